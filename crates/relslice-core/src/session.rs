use tokio_postgres::{Client, NoTls};
use tracing::error;

use relslice_db::DbError;

/// Opens a single, unpooled connection and spawns its driver task, same as
/// [`relslice_db::ConnectionPool::connect`] does per pooled slot — used where only one
/// short-lived connection is needed (schema reflection, schema cloning, `clear-data`)
/// and a whole pool would be overkill.
pub async fn connect_one(dsn: &str) -> Result<Client, DbError> {
    let (client, connection) = tokio_postgres::connect(dsn, NoTls).await.map_err(DbError::Connect)?;
    tokio::spawn(async move {
        if let Err(error) = connection.await {
            error!(%error, "postgres connection driver exited with an error");
        }
    });
    Ok(client)
}
