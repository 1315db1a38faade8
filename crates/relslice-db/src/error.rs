use thiserror::Error;

#[derive(Debug, Error)]
pub enum DbError {
    #[error("invalid connection string '{dsn}': {reason}")]
    InvalidDsn { dsn: String, reason: String },

    #[error("database connection failed: {0}")]
    Connect(#[source] tokio_postgres::Error),

    #[error("database query failed: {0}")]
    Query(#[from] tokio_postgres::Error),

    #[error("connection pool closed while waiting for a connection")]
    PoolClosed,
}
