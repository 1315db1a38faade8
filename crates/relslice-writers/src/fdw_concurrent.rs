use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tokio::task::JoinSet;
use tracing::debug;

use relslice_db::{ConnectionPool, DatabaseSession};
use relslice_fdw::{build_copy_query, remote_tableoid_for};
use relslice_graph::DataNode;
use relslice_schema::Catalog;

use crate::error::WriterError;
use crate::writer::DataWriter;

/// Like [`crate::SingleRowFdwWriter`] but `write_node` hands the insert off to a
/// background task and returns immediately, instead of waiting for it to land — the
/// Rust shape of the original's `run_in_background` + module-level `background_tasks`
/// list. Every outstanding task must be drained with [`Self::finish`] before the
/// caller commits the target transaction, or some inserts may never have executed.
pub struct ConcurrentSingleRowFdwWriter {
    pool: Arc<ConnectionPool>,
    catalog: Arc<Catalog>,
    tableoid_map: Arc<HashMap<u32, u32>>,
    target_schema: Arc<str>,
    remote_schema: Arc<str>,
    tasks: Mutex<JoinSet<Result<(), WriterError>>>,
}

impl ConcurrentSingleRowFdwWriter {
    pub fn new(
        pool: Arc<ConnectionPool>,
        catalog: Arc<Catalog>,
        tableoid_map: HashMap<u32, u32>,
        target_schema: impl Into<Arc<str>>,
        remote_schema: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            pool,
            catalog,
            tableoid_map: Arc::new(tableoid_map),
            target_schema: target_schema.into(),
            remote_schema: remote_schema.into(),
            tasks: Mutex::new(JoinSet::new()),
        }
    }

    /// Awaits every write spawned so far, surfacing the first error encountered. Later
    /// tasks are still drained even after a failure, so none are left dangling on the
    /// pool past the caller's commit/rollback decision.
    pub async fn finish(&self) -> Result<(), WriterError> {
        let mut tasks = self.tasks.lock().await;
        let mut first_error = None;
        while let Some(joined) = tasks.join_next().await {
            let result = joined.expect("background write task panicked");
            if let Err(error) = result {
                first_error.get_or_insert(error);
            }
        }
        match first_error {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl DataWriter for ConcurrentSingleRowFdwWriter {
    async fn write_node(&self, node: &DataNode) -> Result<(), WriterError> {
        let table = self.catalog.table(node.table)?.clone();
        let remote_tableoid = remote_tableoid_for(&self.tableoid_map, node.tableoid)?;
        let condition = format!("ctid = '{}' AND tableoid = '{}'", node.ctid, remote_tableoid);
        let target_schema = Arc::clone(&self.target_schema);
        let remote_schema = Arc::clone(&self.remote_schema);
        let pool = Arc::clone(&self.pool);

        let mut tasks = self.tasks.lock().await;
        tasks.spawn(async move {
            let query = build_copy_query(&table, &target_schema, &remote_schema, Some(&condition));
            debug!(table = %table.name, "copying single row through FDW (background)");
            let session = DatabaseSession::acquire(&pool).await;
            let result = session.execute(&query, &[]).await;
            session.release().await;
            result.map(|_| ()).map_err(WriterError::from)
        });
        Ok(())
    }
}
