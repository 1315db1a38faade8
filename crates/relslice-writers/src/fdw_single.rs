use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use relslice_db::DatabaseSession;
use relslice_fdw::{build_copy_query, remote_tableoid_for};
use relslice_graph::DataNode;
use relslice_schema::Catalog;

use crate::error::WriterError;
use crate::writer::DataWriter;

/// Writes one row at a time through the FDW bridge — the sink row-level walkers (the
/// BFS over individual `DataNode`s) use.
pub struct SingleRowFdwWriter<'a> {
    target: DatabaseSession<'a>,
    catalog: Arc<Catalog>,
    tableoid_map: HashMap<u32, u32>,
    target_schema: String,
    remote_schema: String,
}

impl<'a> SingleRowFdwWriter<'a> {
    pub fn new(
        target: DatabaseSession<'a>,
        catalog: Arc<Catalog>,
        tableoid_map: HashMap<u32, u32>,
        target_schema: String,
        remote_schema: String,
    ) -> Self {
        Self {
            target,
            catalog,
            tableoid_map,
            target_schema,
            remote_schema,
        }
    }

    /// Hands the target session back to the caller, so its pool can be committed or
    /// rolled back once the pool is fully idle again.
    pub fn into_session(self) -> DatabaseSession<'a> {
        self.target
    }
}

#[async_trait]
impl<'a> DataWriter for SingleRowFdwWriter<'a> {
    async fn write_node(&self, node: &DataNode) -> Result<(), WriterError> {
        let table = self.catalog.table(node.table)?;
        let remote_tableoid = remote_tableoid_for(&self.tableoid_map, node.tableoid)?;
        let condition = format!("ctid = '{}' AND tableoid = '{}'", node.ctid, remote_tableoid);
        let query = build_copy_query(table, &self.target_schema, &self.remote_schema, Some(&condition));
        debug!(table = %table.name, %node.ctid, "copying single row through FDW");
        self.target.execute(&query, &[]).await?;
        Ok(())
    }
}
