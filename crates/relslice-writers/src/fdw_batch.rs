use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use relslice_db::DatabaseSession;
use relslice_fdw::build_copy_query;
use relslice_graph::{RelationEdge, TableId};
use relslice_schema::Catalog;

use crate::error::WriterError;
use crate::writer::DataWriter;

/// Writes a whole table (or the slice of a table reachable along one relation edge) at
/// a time — the sink the table-level DFS walker uses, since it never looks at
/// individual rows.
pub struct BatchEdgeFdwWriter<'a> {
    target: DatabaseSession<'a>,
    catalog: Arc<Catalog>,
    target_schema: String,
    remote_schema: String,
}

impl<'a> BatchEdgeFdwWriter<'a> {
    pub fn new(target: DatabaseSession<'a>, catalog: Arc<Catalog>, target_schema: String, remote_schema: String) -> Self {
        Self {
            target,
            catalog,
            target_schema,
            remote_schema,
        }
    }

    /// Hands the target session back to the caller, so its pool can be committed or
    /// rolled back once the pool is fully idle again.
    pub fn into_session(self) -> DatabaseSession<'a> {
        self.target
    }

    fn qualified(&self, schema: &str, table: &str) -> String {
        format!("\"{schema}\".\"{table}\"")
    }

    async fn select_tuples(&self, query: &str) -> Result<HashSet<Vec<String>>, WriterError> {
        let rows = self.target.query(query, &[]).await?;
        let mut tuples = HashSet::with_capacity(rows.len());
        for row in &rows {
            let values: Vec<String> = (0..row.len()).map(|i| row.get::<_, String>(i)).collect();
            tuples.insert(values);
        }
        Ok(tuples)
    }
}

fn tuple_list_literal(tuples: &HashSet<Vec<String>>) -> String {
    tuples
        .iter()
        .map(|values| {
            let quoted: Vec<String> = values.iter().map(|v| format!("'{v}'")).collect();
            format!("({})", quoted.join(","))
        })
        .collect::<Vec<_>>()
        .join(",")
}

#[async_trait]
impl<'a> DataWriter for BatchEdgeFdwWriter<'a> {
    async fn write_table(&self, table: TableId, condition: Option<&str>) -> Result<(), WriterError> {
        let schema = self.catalog.table(table)?;
        let query = build_copy_query(schema, &self.target_schema, &self.remote_schema, condition);
        debug!(table = %schema.name, "copying table through FDW");
        self.target.execute(&query, &[]).await?;
        Ok(())
    }

    /// Finds every `edge.target_table` row the already-copied `edge.source_table` rows
    /// on the target point to, excludes rows already present, and copies the rest.
    /// Returns how many new rows were inserted (the walker uses this to decide whether
    /// to keep expanding past `edge.target_table`).
    async fn write_edge(&self, edge: &RelationEdge) -> Result<u64, WriterError> {
        let source_table = self.catalog.table(edge.source_table)?;
        let target_table = self.catalog.table(edge.target_table)?;

        let source_columns = edge.source_key.iter().map(|c| format!("\"{c}\"::text")).collect::<Vec<_>>().join(",");
        let not_null = edge
            .source_key
            .iter()
            .map(|c| format!("\"{c}\" IS NOT NULL"))
            .collect::<Vec<_>>()
            .join(" AND ");
        let select_source_values = format!(
            "SELECT {source_columns} FROM {table} WHERE {not_null}",
            table = self.qualified(&self.target_schema, &source_table.name),
        );
        let source_values = self.select_tuples(&select_source_values).await?;
        if source_values.is_empty() {
            return Ok(0);
        }
        let source_values_literal = tuple_list_literal(&source_values);

        let target_columns = edge.target_key.iter().map(|c| format!("\"{c}\"")).collect::<Vec<_>>().join(",");
        let target_pk_columns = target_table
            .primary_key
            .iter()
            .map(|c| format!("\"{c}\"::text"))
            .collect::<Vec<_>>()
            .join(",");

        let select_new_values = format!(
            "SELECT {target_pk_columns} FROM {remote} WHERE ({target_columns}) IN ({source_values_literal})",
            remote = self.qualified(&self.remote_schema, &target_table.name),
        );
        let mut new_values = self.select_tuples(&select_new_values).await?;

        let select_old_values = format!(
            "SELECT {target_pk_columns} FROM {table}",
            table = self.qualified(&self.target_schema, &target_table.name),
        );
        let old_values = self.select_tuples(&select_old_values).await?;

        for old in &old_values {
            new_values.remove(old);
        }
        if new_values.is_empty() {
            return Ok(0);
        }

        let target_pk_unquoted = target_table
            .primary_key
            .iter()
            .map(|c| format!("\"{c}\""))
            .collect::<Vec<_>>()
            .join(",");
        let condition = format!(
            "({target_pk_unquoted}) IN ({})",
            tuple_list_literal(&new_values)
        );
        let inserted = new_values.len() as u64;
        self.write_table(edge.target_table, Some(&condition)).await?;
        Ok(inserted)
    }
}
