use std::collections::VecDeque;

use tracing::debug;

use relslice_graph::{RelationEdge, RelationGraph, TableId};
use relslice_rules::{SourceRules, TableGraphRules};
use relslice_schema::{build_table_graph_from_tables, Catalog};
use relslice_writers::DataWriter;

use crate::error::TraversalError;

/// Walks the table graph two phases at a time, table by table rather than row by row:
/// first "up" through inverted edges from the source tables (pulling in everything a
/// source row could reference), then "down" again from the closure that phase
/// discovered (pulling in everything that references what was just pulled in). Each
/// edge is re-expanded only while the writer reports new rows landed, since an edge
/// that copies nothing new can have nothing new beyond it either.
pub struct TableGraphWalker<'a> {
    catalog: &'a Catalog,
    table_graph_rules: &'a TableGraphRules,
    source_rules: &'a SourceRules,
}

impl<'a> TableGraphWalker<'a> {
    pub fn new(catalog: &'a Catalog, table_graph_rules: &'a TableGraphRules, source_rules: &'a SourceRules) -> Self {
        Self {
            catalog,
            table_graph_rules,
            source_rules,
        }
    }

    fn source_table_ids(&self) -> Result<Vec<TableId>, TraversalError> {
        self.source_rules
            .tables()
            .map(|name| {
                self.catalog
                    .table_by_name(name)
                    .map(|t| t.id)
                    .map_err(|_| TraversalError::UnknownSourceTable(name.to_string()))
            })
            .collect()
    }

    pub async fn run(&self, writer: &dyn DataWriter) -> Result<(), TraversalError> {
        let graph = build_table_graph_from_tables(self.catalog);
        let graph = self.table_graph_rules.update_graph(graph);

        let initial_tables = self.source_table_ids()?;

        debug!("deep copy: upward pass");
        let inverse_graph = graph.inverse();
        let (inv_subgraph, visited_tables) = inverse_graph.subgraph_reachable_from(initial_tables.iter().copied());
        self.deep_copy(writer, &inv_subgraph, initial_tables, false).await?;

        debug!("deep copy: downward pass");
        let (subgraph, _) = graph.subgraph_reachable_from(visited_tables.iter().copied());
        self.deep_copy(writer, &subgraph, visited_tables, true).await?;

        Ok(())
    }

    async fn deep_copy(
        &self,
        writer: &dyn DataWriter,
        graph: &RelationGraph,
        mut initial_tables: Vec<TableId>,
        from_existing: bool,
    ) -> Result<(), TraversalError> {
        let mut edges: VecDeque<RelationEdge> = VecDeque::new();

        while let Some(table) = initial_tables.pop() {
            if !from_existing {
                let table_name = self.catalog.table(table)?.name.clone();
                let condition = self.source_rules.where_condition(&table_name);
                writer.write_table(table, condition).await?;
            }
            for edge in graph.edges_from(table) {
                edges.push_back(edge.clone());
            }
        }

        while let Some(edge) = edges.pop_front() {
            let new_rows = writer.write_edge(&edge).await?;
            if new_rows > 0 {
                for next_edge in graph.edges_from(edge.target_table) {
                    edges.push_back(next_edge.clone());
                }
            }
        }
        Ok(())
    }
}
