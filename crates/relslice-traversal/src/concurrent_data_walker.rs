use std::collections::VecDeque;

use futures::future::try_join_all;
use tracing::debug;

use relslice_db::{ConnectionPool, DatabaseSession};
use relslice_graph::{DataNode, RelationEdge, RelationGraph, VisitedSet};
use relslice_rules::{DataGraphRules, SourceRules, TableGraphRules};
use relslice_schema::{build_table_graph_from_tables, Catalog};
use relslice_writers::DataWriter;

use crate::error::TraversalError;
use crate::queries::{next_node_fragment, start_node_query};

/// Structural twin of [`crate::DataGraphWalker`]: the outer BFS loop is still
/// sequential, but the I/O for a single node — every outgoing edge's successor query,
/// and every source-rule table's start-node query — fans out concurrently over a
/// bounded connection pool instead of running one query at a time. Emission still
/// happens from the loop, one node at a time, so sink reentrancy is never an issue.
pub struct ConcurrentDataGraphWalker<'a> {
    pool: &'a ConnectionPool,
    catalog: &'a Catalog,
    table_graph_rules: &'a TableGraphRules,
    data_graph_rules: &'a DataGraphRules,
    source_rules: &'a SourceRules,
}

impl<'a> ConcurrentDataGraphWalker<'a> {
    pub fn new(
        pool: &'a ConnectionPool,
        catalog: &'a Catalog,
        table_graph_rules: &'a TableGraphRules,
        data_graph_rules: &'a DataGraphRules,
        source_rules: &'a SourceRules,
    ) -> Self {
        Self {
            pool,
            catalog,
            table_graph_rules,
            data_graph_rules,
            source_rules,
        }
    }

    fn symmetric_table_graph(&self) -> RelationGraph {
        let graph = build_table_graph_from_tables(self.catalog);
        let graph = graph.merge(&graph.inverse());
        self.table_graph_rules.update_graph(graph)
    }

    async fn find_start_nodes(&self) -> Result<Vec<DataNode>, TraversalError> {
        let fetches = self.source_rules.tables().map(|table_name| self.select_start_nodes(table_name));
        let batches = try_join_all(fetches).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn select_start_nodes(&self, table_name: &str) -> Result<Vec<DataNode>, TraversalError> {
        let table = self
            .catalog
            .table_by_name(table_name)
            .map_err(|_| TraversalError::UnknownSourceTable(table_name.to_string()))?;
        let condition = self
            .source_rules
            .where_condition(table_name)
            .expect("table came from source_rules.tables()");
        let query = start_node_query(&table.name, condition);

        let session = DatabaseSession::acquire(self.pool).await;
        let rows = session.query(&query, &[]).await;
        session.release().await;
        let rows = rows?;

        Ok(rows
            .into_iter()
            .map(|row| DataNode::new(table.id, row.get::<_, String>(0), row.get::<_, u32>(1)))
            .collect())
    }

    async fn find_next_nodes(&self, node: &DataNode, graph: &RelationGraph) -> Result<Vec<DataNode>, TraversalError> {
        let fetches = graph.edges_from(node.table).map(|edge| self.select_next_nodes(node, edge));
        let batches = try_join_all(fetches).await?;
        Ok(batches.into_iter().flatten().collect())
    }

    async fn select_next_nodes(&self, node: &DataNode, edge: &RelationEdge) -> Result<Vec<DataNode>, TraversalError> {
        let source_table = self.catalog.table(edge.source_table)?;
        let target_table = self.catalog.table(edge.target_table)?;

        let mut fragment = next_node_fragment(&source_table.name, &target_table.name, node, edge);
        self.data_graph_rules.enrich(&mut fragment, node, edge);

        let session = DatabaseSession::acquire(self.pool).await;
        let rows = session.query(&fragment.render(), &[]).await;
        session.release().await;
        let rows = rows?;

        Ok(rows
            .into_iter()
            .map(|row| DataNode::new(edge.target_table, row.get::<_, String>(0), row.get::<_, u32>(1)))
            .collect())
    }

    pub async fn run(&self, writer: &dyn DataWriter) -> Result<(), TraversalError> {
        let graph = self.symmetric_table_graph();

        debug!(pool_capacity = self.pool.capacity(), "finding start nodes concurrently");
        let start_nodes = self.find_start_nodes().await?;
        let mut visited = VisitedSet::from_nodes(start_nodes.iter());
        let mut queue: VecDeque<DataNode> = start_nodes.into_iter().collect();

        while let Some(node) = queue.pop_front() {
            writer.write_node(&node).await?;
            for next_node in self.find_next_nodes(&node, &graph).await? {
                if visited.insert(&next_node) {
                    queue.push_back(next_node);
                }
            }
        }
        Ok(())
    }
}
