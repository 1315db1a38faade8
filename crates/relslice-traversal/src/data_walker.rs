use std::collections::VecDeque;

use tracing::debug;

use relslice_db::DatabaseSession;
use relslice_graph::{DataNode, RelationGraph, VisitedSet};
use relslice_rules::{DataGraphRules, SourceRules, TableGraphRules};
use relslice_schema::{build_table_graph_from_tables, Catalog};
use relslice_writers::DataWriter;

use crate::error::TraversalError;
use crate::queries::{next_node_fragment, start_node_query};

/// Runs a breadth-first search over individual rows, starting from the rows each
/// source rule selects and following the symmetric closure of the relation graph one
/// foreign-key hop at a time. Emits each node to `writer` the moment it's dequeued,
/// before its successors are looked up — a node already pushed for copy never blocks on
/// the rest of the walk.
pub struct DataGraphWalker<'a> {
    source: DatabaseSession<'a>,
    catalog: &'a Catalog,
    table_graph_rules: &'a TableGraphRules,
    data_graph_rules: &'a DataGraphRules,
    source_rules: &'a SourceRules,
}

impl<'a> DataGraphWalker<'a> {
    pub fn new(
        source: DatabaseSession<'a>,
        catalog: &'a Catalog,
        table_graph_rules: &'a TableGraphRules,
        data_graph_rules: &'a DataGraphRules,
        source_rules: &'a SourceRules,
    ) -> Self {
        Self {
            source,
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
        let mut start_nodes = Vec::new();
        for table_name in self.source_rules.tables() {
            let table = self
                .catalog
                .table_by_name(table_name)
                .map_err(|_| TraversalError::UnknownSourceTable(table_name.to_string()))?;
            let condition = self
                .source_rules
                .where_condition(table_name)
                .expect("table came from source_rules.tables()");
            let query = start_node_query(&table.name, condition);
            let rows = self.source.query(&query, &[]).await?;
            for row in rows {
                let ctid: String = row.get(0);
                let tableoid: u32 = row.get(1);
                start_nodes.push(DataNode::new(table.id, ctid, tableoid));
            }
        }
        Ok(start_nodes)
    }

    async fn find_next_nodes(
        &self,
        node: &DataNode,
        graph: &RelationGraph,
    ) -> Result<Vec<DataNode>, TraversalError> {
        let mut next_nodes = Vec::new();
        for edge in graph.edges_from(node.table) {
            let source_table = self.catalog.table(edge.source_table)?;
            let target_table = self.catalog.table(edge.target_table)?;

            let mut fragment = next_node_fragment(&source_table.name, &target_table.name, node, edge);
            self.data_graph_rules.enrich(&mut fragment, node, edge);

            let rows = self.source.query(&fragment.render(), &[]).await?;
            for row in rows {
                let ctid: String = row.get(0);
                let tableoid: u32 = row.get(1);
                next_nodes.push(DataNode::new(edge.target_table, ctid, tableoid));
            }
        }
        Ok(next_nodes)
    }

    pub async fn run(&self, writer: &dyn DataWriter) -> Result<(), TraversalError> {
        let graph = self.symmetric_table_graph();

        debug!("finding start nodes");
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
