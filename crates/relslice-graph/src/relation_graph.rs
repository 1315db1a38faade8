use std::collections::HashSet;

use petgraph::graphmap::DiGraphMap;

use crate::edge::RelationEdge;
use crate::table_id::TableId;

/// Directed multigraph of tables.
///
/// Backed by `DiGraphMap<TableId, HashSet<RelationEdge>>`: a single directed edge
/// `a -> b` in the underlying graph carries the *set* of `RelationEdge`s between those
/// two tables (there can be more than one FK relating the same pair). Adding an edge
/// unions into that set rather than overwriting it — the adjacency-set union the spec
/// calls `safe_merge`.
#[derive(Clone, Debug, Default)]
pub struct RelationGraph {
    inner: DiGraphMap<TableId, HashSet<RelationEdge>>,
}

impl RelationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_edge(&mut self, edge: RelationEdge) {
        let (a, b) = (edge.source_table, edge.target_table);
        if !self.inner.contains_node(a) {
            self.inner.add_node(a);
        }
        if !self.inner.contains_node(b) {
            self.inner.add_node(b);
        }
        match self.inner.edge_weight_mut(a, b) {
            Some(set) => {
                set.insert(edge);
            }
            None => {
                let mut set = HashSet::new();
                set.insert(edge);
                self.inner.add_edge(a, b, set);
            }
        }
    }

    /// Ensures `table` is present as a node even if it has no incident edges yet.
    pub fn add_node(&mut self, table: TableId) {
        self.inner.add_node(table);
    }

    pub fn contains_node(&self, table: TableId) -> bool {
        self.inner.contains_node(table)
    }

    pub fn nodes(&self) -> impl Iterator<Item = TableId> + '_ {
        self.inner.nodes()
    }

    /// All edges whose `source_table` is `table`.
    pub fn edges_from(&self, table: TableId) -> impl Iterator<Item = &RelationEdge> + '_ {
        self.inner
            .edges(table)
            .flat_map(|(_, _, edges)| edges.iter())
    }

    pub fn edges(&self) -> impl Iterator<Item = &RelationEdge> + '_ {
        self.inner.all_edges().flat_map(|(_, _, edges)| edges.iter())
    }

    pub fn edge_count(&self) -> usize {
        self.edges().count()
    }

    pub fn node_count(&self) -> usize {
        self.inner.node_count()
    }

    /// The same graph with every edge reversed.
    pub fn inverse(&self) -> RelationGraph {
        let mut out = RelationGraph::new();
        for table in self.inner.nodes() {
            out.add_node(table);
        }
        for edge in self.edges() {
            out.add_edge(edge.inverted());
        }
        out
    }

    /// Adjacency-set union of two graphs (the symmetric-closure step: `G + G.inverse()`).
    pub fn merge(&self, other: &RelationGraph) -> RelationGraph {
        let mut out = self.clone();
        for table in other.inner.nodes() {
            out.add_node(table);
        }
        for edge in other.edges() {
            out.add_edge(edge.clone());
        }
        out
    }

    /// `no_enter(t)`: remove all incoming edges of `t` (implemented by inverting,
    /// dropping `t`'s adjacency, inverting back — self-loops on `t` are removed too).
    pub fn without_incoming(&self, table: TableId) -> RelationGraph {
        let mut inv = self.inverse();
        inv.remove_adjacency(table);
        inv.inverse()
    }

    /// `no_exit(t)`: remove all outgoing edges of `t`.
    pub fn without_outgoing(&self, table: TableId) -> RelationGraph {
        let mut out = self.clone();
        out.remove_adjacency(table);
        out
    }

    /// Drops every edge whose `source_table` is `table`, and the node itself if isolated.
    fn remove_adjacency(&mut self, table: TableId) {
        if !self.inner.contains_node(table) {
            return;
        }
        let targets: Vec<TableId> = self
            .inner
            .neighbors(table)
            .collect();
        for target in targets {
            self.inner.remove_edge(table, target);
        }
    }

    /// True breadth-first restriction of the graph to the `max_distance`-neighborhood of
    /// `table` (walking only outgoing edges from `table` outward). See SPEC_FULL.md §9 for
    /// why this departs from the original's effectively-distance-1-only behavior.
    pub fn restricted_to_neighborhood(&self, table: TableId, max_distance: u32) -> RelationGraph {
        let mut out = RelationGraph::new();
        if max_distance == 0 || !self.inner.contains_node(table) {
            return out;
        }

        let mut frontier = vec![table];
        let mut visited = HashSet::new();
        visited.insert(table);

        for _distance in 1..=max_distance {
            let mut next_frontier = Vec::new();
            for node in frontier {
                for edge in self.edges_from(node) {
                    out.add_edge(edge.clone());
                    if visited.insert(edge.target_table) {
                        next_frontier.push(edge.target_table);
                    }
                }
            }
            frontier = next_frontier;
            if frontier.is_empty() {
                break;
            }
        }

        out
    }

    /// Extracts the subgraph reachable from `source` by depth-first traversal of
    /// outgoing edges, along with the set of tables visited. Used both to print a
    /// schema diagram rooted at a set of tables and, inverted, to discover every table a
    /// walk could touch before any data is read.
    pub fn subgraph_reachable_from(&self, source: impl IntoIterator<Item = TableId>) -> (RelationGraph, Vec<TableId>) {
        let mut to_visit: Vec<TableId> = source.into_iter().collect();
        let mut visited = HashSet::new();
        let mut subgraph = RelationGraph::new();

        while let Some(table) = to_visit.pop() {
            if !visited.insert(table) {
                continue;
            }
            subgraph.add_node(table);
            for edge in self.edges_from(table) {
                subgraph.add_edge(edge.clone());
                to_visit.push(edge.target_table);
            }
        }

        (subgraph, visited.into_iter().collect())
    }
}
