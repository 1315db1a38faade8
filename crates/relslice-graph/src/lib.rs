//! Relation graph and physical-row-identity types shared by the rest of relslice.

mod data_node;
mod edge;
mod relation_graph;
mod table_id;
mod visited;

pub use data_node::DataNode;
pub use edge::RelationEdge;
pub use relation_graph::RelationGraph;
pub use table_id::TableId;
pub use visited::VisitedSet;

#[cfg(test)]
mod tests {
    use super::*;

    fn tid(i: u32) -> TableId {
        TableId::from_index(i)
    }

    fn edge(a: u32, b: u32, src_key: &str, tgt_key: &str) -> RelationEdge {
        RelationEdge::new(tid(a), tid(b), vec![src_key.into()], vec![tgt_key.into()])
    }

    #[test]
    fn add_edge_dedupes_by_full_tuple() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "user_id", "id"));
        g.add_edge(edge(1, 2, "user_id", "id"));
        assert_eq!(g.edge_count(), 1);
    }

    #[test]
    fn distinct_edges_between_same_pair_both_kept() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "user_id", "id"));
        g.add_edge(edge(1, 2, "approver_id", "id"));
        assert_eq!(g.edge_count(), 2);
    }

    #[test]
    fn inverse_flips_every_edge() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "user_id", "id"));
        let inv = g.inverse();
        let inv_edges: Vec<_> = inv.edges().collect();
        assert_eq!(inv_edges.len(), 1);
        assert_eq!(inv_edges[0].source_table, tid(2));
        assert_eq!(inv_edges[0].target_table, tid(1));
        assert_eq!(inv_edges[0].source_key, vec!["id".to_string()]);
        assert_eq!(inv_edges[0].target_key, vec!["user_id".to_string()]);
    }

    #[test]
    fn merge_is_union_of_both_graphs() {
        let mut a = RelationGraph::new();
        a.add_edge(edge(1, 2, "user_id", "id"));
        let mut b = RelationGraph::new();
        b.add_edge(edge(2, 3, "order_id", "id"));
        let merged = a.merge(&b);
        assert_eq!(merged.edge_count(), 2);
    }

    #[test]
    fn without_incoming_drops_edges_targeting_the_table() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "user_id", "id"));
        g.add_edge(edge(3, 2, "owner_id", "id"));
        let restricted = g.without_incoming(tid(2));
        assert_eq!(restricted.edge_count(), 0);
    }

    #[test]
    fn without_outgoing_drops_edges_sourced_from_the_table() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "user_id", "id"));
        g.add_edge(edge(1, 3, "category_id", "id"));
        let restricted = g.without_outgoing(tid(1));
        assert_eq!(restricted.edge_count(), 0);
    }

    #[test]
    fn limit_distance_reaches_beyond_the_first_hop() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "a_id", "id"));
        g.add_edge(edge(2, 3, "b_id", "id"));
        g.add_edge(edge(3, 4, "c_id", "id"));

        let restricted = g.restricted_to_neighborhood(tid(1), 2);
        let targets: Vec<_> = restricted.edges().map(|e| e.target_table).collect();
        assert!(targets.contains(&tid(2)));
        assert!(targets.contains(&tid(3)));
        assert!(!targets.contains(&tid(4)));
    }

    #[test]
    fn subgraph_reachable_from_follows_outgoing_edges_transitively() {
        let mut g = RelationGraph::new();
        g.add_edge(edge(1, 2, "a_id", "id"));
        g.add_edge(edge(2, 3, "b_id", "id"));
        g.add_edge(edge(4, 5, "unrelated", "id"));

        let (subgraph, visited) = g.subgraph_reachable_from([tid(1)]);
        assert_eq!(subgraph.edge_count(), 2);
        assert!(visited.contains(&tid(1)));
        assert!(visited.contains(&tid(2)));
        assert!(visited.contains(&tid(3)));
        assert!(!visited.contains(&tid(4)));
    }

    #[test]
    fn visited_set_keys_only_on_tableoid_and_ctid() {
        let mut visited = VisitedSet::new();
        let a = DataNode::new(tid(1), "(0,1)", 100);
        let b = DataNode::new(tid(99), "(0,1)", 100);
        assert!(visited.insert(&a));
        assert!(visited.contains(&b), "table field must not affect identity");
        assert!(!visited.insert(&b));
    }
}
