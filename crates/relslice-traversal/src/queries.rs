use relslice_graph::{DataNode, RelationEdge};
use relslice_rules::QueryFragment;

pub fn start_node_query(table_name: &str, condition: &str) -> String {
    format!("SELECT ctid, tableoid FROM \"{table_name}\" WHERE {condition}")
}

pub fn next_node_fragment(source_table_name: &str, target_table_name: &str, node: &DataNode, edge: &RelationEdge) -> QueryFragment {
    let target_keys = edge.target_key.iter().map(|k| format!("\"{k}\"")).collect::<Vec<_>>().join(",");
    let source_keys = edge.source_key.iter().map(|k| format!("\"{k}\"")).collect::<Vec<_>>().join(",");

    QueryFragment::new(format!(
        "SELECT ctid, tableoid FROM \"{target_table_name}\" WHERE ({target_keys}) = \
         (SELECT ({source_keys}) FROM \"{source_table_name}\" WHERE ctid = '{ctid}' AND tableoid = '{tableoid}')",
        ctid = node.ctid,
        tableoid = node.tableoid,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use relslice_graph::TableId;

    #[test]
    fn start_node_query_selects_ctid_and_tableoid_with_the_given_condition() {
        let query = start_node_query("users", "id = 1");
        assert_eq!(query, "SELECT ctid, tableoid FROM \"users\" WHERE id = 1");
    }

    #[test]
    fn next_node_fragment_joins_on_the_edge_keys_from_the_node_identity() {
        let node = DataNode::new(TableId::from_index(1), "(0,1)".to_string(), 16399);
        let edge = RelationEdge::new(
            TableId::from_index(1),
            TableId::from_index(2),
            vec!["id".into()],
            vec!["user_id".into()],
        );

        let fragment = next_node_fragment("users", "orders", &node, &edge);
        let rendered = fragment.render();

        assert_eq!(
            rendered,
            "SELECT ctid, tableoid FROM \"orders\" WHERE (\"user_id\") = \
             (SELECT (\"id\") FROM \"users\" WHERE ctid = '(0,1)' AND tableoid = '16399')"
        );
    }

    #[test]
    fn next_node_fragment_handles_composite_keys() {
        let node = DataNode::new(TableId::from_index(1), "(2,3)".to_string(), 16400);
        let edge = RelationEdge::new(
            TableId::from_index(1),
            TableId::from_index(2),
            vec!["a".into(), "b".into()],
            vec!["x".into(), "y".into()],
        );

        let fragment = next_node_fragment("left_table", "right_table", &node, &edge);
        assert!(fragment.render().contains("(\"x\",\"y\") = "));
        assert!(fragment.render().contains("(\"a\",\"b\")"));
    }
}
