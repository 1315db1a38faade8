mod data_graph_rules;
mod error;
mod loader;
mod source_rules;
mod table_graph_rules;

pub use data_graph_rules::{DataGraphRuleSpec, DataGraphRules, QueryFragment};
pub use error::RuleLoadError;
pub use loader::RuleSet;
pub use source_rules::SourceRules;
pub use table_graph_rules::{TableGraphRuleSpec, TableGraphRules};

#[cfg(test)]
mod tests {
    use super::*;
    use relslice_graph::{RelationEdge, RelationGraph, TableId};
    use serde_json::json;

    fn table(n: u32) -> TableId {
        TableId::from_index(n)
    }

    #[test]
    fn loads_source_and_traversal_rules_from_a_document() {
        let document = json!({
            "source_rules": [
                {"table": "orders", "where": "id = 1"},
            ],
            "traversal_rules": [
                {"type": "no_enter", "values": [{"table": "audit_log"}]},
                {"type": "no_exit", "values": [{"table": "users", "where": "deleted = false"}]},
                {"type": "limit_distance", "values": [{"table": "tags", "max_distance": 2}]},
            ],
        });

        let rule_set = RuleSet::from_document(&document).expect("valid rule document");
        assert_eq!(rule_set.source_rules.where_condition("orders"), Some("id = 1"));
        assert_eq!(rule_set.table_graph_rules.len(), 2);
        assert_eq!(rule_set.data_graph_rules.len(), 1);
    }

    #[test]
    fn rejects_duplicate_source_rule_tables() {
        let document = json!({
            "source_rules": [
                {"table": "orders", "where": "id = 1"},
                {"table": "orders", "where": "id = 2"},
            ],
            "traversal_rules": [],
        });

        let err = RuleSet::from_document(&document).unwrap_err();
        assert!(matches!(err, RuleLoadError::DuplicateSourceTable { .. }));
    }

    #[test]
    fn rejects_source_rule_missing_where() {
        let document = json!({
            "source_rules": [{"table": "orders"}],
            "traversal_rules": [],
        });
        let err = RuleSet::from_document(&document).unwrap_err();
        assert!(matches!(err, RuleLoadError::Invalid { .. }));
    }

    #[test]
    fn rejects_unknown_traversal_rule_type() {
        let document = json!({
            "source_rules": [],
            "traversal_rules": [
                {"type": "teleport", "values": [{"table": "orders"}]},
            ],
        });
        let err = RuleSet::from_document(&document).unwrap_err();
        assert!(matches!(err, RuleLoadError::UnknownRuleType { .. }));
    }

    #[test]
    fn rejects_limit_distance_with_a_where_clause() {
        let document = json!({
            "source_rules": [],
            "traversal_rules": [
                {"type": "limit_distance", "values": [{"table": "tags", "where": "1 = 1"}]},
            ],
        });
        let err = RuleSet::from_document(&document).unwrap_err();
        assert!(matches!(err, RuleLoadError::UnsupportedDataGraphRule { .. }));
    }

    #[test]
    fn table_graph_rules_apply_in_order_and_limit_distance_replaces_the_graph() {
        let mut graph = RelationGraph::new();
        graph.add_edge(RelationEdge::new(table(1), table(2), vec!["id".into()], vec!["a_id".into()]));
        graph.add_edge(RelationEdge::new(table(2), table(3), vec!["id".into()], vec!["b_id".into()]));

        let specs = vec![TableGraphRuleSpec::LimitDistance {
            table: "a".to_string(),
            max_distance: 1,
        }];
        let resolve = |name: &str| match name {
            "a" => Some(table(1)),
            _ => None,
        };
        let rules = TableGraphRules::resolve(&specs, resolve).unwrap();
        let restricted = rules.update_graph(graph);

        assert!(restricted.contains_node(table(1)));
        assert!(restricted.contains_node(table(2)));
        assert!(!restricted.contains_node(table(3)));
    }

    #[test]
    fn data_graph_rules_enrich_no_enter_and_no_exit() {
        let specs = vec![
            DataGraphRuleSpec::NoEnter {
                table: "orders".to_string(),
                where_clause: "archived".to_string(),
            },
            DataGraphRuleSpec::NoExit {
                table: "users".to_string(),
                where_clause: "banned".to_string(),
            },
        ];
        let resolve = |name: &str| match name {
            "orders" => Some((table(2), "\"orders\"".to_string())),
            "users" => Some((table(1), "\"users\"".to_string())),
            _ => None,
        };
        let rules = DataGraphRules::resolve(&specs, resolve).unwrap();

        let edge = RelationEdge::new(table(1), table(2), vec!["id".into()], vec!["user_id".into()]);
        let node = relslice_graph::DataNode::new(table(1), "(0,1)".to_string(), 16399);

        let mut fragment = QueryFragment::new("SELECT ctid, tableoid FROM users");
        rules.enrich(&mut fragment, &node, &edge);
        let rendered = fragment.render();

        assert!(rendered.contains("NOT (archived)"));
        assert!(rendered.contains("NOT EXISTS (SELECT 1 FROM \"users\" WHERE ctid = '(0,1)' AND (banned))"));
    }

    #[test]
    fn data_graph_rules_resolve_fails_on_unknown_table() {
        let specs = vec![DataGraphRuleSpec::NoEnter {
            table: "ghost".to_string(),
            where_clause: "1 = 1".to_string(),
        }];
        let err = DataGraphRules::resolve(&specs, |_| None).unwrap_err();
        assert!(matches!(err, RuleLoadError::TableNotFound { .. }));
    }
}
