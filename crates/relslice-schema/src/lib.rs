//! Database catalog reflection, table-graph construction, rule resolution and schema
//! cloning.

mod catalog;
mod cloner;
mod error;
mod plantuml;
mod reflect;
mod rules;
mod table_graph_builder;
mod table_schema;

pub use catalog::Catalog;
pub use cloner::{clone_extensions, clone_schema, clone_sequences, clone_table_shells, clone_user_types, delete_all_data, recreate_schema};
pub use error::SchemaError;
pub use plantuml::render_plantuml;
pub use reflect::reflect_catalog;
pub use rules::{resolve_data_graph_rules, resolve_rules, resolve_table_graph_rules, ResolvedRules};
pub use table_graph_builder::build_table_graph_from_tables;
pub use table_schema::{ColumnSchema, ForeignKeyConstraint, TableSchema};

#[cfg(test)]
mod tests {
    use super::*;
    use relslice_rules::{DataGraphRuleSpec, TableGraphRuleSpec};

    fn catalog_with_users_and_orders() -> Catalog {
        let mut catalog = Catalog::new();
        let users = catalog.intern("users");
        let orders = catalog.intern("orders");

        catalog.table_mut(users).primary_key = vec!["id".to_string()];
        catalog.table_mut(orders).primary_key = vec!["id".to_string()];
        catalog.table_mut(orders).foreign_keys.push(ForeignKeyConstraint {
            name: "orders_user_id_fkey".to_string(),
            columns: vec!["user_id".to_string()],
            referred_table: "users".to_string(),
            referred_columns: vec!["id".to_string()],
        });

        catalog
    }

    #[test]
    fn builds_a_forward_edge_for_a_plain_foreign_key() {
        let catalog = catalog_with_users_and_orders();
        let graph = build_table_graph_from_tables(&catalog);
        assert_eq!(graph.edge_count(), 1);
        let edge = graph.edges().next().unwrap();
        assert_eq!(edge.source_table, catalog.table_id("orders").unwrap());
        assert_eq!(edge.target_table, catalog.table_id("users").unwrap());
    }

    #[test]
    fn one_to_one_foreign_key_adds_both_directions() {
        let mut catalog = Catalog::new();
        let users = catalog.intern("users");
        let profiles = catalog.intern("profiles");
        catalog.table_mut(users).primary_key = vec!["id".to_string()];
        catalog.table_mut(profiles).primary_key = vec!["user_id".to_string()];
        catalog.table_mut(profiles).foreign_keys.push(ForeignKeyConstraint {
            name: "profiles_user_id_fkey".to_string(),
            columns: vec!["user_id".to_string()],
            referred_table: "users".to_string(),
            referred_columns: vec!["id".to_string()],
        });

        let graph = build_table_graph_from_tables(&catalog);
        assert_eq!(graph.edge_count(), 2);
    }

    #[test]
    fn resolves_table_graph_and_data_graph_rules_against_the_catalog() {
        let catalog = catalog_with_users_and_orders();
        let table_graph_specs = vec![TableGraphRuleSpec::NoExit {
            table: "orders".to_string(),
        }];
        let data_graph_specs = vec![DataGraphRuleSpec::NoEnter {
            table: "users".to_string(),
            where_clause: "banned".to_string(),
        }];

        let resolved = resolve_rules(
            &relslice_rules::RuleSet {
                source_rules: relslice_rules::SourceRules::new(),
                table_graph_rules: table_graph_specs,
                data_graph_rules: data_graph_specs,
            },
            &catalog,
        )
        .unwrap();

        let graph = build_table_graph_from_tables(&catalog);
        let restricted = resolved.table_graph_rules.update_graph(graph);
        assert_eq!(restricted.edge_count(), 0);
    }

    #[test]
    fn plantuml_rendering_includes_every_node_and_edge() {
        let catalog = catalog_with_users_and_orders();
        let graph = build_table_graph_from_tables(&catalog);
        let rendered = render_plantuml(&graph, &catalog);
        assert!(rendered.starts_with("@startuml\n"));
        assert!(rendered.contains("class users"));
        assert!(rendered.contains("class orders"));
        assert!(rendered.contains("\"user_id\" --> \"id\""));
        assert!(!rendered.contains('['));
        assert!(rendered.trim_end().ends_with("@enduml"));
    }
}
