use relslice_rules::{DataGraphRuleSpec, DataGraphRules, RuleSet, TableGraphRuleSpec, TableGraphRules};

use crate::catalog::Catalog;
use crate::error::SchemaError;

/// Resolves every table-name-keyed rule in `rule_set` against `catalog`, turning them
/// into the `TableId`-keyed structures the graph and traversal crates operate on.
pub struct ResolvedRules {
    pub table_graph_rules: TableGraphRules,
    pub data_graph_rules: DataGraphRules,
}

pub fn resolve_rules(rule_set: &RuleSet, catalog: &Catalog) -> Result<ResolvedRules, SchemaError> {
    let table_graph_rules = resolve_table_graph_rules(&rule_set.table_graph_rules, catalog)?;
    let data_graph_rules = resolve_data_graph_rules(&rule_set.data_graph_rules, catalog)?;
    Ok(ResolvedRules {
        table_graph_rules,
        data_graph_rules,
    })
}

pub fn resolve_table_graph_rules(
    specs: &[TableGraphRuleSpec],
    catalog: &Catalog,
) -> Result<TableGraphRules, SchemaError> {
    TableGraphRules::resolve(specs, |name| catalog.resolve(name)).map_err(SchemaError::from)
}

pub fn resolve_data_graph_rules(specs: &[DataGraphRuleSpec], catalog: &Catalog) -> Result<DataGraphRules, SchemaError> {
    DataGraphRules::resolve(specs, |name| catalog.resolve_with_name(name)).map_err(SchemaError::from)
}
