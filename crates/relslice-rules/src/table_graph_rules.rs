use relslice_graph::{RelationGraph, TableId};

use crate::error::RuleLoadError;

/// A table-graph rule as parsed from the rule file, before the named table has been
/// resolved against a `Catalog`.
#[derive(Debug, Clone)]
pub enum TableGraphRuleSpec {
    NoEnter { table: String },
    NoExit { table: String },
    LimitDistance { table: String, max_distance: u32 },
}

impl TableGraphRuleSpec {
    pub fn table(&self) -> &str {
        match self {
            TableGraphRuleSpec::NoEnter { table }
            | TableGraphRuleSpec::NoExit { table }
            | TableGraphRuleSpec::LimitDistance { table, .. } => table,
        }
    }
}

/// Table-graph rules resolved against a concrete schema, ready to reshape a
/// `RelationGraph`. Applied in list order; `LimitDistance` replaces the whole working
/// graph with just the neighborhood it computes (matching the original's behavior —
/// see SPEC_FULL.md §4.2).
#[derive(Debug, Clone, Default)]
pub struct TableGraphRules {
    rules: Vec<ResolvedTableGraphRule>,
}

#[derive(Debug, Clone)]
enum ResolvedTableGraphRule {
    NoEnter(TableId),
    NoExit(TableId),
    LimitDistance(TableId, u32),
}

impl TableGraphRules {
    pub fn resolve(
        specs: &[TableGraphRuleSpec],
        resolve_table: impl Fn(&str) -> Option<TableId>,
    ) -> Result<Self, RuleLoadError> {
        let mut rules = Vec::with_capacity(specs.len());
        for spec in specs {
            let table = resolve_table(spec.table()).ok_or_else(|| RuleLoadError::TableNotFound {
                table: spec.table().to_string(),
            })?;
            rules.push(match spec {
                TableGraphRuleSpec::NoEnter { .. } => ResolvedTableGraphRule::NoEnter(table),
                TableGraphRuleSpec::NoExit { .. } => ResolvedTableGraphRule::NoExit(table),
                TableGraphRuleSpec::LimitDistance { max_distance, .. } => {
                    ResolvedTableGraphRule::LimitDistance(table, *max_distance)
                }
            });
        }
        Ok(Self { rules })
    }

    pub fn update_graph(&self, mut graph: RelationGraph) -> RelationGraph {
        for rule in &self.rules {
            graph = match rule {
                ResolvedTableGraphRule::NoEnter(t) => graph.without_incoming(*t),
                ResolvedTableGraphRule::NoExit(t) => graph.without_outgoing(*t),
                ResolvedTableGraphRule::LimitDistance(t, d) => graph.restricted_to_neighborhood(*t, *d),
            };
        }
        graph
    }
}
