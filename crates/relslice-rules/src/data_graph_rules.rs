use std::collections::HashMap;

use relslice_graph::{DataNode, RelationEdge, TableId};

use crate::error::RuleLoadError;

/// A data-graph rule as parsed from the rule file: a `(table, where)` pair that will
/// narrow a successor-discovery query at runtime.
#[derive(Debug, Clone)]
pub enum DataGraphRuleSpec {
    NoEnter { table: String, where_clause: String },
    NoExit { table: String, where_clause: String },
}

impl DataGraphRuleSpec {
    pub fn table(&self) -> &str {
        match self {
            DataGraphRuleSpec::NoEnter { table, .. } | DataGraphRuleSpec::NoExit { table, .. } => table,
        }
    }
}

/// A `SELECT ctid, tableoid ...` query under construction, plus the predicates data-graph
/// rules have appended so far.
///
/// Modeled as a reducer over appended predicate clauses rather than repeated string
/// concatenation, per SPEC_FULL.md §4.5 / spec §9's "not string splicing" guidance —
/// the query is rendered exactly once, at the end.
#[derive(Debug, Clone)]
pub struct QueryFragment {
    base: String,
    predicates: Vec<String>,
}

impl QueryFragment {
    pub fn new(base: impl Into<String>) -> Self {
        Self {
            base: base.into(),
            predicates: Vec::new(),
        }
    }

    pub fn and(&mut self, predicate: impl Into<String>) {
        self.predicates.push(predicate.into());
    }

    pub fn render(&self) -> String {
        let mut query = self.base.clone();
        for predicate in &self.predicates {
            query.push_str(" AND ");
            query.push_str(predicate);
        }
        query
    }
}

#[derive(Debug, Clone, Default)]
struct TableRules {
    no_enter: Vec<String>,
    /// `(quoted source-table SQL name, where clause)` — the EXISTS subquery needs the
    /// source table's name, not just its id.
    no_exit: Vec<(String, String)>,
}

/// Data-graph rules resolved against a concrete schema, ready to enrich successor
/// queries during traversal.
#[derive(Debug, Clone, Default)]
pub struct DataGraphRules {
    by_table: HashMap<TableId, TableRules>,
}

impl DataGraphRules {
    pub fn resolve(
        specs: &[DataGraphRuleSpec],
        resolve_table: impl Fn(&str) -> Option<(TableId, String)>,
    ) -> Result<Self, RuleLoadError> {
        let mut by_table: HashMap<TableId, TableRules> = HashMap::new();
        for spec in specs {
            let (table_id, table_sql_name) =
                resolve_table(spec.table()).ok_or_else(|| RuleLoadError::TableNotFound {
                    table: spec.table().to_string(),
                })?;
            let entry = by_table.entry(table_id).or_default();
            match spec {
                DataGraphRuleSpec::NoEnter { where_clause, .. } => {
                    entry.no_enter.push(where_clause.clone());
                }
                DataGraphRuleSpec::NoExit { where_clause, .. } => {
                    entry.no_exit.push((table_sql_name, where_clause.clone()));
                }
            }
        }
        Ok(Self { by_table })
    }

    /// Appends every applicable `no_enter`/`no_exit` predicate for this hop: `no_enter`
    /// rules attached to `edge.target_table` are evaluated against the target row;
    /// `no_exit` rules attached to `edge.source_table` are evaluated against the source
    /// row via an (intentionally redundant, per spec §4.5) `EXISTS` on `node`.
    pub fn enrich(&self, fragment: &mut QueryFragment, node: &DataNode, edge: &RelationEdge) {
        if let Some(rules) = self.by_table.get(&edge.target_table) {
            for where_clause in &rules.no_enter {
                fragment.and(format!("NOT ({where_clause})"));
            }
        }
        if let Some(rules) = self.by_table.get(&edge.source_table) {
            for (source_table_sql_name, where_clause) in &rules.no_exit {
                fragment.and(format!(
                    "NOT EXISTS (SELECT 1 FROM {source_table_sql_name} WHERE ctid = '{ctid}' AND ({where_clause}))",
                    ctid = node.ctid
                ));
            }
        }
    }
}
