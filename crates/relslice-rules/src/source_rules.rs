use indexmap::IndexMap;

use crate::error::RuleLoadError;

/// `{table, where}` pairs seeding a walk. Keys are unique per table; order is
/// preserved (start-node discovery order is observable in single-threaded walkers).
#[derive(Debug, Clone, Default)]
pub struct SourceRules {
    by_table: IndexMap<String, String>,
}

impl SourceRules {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, table: String, where_clause: String) -> Result<(), RuleLoadError> {
        if self.by_table.contains_key(&table) {
            return Err(RuleLoadError::DuplicateSourceTable { table });
        }
        self.by_table.insert(table, where_clause);
        Ok(())
    }

    pub fn tables(&self) -> impl Iterator<Item = &str> {
        self.by_table.keys().map(String::as_str)
    }

    pub fn where_condition(&self, table: &str) -> Option<&str> {
        self.by_table.get(table).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.by_table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_table.is_empty()
    }
}
