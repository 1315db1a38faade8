use crate::table_id::TableId;

/// A directed, typed edge of the relation graph: `source_table(source_key) -> target_table(target_key)`.
///
/// Identity is the full 4-tuple, matching the multigraph invariant — two edges
/// with the same tables but different key tuples (e.g. two distinct FKs between the
/// same pair of tables) are different edges, not duplicates.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct RelationEdge {
    pub source_table: TableId,
    pub target_table: TableId,
    pub source_key: Vec<String>,
    pub target_key: Vec<String>,
}

impl RelationEdge {
    pub fn new(
        source_table: TableId,
        target_table: TableId,
        source_key: Vec<String>,
        target_key: Vec<String>,
    ) -> Self {
        Self {
            source_table,
            target_table,
            source_key,
            target_key,
        }
    }

    /// The same relationship, walked backwards.
    pub fn inverted(&self) -> RelationEdge {
        RelationEdge {
            source_table: self.target_table,
            target_table: self.source_table,
            source_key: self.target_key.clone(),
            target_key: self.source_key.clone(),
        }
    }
}
