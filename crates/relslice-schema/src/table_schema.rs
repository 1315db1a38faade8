use relslice_graph::TableId;

/// A single reflected column.
#[derive(Debug, Clone)]
pub struct ColumnSchema {
    pub name: String,
    pub data_type: String,
    pub not_null: bool,
    pub is_identity: bool,
}

/// A reflected foreign key, column order preserved (it matters: `source_key`/
/// `target_key` are paired positionally when walking an edge).
#[derive(Debug, Clone)]
pub struct ForeignKeyConstraint {
    pub name: String,
    pub columns: Vec<String>,
    pub referred_table: String,
    pub referred_columns: Vec<String>,
}

/// Everything reflected about one table: enough to build relation-graph edges and to
/// recreate the table's bare DDL shape on a target database.
#[derive(Debug, Clone)]
pub struct TableSchema {
    pub id: TableId,
    pub name: String,
    pub oid: u32,
    pub columns: Vec<ColumnSchema>,
    pub primary_key: Vec<String>,
    pub foreign_keys: Vec<ForeignKeyConstraint>,
}

impl TableSchema {
    pub fn is_one_to_one(&self, fk: &ForeignKeyConstraint) -> bool {
        self.primary_key == fk.columns
    }
}
