use indexmap::IndexMap;

use relslice_graph::TableId;

use crate::error::SchemaError;
use crate::table_schema::TableSchema;

/// The reflected database schema: table names interned to `TableId`s so the relation
/// graph can use them as `Copy` node keys, plus the full reflected shape of each table.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    name_to_id: IndexMap<String, TableId>,
    tables: Vec<TableSchema>,
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Interns `name`, returning its existing id if already known.
    pub fn intern(&mut self, name: impl Into<String>) -> TableId {
        let name = name.into();
        if let Some(&id) = self.name_to_id.get(&name) {
            return id;
        }
        let id = TableId::from_index(self.tables.len() as u32);
        self.name_to_id.insert(name.clone(), id);
        self.tables.push(TableSchema {
            id,
            name,
            oid: 0,
            columns: Vec::new(),
            primary_key: Vec::new(),
            foreign_keys: Vec::new(),
        });
        id
    }

    pub fn table_id(&self, name: &str) -> Option<TableId> {
        self.name_to_id.get(name).copied()
    }

    pub fn table_name(&self, id: TableId) -> &str {
        &self.tables[id.index() as usize].name
    }

    /// A schema-ready reference, for embedding in `FROM`/`EXISTS` clauses.
    pub fn quoted_table_name(&self, id: TableId) -> String {
        format!("\"{}\"", self.table_name(id))
    }

    pub fn table(&self, id: TableId) -> Result<&TableSchema, SchemaError> {
        self.tables
            .get(id.index() as usize)
            .ok_or_else(|| SchemaError::UnknownTable(format!("<table id {}>", id.index())))
    }

    pub fn table_by_name(&self, name: &str) -> Result<&TableSchema, SchemaError> {
        let id = self
            .table_id(name)
            .ok_or_else(|| SchemaError::UnknownTable(name.to_string()))?;
        self.table(id)
    }

    pub fn table_mut(&mut self, id: TableId) -> &mut TableSchema {
        &mut self.tables[id.index() as usize]
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableSchema> {
        self.tables.iter()
    }

    pub fn len(&self) -> usize {
        self.tables.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }

    /// A `(TableId, quoted SQL name)` resolver suitable for handing to
    /// `relslice_rules::TableGraphRules::resolve` / `DataGraphRules::resolve`.
    pub fn resolve_with_name(&self, name: &str) -> Option<(TableId, String)> {
        self.table_id(name).map(|id| (id, self.quoted_table_name(id)))
    }

    pub fn resolve(&self, name: &str) -> Option<TableId> {
        self.table_id(name)
    }
}
