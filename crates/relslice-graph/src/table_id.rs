use std::fmt;

/// An interned handle for a table, assigned by a `Catalog`.
///
/// Kept `Copy` so the relation graph can be backed by `petgraph::graphmap::DiGraphMap`,
/// whose node type must be `Copy + Hash + Eq + Ord`. The handle carries no name of its
/// own; resolving it back to a qualified name is the `Catalog`'s job.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TableId(u32);

impl TableId {
    /// Constructs a handle from a raw index. Only `Catalog` should call this.
    pub fn from_index(index: u32) -> Self {
        TableId(index)
    }

    pub fn index(self) -> u32 {
        self.0
    }
}

impl fmt::Debug for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "TableId({})", self.0)
    }
}
