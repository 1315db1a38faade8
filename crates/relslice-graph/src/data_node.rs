use std::fmt;
use std::hash::{Hash, Hasher};

use crate::table_id::TableId;

/// A row-unique physical identifier: `(table, ctid, tableoid)`.
///
/// `tableoid` names the relation that actually stores the row (it can differ from the
/// table named in a query, for partitioned tables); `ctid` is the row's physical
/// location within that relation. Identity is `(tableoid, ctid)` only — `table` is
/// carried for `Display`/logging but excluded from equality and hashing, since
/// `tableoid` already pins down the relation.
#[derive(Clone, Debug)]
pub struct DataNode {
    pub table: TableId,
    pub ctid: String,
    pub tableoid: u32,
}

impl DataNode {
    pub fn new(table: TableId, ctid: impl Into<String>, tableoid: u32) -> Self {
        Self {
            table,
            ctid: ctid.into(),
            tableoid,
        }
    }
}

impl PartialEq for DataNode {
    fn eq(&self, other: &Self) -> bool {
        self.tableoid == other.tableoid && self.ctid == other.ctid
    }
}

impl Eq for DataNode {}

impl Hash for DataNode {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.tableoid.hash(state);
        self.ctid.hash(state);
    }
}

impl fmt::Display for DataNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:?}, {}, {})", self.table, self.ctid, self.tableoid)
    }
}
