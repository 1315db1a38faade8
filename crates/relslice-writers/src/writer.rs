use async_trait::async_trait;

use relslice_graph::{DataNode, RelationEdge, TableId};

use crate::error::WriterError;

/// Common shape of every data sink a walk can push rows through.
///
/// No single writer implements every operation — a row-at-a-time walker only ever
/// calls `write_table`/`write_node`, a table-at-a-time walker only ever calls
/// `write_table`/`write_edge`. The default implementations return
/// `WriterError::Unsupported`; callers that mismatch a walker with an incompatible
/// writer find out as soon as the first unsupported call is made (the proper
/// compatibility check happens earlier, in the dispatcher that picks the pair).
#[async_trait]
pub trait DataWriter: Send + Sync {
    /// Copies every row of `table` matching `condition` (or every row, if `None`).
    async fn write_table(&self, _table: TableId, _condition: Option<&str>) -> Result<(), WriterError> {
        Err(WriterError::Unsupported {
            operation: "write_table",
        })
    }

    /// Copies the single physical row `node` identifies.
    async fn write_node(&self, _node: &DataNode) -> Result<(), WriterError> {
        Err(WriterError::Unsupported {
            operation: "write_node",
        })
    }

    /// Copies every row of `edge.target_table` reachable from rows of `edge.source_table`
    /// already present on the target, returning how many new rows were inserted.
    async fn write_edge(&self, _edge: &RelationEdge) -> Result<u64, WriterError> {
        Err(WriterError::Unsupported {
            operation: "write_edge",
        })
    }
}
