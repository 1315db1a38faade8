//! Data sinks that land rows discovered by a walk on the target database.

mod error;
mod fdw_batch;
mod fdw_concurrent;
mod fdw_single;
mod file_writer;
mod writer;

pub use error::WriterError;
pub use fdw_batch::BatchEdgeFdwWriter;
pub use fdw_concurrent::ConcurrentSingleRowFdwWriter;
pub use fdw_single::SingleRowFdwWriter;
pub use file_writer::FileWriter;
pub use writer::DataWriter;

#[cfg(test)]
mod tests {
    use super::*;
    use relslice_graph::{DataNode, TableId};

    #[tokio::test]
    async fn file_writer_accepts_a_node_without_erroring() {
        let writer = FileWriter;
        let node = DataNode::new(TableId::from_index(0), "(0,1)", 16401);
        writer.write_node(&node).await.unwrap();
    }

    #[tokio::test]
    async fn file_writer_does_not_implement_write_table() {
        let writer = FileWriter;
        let err = writer.write_table(TableId::from_index(0), None).await.unwrap_err();
        assert!(matches!(err, WriterError::Unsupported { operation: "write_table" }));
    }
}
