use async_trait::async_trait;
use tracing::info;

use relslice_graph::DataNode;

use crate::error::WriterError;
use crate::writer::DataWriter;

/// A sink that only logs what would have been written, for dry runs. Recording
/// anything richer (e.g. the primary key values themselves) is future work once a
/// concrete on-disk format is decided.
#[derive(Debug, Default)]
pub struct FileWriter;

#[async_trait]
impl DataWriter for FileWriter {
    async fn write_node(&self, node: &DataNode) -> Result<(), WriterError> {
        info!(%node, "would copy row");
        Ok(())
    }
}
