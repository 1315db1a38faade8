//! The three interchangeable walkers that drive a referential-subset transfer: an
//! edge-driven table walker and two row-level BFS walkers (sequential and concurrent)
//! sharing the same successor-discovery query shapes.

mod concurrent_data_walker;
mod data_walker;
mod error;
mod queries;
mod table_walker;

pub use concurrent_data_walker::ConcurrentDataGraphWalker;
pub use data_walker::DataGraphWalker;
pub use error::TraversalError;
pub use queries::{next_node_fragment, start_node_query};
pub use table_walker::TableGraphWalker;
