//! Configuration, logging, walker/writer compatibility checking and the orchestration
//! that wires the graph/rules/schema/db/fdw/writers/traversal crates together into the
//! five commands `relslice-cli` exposes.

mod clone_data;
mod compatibility;
mod config;
mod error;
mod logging;
mod schema_ops;
mod session;

pub use clone_data::clone_data;
pub use compatibility::{is_compatible, WalkerKind, WriterKind};
pub use config::Settings;
pub use error::CoreError;
pub use logging::{init_tracing, LoggingGuard};
pub use schema_ops::{clear_data, clear_schema, clone_schema_command, print_schema};
pub use session::connect_one;
