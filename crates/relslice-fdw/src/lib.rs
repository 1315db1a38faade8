//! `postgres_fdw` bridge setup and the SQL that moves rows across it.

mod bootstrap;
mod config;
mod copy_query;
mod error;
mod tableoid_map;

pub use bootstrap::{bootstrap_sql, connect_as_fdw, drop_fdw, teardown_sql};
pub use config::FdwConfig;
pub use copy_query::build_copy_query;
pub use error::FdwError;
pub use tableoid_map::{build_tableoid_map, remote_tableoid_for};
