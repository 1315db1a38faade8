use thiserror::Error;

/// Aggregates every library crate's error type at the orchestration boundary. Only
/// `relslice-cli`'s subcommand `exec` functions (via `anyhow`) and the functions in
/// this crate ever see this type; the walker/writer/schema/rule crates keep their own
/// narrow error enums all the way through.
#[derive(Debug, Error)]
pub enum CoreError {
    #[error("incompatible walker '{walker}' and writer '{writer}'")]
    IncompatibleWalkerWriter { walker: String, writer: String },

    #[error("failed to write '{path}': {source}")]
    Io { path: String, source: std::io::Error },

    #[error(transparent)]
    Db(#[from] relslice_db::DbError),

    #[error(transparent)]
    Schema(#[from] relslice_schema::SchemaError),

    #[error(transparent)]
    RuleLoad(#[from] relslice_rules::RuleLoadError),

    #[error(transparent)]
    Traversal(#[from] relslice_traversal::TraversalError),

    #[error(transparent)]
    Writer(#[from] relslice_writers::WriterError),

    #[error(transparent)]
    Fdw(#[from] relslice_fdw::FdwError),
}
