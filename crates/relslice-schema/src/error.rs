use thiserror::Error;

#[derive(Debug, Error)]
pub enum SchemaError {
    #[error("database error while reflecting schema: {0}")]
    Database(#[from] tokio_postgres::Error),

    #[error("table '{0}' was not found in the reflected schema")]
    UnknownTable(String),

    #[error("unsupported pg_type kind '{kind}' for type '{name}'")]
    UnsupportedTypeKind { name: String, kind: String },

    #[error(transparent)]
    RuleLoad(#[from] relslice_rules::RuleLoadError),
}
