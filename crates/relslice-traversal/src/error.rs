use thiserror::Error;

#[derive(Debug, Error)]
pub enum TraversalError {
    #[error(transparent)]
    Db(#[from] relslice_db::DbError),

    #[error(transparent)]
    Schema(#[from] relslice_schema::SchemaError),

    #[error(transparent)]
    Writer(#[from] relslice_writers::WriterError),

    #[error("source table '{0}' was not found in the reflected schema")]
    UnknownSourceTable(String),
}
