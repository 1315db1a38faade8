use thiserror::Error;

#[derive(Debug, Error)]
pub enum WriterError {
    #[error(transparent)]
    Db(#[from] relslice_db::DbError),

    #[error(transparent)]
    Fdw(#[from] relslice_fdw::FdwError),

    #[error(transparent)]
    Schema(#[from] relslice_schema::SchemaError),

    #[error("this writer does not implement {operation}")]
    Unsupported { operation: &'static str },
}
