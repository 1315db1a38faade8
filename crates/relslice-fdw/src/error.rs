use thiserror::Error;

#[derive(Debug, Error)]
pub enum FdwError {
    #[error(transparent)]
    Db(#[from] relslice_db::DbError),

    #[error("tableoid map is missing an entry for source relation '{0}'")]
    MissingTableoidMapping(u32),

    #[error("foreign table options for '{table}' did not contain table_name")]
    MalformedForeignTableOptions { table: String },
}
