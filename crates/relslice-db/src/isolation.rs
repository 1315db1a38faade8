/// Transaction isolation levels a walker session can run under. `SERIALIZABLE` and
/// `REPEATABLE READ` both give a stable snapshot of the source database for the
/// duration of a walk; `READ COMMITTED` is the cheaper option when the source is known
/// not to be concurrently written during the transfer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IsolationLevel {
    Serializable,
    RepeatableRead,
    ReadCommitted,
}

impl IsolationLevel {
    pub fn as_sql(self) -> &'static str {
        match self {
            IsolationLevel::Serializable => "SERIALIZABLE",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
        }
    }
}

impl std::str::FromStr for IsolationLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value {
            "serializable" => Ok(IsolationLevel::Serializable),
            "repeatable_read" => Ok(IsolationLevel::RepeatableRead),
            "read_committed" => Ok(IsolationLevel::ReadCommitted),
            other => Err(format!("unknown isolation level '{other}'")),
        }
    }
}
