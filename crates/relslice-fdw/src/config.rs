use relslice_db::Dsn;

/// Everything needed to stand up a `postgres_fdw` bridge from a target database back to
/// its source, and to address the copied-in rows once it exists.
#[derive(Debug, Clone)]
pub struct FdwConfig {
    pub local_user: String,
    pub remote: Dsn,
    /// Schema on the source database that holds the tables being copied.
    pub source_schema: String,
    /// Schema created on the target database to hold the foreign tables.
    pub remote_schema: String,
    /// Schema on the target database that receives the copied rows.
    pub target_schema: String,
}

impl FdwConfig {
    /// `OVERRIDE_REMOTE_HOST`/`OVERRIDE_REMOTE_PORT` let a deployment reach the source
    /// database through a different address than the one embedded in its own DSN — e.g.
    /// through a connection pooler or a port-forward.
    pub fn with_remote_overrides(mut self, host: Option<String>, port: Option<String>) -> Self {
        if let Some(host) = host {
            self.remote.host = host;
        }
        if let Some(port) = port {
            self.remote.port = port;
        }
        self
    }
}
