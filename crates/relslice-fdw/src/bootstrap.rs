use relslice_db::DatabaseSession;
use tracing::debug;

use crate::config::FdwConfig;
use crate::error::FdwError;

const SERVER_NAME: &str = "remote_fdw";

/// `CREATE EXTENSION`/`CREATE SERVER`/`CREATE USER MAPPING`/`IMPORT FOREIGN SCHEMA`,
/// all against the target database — the bridge that lets the target read the source
/// through ordinary SQL.
pub fn bootstrap_sql(config: &FdwConfig) -> String {
    format!(
        r#"
CREATE EXTENSION IF NOT EXISTS postgres_fdw;
CREATE SERVER IF NOT EXISTS {server} FOREIGN DATA WRAPPER postgres_fdw
    OPTIONS (dbname '{dbname}', host '{host}', port '{port}');

CREATE USER MAPPING IF NOT EXISTS
    FOR "{local_user}" SERVER {server} OPTIONS (user '{remote_user}', password '{remote_password}');
GRANT USAGE ON FOREIGN SERVER {server} TO "{local_user}";

DROP SCHEMA IF EXISTS "{remote_schema}" CASCADE;
CREATE SCHEMA IF NOT EXISTS "{remote_schema}";
IMPORT FOREIGN SCHEMA "{source_schema}" FROM SERVER {server} INTO "{remote_schema}";
"#,
        server = SERVER_NAME,
        dbname = config.remote.database,
        host = config.remote.host,
        port = config.remote.port,
        local_user = config.local_user,
        remote_user = config.remote.username,
        remote_password = config.remote.password,
        remote_schema = config.remote_schema,
        source_schema = config.source_schema,
    )
}

pub fn teardown_sql(config: &FdwConfig) -> String {
    format!(
        "DROP SCHEMA IF EXISTS \"{}\" CASCADE;\nDROP SERVER IF EXISTS {SERVER_NAME} CASCADE;",
        config.remote_schema
    )
}

pub async fn connect_as_fdw(session: &DatabaseSession<'_>, config: &FdwConfig) -> Result<(), FdwError> {
    debug!("bootstrapping postgres_fdw bridge to source database");
    session.batch_execute(&bootstrap_sql(config)).await?;
    Ok(())
}

pub async fn drop_fdw(session: &DatabaseSession<'_>, config: &FdwConfig) -> Result<(), FdwError> {
    session.batch_execute(&teardown_sql(config)).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use relslice_db::Dsn;

    fn config() -> FdwConfig {
        FdwConfig {
            local_user: "app".to_string(),
            remote: Dsn {
                username: "app".to_string(),
                password: "secret".to_string(),
                host: "source.internal".to_string(),
                port: "5432".to_string(),
                database: "prod".to_string(),
            },
            source_schema: "public".to_string(),
            remote_schema: "remote".to_string(),
            target_schema: "public".to_string(),
        }
    }

    #[test]
    fn bootstrap_sql_imports_the_source_schema_into_the_remote_schema() {
        let sql = bootstrap_sql(&config());
        assert!(sql.contains("CREATE SERVER IF NOT EXISTS remote_fdw"));
        assert!(sql.contains("dbname 'prod', host 'source.internal', port '5432'"));
        assert!(sql.contains("IMPORT FOREIGN SCHEMA \"public\" FROM SERVER remote_fdw INTO \"remote\""));
    }

    #[test]
    fn teardown_sql_drops_the_remote_schema_and_server() {
        let sql = teardown_sql(&config());
        assert!(sql.contains("DROP SCHEMA IF EXISTS \"remote\" CASCADE"));
        assert!(sql.contains("DROP SERVER IF EXISTS remote_fdw CASCADE"));
    }
}
