use std::time::Duration;

use tokio_postgres::Row;
use tracing::{debug, info};

use crate::error::DbError;
use crate::isolation::IsolationLevel;
use crate::pool::ConnectionPool;
use crate::retry::{retry, DEFAULT_DELAY, DEFAULT_RETRIES};

/// A pooled connection's worth of session state: acquire once per logical unit of work,
/// run queries through `execute`/`query` (retried on a transient connection error, and
/// logged to the `sql_queries` target the way the original split its stream and query
/// loggers), then `release` back to the pool.
pub struct DatabaseSession<'a> {
    pool: &'a ConnectionPool,
    client: Option<tokio_postgres::Client>,
}

impl<'a> DatabaseSession<'a> {
    pub async fn acquire(pool: &'a ConnectionPool) -> Self {
        Self {
            pool,
            client: Some(pool.acquire().await),
        }
    }

    pub async fn release(mut self) {
        if let Some(client) = self.client.take() {
            self.pool.release(client).await;
        }
    }

    fn client(&self) -> &tokio_postgres::Client {
        self.client.as_ref().expect("session already released")
    }

    pub async fn query(&self, sql: &str, params: &[&(dyn tokio_postgres::types::ToSql + Sync)]) -> Result<Vec<Row>, DbError> {
        log_query(sql);
        retry(
            DEFAULT_RETRIES,
            DEFAULT_DELAY,
            is_connection_error,
            || async { self.client().query(sql, params).await },
        )
        .await
        .map_err(DbError::Query)
    }

    pub async fn execute(&self, sql: &str, params: &[&(dyn tokio_postgres::types::ToSql + Sync)]) -> Result<u64, DbError> {
        log_query(sql);
        retry(
            DEFAULT_RETRIES,
            DEFAULT_DELAY,
            is_connection_error,
            || async { self.client().execute(sql, params).await },
        )
        .await
        .map_err(DbError::Query)
    }

    pub async fn batch_execute(&self, sql: &str) -> Result<(), DbError> {
        log_query(sql);
        retry(
            DEFAULT_RETRIES,
            DEFAULT_DELAY,
            is_connection_error,
            || async { self.client().batch_execute(sql).await },
        )
        .await
        .map_err(DbError::Query)
    }

    pub async fn prepare(&self, sql: &str) -> Result<tokio_postgres::Statement, DbError> {
        self.client().prepare(sql).await.map_err(DbError::Query)
    }
}

fn log_query(sql: &str) {
    let trimmed = sql.trim();
    debug!(query = trimmed, "executing query");
    info!(target: "sql_queries", "{trimmed}");
}

fn is_connection_error(error: &tokio_postgres::Error) -> bool {
    error.is_closed()
}

/// Starts a transaction at the given isolation level on every connection in `pool` —
/// the shared-snapshot setup a walk runs its source reads under.
pub async fn begin_pool(pool: &ConnectionPool, isolation: IsolationLevel, readonly: bool) -> Result<(), DbError> {
    pool.start_all(isolation, readonly).await
}

pub async fn commit_pool(pool: &ConnectionPool) -> Result<(), DbError> {
    pool.commit_all().await
}

pub async fn rollback_pool(pool: &ConnectionPool) -> Result<(), DbError> {
    pool.rollback_all().await
}

pub const fn default_retry_delay() -> Duration {
    DEFAULT_DELAY
}
