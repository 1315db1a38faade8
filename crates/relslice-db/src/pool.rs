use std::collections::VecDeque;

use tokio::sync::{Mutex, Notify};
use tokio_postgres::Client;
use tracing::error;

use crate::error::DbError;
use crate::isolation::IsolationLevel;

/// A fixed-size pool of already-connected clients.
///
/// Connections are handed out via `acquire`/`release` rather than an RAII guard: async
/// `Drop` doesn't exist, and the original pool has the same explicit
/// connect-then-release shape (`AsyncConnectionWrapper.release`). `Notify` avoids the
/// missed-wakeup race between an empty check and waiting for one to free up.
pub struct ConnectionPool {
    idle: Mutex<VecDeque<Client>>,
    notify: Notify,
    capacity: usize,
}

impl ConnectionPool {
    pub async fn connect(dsn: &str, pool_size: usize) -> Result<Self, DbError> {
        let mut idle = VecDeque::with_capacity(pool_size);
        for _ in 0..pool_size {
            let (client, connection) = tokio_postgres::connect(dsn, tokio_postgres::NoTls)
                .await
                .map_err(DbError::Connect)?;
            tokio::spawn(async move {
                if let Err(error) = connection.await {
                    error!(%error, "postgres connection driver exited with an error");
                }
            });
            idle.push_back(client);
        }
        Ok(Self {
            idle: Mutex::new(idle),
            notify: Notify::new(),
            capacity: pool_size,
        })
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub async fn acquire(&self) -> Client {
        loop {
            {
                let mut idle = self.idle.lock().await;
                if let Some(client) = idle.pop_front() {
                    return client;
                }
            }
            self.notify.notified().await;
        }
    }

    pub async fn release(&self, client: Client) {
        let mut idle = self.idle.lock().await;
        idle.push_back(client);
        drop(idle);
        self.notify.notify_one();
    }

    /// Begins a transaction at `isolation` on every pooled connection at once — used to
    /// open a single consistent snapshot shared by every worker reading the source
    /// database during a walk.
    pub async fn start_all(&self, isolation: IsolationLevel, readonly: bool) -> Result<(), DbError> {
        let idle = self.idle.lock().await;
        let access_mode = if readonly { "READ ONLY" } else { "READ WRITE" };
        for client in idle.iter() {
            client
                .batch_execute(&format!(
                    "BEGIN ISOLATION LEVEL {} {access_mode}",
                    isolation.as_sql()
                ))
                .await
                .map_err(DbError::Query)?;
        }
        Ok(())
    }

    pub async fn commit_all(&self) -> Result<(), DbError> {
        let idle = self.idle.lock().await;
        for client in idle.iter() {
            client.batch_execute("COMMIT").await.map_err(DbError::Query)?;
        }
        Ok(())
    }

    pub async fn rollback_all(&self) -> Result<(), DbError> {
        let idle = self.idle.lock().await;
        for client in idle.iter() {
            client.batch_execute("ROLLBACK").await.map_err(DbError::Query)?;
        }
        Ok(())
    }
}
