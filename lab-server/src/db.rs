//! Persistence handle
//!
//! Owns the connection pool shared by both sample stores. Created once at
//! startup, cloned into the lifecycle controller and review engine, and
//! closed when the server shuts down.

use lab_common::Result;
use sqlx::{Sqlite, SqlitePool, Transaction};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, warn};

/// Explicitly owned handle to the sample database
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
}

impl Database {
    /// Wrap an already-initialized pool
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Open the database file, creating schema as needed
    pub async fn open(path: &Path, max_connections: u32) -> Result<Self> {
        let pool = lab_common::db::init_database(path, max_connections).await?;
        Ok(Self::new(pool))
    }

    /// Private in-memory database (single connection)
    pub async fn in_memory() -> Result<Self> {
        let pool = lab_common::db::init_memory_database().await?;
        Ok(Self::new(pool))
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Begin a transaction that holds the database write lock from its first statement
    ///
    /// The transaction owns a dedicated pooled connection. Dropping it without
    /// commit rolls back and returns the connection to the pool, so every exit
    /// path releases it. Concurrent callers block here (up to the busy timeout)
    /// until the current holder commits or rolls back.
    pub async fn begin_write(&self, caller: &'static str) -> Result<Transaction<'static, Sqlite>> {
        let start = Instant::now();

        let tx = self.pool.begin_with("BEGIN IMMEDIATE").await?;

        let wait_ms = start.elapsed().as_millis();
        if wait_ms > 1000 {
            warn!(caller, wait_ms, "Slow write lock acquisition");
        } else {
            debug!(caller, wait_ms, "Write transaction started");
        }

        Ok(tx)
    }

    /// Close all pooled connections
    pub async fn close(&self) {
        self.pool.close().await;
    }
}
