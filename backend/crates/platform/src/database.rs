//! Shared Persistence Client
//!
//! One process-wide handle to PostgreSQL. The pool is created on first use,
//! cloned cheaply into every repository and closed once at shutdown.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::sync::OnceCell;

use crate::config::DatabaseConfig;

/// Persistence client error
#[derive(Debug, thiserror::Error)]
pub enum DatabaseError {
    #[error("failed to connect to database: {0}")]
    Connect(#[source] sqlx::Error),

    #[error("database client has been closed")]
    Closed,

    #[error(transparent)]
    Query(#[from] sqlx::Error),
}

struct Inner {
    config: DatabaseConfig,
    pool: OnceCell<PgPool>,
    closed: AtomicBool,
}

/// Cloneable handle to the shared connection pool
#[derive(Clone)]
pub struct Database {
    inner: Arc<Inner>,
}

impl Database {
    /// Create an unconnected client; nothing touches the network yet
    pub fn new(config: DatabaseConfig) -> Self {
        Self {
            inner: Arc::new(Inner {
                config,
                pool: OnceCell::new(),
                closed: AtomicBool::new(false),
            }),
        }
    }

    /// Get the pool, connecting on first call
    ///
    /// Concurrent first callers wait on the same connection attempt. A failed
    /// attempt leaves the client uninitialized so the next call retries.
    pub async fn pool(&self) -> Result<&PgPool, DatabaseError> {
        if self.inner.closed.load(Ordering::Acquire) {
            return Err(DatabaseError::Closed);
        }

        let pool = self
            .inner
            .pool
            .get_or_try_init(|| async {
                let config = &self.inner.config;
                tracing::info!(
                    max_connections = config.max_connections,
                    "Connecting to database"
                );
                PgPoolOptions::new()
                    .max_connections(config.max_connections)
                    .acquire_timeout(config.acquire_timeout())
                    .connect(&config.url)
                    .await
                    .map_err(DatabaseError::Connect)
            })
            .await?;

        // `close` may have run while the connection attempt was in flight
        if self.inner.closed.load(Ordering::Acquire) {
            pool.close().await;
            return Err(DatabaseError::Closed);
        }

        Ok(pool)
    }

    /// Wrap a pool that is already connected
    ///
    /// Used by integration tests that receive their pool from `sqlx::test`.
    pub fn from_pool(pool: PgPool) -> Self {
        let options = pool.options();
        let config = DatabaseConfig {
            url: String::new(),
            max_connections: options.get_max_connections(),
            acquire_timeout_secs: options.get_acquire_timeout().as_secs(),
        };
        Self {
            inner: Arc::new(Inner {
                config,
                pool: OnceCell::new_with(Some(pool)),
                closed: AtomicBool::new(false),
            }),
        }
    }

    pub fn is_initialized(&self) -> bool {
        self.inner.pool.initialized()
    }

    pub fn is_closed(&self) -> bool {
        self.inner.closed.load(Ordering::Acquire)
    }

    /// Round-trip a trivial query
    pub async fn ping(&self) -> Result<(), DatabaseError> {
        let pool = self.pool().await?;
        sqlx::query("SELECT 1").execute(pool).await?;
        Ok(())
    }

    /// Close the pool; later calls to [`Database::pool`] fail with `Closed`
    pub async fn close(&self) {
        if self.inner.closed.swap(true, Ordering::AcqRel) {
            return;
        }
        if let Some(pool) = self.inner.pool.get() {
            pool.close().await;
            tracing::info!("Database connections closed");
        }
    }
}

impl std::fmt::Debug for Database {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Database")
            .field("config", &self.inner.config)
            .field("initialized", &self.is_initialized())
            .field("closed", &self.is_closed())
            .finish()
    }
}
