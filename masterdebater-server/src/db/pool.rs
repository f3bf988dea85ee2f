//! Session factory
//!
//! `Database` owns the sqlx SQLite pool and is constructed explicitly at
//! process start, then handed to whatever needs it. `Database::session()`
//! yields a scoped [`Session`]; its connection goes back to the pool when the
//! guard drops, on every exit path.

use std::ops::{Deref, DerefMut};
use std::path::Path;
use std::str::FromStr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use masterdebater_core::DatabaseConfig;
use sqlx::pool::PoolConnection;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};
use sqlx::{Sqlite, SqliteConnection};

use super::DbError;

/// How long a writer waits on a locked database before failing
const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

/// How long `session()` waits for a free connection
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Shared handle to the debate store. Cheap to clone.
#[derive(Clone, Debug)]
pub struct Database {
    pool: SqlitePool,
    open_sessions: Arc<AtomicUsize>,
}

impl Database {
    /// Open (or create) the store described by `config`.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let db = Database::connect(&config.database).await?;
    /// ```
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str(&config.url)?
            .create_if_missing(true)
            .foreign_keys(true)
            .busy_timeout(BUSY_TIMEOUT);

        ensure_parent_dir(options.get_filename())?;

        let pool = SqlitePoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        tracing::info!(
            url = %config.url,
            max_connections = config.max_connections,
            "Database pool ready"
        );
        Ok(Self::from_pool(pool))
    }

    /// Single-connection in-memory store (for testing).
    ///
    /// The one connection is never recycled, so the schema survives for the
    /// lifetime of the handle.
    pub async fn open_in_memory() -> Result<Self, DbError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")?.foreign_keys(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .acquire_timeout(ACQUIRE_TIMEOUT)
            .connect_with(options)
            .await?;

        Ok(Self::from_pool(pool))
    }

    fn from_pool(pool: SqlitePool) -> Self {
        Self {
            pool,
            open_sessions: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Acquire one scoped session for a unit of work.
    pub async fn session(&self) -> Result<Session, DbError> {
        let conn = self.pool.acquire().await?;
        let open = self.open_sessions.fetch_add(1, Ordering::SeqCst) + 1;
        tracing::trace!(open, "Session acquired");

        Ok(Session {
            conn,
            open_sessions: Arc::clone(&self.open_sessions),
        })
    }

    /// Number of sessions currently checked out
    pub fn open_sessions(&self) -> usize {
        self.open_sessions.load(Ordering::SeqCst)
    }

    /// Borrow the pool for repositories
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Close the pool, waiting for checked-out connections to return.
    pub async fn close(&self) {
        self.pool.close().await;
        tracing::info!("Database pool closed");
    }
}

/// A pooled connection scoped to one unit of work.
///
/// Dereferences to `SqliteConnection`, so `&mut *session` is an executor.
pub struct Session {
    conn: PoolConnection<Sqlite>,
    open_sessions: Arc<AtomicUsize>,
}

impl Deref for Session {
    type Target = SqliteConnection;

    fn deref(&self) -> &Self::Target {
        &self.conn
    }
}

impl DerefMut for Session {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.conn
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        // The PoolConnection field drops right after this and returns itself.
        let open = self.open_sessions.fetch_sub(1, Ordering::SeqCst) - 1;
        tracing::trace!(open, "Session released");
    }
}

fn ensure_parent_dir(file: &Path) -> Result<(), DbError> {
    if let Some(parent) = file.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)?;
            tracing::debug!(dir = %parent.display(), "Created database directory");
        }
    }
    Ok(())
}
