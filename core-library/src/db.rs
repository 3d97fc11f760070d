//! SQLite pool for the song catalog.
//!
//! [`create_pool`] opens the database in WAL mode, applies the embedded
//! migrations under `migrations/` and verifies the connection before handing
//! the pool out. Tests use [`create_test_pool`], which does the same against
//! a private in-memory database.

use crate::{LibraryError, Result};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous};
use sqlx::SqlitePool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use tracing::{debug, info, warn};

const MEMORY_URL: &str = "sqlite::memory:";

/// Pool settings for the catalog database
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// sqlx connection string, e.g. `sqlite:music-library.db`
    pub database_url: String,
    pub min_connections: u32,
    pub max_connections: u32,
    /// How long a request may wait for a free connection
    pub acquire_timeout: Duration,
    pub max_lifetime: Option<Duration>,
    pub idle_timeout: Option<Duration>,
    /// Prepared statements kept per connection
    pub statement_cache_capacity: usize,
}

impl DatabaseConfig {
    /// Settings for a database file at `path`
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self::from_url(format!("sqlite:{}", path.as_ref().display()))
    }

    /// Settings for an explicit connection string
    pub fn from_url(database_url: impl Into<String>) -> Self {
        Self {
            database_url: database_url.into(),
            min_connections: 1,
            max_connections: 5,
            acquire_timeout: Duration::from_secs(30),
            max_lifetime: Some(Duration::from_secs(30 * 60)),
            idle_timeout: Some(Duration::from_secs(10 * 60)),
            statement_cache_capacity: 100,
        }
    }

    /// Private in-memory database.
    ///
    /// Each `:memory:` connection is its own database, so the pool keeps
    /// exactly one connection open for its whole life.
    pub fn in_memory() -> Self {
        Self {
            max_connections: 1,
            max_lifetime: None,
            idle_timeout: None,
            ..Self::from_url(MEMORY_URL)
        }
    }

    pub fn min_connections(mut self, min: u32) -> Self {
        self.min_connections = min;
        self
    }

    pub fn max_connections(mut self, max: u32) -> Self {
        self.max_connections = max;
        self
    }

    pub fn acquire_timeout(mut self, timeout: Duration) -> Self {
        self.acquire_timeout = timeout;
        self
    }

    pub fn statement_cache_capacity(mut self, capacity: usize) -> Self {
        self.statement_cache_capacity = capacity;
        self
    }

    pub fn is_in_memory(&self) -> bool {
        self.database_url.contains(":memory:")
    }

    fn effective_max_connections(&self) -> u32 {
        if self.is_in_memory() {
            1
        } else {
            self.max_connections.max(1)
        }
    }

    fn connect_options(&self) -> Result<SqliteConnectOptions> {
        let options = SqliteConnectOptions::from_str(&self.database_url)?
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .foreign_keys(true)
            .create_if_missing(true)
            // negative cache_size is KiB: 64 MiB
            .pragma("cache_size", "-64000")
            .statement_cache_capacity(self.statement_cache_capacity);
        Ok(options)
    }
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self::in_memory()
    }
}

/// Open the catalog database, migrate it and check it answers.
///
/// # Errors
///
/// Fails with `Database` when the URL is malformed or the file cannot be
/// opened, and with `Migration` when the schema cannot be applied.
pub async fn create_pool(config: DatabaseConfig) -> Result<SqlitePool> {
    let max_connections = config.effective_max_connections();
    info!(
        database_url = %config.database_url,
        max_connections,
        "Opening song database"
    );

    let pool = SqlitePoolOptions::new()
        .min_connections(config.min_connections.min(max_connections))
        .max_connections(max_connections)
        .acquire_timeout(config.acquire_timeout)
        .max_lifetime(config.max_lifetime)
        .idle_timeout(config.idle_timeout)
        .connect_with(config.connect_options()?)
        .await
        .map_err(|e| {
            warn!(error = %e, database_url = %config.database_url, "Could not open song database");
            LibraryError::Database(e)
        })?;

    run_migrations(&pool).await?;
    health_check(&pool).await?;

    info!(connections = pool.size(), "Song database ready");
    Ok(pool)
}

/// Migrated in-memory pool for tests
pub async fn create_test_pool() -> Result<SqlitePool> {
    create_pool(DatabaseConfig::in_memory()).await
}

async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    sqlx::migrate!("./migrations").run(pool).await.map_err(|e| {
        warn!(error = %e, "Song schema migration failed");
        LibraryError::Migration(e.to_string())
    })?;

    debug!("Song schema is up to date");
    Ok(())
}

/// Round-trip a trivial query to prove the pool can serve requests
pub async fn health_check(pool: &SqlitePool) -> Result<()> {
    sqlx::query("SELECT 1").execute(pool).await.map_err(|e| {
        warn!(error = %e, "Song database health check failed");
        LibraryError::Database(e)
    })?;
    Ok(())
}
