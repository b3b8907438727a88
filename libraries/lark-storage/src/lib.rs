//! Lark Player Storage
//!
//! `SQLite` persistence for the two user-owned collections: favorite track ids
//! and lyrics. Each collection is a vertical slice with its own queries;
//! [`LocalStore`] exposes both through the core store traits.
//!
//! # Example
//!
//! ```rust,no_run
//! use lark_core::{FavoriteStore, TrackId};
//! use lark_storage::{create_pool, run_migrations, LocalStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://lark.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = LocalStore::new(pool);
//! store.add(&TrackId::new("42")).await?;
//! assert!(store.is_favorite(&TrackId::new("42")).await?);
//! # Ok(())
//! # }
//! ```

mod context;
mod error;

// Vertical slices
pub mod favorites;
pub mod lyrics;

pub use context::LocalStore;
pub use error::{Result, StorageError};

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before handing the pool to a [`LocalStore`].
pub async fn run_migrations(pool: &SqlitePool) -> Result<()> {
    MIGRATOR.run(pool).await?;
    tracing::debug!("Database migrations applied");
    Ok(())
}

/// Create a new `SQLite` pool
///
/// The database file is created if missing and opened in WAL mode.
pub async fn create_pool(database_url: &str) -> Result<SqlitePool> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!("Creating pool with URL: {}", database_url);

    let options = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| StorageError::Connection(e.to_string()))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
