//! Test helpers for storage integration tests
//!
//! Databases are REAL SQLite files in a temp dir (not in-memory) so every pool
//! connection sees the same data and migrations run as in production.

use lark_storage::LocalStore;
use sqlx::SqlitePool;
use tempfile::TempDir;

/// Test database wrapper that cleans up on drop
pub struct TestDb {
    pub pool: SqlitePool,
    _temp_dir: TempDir,
}

impl TestDb {
    /// Create a new test database with migrations applied
    pub async fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let db_path = temp_dir.path().join("test.db");
        let db_url = format!("sqlite://{}", db_path.display());

        let pool = lark_storage::create_pool(&db_url)
            .await
            .expect("Failed to create pool");

        lark_storage::run_migrations(&pool)
            .await
            .expect("Failed to run migrations");

        Self {
            pool,
            _temp_dir: temp_dir,
        }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    pub fn store(&self) -> LocalStore {
        LocalStore::new(self.pool.clone())
    }
}
