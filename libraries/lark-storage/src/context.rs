use crate::{favorites, lyrics};
use async_trait::async_trait;
use lark_core::error::Result;
use lark_core::traits::{FavoriteStore, LyricStore};
use lark_core::types::{Lyric, TrackId};
use sqlx::SqlitePool;
use std::collections::HashSet;

/// Favorite and lyric stores backed by one `SQLite` pool
#[derive(Debug, Clone)]
pub struct LocalStore {
    pool: SqlitePool,
}

impl LocalStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl FavoriteStore for LocalStore {
    async fn add(&self, id: &TrackId) -> Result<()> {
        Ok(favorites::add(&self.pool, id).await?)
    }

    async fn remove(&self, id: &TrackId) -> Result<()> {
        Ok(favorites::remove(&self.pool, id).await?)
    }

    async fn is_favorite(&self, id: &TrackId) -> Result<bool> {
        Ok(favorites::is_favorite(&self.pool, id).await?)
    }

    async fn all_favorite_ids(&self) -> Result<HashSet<TrackId>> {
        Ok(favorites::all_ids(&self.pool).await?)
    }
}

#[async_trait]
impl LyricStore for LocalStore {
    async fn get(&self, music_id: &TrackId) -> Result<Option<Lyric>> {
        Ok(lyrics::get(&self.pool, music_id).await?)
    }

    async fn upsert(&self, lyric: &Lyric) -> Result<()> {
        Ok(lyrics::upsert(&self.pool, lyric).await?)
    }
}
