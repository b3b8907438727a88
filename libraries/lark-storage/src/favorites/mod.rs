//! Favorite track ids
//!
//! A set keyed by `music_id`. Adding an existing id and removing a missing one
//! are both no-ops.

use crate::error::Result;
use lark_core::types::TrackId;
use sqlx::{Row, SqlitePool};
use std::collections::HashSet;

/// Mark a track as favorite
pub async fn add(pool: &SqlitePool, music_id: &TrackId) -> Result<()> {
    sqlx::query("INSERT OR IGNORE INTO favorites (music_id, added_at) VALUES (?, ?)")
        .bind(music_id.as_str())
        .bind(chrono::Utc::now().timestamp_millis())
        .execute(pool)
        .await?;
    Ok(())
}

/// Remove a track from the favorites
pub async fn remove(pool: &SqlitePool, music_id: &TrackId) -> Result<()> {
    sqlx::query("DELETE FROM favorites WHERE music_id = ?")
        .bind(music_id.as_str())
        .execute(pool)
        .await?;
    Ok(())
}

/// Check whether a track is a favorite
pub async fn is_favorite(pool: &SqlitePool, music_id: &TrackId) -> Result<bool> {
    let row = sqlx::query("SELECT 1 FROM favorites WHERE music_id = ?")
        .bind(music_id.as_str())
        .fetch_optional(pool)
        .await?;
    Ok(row.is_some())
}

/// All favorite ids
pub async fn all_ids(pool: &SqlitePool) -> Result<HashSet<TrackId>> {
    let rows = sqlx::query("SELECT music_id FROM favorites")
        .fetch_all(pool)
        .await?;

    rows.iter()
        .map(|row| -> Result<TrackId> { Ok(TrackId::new(row.try_get::<String, _>("music_id")?)) })
        .collect()
}
