//! Lyric records
//!
//! One row per `music_id`; saving replaces the previous text.

use crate::error::{Result, StorageError};
use chrono::{DateTime, Utc};
use lark_core::types::{Lyric, TrackId};
use sqlx::{Row, SqlitePool};

/// Get the lyric for a track
pub async fn get(pool: &SqlitePool, music_id: &TrackId) -> Result<Option<Lyric>> {
    let row = sqlx::query("SELECT music_id, text, last_modified FROM lyrics WHERE music_id = ?")
        .bind(music_id.as_str())
        .fetch_optional(pool)
        .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let millis: i64 = row.try_get("last_modified")?;
    let last_modified = DateTime::<Utc>::from_timestamp_millis(millis)
        .ok_or_else(|| StorageError::InvalidValue(format!("last_modified {}", millis)))?;

    Ok(Some(Lyric {
        music_id: TrackId::new(row.try_get::<String, _>("music_id")?),
        text: row.try_get("text")?,
        last_modified,
    }))
}

/// Insert the lyric, replacing any existing one for the same track
pub async fn upsert(pool: &SqlitePool, lyric: &Lyric) -> Result<()> {
    sqlx::query(
        "INSERT INTO lyrics (music_id, text, last_modified) VALUES (?, ?, ?)
         ON CONFLICT(music_id) DO UPDATE SET
             text = excluded.text,
             last_modified = excluded.last_modified",
    )
    .bind(lyric.music_id.as_str())
    .bind(&lyric.text)
    .bind(lyric.last_modified.timestamp_millis())
    .execute(pool)
    .await?;
    Ok(())
}
