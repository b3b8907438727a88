//! Collaborator traits
//!
//! The track scanner and the favorite/lyric stores sit outside the core. These
//! traits describe their boundary so local implementations (filesystem scanner,
//! SQLite stores) and test doubles are interchangeable.

use crate::error::Result;
use crate::types::{Lyric, RawTrack, TrackId};
use async_trait::async_trait;
use std::collections::HashSet;

/// Source of raw track records
///
/// Implementations may be slow; the session invokes them at most once per
/// session start. A scan must complete before the listing it returns.
#[async_trait]
pub trait TrackScanner: Send + Sync {
    /// Rescan the device and list every audio track found, in listing order
    async fn scan_and_list(&self) -> Result<Vec<RawTrack>>;
}

/// Persistent set of favorite track ids
#[async_trait]
pub trait FavoriteStore: Send + Sync {
    /// Mark a track as favorite (no-op if already present)
    async fn add(&self, id: &TrackId) -> Result<()>;

    /// Remove a track from the favorites (no-op if absent)
    async fn remove(&self, id: &TrackId) -> Result<()>;

    /// Check whether a track is a favorite
    async fn is_favorite(&self, id: &TrackId) -> Result<bool>;

    /// Get every favorite id
    async fn all_favorite_ids(&self) -> Result<HashSet<TrackId>>;
}

/// Persistent lyric records keyed by music id
#[async_trait]
pub trait LyricStore: Send + Sync {
    /// Get the lyric for a track, if one was saved
    async fn get(&self, music_id: &TrackId) -> Result<Option<Lyric>>;

    /// Insert or replace the lyric for `lyric.music_id`
    async fn upsert(&self, lyric: &Lyric) -> Result<()>;
}
