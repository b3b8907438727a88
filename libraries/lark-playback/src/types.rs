//! Core types for the playback engine

use lark_core::types::{Track, TrackId};
use serde::{Deserialize, Serialize};

/// Track handed to the engine queue
///
/// Carries only what the engine needs to play and report the track.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueTrack {
    /// Track identifier, echoed back in engine events
    pub id: TrackId,

    /// Opaque resource reference for the decoder
    pub locator: String,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,
}

impl From<&Track> for QueueTrack {
    fn from(track: &Track) -> Self {
        Self {
            id: track.id.clone(),
            locator: track.locator.clone(),
            title: track.title.clone(),
            artist: track.artist.clone(),
        }
    }
}

/// Playback state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No track selected, or the queue ran out
    #[default]
    Stopped,

    /// Currently playing
    Playing,

    /// Paused (can resume)
    Paused,
}
