/// Lyric record
use crate::types::TrackId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Lyrics attached to a track, upserted by `music_id`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyric {
    /// Track the lyrics belong to
    pub music_id: TrackId,

    /// Lyric text
    pub text: String,

    /// Last time the lyrics were saved
    pub last_modified: DateTime<Utc>,
}

impl Lyric {
    /// Create a lyric stamped with the current time
    pub fn new(music_id: TrackId, text: impl Into<String>) -> Self {
        Self {
            music_id,
            text: text.into(),
            last_modified: Utc::now(),
        }
    }
}
