/// Track domain types
use crate::types::TrackId;
use serde::{Deserialize, Serialize};

/// Track record as produced by the scanner
///
/// Carries no favorite flag: favorites live in the favorite store and are
/// overlaid at index-build time.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawTrack {
    /// Stable track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Opaque resource reference handed to the playback engine
    pub locator: String,
}

impl RawTrack {
    /// Create a raw track record
    pub fn new(
        id: TrackId,
        title: impl Into<String>,
        artist: impl Into<String>,
        locator: impl Into<String>,
    ) -> Self {
        Self {
            id,
            title: title.into(),
            artist: artist.into(),
            locator: locator.into(),
        }
    }
}

/// Audio track as shown in the library
///
/// Immutable value owned by a library snapshot. `is_favorite` is derived from
/// the favorite store for the snapshot it belongs to; it is never written back.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    /// Stable track identifier
    pub id: TrackId,

    /// Track title
    pub title: String,

    /// Artist name
    pub artist: String,

    /// Opaque resource reference handed to the playback engine
    pub locator: String,

    /// Whether the track is in the favorite store
    pub is_favorite: bool,
}

impl Track {
    /// Overlay a favorite flag onto a raw scanner record
    pub fn from_raw(raw: RawTrack, is_favorite: bool) -> Self {
        Self {
            id: raw.id,
            title: raw.title,
            artist: raw.artist,
            locator: raw.locator,
            is_favorite,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw() -> RawTrack {
        RawTrack::new(TrackId::new("1"), "Elephant", "Tame Impala", "/music/elephant.mp3")
    }

    #[test]
    fn track_from_raw_keeps_fields() {
        let track = Track::from_raw(raw(), false);
        assert_eq!(track.id.as_str(), "1");
        assert_eq!(track.title, "Elephant");
        assert_eq!(track.artist, "Tame Impala");
        assert!(!track.is_favorite);
    }
}
