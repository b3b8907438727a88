//! Lark Player Core
//!
//! Platform-agnostic core types, traits, and error handling for Lark Player.
//!
//! This crate provides the foundational building blocks shared by the library
//! index, the playback controllers, the stores, and the session layer.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `RawTrack`, `Track`, `Lyric`, `PlaybackMode`, `TimerState`
//! - **Collaborator Traits**: `TrackScanner`, `FavoriteStore`, `LyricStore`
//! - **Error Handling**: Unified `LarkError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use lark_core::types::{PlaybackMode, RawTrack, Track, TrackId};
//!
//! let raw = RawTrack::new(TrackId::new("42"), "가나다", "Artist", "/music/a.mp3");
//! let track = Track::from_raw(raw, true);
//! assert!(track.is_favorite);
//!
//! assert_eq!(PlaybackMode::RepeatAll.next(), PlaybackMode::RepeatOne);
//! ```

#![forbid(unsafe_code)]

pub mod error;
pub mod traits;
pub mod types;

// Re-export commonly used types
pub use error::{LarkError, Result};
pub use traits::{FavoriteStore, LyricStore, TrackScanner};

pub use types::{
    Lyric, PlaybackMode, RawTrack, RepeatFlag, TimerState, Track, TrackId, TransportFlags,
};
