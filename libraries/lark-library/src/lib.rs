//! Lark Player library index
//!
//! Builds the visible track listing and its fast-scroll rail:
//! - [`bucket`]: script-aware grouping of titles (Hangul initials, letters, `#`)
//! - [`index`]: favorite overlay, search filter and the bucket index
//! - [`scroll`]: rail pointer mapping and drag state
//! - [`scanner`]: filesystem [`TrackScanner`](lark_core::TrackScanner)
//!
//! # Example
//!
//! ```rust
//! use lark_core::types::{RawTrack, TrackId};
//! use lark_library::{build, Bucket};
//! use std::collections::HashSet;
//!
//! let raw = vec![
//!     RawTrack::new(TrackId::new("1"), "Bravo", "x", "/a.mp3"),
//!     RawTrack::new(TrackId::new("2"), "가을", "y", "/b.mp3"),
//! ];
//! let view = build(&raw, &HashSet::new(), "");
//! assert_eq!(view.index.buckets(), &[Bucket::Hangul('ㄱ'), Bucket::Letter('B')]);
//! assert_eq!(view.index.row_for(Bucket::Hangul('ㄱ')), Some(1));
//! ```

#![forbid(unsafe_code)]

pub mod bucket;
pub mod error;
pub mod index;
pub mod scanner;
pub mod scroll;

pub use bucket::{classify_char, classify_title, Bucket, BucketGroup};
pub use error::{Result, ScanError};
pub use index::{build, filter_tracks, overlay_favorites, BucketIndex, LibraryIndexBuilder, LibraryView};
pub use scanner::FileSystemScanner;
pub use scroll::{FastScrollRail, ScrollIndexMapper, ScrollTarget, DEFAULT_ITEM_HEIGHT};
