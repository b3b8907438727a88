//! Lark Player session
//!
//! The control surface a UI binds to. A [`MusicSession`] loads the library,
//! applies search and favorites, keeps the fast-scroll rail in step with the
//! visible rows, and drives a running playback engine:
//!
//! ```rust,no_run
//! use lark_playback::PlaybackService;
//! use lark_session::{init_logging, MusicSession, SessionConfig};
//! use std::sync::Arc;
//!
//! # async fn example() -> lark_core::Result<()> {
//! let config = SessionConfig::load()?;
//! init_logging(&config.logging);
//!
//! let engine = PlaybackService::start(config.engine_config());
//! let session = Arc::new(MusicSession::open(&config, engine.connect()).await?);
//! session.spawn_event_listener();
//!
//! session.load_music().await;
//! session.set_search_query("love").await;
//! session.play_from_row(0)?;
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod logging;
pub mod session;

pub use config::SessionConfig;
pub use logging::init_logging;
pub use session::{Collaborators, LibrarySnapshot, MusicSession, NowPlaying};
