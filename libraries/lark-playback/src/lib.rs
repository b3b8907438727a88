//! Lark Player playback
//!
//! Out-of-process style playback control:
//! - [`PlaybackService`] hosts the engine task: the [`Transport`] (queue,
//!   play order, repeat and shuffle flags) plus the pause trigger
//! - [`EngineHandle`] is a control surface's connection to it
//! - [`PlaybackModeController`] and [`SleepTimerController`] are the
//!   control-surface state machines layered on a handle
//!
//! Control surfaces may detach and reattach at any time; the engine keeps
//! playing and the controllers re-derive their state from [`EngineStatus`].

#![forbid(unsafe_code)]

pub mod error;
pub mod handle;
pub mod mode;
pub mod protocol;
pub mod service;
pub mod timer;
pub mod transport;
pub mod types;

pub use error::{PlaybackError, Result};
pub use handle::EngineHandle;
pub use mode::PlaybackModeController;
pub use protocol::{EngineCommand, EngineEvent, EngineStatus};
pub use service::{EngineConfig, PlaybackService};
pub use timer::{SleepTimerController, TimerLabels, TimerSnapshot};
pub use transport::{Transport, RESTART_THRESHOLD};
pub use types::{PlaybackState, QueueTrack};
