//! Engine command and event protocol
//!
//! Control surfaces talk to the engine only through these messages. Commands
//! are fire-and-forget; their effect shows up in [`EngineStatus`] and as
//! [`EngineEvent`]s.

use crate::types::QueueTrack;
use lark_core::types::{PlaybackMode, RepeatFlag, TrackId, TransportFlags};
use std::time::Duration;
use tokio::time::Instant;

/// Commands sent to the engine task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineCommand {
    /// Replace the queue and select `start_index` (scan order)
    SetQueue {
        tracks: Vec<QueueTrack>,
        start_index: usize,
    },

    /// Start or resume playback
    Play,

    /// Pause playback
    Pause,

    /// Seek within the current track
    Seek(Duration),

    /// Skip to next track
    Next,

    /// Go to previous track (restarts the current one after 3 seconds)
    Previous,

    /// Set the repeat flag
    SetRepeat(RepeatFlag),

    /// Set the shuffle flag
    SetShuffle(bool),

    /// Set both transport flags to the combination implied by a mode
    SetPlaybackMode(PlaybackMode),

    /// Arm (or re-arm) the pause trigger `minutes` from now
    ArmPauseIn { minutes: u32 },

    /// Clear the pause trigger, if any
    DisarmPause,

    /// The current track reached its end
    TrackFinished,

    /// Stop the engine task
    Shutdown,
}

/// Events broadcast by the engine task
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    /// Playing state changed
    IsPlayingChanged(bool),

    /// Current track changed (`None` when the queue ran out or was cleared)
    CurrentTrackChanged(Option<TrackId>),

    /// Repeat or shuffle flag changed
    TransportFlagsChanged(TransportFlags),

    /// The pause trigger fired and playback was paused
    PauseTriggerFired,

    /// A command could not be applied
    Error(String),
}

/// Snapshot of the engine published after every command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EngineStatus {
    /// Live transport flags
    pub flags: TransportFlags,

    /// Whether a track is playing
    pub is_playing: bool,

    /// Current track, if any
    pub current_track: Option<TrackId>,

    /// When the pause trigger fires, if armed
    pub pause_deadline: Option<Instant>,
}

impl EngineStatus {
    /// Time left before the pause trigger fires
    pub fn pause_remaining(&self) -> Option<Duration> {
        self.pause_deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }
}
