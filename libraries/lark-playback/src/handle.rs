//! Control-surface handle onto a running engine

use crate::error::{PlaybackError, Result};
use crate::protocol::{EngineCommand, EngineEvent, EngineStatus};
use crate::types::QueueTrack;
use lark_core::types::{PlaybackMode, RepeatFlag};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};

/// Cheap, cloneable connection to the engine task
///
/// Sends never block: a full command buffer reports
/// [`PlaybackError::EngineBusy`] and a stopped engine
/// [`PlaybackError::EngineUnreachable`].
#[derive(Debug, Clone)]
pub struct EngineHandle {
    commands: mpsc::Sender<EngineCommand>,
    status: watch::Receiver<EngineStatus>,
    events: broadcast::Sender<EngineEvent>,
}

impl EngineHandle {
    pub(crate) fn new(
        commands: mpsc::Sender<EngineCommand>,
        status: watch::Receiver<EngineStatus>,
        events: broadcast::Sender<EngineEvent>,
    ) -> Self {
        Self {
            commands,
            status,
            events,
        }
    }

    /// Send a command without waiting for it to be applied
    pub fn send(&self, command: EngineCommand) -> Result<()> {
        self.commands.try_send(command).map_err(|e| match e {
            mpsc::error::TrySendError::Full(command) => {
                tracing::warn!("Engine command buffer full, dropping {:?}", command);
                PlaybackError::EngineBusy
            }
            mpsc::error::TrySendError::Closed(_) => PlaybackError::EngineUnreachable,
        })
    }

    /// Latest engine snapshot
    pub fn status(&self) -> EngineStatus {
        self.status.borrow().clone()
    }

    /// Subscribe to engine events from now on
    pub fn subscribe(&self) -> broadcast::Receiver<EngineEvent> {
        self.events.subscribe()
    }

    /// Whether the engine task is still accepting commands
    pub fn is_connected(&self) -> bool {
        !self.commands.is_closed()
    }

    // Convenience senders

    pub fn set_queue(&self, tracks: Vec<QueueTrack>, start_index: usize) -> Result<()> {
        self.send(EngineCommand::SetQueue {
            tracks,
            start_index,
        })
    }

    pub fn play(&self) -> Result<()> {
        self.send(EngineCommand::Play)
    }

    pub fn pause(&self) -> Result<()> {
        self.send(EngineCommand::Pause)
    }

    pub fn seek(&self, position: Duration) -> Result<()> {
        self.send(EngineCommand::Seek(position))
    }

    #[allow(clippy::should_implement_trait)]
    pub fn next(&self) -> Result<()> {
        self.send(EngineCommand::Next)
    }

    pub fn previous(&self) -> Result<()> {
        self.send(EngineCommand::Previous)
    }

    pub fn set_repeat(&self, repeat: RepeatFlag) -> Result<()> {
        self.send(EngineCommand::SetRepeat(repeat))
    }

    pub fn set_shuffle(&self, shuffle: bool) -> Result<()> {
        self.send(EngineCommand::SetShuffle(shuffle))
    }

    pub fn set_playback_mode(&self, mode: PlaybackMode) -> Result<()> {
        self.send(EngineCommand::SetPlaybackMode(mode))
    }

    pub fn arm_pause_in(&self, minutes: u32) -> Result<()> {
        self.send(EngineCommand::ArmPauseIn { minutes })
    }

    pub fn disarm_pause(&self) -> Result<()> {
        self.send(EngineCommand::DisarmPause)
    }

    pub fn track_finished(&self) -> Result<()> {
        self.send(EngineCommand::TrackFinished)
    }
}
