//! Playback mode controller
//!
//! Holds the control surface's copy of the playback mode and pushes each change
//! to the engine. The engine keeps its own copy as transport flags; on attach
//! the local copy is re-derived from those flags.

use crate::error::Result;
use crate::handle::EngineHandle;
use lark_core::types::{PlaybackMode, TransportFlags};
use tokio::sync::watch;

/// Cycles `RepeatAll -> RepeatOne -> Shuffle` and keeps the engine in step
#[derive(Debug)]
pub struct PlaybackModeController {
    engine: EngineHandle,
    mode: watch::Sender<PlaybackMode>,
}

impl PlaybackModeController {
    /// Attach to an engine, adopting its live mode
    pub fn attach(engine: EngineHandle) -> Self {
        let initial = PlaybackMode::from_transport_flags(engine.status().flags);
        let (mode, _) = watch::channel(initial);
        tracing::debug!("Playback mode attached as {}", initial);
        Self { engine, mode }
    }

    /// Last-known mode
    pub fn current(&self) -> PlaybackMode {
        *self.mode.borrow()
    }

    /// Observe mode changes
    pub fn subscribe(&self) -> watch::Receiver<PlaybackMode> {
        self.mode.subscribe()
    }

    /// Advance to the next mode and tell the engine
    ///
    /// The local mode advances even when the command cannot be delivered; the
    /// error is returned and the next [`reconcile`](Self::reconcile) corrects
    /// any drift.
    pub fn toggle(&self) -> Result<PlaybackMode> {
        let next = self.current().next();
        self.mode.send_replace(next);

        if let Err(e) = self.engine.set_playback_mode(next) {
            tracing::warn!("Playback mode {} not delivered: {}", next, e);
            return Err(e);
        }
        Ok(next)
    }

    /// Re-derive the mode from the engine's live flags
    pub fn reconcile(&self) -> PlaybackMode {
        self.reconcile_with(self.engine.status().flags)
    }

    /// Re-derive the mode from flags carried by an engine event
    pub fn reconcile_with(&self, flags: TransportFlags) -> PlaybackMode {
        let live = PlaybackMode::from_transport_flags(flags);
        self.mode.send_if_modified(|mode| {
            if *mode == live {
                return false;
            }
            tracing::debug!("Playback mode corrected from {} to {}", mode, live);
            *mode = live;
            true
        });
        live
    }
}
