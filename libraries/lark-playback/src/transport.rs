//! Logical transport state
//!
//! Queue, play order, cursor, play/pause state, position and the two
//! transport flags. Pure state machine: the engine task drives it and
//! forwards the events it queues.

use crate::error::{PlaybackError, Result};
use crate::protocol::EngineEvent;
use crate::types::{PlaybackState, QueueTrack};
use lark_core::types::{PlaybackMode, RepeatFlag, TrackId, TransportFlags};
use rand::seq::SliceRandom;
use rand::thread_rng;
use std::time::Duration;
use tokio::time::Instant;

/// Past this point `previous()` restarts the current track
pub const RESTART_THRESHOLD: Duration = Duration::from_secs(3);

/// Queue and transport flags for one engine
#[derive(Debug)]
pub struct Transport {
    /// Tracks in the order they were handed over
    queue: Vec<QueueTrack>,

    /// Play order as indices into `queue`
    order: Vec<usize>,

    /// Position in `order` of the current track
    cursor: Option<usize>,

    state: PlaybackState,

    /// Position accumulated before the last resume
    position_base: Duration,

    /// When playback last resumed, while playing
    resumed_at: Option<Instant>,

    flags: TransportFlags,

    // Event queue forwarded by the engine task
    pending_events: Vec<EngineEvent>,
}

impl Default for Transport {
    fn default() -> Self {
        Self::new(PlaybackMode::default().transport_flags())
    }
}

impl Transport {
    /// Create an empty transport with the given flags
    pub fn new(flags: TransportFlags) -> Self {
        Self {
            queue: Vec::new(),
            order: Vec::new(),
            cursor: None,
            state: PlaybackState::Stopped,
            position_base: Duration::ZERO,
            resumed_at: None,
            flags,
            pending_events: Vec::new(),
        }
    }

    // ===== Queue =====

    /// Replace the queue and select the track at `start_index`
    ///
    /// With shuffle on, the selected track plays first and the rest follow in
    /// random order. An empty queue stops playback.
    pub fn set_queue(&mut self, tracks: Vec<QueueTrack>, start_index: usize) -> Result<()> {
        if tracks.is_empty() {
            self.queue.clear();
            self.order.clear();
            self.set_state(PlaybackState::Stopped);
            self.select(None);
            return Ok(());
        }

        if start_index >= tracks.len() {
            return Err(PlaybackError::IndexOutOfBounds(start_index));
        }

        let len = tracks.len();
        self.queue = tracks;

        let cursor = if self.flags.shuffle {
            self.order = shuffled_order(len, Some(start_index));
            0
        } else {
            self.order = (0..len).collect();
            start_index
        };

        self.select(Some(cursor));
        Ok(())
    }

    /// Tracks in the order they were handed over
    pub fn queue(&self) -> &[QueueTrack] {
        &self.queue
    }

    /// Tracks in play order
    pub fn play_order(&self) -> impl Iterator<Item = &QueueTrack> + '_ {
        self.order.iter().filter_map(|index| self.queue.get(*index))
    }

    // ===== Playback Control =====

    /// Start or resume playback
    ///
    /// Selects the first track in play order when nothing is selected.
    pub fn play(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        if self.cursor.is_none() {
            self.select(Some(0));
        }

        self.set_state(PlaybackState::Playing);
        Ok(())
    }

    /// Pause playback
    pub fn pause(&mut self) {
        if self.state == PlaybackState::Playing {
            self.set_state(PlaybackState::Paused);
        }
    }

    /// Seek within the current track
    pub fn seek(&mut self, position: Duration) -> Result<()> {
        if self.current_index().is_none() {
            return Err(PlaybackError::NoTrackLoaded);
        }

        self.position_base = position;
        if self.resumed_at.is_some() {
            self.resumed_at = Some(Instant::now());
        }
        Ok(())
    }

    /// Skip to next track
    ///
    /// Wraps to the start of the play order unless repeat is off.
    #[allow(clippy::should_implement_trait)]
    pub fn next(&mut self) -> Result<()> {
        if self.queue.is_empty() {
            return Err(PlaybackError::QueueEmpty);
        }

        let Some(cursor) = self.cursor else {
            self.select(Some(0));
            return Ok(());
        };

        if cursor + 1 < self.order.len() {
            self.select(Some(cursor + 1));
        } else if self.flags.repeat == RepeatFlag::Off {
            return Err(PlaybackError::QueueEmpty);
        } else {
            self.select(Some(0));
        }
        Ok(())
    }

    /// Go to previous track
    ///
    /// More than [`RESTART_THRESHOLD`] into the track restarts it. Otherwise
    /// steps back, wrapping to the end unless repeat is off.
    pub fn previous(&mut self) -> Result<()> {
        let Some(cursor) = self.cursor else {
            return Err(PlaybackError::NoTrackLoaded);
        };

        if self.position() > RESTART_THRESHOLD {
            self.rewind();
            return Ok(());
        }

        if cursor > 0 {
            self.select(Some(cursor - 1));
        } else if self.flags.repeat == RepeatFlag::Off {
            self.rewind();
        } else {
            self.select(Some(self.order.len() - 1));
        }
        Ok(())
    }

    /// The current track played to its end
    pub fn on_track_finished(&mut self) {
        let Some(cursor) = self.cursor else {
            return;
        };
        let has_next = cursor + 1 < self.order.len();

        match self.flags.repeat {
            RepeatFlag::One => self.rewind(),
            RepeatFlag::All if has_next => self.select(Some(cursor + 1)),
            RepeatFlag::All => self.select(Some(0)),
            RepeatFlag::Off if has_next => self.select(Some(cursor + 1)),
            RepeatFlag::Off => {
                self.set_state(PlaybackState::Stopped);
                self.select(None);
            }
        }
    }

    // ===== Shuffle & Repeat =====

    /// Set the repeat flag; no-op when unchanged
    pub fn set_repeat(&mut self, repeat: RepeatFlag) {
        self.apply_flags(TransportFlags::new(repeat, self.flags.shuffle));
    }

    /// Set the shuffle flag; no-op when unchanged
    pub fn set_shuffle(&mut self, shuffle: bool) {
        self.apply_flags(TransportFlags::new(self.flags.repeat, shuffle));
    }

    /// Set both flags to the combination implied by `mode`
    pub fn set_mode(&mut self, mode: PlaybackMode) -> bool {
        self.apply_flags(mode.transport_flags())
    }

    /// Set both flags at once
    ///
    /// Returns whether anything changed. Re-applying the current flags neither
    /// reshuffles nor emits an event.
    pub fn apply_flags(&mut self, flags: TransportFlags) -> bool {
        if self.flags == flags {
            return false;
        }

        if self.flags.shuffle != flags.shuffle {
            self.reorder(flags.shuffle);
        }

        self.flags = flags;
        self.pending_events
            .push(EngineEvent::TransportFlagsChanged(flags));
        true
    }

    /// Current transport flags
    pub fn flags(&self) -> TransportFlags {
        self.flags
    }

    // ===== State Queries =====

    pub fn state(&self) -> PlaybackState {
        self.state
    }

    pub fn is_playing(&self) -> bool {
        self.state == PlaybackState::Playing
    }

    /// Current track, if any
    pub fn current_track(&self) -> Option<&QueueTrack> {
        self.current_index().and_then(|index| self.queue.get(index))
    }

    /// Current track id, if any
    pub fn current_id(&self) -> Option<TrackId> {
        self.current_track().map(|track| track.id.clone())
    }

    /// Position in the current track
    pub fn position(&self) -> Duration {
        self.position_base + self.resumed_at.map(|at| at.elapsed()).unwrap_or_default()
    }

    // ===== Events =====

    /// Take the queued events
    pub fn drain_events(&mut self) -> Vec<EngineEvent> {
        std::mem::take(&mut self.pending_events)
    }

    // ===== Internal =====

    fn current_index(&self) -> Option<usize> {
        self.cursor.and_then(|cursor| self.order.get(cursor).copied())
    }

    /// Move the cursor and start the selected track from the top
    fn select(&mut self, cursor: Option<usize>) {
        let before = self.current_id();
        self.cursor = cursor;
        self.rewind();

        let after = self.current_id();
        if before != after {
            self.pending_events
                .push(EngineEvent::CurrentTrackChanged(after));
        }
    }

    fn rewind(&mut self) {
        self.position_base = Duration::ZERO;
        if self.resumed_at.is_some() {
            self.resumed_at = Some(Instant::now());
        }
    }

    fn set_state(&mut self, state: PlaybackState) {
        let was_playing = self.is_playing();

        if state == PlaybackState::Playing && !was_playing {
            self.resumed_at = Some(Instant::now());
        } else if state != PlaybackState::Playing && was_playing {
            self.position_base = self.position();
            self.resumed_at = None;
        }

        self.state = state;
        if was_playing != self.is_playing() {
            self.pending_events
                .push(EngineEvent::IsPlayingChanged(self.is_playing()));
        }
    }

    /// Rebuild the play order, keeping the current track current
    fn reorder(&mut self, shuffle: bool) {
        let current = self.current_index();

        if shuffle {
            self.order = shuffled_order(self.queue.len(), current);
            self.cursor = current.map(|_| 0);
        } else {
            self.order = (0..self.queue.len()).collect();
            self.cursor = current;
        }
    }
}

/// Random play order over `len` tracks with `first` (if any) up front
fn shuffled_order(len: usize, first: Option<usize>) -> Vec<usize> {
    let mut rest: Vec<usize> = (0..len).filter(|index| Some(*index) != first).collect();
    rest.shuffle(&mut thread_rng());
    first.into_iter().chain(rest).collect()
}
