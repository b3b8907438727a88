//! Sleep timer controller
//!
//! Two independent clocks: the engine's pause trigger does the actual pausing,
//! and a local 1 Hz countdown drives the "mm:ss" display. Each start or cancel
//! bumps a generation counter; countdown ticks from an older generation are
//! discarded before they reach subscribers.

use crate::error::{PlaybackError, Result};
use crate::handle::EngineHandle;
use lark_core::types::TimerState;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::Instant;

const TICK: Duration = Duration::from_secs(1);

/// Display labels for the idle and finished states
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerLabels {
    /// Shown when no timer is running
    pub idle: String,

    /// Shown once a countdown reaches zero
    pub finished: String,
}

impl Default for TimerLabels {
    fn default() -> Self {
        Self {
            idle: "Set sleep timer".to_string(),
            finished: "Timer finished".to_string(),
        }
    }
}

/// What subscribers observe
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TimerSnapshot {
    /// Bumped by every start and cancel
    pub generation: u64,

    /// Countdown state
    pub state: TimerState,

    /// Display text: `mm:ss` while running, otherwise a label
    pub text: String,
}

/// Sleep timer for one control surface
#[derive(Debug)]
pub struct SleepTimerController {
    engine: EngineHandle,
    labels: TimerLabels,
    snapshot: Arc<watch::Sender<TimerSnapshot>>,
    countdown: Option<JoinHandle<()>>,
}

impl SleepTimerController {
    /// Attach to an engine
    ///
    /// If the engine already has a pause trigger armed (set by an earlier
    /// control surface), the local countdown resumes from the engine's
    /// remaining time without re-arming it.
    pub fn attach(engine: EngineHandle, labels: TimerLabels) -> Self {
        let (snapshot, _) = watch::channel(TimerSnapshot {
            generation: 0,
            state: TimerState::idle(),
            text: labels.idle.clone(),
        });

        let mut controller = Self {
            engine,
            labels,
            snapshot: Arc::new(snapshot),
            countdown: None,
        };

        if let Some(remaining) = controller.engine.status().pause_remaining() {
            let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
            if seconds > 0 {
                tracing::debug!("Resuming sleep timer with {}s left", seconds);
                controller.run_countdown(seconds);
            }
        }

        controller
    }

    /// Start a timer, superseding any running one
    ///
    /// The local countdown runs even if the engine could not be reached; the
    /// delivery error is returned.
    pub fn start(&mut self, minutes: u32) -> Result<()> {
        if minutes == 0 {
            return Err(PlaybackError::InvalidDuration(minutes));
        }

        self.run_countdown(u64::from(minutes) * 60);
        tracing::info!("Sleep timer started for {} minutes", minutes);

        self.engine.arm_pause_in(minutes).map_err(|e| {
            tracing::warn!("Pause trigger not armed: {}", e);
            e
        })
    }

    /// Stop the countdown and disarm the engine trigger
    ///
    /// The disarm command is always sent. With no timer running a delivery
    /// failure is only logged; otherwise it is returned.
    pub fn cancel(&mut self) -> Result<()> {
        let was_active = self.is_active();
        self.abort_countdown();
        let idle = self.labels.idle.clone();
        self.begin(TimerState::idle(), idle);
        tracing::info!("Sleep timer cancelled");

        match self.engine.disarm_pause() {
            Ok(()) => Ok(()),
            Err(e) if was_active => {
                tracing::warn!("Pause trigger not disarmed: {}", e);
                Err(e)
            }
            Err(e) => {
                tracing::debug!("Idle disarm not delivered: {}", e);
                Ok(())
            }
        }
    }

    /// Current snapshot
    pub fn current(&self) -> TimerSnapshot {
        self.snapshot.borrow().clone()
    }

    /// Current display text
    pub fn text(&self) -> String {
        self.snapshot.borrow().text.clone()
    }

    /// Whether a countdown is running
    pub fn is_active(&self) -> bool {
        self.snapshot.borrow().state.armed
    }

    /// Observe snapshot changes
    pub fn subscribe(&self) -> watch::Receiver<TimerSnapshot> {
        self.snapshot.subscribe()
    }

    pub fn labels(&self) -> &TimerLabels {
        &self.labels
    }

    fn run_countdown(&mut self, seconds: u64) {
        self.abort_countdown();

        let state = TimerState::running(seconds);
        let generation = self.begin(state, state.format_remaining());

        let snapshot = Arc::clone(&self.snapshot);
        let finished = self.labels.finished.clone();
        self.countdown = Some(tokio::spawn(count_down(
            snapshot, generation, seconds, finished,
        )));
    }

    /// Publish a new generation and return its number
    fn begin(&self, state: TimerState, text: String) -> u64 {
        let mut generation = 0;
        self.snapshot.send_modify(|snapshot| {
            snapshot.generation += 1;
            snapshot.state = state;
            snapshot.text = text;
            generation = snapshot.generation;
        });
        generation
    }

    fn abort_countdown(&mut self) {
        if let Some(task) = self.countdown.take() {
            task.abort();
        }
    }
}

impl Drop for SleepTimerController {
    fn drop(&mut self) {
        // The engine trigger stays armed
        self.abort_countdown();
    }
}

async fn count_down(
    snapshot: Arc<watch::Sender<TimerSnapshot>>,
    generation: u64,
    mut remaining: u64,
    finished: String,
) {
    let mut ticker = tokio::time::interval_at(Instant::now() + TICK, TICK);

    while remaining > 0 {
        ticker.tick().await;
        remaining -= 1;

        let state = TimerState::running(remaining);
        if !publish(&snapshot, generation, state, state.format_remaining()) {
            return;
        }
    }

    publish(&snapshot, generation, TimerState::idle(), finished);
}

/// Publish a tick unless a newer generation took over
fn publish(
    snapshot: &watch::Sender<TimerSnapshot>,
    generation: u64,
    state: TimerState,
    text: String,
) -> bool {
    snapshot.send_if_modified(|current| {
        if current.generation != generation {
            return false;
        }
        current.state = state;
        current.text = text;
        true
    })
}
