//! Playback engine host
//!
//! Runs the [`Transport`] in a single task that outlives any control surface.
//! Control surfaces come and go through [`PlaybackService::connect`]; the
//! engine keeps its queue, flags and pause trigger across reattachment.

use crate::handle::EngineHandle;
use crate::protocol::{EngineCommand, EngineEvent, EngineStatus};
use crate::transport::Transport;
use lark_core::types::{PlaybackMode, TransportFlags};
use std::time::Duration;
use tokio::sync::{broadcast, mpsc, watch};
use tokio::task::JoinHandle;
use tokio::time::Instant;

/// Engine channel sizing and startup flags
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EngineConfig {
    /// Command buffer capacity
    pub command_buffer: usize,

    /// Event broadcast capacity (slow subscribers lag past this)
    pub event_buffer: usize,

    /// Flags the transport starts with
    pub initial_flags: TransportFlags,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            command_buffer: 32,
            event_buffer: 64,
            initial_flags: PlaybackMode::default().transport_flags(),
        }
    }
}

/// Owner of the engine task
#[derive(Debug)]
pub struct PlaybackService {
    handle: EngineHandle,
    commands: mpsc::Sender<EngineCommand>,
    task: JoinHandle<()>,
}

impl PlaybackService {
    /// Spawn the engine task on the current tokio runtime
    pub fn start(config: EngineConfig) -> Self {
        let (command_tx, command_rx) = mpsc::channel(config.command_buffer.max(1));
        let (event_tx, _) = broadcast::channel(config.event_buffer.max(1));

        let transport = Transport::new(config.initial_flags);
        let (status_tx, status_rx) = watch::channel(EngineStatus {
            flags: transport.flags(),
            ..EngineStatus::default()
        });

        let task = EngineTask {
            transport,
            commands: command_rx,
            status: status_tx,
            events: event_tx.clone(),
            pause_deadline: None,
        };
        let task = tokio::spawn(task.run());

        tracing::info!("Playback engine started");

        Self {
            handle: EngineHandle::new(command_tx.clone(), status_rx, event_tx),
            commands: command_tx,
            task,
        }
    }

    /// New control-surface handle
    pub fn connect(&self) -> EngineHandle {
        self.handle.clone()
    }

    /// Latest engine snapshot
    pub fn status(&self) -> EngineStatus {
        self.handle.status()
    }

    /// Stop the engine task and wait for it to exit
    ///
    /// Outstanding handles report [`EngineUnreachable`](crate::PlaybackError::EngineUnreachable)
    /// afterwards.
    pub async fn shutdown(self) {
        if self.commands.send(EngineCommand::Shutdown).await.is_err() {
            tracing::debug!("Playback engine already stopped");
        }

        if let Err(e) = self.task.await {
            tracing::error!("Playback engine task failed: {}", e);
        }
    }
}

struct EngineTask {
    transport: Transport,
    commands: mpsc::Receiver<EngineCommand>,
    status: watch::Sender<EngineStatus>,
    events: broadcast::Sender<EngineEvent>,
    pause_deadline: Option<Instant>,
}

impl EngineTask {
    async fn run(mut self) {
        loop {
            let deadline = self.pause_deadline;
            let trigger = async move {
                match deadline {
                    Some(deadline) => tokio::time::sleep_until(deadline).await,
                    None => std::future::pending::<()>().await,
                }
            };

            tokio::select! {
                command = self.commands.recv() => match command {
                    Some(EngineCommand::Shutdown) | None => break,
                    Some(command) => self.process_command(command),
                },
                () = trigger => self.fire_pause_trigger(),
            }

            self.publish();
        }

        tracing::info!("Playback engine stopped");
    }

    fn process_command(&mut self, command: EngineCommand) {
        tracing::trace!("Engine command: {:?}", command);

        let result = match command {
            EngineCommand::SetQueue {
                tracks,
                start_index,
            } => self.transport.set_queue(tracks, start_index),
            EngineCommand::Play => self.transport.play(),
            EngineCommand::Pause => {
                self.transport.pause();
                Ok(())
            }
            EngineCommand::Seek(position) => self.transport.seek(position),
            EngineCommand::Next => self.transport.next(),
            EngineCommand::Previous => self.transport.previous(),
            EngineCommand::SetRepeat(repeat) => {
                self.transport.set_repeat(repeat);
                Ok(())
            }
            EngineCommand::SetShuffle(shuffle) => {
                self.transport.set_shuffle(shuffle);
                Ok(())
            }
            EngineCommand::SetPlaybackMode(mode) => {
                if self.transport.set_mode(mode) {
                    tracing::debug!("Playback mode set to {}", mode);
                }
                Ok(())
            }
            EngineCommand::ArmPauseIn { minutes } => {
                let delay = Duration::from_secs(u64::from(minutes) * 60);
                self.pause_deadline = Some(Instant::now() + delay);
                tracing::info!("Pause trigger armed for {} minutes", minutes);
                Ok(())
            }
            EngineCommand::DisarmPause => {
                if self.pause_deadline.take().is_some() {
                    tracing::info!("Pause trigger disarmed");
                }
                Ok(())
            }
            EngineCommand::TrackFinished => {
                self.transport.on_track_finished();
                Ok(())
            }
            // Handled by the run loop
            EngineCommand::Shutdown => Ok(()),
        };

        if let Err(e) = result {
            tracing::warn!("Engine command failed: {}", e);
            self.emit(EngineEvent::Error(e.to_string()));
        }
    }

    fn fire_pause_trigger(&mut self) {
        self.pause_deadline = None;
        self.transport.pause();
        tracing::info!("Pause trigger fired");
        self.publish();
        self.emit(EngineEvent::PauseTriggerFired);
    }

    /// Publish the snapshot, then forward transport events
    ///
    /// Subscribers reading the status on an event always see the state the
    /// event describes.
    fn publish(&mut self) {
        let status = EngineStatus {
            flags: self.transport.flags(),
            is_playing: self.transport.is_playing(),
            current_track: self.transport.current_id(),
            pause_deadline: self.pause_deadline,
        };

        self.status.send_if_modified(|current| {
            if *current == status {
                return false;
            }
            *current = status;
            true
        });

        self.forward_transport_events();
    }

    fn forward_transport_events(&mut self) {
        for event in self.transport.drain_events() {
            self.emit(event);
        }
    }

    fn emit(&self, event: EngineEvent) {
        // No subscribers is fine; nobody is attached
        let _ = self.events.send(event);
    }
}
