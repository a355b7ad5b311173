//! Async player service
//!
//! Runs a `SessionManager` on a single task. Commands, device callbacks and
//! finished playlist lookups are all serialized through that task, so the
//! manager never sees concurrent transitions. Lookups run on their own
//! tasks and report back by generation.

use std::sync::Arc;
use tilawa_core::ReciterId;
use tokio::sync::{broadcast, mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::device::{AudioDevice, DeviceNotification};
use crate::error::{PlaybackError, Result};
use crate::events::SessionEvent;
use crate::manager::{ResolveRequest, SessionManager};
use crate::resolver::PlaylistResolver;
use crate::types::{PlaybackSnapshot, Playlist};

const EVENT_CAPACITY: usize = 256;

/// Commands sent to the player task
#[derive(Debug)]
enum PlayerCommand {
    PlayTrack {
        reciter_id: ReciterId,
        chapter_number: u16,
        reply: oneshot::Sender<Result<()>>,
    },
    TogglePlayPause,
    Seek(f64),
    ClosePlayer,
    Shutdown,
}

struct Resolved {
    generation: u64,
    result: Result<Playlist>,
}

/// Handle to a running player task
///
/// Cheap to clone; the task stops when `shutdown` is called or every handle
/// is dropped.
#[derive(Clone)]
pub struct PlayerHandle {
    commands: mpsc::UnboundedSender<PlayerCommand>,
    snapshots: watch::Receiver<PlaybackSnapshot>,
    events: broadcast::Sender<SessionEvent>,
}

impl PlayerHandle {
    /// Select a reciter and chapter
    ///
    /// Resolves once the selection was accepted, before the playlist is
    /// loaded. Errors for invalid selections are returned here.
    pub async fn play_track(&self, reciter_id: ReciterId, chapter_number: u16) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.send(PlayerCommand::PlayTrack {
            reciter_id,
            chapter_number,
            reply,
        })?;
        response.await.map_err(|_| PlaybackError::ServiceStopped)?
    }

    pub fn toggle_play_pause(&self) -> Result<()> {
        self.send(PlayerCommand::TogglePlayPause)
    }

    pub fn seek(&self, seconds: f64) -> Result<()> {
        self.send(PlayerCommand::Seek(seconds))
    }

    pub fn close_player(&self) -> Result<()> {
        self.send(PlayerCommand::ClosePlayer)
    }

    /// Ask the task to close the player and exit
    pub fn shutdown(&self) -> Result<()> {
        self.send(PlayerCommand::Shutdown)
    }

    /// Latest snapshot
    pub fn snapshot(&self) -> PlaybackSnapshot {
        self.snapshots.borrow().clone()
    }

    /// Receiver that is notified on every snapshot change
    pub fn subscribe(&self) -> watch::Receiver<PlaybackSnapshot> {
        self.snapshots.clone()
    }

    /// Receiver for session events
    pub fn events(&self) -> broadcast::Receiver<SessionEvent> {
        self.events.subscribe()
    }

    fn send(&self, command: PlayerCommand) -> Result<()> {
        self.commands
            .send(command)
            .map_err(|_| PlaybackError::ServiceStopped)
    }
}

/// Player task state
pub struct PlayerService<D: AudioDevice + 'static> {
    manager: SessionManager<D>,
    resolver: Arc<PlaylistResolver>,
    snapshots: watch::Sender<PlaybackSnapshot>,
    events: broadcast::Sender<SessionEvent>,
    resolved_tx: mpsc::UnboundedSender<Resolved>,
}

impl<D: AudioDevice + 'static> PlayerService<D> {
    /// Start the player task
    ///
    /// `device_events` must be the receiver paired with the sink the device
    /// reports through.
    pub fn spawn(
        manager: SessionManager<D>,
        resolver: Arc<PlaylistResolver>,
        device_events: mpsc::UnboundedReceiver<DeviceNotification>,
    ) -> (PlayerHandle, JoinHandle<()>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (resolved_tx, resolved_rx) = mpsc::unbounded_channel();
        let (snapshots_tx, snapshots_rx) = watch::channel(manager.snapshot());
        let (events_tx, _) = broadcast::channel(EVENT_CAPACITY);

        let handle = PlayerHandle {
            commands: commands_tx,
            snapshots: snapshots_rx,
            events: events_tx.clone(),
        };

        let service = Self {
            manager,
            resolver,
            snapshots: snapshots_tx,
            events: events_tx,
            resolved_tx,
        };

        let task = tokio::spawn(service.run(commands_rx, device_events, resolved_rx));
        (handle, task)
    }

    async fn run(
        mut self,
        mut commands: mpsc::UnboundedReceiver<PlayerCommand>,
        mut device_events: mpsc::UnboundedReceiver<DeviceNotification>,
        mut resolved: mpsc::UnboundedReceiver<Resolved>,
    ) {
        tracing::debug!("Player service started");

        loop {
            tokio::select! {
                command = commands.recv() => match command {
                    Some(PlayerCommand::Shutdown) | None => break,
                    Some(command) => self.handle_command(command),
                },
                Some(notification) = device_events.recv() => {
                    if let Some(request) = self.manager.handle_device_event(notification) {
                        self.spawn_resolve(request);
                    }
                }
                Some(done) = resolved.recv() => {
                    self.manager.apply_resolved(done.generation, done.result);
                }
            }
            self.publish();
        }

        self.manager.close_player();
        self.publish();

        // Results still queued were never applied
        resolved.close();
        while let Ok(done) = resolved.try_recv() {
            if let Ok(playlist) = done.result {
                self.resolver.registry().release_playlist(&playlist);
            }
        }

        tracing::debug!("Player service stopped");
    }

    fn handle_command(&mut self, command: PlayerCommand) {
        match command {
            PlayerCommand::PlayTrack {
                reciter_id,
                chapter_number,
                reply,
            } => {
                let outcome = match self.manager.play_track(&reciter_id, chapter_number) {
                    Ok(request) => {
                        if let Some(request) = request {
                            self.spawn_resolve(request);
                        }
                        Ok(())
                    }
                    Err(e) => Err(e),
                };
                let _ = reply.send(outcome);
            }
            PlayerCommand::TogglePlayPause => self.manager.toggle_play_pause(),
            PlayerCommand::Seek(seconds) => {
                self.manager.seek(seconds);
            }
            PlayerCommand::ClosePlayer => self.manager.close_player(),
            PlayerCommand::Shutdown => {}
        }
    }

    fn spawn_resolve(&self, request: ResolveRequest) {
        let resolver = Arc::clone(&self.resolver);
        let tx = self.resolved_tx.clone();

        tokio::spawn(async move {
            let result = resolver
                .resolve(&request.reciter_id, request.chapter_number)
                .await;
            let message = Resolved {
                generation: request.generation,
                result,
            };
            if let Err(mpsc::error::SendError(message)) = tx.send(message) {
                if let Ok(playlist) = message.result {
                    resolver.registry().release_playlist(&playlist);
                }
            }
        });
    }

    /// Publish the snapshot, then the events that led to it
    ///
    /// Event subscribers read `PlayerHandle::snapshot`, so it must already
    /// reflect every event they receive.
    fn publish(&mut self) {
        let events = self.manager.drain_events();

        self.snapshots.send_if_modified(|current| {
            let next = self.manager.snapshot();
            if *current == next {
                false
            } else {
                *current = next;
                true
            }
        });

        for event in events {
            tracing::trace!(?event, "Session event");
            // No subscribers is fine
            let _ = self.events.send(event);
        }
    }
}
