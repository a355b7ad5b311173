//! Playback session manager - core orchestration
//!
//! Owns the now-playing session and the output device. All transitions run
//! synchronously on the caller; the one asynchronous step, playlist
//! resolution, is handed out as a `ResolveRequest` and its result comes back
//! through `apply_resolved`. Each request carries a generation, and a result
//! whose generation is no longer pending is stale and gets released.

use std::sync::Arc;
use tilawa_core::{Catalog, ReciterId};

use crate::{
    device::{AudioDevice, DeviceEvent, DeviceNotification, LoadId},
    error::Result,
    events::SessionEvent,
    local::LocalSourceRegistry,
    types::{PlaybackPosition, PlaybackSnapshot, PlaybackState, Playlist, TrackDescriptor},
};

/// Playlist lookup the caller must run and report back
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolveRequest {
    pub generation: u64,
    pub reciter_id: ReciterId,
    pub chapter_number: u16,
}

#[derive(Debug)]
struct Session {
    track: TrackDescriptor,
    playlist: Playlist,
    position: PlaybackPosition,
    is_playing: bool,
    last_error: Option<String>,
}

#[derive(Debug)]
struct PendingLoad {
    generation: u64,
    reciter_id: ReciterId,
    chapter_number: u16,
}

/// Drives one audio device through a recitation session
pub struct SessionManager<D: AudioDevice> {
    catalog: Arc<Catalog>,
    registry: LocalSourceRegistry,
    device: D,

    session: Option<Session>,
    pending: Option<PendingLoad>,

    // Bumped on every new selection and on close
    generation: u64,

    // Bumped on every device load
    load: LoadId,

    // Event queue for presentation
    pending_events: Vec<SessionEvent>,
}

impl<D: AudioDevice> SessionManager<D> {
    pub fn new(catalog: Arc<Catalog>, registry: LocalSourceRegistry, device: D) -> Self {
        Self {
            catalog,
            registry,
            device,
            session: None,
            pending: None,
            generation: 0,
            load: LoadId::default(),
            pending_events: Vec::new(),
        }
    }

    // ===== Commands =====

    /// Select a reciter and chapter
    ///
    /// Selecting the loaded item toggles play/pause instead. Otherwise the
    /// outgoing playlist is stopped and released and a resolve request is
    /// returned; playback starts once its result is applied.
    ///
    /// # Errors
    /// Returns an error for an unknown reciter or a chapter outside 1..=114.
    /// The current session is left untouched in that case.
    pub fn play_track(
        &mut self,
        reciter_id: &ReciterId,
        chapter_number: u16,
    ) -> Result<Option<ResolveRequest>> {
        self.catalog.reciter(reciter_id)?;
        self.catalog.chapter(chapter_number)?;

        if let Some(session) = &self.session {
            if &session.track.reciter_id == reciter_id
                && session.track.chapter_number == chapter_number
            {
                self.toggle_play_pause();
                return Ok(None);
            }
        }

        if let Some(pending) = &self.pending {
            if &pending.reciter_id == reciter_id && pending.chapter_number == chapter_number {
                tracing::debug!(
                    reciter = %reciter_id,
                    chapter = chapter_number,
                    "Selection already loading"
                );
                return Ok(None);
            }
        }

        self.unload();

        self.generation += 1;
        self.pending = Some(PendingLoad {
            generation: self.generation,
            reciter_id: reciter_id.clone(),
            chapter_number,
        });
        self.emit_state_changed();

        tracing::debug!(
            reciter = %reciter_id,
            chapter = chapter_number,
            generation = self.generation,
            "Resolving playlist"
        );

        Ok(Some(ResolveRequest {
            generation: self.generation,
            reciter_id: reciter_id.clone(),
            chapter_number,
        }))
    }

    /// Install the result of a resolve request
    ///
    /// Stale results are discarded and their local resources released.
    pub fn apply_resolved(&mut self, generation: u64, result: Result<Playlist>) {
        let is_current = self
            .pending
            .as_ref()
            .is_some_and(|p| p.generation == generation);

        if !is_current {
            tracing::debug!(generation, "Discarding stale playlist");
            if let Ok(playlist) = result {
                self.registry.release_playlist(&playlist);
            }
            return;
        }

        let Some(pending) = self.pending.take() else {
            return;
        };

        let playlist = match result {
            Ok(playlist) => playlist,
            Err(e) => {
                tracing::warn!(
                    reciter = %pending.reciter_id,
                    chapter = pending.chapter_number,
                    error = %e,
                    "Failed to resolve playlist"
                );
                self.emit_playback_failed(e.to_string());
                self.emit_state_changed();
                return;
            }
        };

        let track = match self.describe(&pending, &playlist) {
            Ok(track) => track,
            Err(e) => {
                self.registry.release_playlist(&playlist);
                self.emit_playback_failed(e.to_string());
                self.emit_state_changed();
                return;
            }
        };

        self.pending_events.push(SessionEvent::TrackChanged {
            reciter_id: track.reciter_id.clone(),
            chapter_number: track.chapter_number,
            entries: playlist.len(),
            segmented: playlist.is_segmented(),
        });

        tracing::info!(
            reciter = %track.reciter_id,
            chapter = track.chapter_number,
            entries = playlist.len(),
            segmented = playlist.is_segmented(),
            "Now playing"
        );

        self.session = Some(Session {
            track,
            playlist,
            position: PlaybackPosition::default(),
            is_playing: true,
            last_error: None,
        });

        self.start_entry(0);
    }

    /// Flip between playing and paused
    ///
    /// No-op without a loaded track.
    pub fn toggle_play_pause(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };

        if session.is_playing {
            self.device.pause();
            session.is_playing = false;
            self.emit_state_changed();
        } else {
            match self.device.play() {
                Ok(()) => {
                    session.is_playing = true;
                    session.last_error = None;
                    self.emit_state_changed();
                }
                Err(e) => self.playback_failed(e.to_string()),
            }
        }
    }

    /// Seek within the current entry
    ///
    /// Ignored for non-finite input or when the device has no source. The
    /// target is clamped to `[0, duration]`, or only to `0` while the
    /// duration is unknown. Returns whether a seek was issued.
    pub fn seek(&mut self, seconds: f64) -> bool {
        if !seconds.is_finite() || !self.device.has_source() {
            return false;
        }
        let Some(session) = self.session.as_mut() else {
            return false;
        };

        let mut target = seconds.max(0.0);
        if let Some(total) = session.position.total_duration_seconds {
            target = target.min(total);
        }

        self.device.seek(target);
        session.position.elapsed_seconds = target;
        true
    }

    /// Stop playback, release resources and return to idle
    ///
    /// Also cancels an in-flight resolve. Calling it while idle does nothing.
    pub fn close_player(&mut self) {
        if self.session.is_none() && self.pending.is_none() {
            return;
        }
        self.unload();
        self.generation += 1;
        self.emit_state_changed();
        tracing::debug!("Player closed");
    }

    // ===== Device events =====

    /// Apply a device callback
    ///
    /// Returns a resolve request when the chapter ended and the next one
    /// must be loaded.
    pub fn handle_device_event(&mut self, notification: DeviceNotification) -> Option<ResolveRequest> {
        if notification.load != self.load {
            tracing::trace!(load = notification.load.0, "Ignoring event from replaced source");
            return None;
        }
        let session = self.session.as_mut()?;

        match notification.event {
            DeviceEvent::TimeUpdate(seconds) => {
                if seconds.is_finite() {
                    session.position.elapsed_seconds = seconds.max(0.0);
                    let event = SessionEvent::PositionUpdate {
                        elapsed_seconds: session.position.elapsed_seconds,
                        total_duration_seconds: session.position.total_duration_seconds,
                    };
                    self.pending_events.push(event);
                }
                None
            }
            DeviceEvent::DurationKnown(seconds) => {
                if seconds.is_finite() && seconds >= 0.0 {
                    session.position.total_duration_seconds = Some(seconds);
                }
                None
            }
            DeviceEvent::Played => {
                if !session.is_playing {
                    session.is_playing = true;
                    self.emit_state_changed();
                }
                None
            }
            DeviceEvent::Paused => {
                if session.is_playing {
                    session.is_playing = false;
                    self.emit_state_changed();
                }
                None
            }
            DeviceEvent::PlaybackFailed(message) => {
                self.playback_failed(message);
                None
            }
            DeviceEvent::SourceEnded => self.advance(),
        }
    }

    /// Move past the end of the current entry
    fn advance(&mut self) -> Option<ResolveRequest> {
        let session = self.session.as_ref()?;
        let next_index = session.position.entry_index + 1;

        if session.playlist.is_segmented() && next_index < session.playlist.len() {
            self.start_entry(next_index);
            return None;
        }

        let reciter_id = session.track.reciter_id.clone();
        let chapter_number = session.track.chapter_number;

        match self.catalog.next_chapter(chapter_number).map(|c| c.number) {
            Some(next) => {
                tracing::debug!(reciter = %reciter_id, from = chapter_number, to = next, "Advancing to next chapter");
                match self.play_track(&reciter_id, next) {
                    Ok(request) => request,
                    Err(e) => {
                        tracing::warn!(error = %e, "Auto-advance failed");
                        self.close_player();
                        None
                    }
                }
            }
            None => {
                tracing::info!(reciter = %reciter_id, "Book completed");
                self.close_player();
                self.pending_events
                    .push(SessionEvent::BookCompleted { reciter_id });
                None
            }
        }
    }

    // ===== Queries =====

    pub fn state(&self) -> PlaybackState {
        match (&self.session, &self.pending) {
            (Some(session), _) if session.is_playing => PlaybackState::Playing,
            (Some(_), _) => PlaybackState::Paused,
            (None, Some(_)) => PlaybackState::Loading,
            (None, None) => PlaybackState::Idle,
        }
    }

    pub fn snapshot(&self) -> PlaybackSnapshot {
        match &self.session {
            Some(session) => PlaybackSnapshot {
                state: self.state(),
                track: Some(session.track.clone()),
                is_playing: session.is_playing,
                position: session.position,
                entry_count: session.playlist.len(),
                segmented: session.playlist.is_segmented(),
                last_error: session.last_error.clone(),
            },
            None => PlaybackSnapshot {
                state: self.state(),
                ..PlaybackSnapshot::default()
            },
        }
    }

    /// Playlist of the loaded track
    pub fn playlist(&self) -> Option<&Playlist> {
        self.session.as_ref().map(|s| &s.playlist)
    }

    /// Load id of the source most recently handed to the device
    pub fn current_load(&self) -> LoadId {
        self.load
    }

    pub fn device(&self) -> &D {
        &self.device
    }

    // ===== Events =====

    /// Take all events recorded since the last drain
    pub fn drain_events(&mut self) -> Vec<SessionEvent> {
        std::mem::take(&mut self.pending_events)
    }

    pub fn has_pending_events(&self) -> bool {
        !self.pending_events.is_empty()
    }

    // ===== Internals =====

    fn describe(&self, pending: &PendingLoad, playlist: &Playlist) -> Result<TrackDescriptor> {
        let reciter = self.catalog.reciter(&pending.reciter_id)?;
        let chapter = self.catalog.chapter(pending.chapter_number)?;
        Ok(TrackDescriptor {
            reciter_id: reciter.id.clone(),
            reciter_name: reciter.name.clone(),
            chapter_number: chapter.number,
            chapter_name: chapter.name.clone(),
            verse: playlist.is_segmented().then_some(1),
        })
    }

    /// Hand entry `index` to the device and start it
    fn start_entry(&mut self, index: usize) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        let Some(source) = session.playlist.entry(index).cloned() else {
            return;
        };

        session.position = PlaybackPosition {
            entry_index: index,
            ..PlaybackPosition::default()
        };
        session.is_playing = true;
        session.last_error = None;

        if session.playlist.is_segmented() {
            let verse = u16::try_from(index + 1).unwrap_or(u16::MAX);
            session.track.verse = Some(verse);
            if index > 0 {
                self.pending_events.push(SessionEvent::VerseChanged {
                    chapter_number: session.track.chapter_number,
                    verse,
                });
            }
        }

        self.load = self.load.next();
        tracing::debug!(entry = index, load = self.load.0, source = %source, "Loading entry");

        let started = self
            .device
            .set_source(self.load, &source)
            .and_then(|()| self.device.play());

        match started {
            Ok(()) => self.emit_state_changed(),
            Err(e) => self.playback_failed(e.to_string()),
        }
    }

    /// Record a non-fatal device failure; the track stays loaded
    fn playback_failed(&mut self, message: String) {
        tracing::warn!(error = %message, "Playback failed");
        if let Some(session) = self.session.as_mut() {
            session.is_playing = false;
            session.last_error = Some(message.clone());
        }
        self.emit_playback_failed(message);
        self.emit_state_changed();
    }

    /// Stop the device, then release the outgoing playlist
    fn unload(&mut self) {
        self.pending = None;
        if let Some(session) = self.session.take() {
            self.device.stop();
            self.registry.release_playlist(&session.playlist);
        }
    }

    fn emit_state_changed(&mut self) {
        let state = self.state();
        self.pending_events.push(SessionEvent::StateChanged { state });
    }

    fn emit_playback_failed(&mut self, message: String) {
        self.pending_events
            .push(SessionEvent::PlaybackFailed { message });
    }
}
