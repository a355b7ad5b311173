//! Shared fixtures for playback tests

#![allow(dead_code)]

use async_trait::async_trait;
use mockall::mock;
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tilawa_core::{
    Catalog, DownloadedTrack, OfflineTrackStore, ReciterId, Result as CoreResult, StoredTrack,
    TrackKey,
};
use tilawa_playback::{
    AudioDevice, LoadId, LocalSourceRegistry, PlaybackConfig, PlaybackError, PlaylistResolver,
    Result, SessionManager, SourceAddress,
};
use tokio::sync::Notify;

mock! {
    pub Store {}

    #[async_trait]
    impl OfflineTrackStore for Store {
        async fn get(&self, key: &TrackKey) -> CoreResult<Option<StoredTrack>>;
        async fn put(&self, track: StoredTrack) -> CoreResult<()>;
        async fn delete(&self, key: &TrackKey) -> CoreResult<bool>;
        async fn list(&self) -> CoreResult<Vec<DownloadedTrack>>;
    }
}

/// Call recorded by `FakeDevice`
#[derive(Debug, Clone, PartialEq)]
pub enum DeviceCall {
    SetSource(LoadId, SourceAddress),
    Play,
    Pause,
    Stop,
    Seek(f64),
}

/// Device that records every command
pub struct FakeDevice {
    pub calls: Vec<DeviceCall>,
    pub fail_play: bool,
    registry: LocalSourceRegistry,
    loaded: bool,

    /// Outstanding local handles observed at each `set_source`
    pub outstanding_at_load: Vec<usize>,
}

impl FakeDevice {
    pub fn new(registry: LocalSourceRegistry) -> Self {
        Self {
            calls: Vec::new(),
            fail_play: false,
            registry,
            loaded: false,
            outstanding_at_load: Vec::new(),
        }
    }

    pub fn failing(registry: LocalSourceRegistry) -> Self {
        Self {
            fail_play: true,
            ..Self::new(registry)
        }
    }

    pub fn loaded_sources(&self) -> Vec<SourceAddress> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                DeviceCall::SetSource(_, source) => Some(source.clone()),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, call: &DeviceCall) -> usize {
        self.calls.iter().filter(|c| *c == call).count()
    }
}

impl AudioDevice for FakeDevice {
    fn set_source(&mut self, load: LoadId, source: &SourceAddress) -> Result<()> {
        if let SourceAddress::Local(handle) = source {
            assert!(
                self.registry.open(*handle).is_some(),
                "device handed a released handle"
            );
        }
        self.outstanding_at_load.push(self.registry.outstanding());
        self.calls.push(DeviceCall::SetSource(load, source.clone()));
        self.loaded = true;
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        self.calls.push(DeviceCall::Play);
        if self.fail_play {
            return Err(PlaybackError::device("autoplay blocked"));
        }
        Ok(())
    }

    fn pause(&mut self) {
        self.calls.push(DeviceCall::Pause);
    }

    fn stop(&mut self) {
        self.calls.push(DeviceCall::Stop);
        self.loaded = false;
    }

    fn seek(&mut self, seconds: f64) {
        self.calls.push(DeviceCall::Seek(seconds));
    }

    fn has_source(&self) -> bool {
        self.loaded
    }
}

/// In-memory store; optionally holds every `get` until released
#[derive(Default)]
pub struct MemoryStore {
    tracks: Mutex<HashMap<TrackKey, StoredTrack>>,
    gate: Option<Arc<Notify>>,
}

impl MemoryStore {
    pub fn with_track(track: StoredTrack) -> Self {
        let store = Self::default();
        store.insert(track);
        store
    }

    pub fn gated(gate: Arc<Notify>) -> Self {
        Self {
            tracks: Mutex::new(HashMap::new()),
            gate: Some(gate),
        }
    }

    pub fn insert(&self, track: StoredTrack) {
        self.tracks.lock().unwrap().insert(track.key.clone(), track);
    }
}

#[async_trait]
impl OfflineTrackStore for MemoryStore {
    async fn get(&self, key: &TrackKey) -> CoreResult<Option<StoredTrack>> {
        if let Some(gate) = &self.gate {
            gate.notified().await;
        }
        Ok(self.tracks.lock().unwrap().get(key).cloned())
    }

    async fn put(&self, track: StoredTrack) -> CoreResult<()> {
        self.insert(track);
        Ok(())
    }

    async fn delete(&self, key: &TrackKey) -> CoreResult<bool> {
        Ok(self.tracks.lock().unwrap().remove(key).is_some())
    }

    async fn list(&self) -> CoreResult<Vec<DownloadedTrack>> {
        Ok(self
            .tracks
            .lock()
            .unwrap()
            .values()
            .map(StoredTrack::summary)
            .collect())
    }
}

pub fn catalog() -> Arc<Catalog> {
    Arc::new(Catalog::builtin().unwrap())
}

pub fn stored_track(catalog: &Catalog, reciter: &str, chapter: u16) -> StoredTrack {
    StoredTrack::new(
        ReciterId::new(reciter),
        catalog.chapter(chapter).unwrap(),
        b"cached-audio".to_vec(),
    )
}

/// Resolver, manager and registry wired around one store
pub struct Harness {
    pub catalog: Arc<Catalog>,
    pub registry: LocalSourceRegistry,
    pub resolver: PlaylistResolver,
    pub manager: SessionManager<FakeDevice>,
}

impl Harness {
    pub fn new(store: Arc<dyn OfflineTrackStore>) -> Self {
        Self::with_device(store, FakeDevice::new)
    }

    pub fn with_device(
        store: Arc<dyn OfflineTrackStore>,
        device: impl FnOnce(LocalSourceRegistry) -> FakeDevice,
    ) -> Self {
        let catalog = catalog();
        let registry = LocalSourceRegistry::new();
        let resolver = PlaylistResolver::new(
            Arc::clone(&catalog),
            store,
            registry.clone(),
            PlaybackConfig::default(),
        );
        let manager =
            SessionManager::new(Arc::clone(&catalog), registry.clone(), device(registry.clone()));
        Self {
            catalog,
            registry,
            resolver,
            manager,
        }
    }

    /// `play_track` and, if a lookup was requested, run it and apply it
    pub async fn play(&mut self, reciter: &str, chapter: u16) {
        let request = self
            .manager
            .play_track(&ReciterId::new(reciter), chapter)
            .unwrap();
        if let Some(request) = request {
            self.complete(request).await;
        }
    }

    pub async fn complete(&mut self, request: tilawa_playback::ResolveRequest) {
        let result = self
            .resolver
            .resolve(&request.reciter_id, request.chapter_number)
            .await;
        self.manager.apply_resolved(request.generation, result);
    }

    pub fn end_current(&mut self) -> Option<tilawa_playback::ResolveRequest> {
        let load = self.manager.current_load();
        self.manager
            .handle_device_event(tilawa_playback::DeviceNotification {
                load,
                event: tilawa_playback::DeviceEvent::SourceEnded,
            })
    }
}
