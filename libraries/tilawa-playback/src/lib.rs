//! Tilawa - Playback Management
//!
//! Turns a (reciter, chapter) selection into something playing on a single
//! output device.
//!
//! This crate provides:
//! - Playlist resolution (per-verse remote segments or one chapter file,
//!   offline copy first)
//! - Transient local resource tracking (`LocalSourceRegistry`)
//! - The session state machine (`SessionManager`): play/pause, seek, close,
//!   verse advance and chapter auto-advance
//! - An async service (`PlayerService`) that serializes commands, device
//!   callbacks and lookups on one task
//!
//! # Architecture
//!
//! `tilawa-playback` has no audio backend of its own. The output is
//! abstracted behind `AudioDevice`; `HeadlessDevice` is a silent clock used
//! by the command-line player and tests.
//!
//! # Example
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tilawa_core::{Catalog, OfflineTrackStore, ReciterId};
//! use tilawa_playback::{
//!     DeviceEventSink, HeadlessDevice, LocalSourceRegistry, PlaybackConfig, PlayerService,
//!     PlaylistResolver, SessionManager,
//! };
//!
//! # async fn example(store: Arc<dyn OfflineTrackStore>) -> Result<(), Box<dyn std::error::Error>> {
//! let catalog = Arc::new(Catalog::builtin()?);
//! let registry = LocalSourceRegistry::new();
//!
//! let (sink, device_events) = DeviceEventSink::channel();
//! let device = HeadlessDevice::new(sink, registry.clone(), 5.0, Duration::from_millis(250));
//!
//! let resolver = PlaylistResolver::new(
//!     Arc::clone(&catalog),
//!     store,
//!     registry.clone(),
//!     PlaybackConfig::default(),
//! );
//! let manager = SessionManager::new(catalog, registry, device);
//! let (player, _task) = PlayerService::spawn(manager, Arc::new(resolver), device_events);
//!
//! player.play_track(ReciterId::new("alafasy"), 1).await?;
//! player.toggle_play_pause()?;
//! player.close_player()?;
//! # Ok(())
//! # }
//! ```

mod device;
mod error;
mod events;
mod headless;
mod local;
mod manager;
mod resolver;
mod service;
pub mod types;

// Public exports
pub use device::{AudioDevice, DeviceEvent, DeviceEventSink, DeviceNotification, LoadId};
pub use error::{PlaybackError, Result};
pub use events::SessionEvent;
pub use headless::HeadlessDevice;
pub use local::{LocalHandle, LocalSourceRegistry};
pub use manager::{ResolveRequest, SessionManager};
pub use resolver::PlaylistResolver;
pub use service::{PlayerHandle, PlayerService};
pub use types::{
    format_clock, PlaybackConfig, PlaybackPosition, PlaybackSnapshot, PlaybackState, Playlist,
    SourceAddress, TrackDescriptor,
};
