//! Clock-driven output device
//!
//! Plays every entry for a fixed nominal length without producing sound.
//! Used by the command-line player and for exercising the service end to
//! end. Must be driven from inside a tokio runtime.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use tokio::task::JoinHandle;

use crate::device::{AudioDevice, DeviceEvent, DeviceEventSink, LoadId};
use crate::error::{PlaybackError, Result};
use crate::local::LocalSourceRegistry;
use crate::types::SourceAddress;

struct Loaded {
    load: LoadId,
    elapsed: Arc<Mutex<f64>>,
}

/// Silent device that advances a clock
pub struct HeadlessDevice {
    sink: DeviceEventSink,
    registry: LocalSourceRegistry,
    entry_seconds: f64,
    tick: Duration,
    loaded: Option<Loaded>,
    clock: Option<JoinHandle<()>>,
}

impl HeadlessDevice {
    pub fn new(
        sink: DeviceEventSink,
        registry: LocalSourceRegistry,
        entry_seconds: f64,
        tick: Duration,
    ) -> Self {
        Self {
            sink,
            registry,
            entry_seconds,
            tick,
            loaded: None,
            clock: None,
        }
    }

    fn stop_clock(&mut self) {
        if let Some(clock) = self.clock.take() {
            clock.abort();
        }
    }
}

impl AudioDevice for HeadlessDevice {
    fn set_source(&mut self, load: LoadId, source: &SourceAddress) -> Result<()> {
        self.stop_clock();
        self.loaded = None;

        if let SourceAddress::Local(handle) = source {
            if self.registry.open(*handle).is_none() {
                return Err(PlaybackError::device(format!("{} is not outstanding", handle)));
            }
        }

        self.loaded = Some(Loaded {
            load,
            elapsed: Arc::new(Mutex::new(0.0)),
        });
        self.sink
            .emit(load, DeviceEvent::DurationKnown(self.entry_seconds));
        Ok(())
    }

    fn play(&mut self) -> Result<()> {
        let loaded = self.loaded.as_ref().ok_or(PlaybackError::NoTrackLoaded)?;
        if self.clock.as_ref().is_some_and(|clock| !clock.is_finished()) {
            return Ok(());
        }
        let runtime = tokio::runtime::Handle::try_current()
            .map_err(|e| PlaybackError::device(e.to_string()))?;

        let sink = self.sink.clone();
        let load = loaded.load;
        let elapsed = Arc::clone(&loaded.elapsed);
        let length = self.entry_seconds;
        let tick = self.tick;

        self.clock = Some(runtime.spawn(async move {
            sink.emit(load, DeviceEvent::Played);
            let mut interval = tokio::time::interval(tick);
            interval.tick().await;
            loop {
                interval.tick().await;
                let now = {
                    let mut elapsed = elapsed.lock().unwrap_or_else(PoisonError::into_inner);
                    *elapsed = (*elapsed + tick.as_secs_f64()).min(length);
                    *elapsed
                };
                if !sink.emit(load, DeviceEvent::TimeUpdate(now)) {
                    return;
                }
                if now >= length {
                    sink.emit(load, DeviceEvent::SourceEnded);
                    return;
                }
            }
        }));
        Ok(())
    }

    fn pause(&mut self) {
        if self.clock.is_some() {
            self.stop_clock();
            if let Some(loaded) = &self.loaded {
                self.sink.emit(loaded.load, DeviceEvent::Paused);
            }
        }
    }

    fn stop(&mut self) {
        self.stop_clock();
        self.loaded = None;
    }

    fn seek(&mut self, seconds: f64) {
        if let Some(loaded) = &self.loaded {
            let target = seconds.clamp(0.0, self.entry_seconds);
            *loaded.elapsed.lock().unwrap_or_else(PoisonError::into_inner) = target;
            self.sink.emit(loaded.load, DeviceEvent::TimeUpdate(target));
        }
    }

    fn has_source(&self) -> bool {
        self.loaded.is_some()
    }
}

impl Drop for HeadlessDevice {
    fn drop(&mut self) {
        self.stop_clock();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[tokio::test(start_paused = true)]
    async fn test_entry_plays_to_end() {
        let (sink, mut rx) = DeviceEventSink::channel();
        let mut device = HeadlessDevice::new(
            sink,
            LocalSourceRegistry::new(),
            1.0,
            Duration::from_millis(500),
        );

        device
            .set_source(LoadId(1), &SourceAddress::Remote("https://x/1.mp3".into()))
            .unwrap();
        device.play().unwrap();

        let mut events = Vec::new();
        while let Some(note) = rx.recv().await {
            assert_eq!(note.load, LoadId(1));
            let done = note.event == DeviceEvent::SourceEnded;
            events.push(note.event);
            if done {
                break;
            }
        }

        assert_eq!(
            events,
            vec![
                DeviceEvent::DurationKnown(1.0),
                DeviceEvent::Played,
                DeviceEvent::TimeUpdate(0.5),
                DeviceEvent::TimeUpdate(1.0),
                DeviceEvent::SourceEnded,
            ]
        );
    }

    #[tokio::test]
    async fn test_released_local_source_is_rejected() {
        let registry = LocalSourceRegistry::new();
        let handle = registry.checkout(Bytes::from_static(b"audio"));
        registry.release(handle);

        let (sink, _rx) = DeviceEventSink::channel();
        let mut device = HeadlessDevice::new(sink, registry, 1.0, Duration::from_millis(10));

        let result = device.set_source(LoadId(1), &SourceAddress::Local(handle));
        assert!(matches!(result, Err(PlaybackError::Device(_))));
        assert!(!device.has_source());
        assert!(matches!(device.play(), Err(PlaybackError::NoTrackLoaded)));
    }
}
