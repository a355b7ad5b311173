//! Audio output device abstraction
//!
//! The device owns the single output. The session manager drives it through
//! `AudioDevice` and consumes its callbacks as `DeviceNotification`s.

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

use crate::error::Result;
use crate::types::SourceAddress;

/// Identifies one `set_source` call
///
/// Every notification carries the load it belongs to, so callbacks from a
/// replaced source can be told apart from the current one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct LoadId(pub u64);

impl LoadId {
    #[must_use]
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

/// Callback from the device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DeviceEvent {
    /// Playback position in seconds
    TimeUpdate(f64),

    /// Length of the loaded source in seconds
    DurationKnown(f64),

    /// Output started or resumed
    Played,

    /// Output paused, by command or externally
    Paused,

    /// The loaded source played to its end
    SourceEnded,

    /// Starting playback failed asynchronously
    PlaybackFailed(String),
}

/// A device event tagged with its load
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceNotification {
    pub load: LoadId,
    pub event: DeviceEvent,
}

/// Platform audio output
///
/// Implementors must only report events through the sink they were built
/// with, tagged with the `LoadId` passed to `set_source`.
pub trait AudioDevice: Send {
    /// Load a source, replacing the current one
    ///
    /// # Errors
    /// Returns `PlaybackError::Device` if the source can not be opened.
    fn set_source(&mut self, load: LoadId, source: &SourceAddress) -> Result<()>;

    /// Start or resume output
    ///
    /// # Errors
    /// Returns an error if playback can not start (no source, output busy).
    fn play(&mut self) -> Result<()>;

    /// Pause output
    fn pause(&mut self);

    /// Stop output and unload the source
    fn stop(&mut self);

    /// Seek within the loaded source
    fn seek(&mut self, seconds: f64);

    /// Whether a source is loaded
    fn has_source(&self) -> bool;
}

/// Sending half for device callbacks
#[derive(Debug, Clone)]
pub struct DeviceEventSink {
    tx: mpsc::UnboundedSender<DeviceNotification>,
}

impl DeviceEventSink {
    /// Create a sink and the receiver the player service consumes
    pub fn channel() -> (Self, mpsc::UnboundedReceiver<DeviceNotification>) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, rx)
    }

    /// Report an event
    ///
    /// Returns `false` once the receiver is gone.
    pub fn emit(&self, load: LoadId, event: DeviceEvent) -> bool {
        self.tx.send(DeviceNotification { load, event }).is_ok()
    }
}
