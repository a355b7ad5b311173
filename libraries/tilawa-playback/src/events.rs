//! Session Events
//!
//! Emitted by the session manager at transition points and drained by the
//! player service:
//! - Transport state changes
//! - Track and verse changes
//! - Position updates
//! - Non-fatal playback failures
//! - Completion of the final chapter

use serde::{Deserialize, Serialize};
use tilawa_core::ReciterId;

use crate::types::PlaybackState;

/// Events emitted by the playback session
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SessionEvent {
    /// Transport state changed
    StateChanged { state: PlaybackState },

    /// A new playlist was installed
    TrackChanged {
        reciter_id: ReciterId,
        chapter_number: u16,
        entries: usize,
        segmented: bool,
    },

    /// Segmented playback moved to another verse
    VerseChanged { chapter_number: u16, verse: u16 },

    /// Position update from the device
    PositionUpdate {
        elapsed_seconds: f64,
        total_duration_seconds: Option<f64>,
    },

    /// The device failed to play; the track stays loaded
    PlaybackFailed { message: String },

    /// The last chapter finished and the session closed
    BookCompleted { reciter_id: ReciterId },
}
