//! Error types for playback management

use thiserror::Error;
use tilawa_core::TilawaError;

/// Playback errors
#[derive(Debug, Error)]
pub enum PlaybackError {
    /// No track is currently loaded
    #[error("No track loaded")]
    NoTrackLoaded,

    /// The output device rejected a command
    #[error("Audio device error: {0}")]
    Device(String),

    /// A playlist must hold at least one entry
    #[error("Playlist is empty")]
    EmptyPlaylist,

    /// The player service task has exited
    #[error("Player service stopped")]
    ServiceStopped,

    /// Catalog or store error
    #[error(transparent)]
    Core(#[from] TilawaError),
}

impl PlaybackError {
    pub fn device(msg: impl Into<String>) -> Self {
        Self::Device(msg.into())
    }
}

/// Result type for playback operations
pub type Result<T> = std::result::Result<T, PlaybackError>;
