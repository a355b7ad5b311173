/// CLI error types
use thiserror::Error;

pub type Result<T> = std::result::Result<T, CliError>;

#[derive(Debug, Error)]
pub enum CliError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error(transparent)]
    Core(#[from] tilawa_core::TilawaError),

    #[error(transparent)]
    Playback(#[from] tilawa_playback::PlaybackError),

    #[error("Storage error: {0}")]
    Storage(#[from] tilawa_storage::StorageError),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
