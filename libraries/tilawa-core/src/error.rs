/// Core error types for Tilawa
use thiserror::Error;

/// Result type alias using `TilawaError`
pub type Result<T> = std::result::Result<T, TilawaError>;

/// Core error type for Tilawa
#[derive(Error, Debug)]
pub enum TilawaError {
    /// Chapter number outside 1..=114
    #[error("Invalid chapter number: {0}")]
    InvalidChapterNumber(u16),

    /// Reciter id not present in the catalog
    #[error("Reciter not found: {0}")]
    ReciterNotFound(String),

    /// Catalog data is malformed
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Offline store errors
    #[error("Storage error: {0}")]
    Storage(String),

    /// Serialization errors
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
}

impl TilawaError {
    /// Create a storage error
    pub fn storage(msg: impl Into<String>) -> Self {
        Self::Storage(msg.into())
    }

    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }
}
