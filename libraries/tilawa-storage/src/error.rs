/// Storage-specific errors
use thiserror::Error;

/// Result type alias using `StorageError`
pub type Result<T> = std::result::Result<T, StorageError>;

/// Storage error types
#[derive(Error, Debug)]
pub enum StorageError {
    /// Migration error
    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),

    /// Database error from `SQLx`
    #[error(transparent)]
    Database(#[from] sqlx::Error),

    /// A stored row violates the schema's expectations
    #[error("Corrupt row {key}: {reason}")]
    CorruptRow { key: String, reason: String },
}

impl StorageError {
    pub fn corrupt(key: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::CorruptRow {
            key: key.into(),
            reason: reason.into(),
        }
    }
}

impl From<StorageError> for tilawa_core::TilawaError {
    fn from(err: StorageError) -> Self {
        tilawa_core::TilawaError::storage(err.to_string())
    }
}
