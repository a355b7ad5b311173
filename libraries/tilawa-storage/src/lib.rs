//! Tilawa Storage
//!
//! `SQLite` persistence for downloaded chapter recordings.
//!
//! # Architecture
//!
//! - **Vertical Slicing**: each feature owns its own queries (`downloads`)
//! - **Store Adapter**: [`SqliteTrackStore`] implements the core
//!   `OfflineTrackStore` contract on top of the slice
//!
//! # Example
//!
//! ```rust,no_run
//! use tilawa_core::{OfflineTrackStore, ReciterId, TrackKey};
//! use tilawa_storage::{create_pool, run_migrations, SqliteTrackStore};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = create_pool("sqlite://tilawa.db").await?;
//! run_migrations(&pool).await?;
//!
//! let store = SqliteTrackStore::new(pool);
//! let key = TrackKey::for_track(&ReciterId::new("alafasy"), 2);
//! let cached = store.get(&key).await?;
//! # Ok(())
//! # }
//! ```

mod error;
mod store;

// Vertical slices
pub mod downloads;

pub use error::StorageError;
pub use store::SqliteTrackStore;

use sqlx::migrate::Migrator;
use sqlx::sqlite::SqlitePool;

// Embed migrations into binary
static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Run database migrations
///
/// Call once at startup, before the pool is handed to a store.
///
/// # Errors
///
/// Returns an error if migrations fail to run
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), StorageError> {
    MIGRATOR.run(pool).await?;
    Ok(())
}

/// Create a new `SQLite` pool
///
/// # Arguments
///
/// * `database_url` - `SQLite` connection string (e.g., `sqlite://tilawa.db`)
///
/// # Errors
///
/// Returns an error if the connection fails
pub async fn create_pool(database_url: &str) -> Result<SqlitePool, StorageError> {
    use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
    use std::str::FromStr;

    tracing::debug!(url = database_url, "Creating SQLite pool");

    let options = SqliteConnectOptions::from_str(database_url)?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .busy_timeout(std::time::Duration::from_secs(30));

    let pool = SqlitePoolOptions::new()
        .max_connections(5)
        .connect_with(options)
        .await?;

    Ok(pool)
}
