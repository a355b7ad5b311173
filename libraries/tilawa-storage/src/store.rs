use async_trait::async_trait;
use sqlx::SqlitePool;
use tilawa_core::{DownloadedTrack, OfflineTrackStore, Result, StoredTrack, TrackKey};

use crate::downloads;

/// `SQLite`-backed offline recording store
#[derive(Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl OfflineTrackStore for SqliteTrackStore {
    async fn get(&self, key: &TrackKey) -> Result<Option<StoredTrack>> {
        Ok(downloads::get(&self.pool, key).await?)
    }

    async fn put(&self, track: StoredTrack) -> Result<()> {
        tracing::debug!(key = %track.key, bytes = track.payload.len(), "Saving download");
        Ok(downloads::put(&self.pool, &track).await?)
    }

    async fn delete(&self, key: &TrackKey) -> Result<bool> {
        let removed = downloads::delete(&self.pool, key).await?;
        tracing::debug!(key = %key, removed, "Deleted download");
        Ok(removed)
    }

    async fn list(&self) -> Result<Vec<DownloadedTrack>> {
        Ok(downloads::list(&self.pool).await?)
    }
}
