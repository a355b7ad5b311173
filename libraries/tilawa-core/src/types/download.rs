use bytes::Bytes;
use serde::{Deserialize, Serialize};

use super::{ChapterInfo, ReciterId, TrackKey};

/// A chapter recording saved for offline playback
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredTrack {
    pub key: TrackKey,
    pub reciter_id: ReciterId,
    pub chapter_number: u16,
    pub chapter_name: String,

    /// Encoded audio bytes as downloaded
    pub payload: Bytes,

    /// Unix timestamp (seconds)
    pub downloaded_at: i64,
}

impl StoredTrack {
    /// Create a new stored track, stamped with the current time
    pub fn new(reciter_id: ReciterId, chapter: &ChapterInfo, payload: impl Into<Bytes>) -> Self {
        Self {
            key: TrackKey::for_track(&reciter_id, chapter.number),
            reciter_id,
            chapter_number: chapter.number,
            chapter_name: chapter.name.clone(),
            payload: payload.into(),
            downloaded_at: chrono::Utc::now().timestamp(),
        }
    }

    /// Metadata view without the payload
    pub fn summary(&self) -> DownloadedTrack {
        DownloadedTrack {
            key: self.key.clone(),
            reciter_id: self.reciter_id.clone(),
            chapter_number: self.chapter_number,
            chapter_name: self.chapter_name.clone(),
            size_bytes: self.payload.len() as u64,
            downloaded_at: self.downloaded_at,
        }
    }
}

/// Listing entry for the downloads library (no payload)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DownloadedTrack {
    pub key: TrackKey,
    pub reciter_id: ReciterId,
    pub chapter_number: u16,
    pub chapter_name: String,
    pub size_bytes: u64,
    pub downloaded_at: i64,
}
