//! Offline track store contract
//!
//! The playback core only reads from the store. Saving and deleting
//! recordings belongs to the downloads library, which may remove entries
//! while a lookup is in flight.

use async_trait::async_trait;

use crate::catalog::Catalog;
use crate::error::Result;
use crate::types::{DownloadedTrack, ReciterInfo, StoredTrack, TrackKey};

/// Key/value store of downloaded chapter recordings
#[async_trait]
pub trait OfflineTrackStore: Send + Sync {
    /// Fetch a stored recording, `None` when absent
    async fn get(&self, key: &TrackKey) -> Result<Option<StoredTrack>>;

    /// Save a recording, replacing any existing entry with the same key
    async fn put(&self, track: StoredTrack) -> Result<()>;

    /// Remove a recording
    ///
    /// Returns `true` if an entry was removed.
    async fn delete(&self, key: &TrackKey) -> Result<bool>;

    /// List every stored recording without payloads
    async fn list(&self) -> Result<Vec<DownloadedTrack>>;
}

/// Downloads of one reciter, chapters ascending
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReciterDownloads {
    pub reciter: ReciterInfo,
    pub tracks: Vec<DownloadedTrack>,
}

/// Group a downloads listing by reciter
///
/// Reciters appear in catalog order and those without downloads are
/// omitted. Entries whose reciter is no longer in the catalog are dropped.
pub fn group_downloads_by_reciter(
    catalog: &Catalog,
    downloads: Vec<DownloadedTrack>,
) -> Vec<ReciterDownloads> {
    catalog
        .reciters()
        .iter()
        .filter_map(|reciter| {
            let mut tracks: Vec<DownloadedTrack> = downloads
                .iter()
                .filter(|d| d.reciter_id == reciter.id)
                .cloned()
                .collect();
            if tracks.is_empty() {
                return None;
            }
            tracks.sort_by_key(|t| t.chapter_number);
            Some(ReciterDownloads {
                reciter: reciter.clone(),
                tracks,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ReciterId;

    fn download(reciter: &str, chapter: u16) -> DownloadedTrack {
        let reciter_id = ReciterId::new(reciter);
        DownloadedTrack {
            key: TrackKey::for_track(&reciter_id, chapter),
            reciter_id,
            chapter_number: chapter,
            chapter_name: format!("chapter {}", chapter),
            size_bytes: 1024,
            downloaded_at: 1_700_000_000,
        }
    }

    #[test]
    fn groups_in_catalog_order_with_sorted_chapters() {
        let catalog = Catalog::builtin().unwrap();
        let downloads = vec![
            download("ghamdi", 18),
            download("alafasy", 36),
            download("ghamdi", 2),
            download("alafasy", 1),
        ];

        let groups = group_downloads_by_reciter(&catalog, downloads);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].reciter.id.as_str(), "alafasy");
        assert_eq!(groups[1].reciter.id.as_str(), "ghamdi");

        let ghamdi: Vec<u16> = groups[1].tracks.iter().map(|t| t.chapter_number).collect();
        assert_eq!(ghamdi, vec![2, 18]);
    }

    #[test]
    fn unknown_reciters_are_dropped() {
        let catalog = Catalog::builtin().unwrap();
        let groups = group_downloads_by_reciter(&catalog, vec![download("retired", 1)]);
        assert!(groups.is_empty());
    }
}
