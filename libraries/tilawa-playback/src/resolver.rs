//! Playlist resolution
//!
//! Segmented reciters get one remote entry per verse, addressed by global
//! verse number. Single-file reciters get one entry: the offline copy when
//! the store has it, otherwise the remote chapter file.

use std::sync::Arc;
use tilawa_core::{
    single_file_url, Catalog, OfflineTrackStore, ReciterId, ReciterSource, TrackKey,
};

use crate::error::Result;
use crate::local::LocalSourceRegistry;
use crate::types::{PlaybackConfig, Playlist, SourceAddress};

/// Builds playlists from the catalog and the offline store
pub struct PlaylistResolver {
    catalog: Arc<Catalog>,
    store: Arc<dyn OfflineTrackStore>,
    registry: LocalSourceRegistry,
    config: PlaybackConfig,
}

impl PlaylistResolver {
    pub fn new(
        catalog: Arc<Catalog>,
        store: Arc<dyn OfflineTrackStore>,
        registry: LocalSourceRegistry,
        config: PlaybackConfig,
    ) -> Self {
        Self {
            catalog,
            store,
            registry,
            config,
        }
    }

    pub fn registry(&self) -> &LocalSourceRegistry {
        &self.registry
    }

    /// Resolve the playlist for a reciter and chapter
    ///
    /// A local hit checks a resource out of the registry; the caller owns
    /// releasing it. Store read failures fall back to the remote file.
    ///
    /// # Errors
    /// Returns an error for an unknown reciter or a chapter outside 1..=114.
    pub async fn resolve(&self, reciter_id: &ReciterId, chapter_number: u16) -> Result<Playlist> {
        let reciter = self.catalog.reciter(reciter_id)?;
        let chapter = self.catalog.chapter(chapter_number)?;

        match &reciter.source {
            ReciterSource::Segmented { edition } => {
                let first = self.catalog.global_verse_offset(chapter_number)?;
                let base = self.config.segment_cdn_base.trim_end_matches('/');
                let entries = (0..u32::from(chapter.verse_count))
                    .map(|i| {
                        SourceAddress::Remote(format!("{}/{}/{}.mp3", base, edition, first + i))
                    })
                    .collect();
                Playlist::new(entries, true)
            }
            ReciterSource::SingleFile { server, path } => {
                let key = TrackKey::for_track(reciter_id, chapter_number);
                let entry = match self.store.get(&key).await {
                    Ok(Some(track)) => {
                        let handle = self.registry.checkout(track.payload);
                        tracing::debug!(key = %key, handle = %handle, "Using offline recording");
                        SourceAddress::Local(handle)
                    }
                    Ok(None) => SourceAddress::Remote(single_file_url(server, path, chapter_number)),
                    Err(e) => {
                        tracing::warn!(key = %key, error = %e, "Offline store read failed, streaming instead");
                        SourceAddress::Remote(single_file_url(server, path, chapter_number))
                    }
                };
                Ok(Playlist::single(entry))
            }
        }
    }
}
