//! Offline downloads library

use bytes::Bytes;
use std::path::Path;
use tilawa_core::{group_downloads_by_reciter, OfflineTrackStore, ReciterId, StoredTrack, TrackKey};

use super::AppContext;
use crate::error::{CliError, Result};

/// Print downloads grouped by reciter
pub async fn list(ctx: &AppContext) -> Result<()> {
    let store = ctx.open_store().await?;
    let groups = group_downloads_by_reciter(&ctx.catalog, store.list().await?);

    if groups.is_empty() {
        println!("No downloads yet.");
        return Ok(());
    }

    for group in groups {
        println!("{} ({})", group.reciter.english_name, group.reciter.id);
        for track in group.tracks {
            println!(
                "  {:>3}  {:<20} {:>10} bytes",
                track.chapter_number, track.chapter_name, track.size_bytes
            );
        }
    }
    Ok(())
}

/// Save a chapter recording for offline playback
///
/// Imports `file` when given, otherwise downloads the reciter's remote
/// chapter file.
pub async fn add(
    ctx: &AppContext,
    reciter_id: &ReciterId,
    chapter_number: u16,
    file: Option<&Path>,
) -> Result<()> {
    let reciter = ctx.catalog.reciter(reciter_id)?;
    let chapter = ctx.catalog.chapter(chapter_number)?;

    let payload = match file {
        Some(path) => Bytes::from(tokio::fs::read(path).await?),
        None => {
            let url = reciter.chapter_file_url(chapter_number).ok_or_else(|| {
                CliError::Download(format!(
                    "{} recites verse by verse and has no chapter files",
                    reciter.id
                ))
            })?;
            fetch(&url).await?
        }
    };

    if payload.is_empty() {
        return Err(CliError::Download("recording is empty".to_string()));
    }

    let store = ctx.open_store().await?;
    let track = StoredTrack::new(reciter.id.clone(), chapter, payload);
    let key = track.key.clone();
    let size = track.payload.len();
    store.put(track).await?;

    tracing::info!(key = %key, bytes = size, "Download saved");
    println!("Saved {} ({} bytes)", key, size);
    Ok(())
}

/// Remove a saved recording
pub async fn delete(ctx: &AppContext, reciter_id: &ReciterId, chapter_number: u16) -> Result<()> {
    ctx.catalog.chapter(chapter_number)?;
    let store = ctx.open_store().await?;
    let key = TrackKey::for_track(reciter_id, chapter_number);

    if store.delete(&key).await? {
        println!("Deleted {}", key);
    } else {
        println!("{} was not downloaded", key);
    }
    Ok(())
}

async fn fetch(url: &str) -> Result<Bytes> {
    tracing::info!(url = %url, "Downloading recording");

    let response = reqwest::get(url).await?;
    let status = response.status();
    if !status.is_success() {
        return Err(CliError::Download(format!("{} returned {}", url, status)));
    }

    Ok(response.bytes().await?)
}
