//! Playlist inspection

use std::sync::Arc;
use tilawa_core::ReciterId;
use tilawa_playback::{LocalSourceRegistry, PlaylistResolver, SourceAddress};

use super::AppContext;
use crate::error::Result;

/// Resolve and print the playlist for a reciter and chapter
pub async fn show(ctx: &AppContext, reciter_id: &ReciterId, chapter_number: u16) -> Result<()> {
    let store = ctx.open_store().await?;
    let registry = LocalSourceRegistry::new();
    let resolver = PlaylistResolver::new(
        Arc::clone(&ctx.catalog),
        Arc::new(store),
        registry.clone(),
        ctx.config.playback.clone(),
    );

    let playlist = resolver.resolve(reciter_id, chapter_number).await?;
    let chapter = ctx.catalog.chapter(chapter_number)?;

    println!(
        "{} {} ({}): {} {}",
        chapter.number,
        chapter.english_name,
        reciter_id,
        playlist.len(),
        if playlist.is_segmented() { "verses" } else { "file" }
    );
    for (index, entry) in playlist.entries().iter().enumerate() {
        match entry {
            SourceAddress::Remote(url) => println!("{:>4}  {}", index + 1, url),
            SourceAddress::Local(handle) => {
                let size = registry.open(*handle).map_or(0, |payload| payload.len());
                println!("{:>4}  offline copy ({} bytes)", index + 1, size);
            }
        }
    }

    registry.release_playlist(&playlist);
    Ok(())
}
