//! Catalog browsing

use tilawa_core::{Catalog, ReciterSource};

/// Print chapters, optionally filtered
pub fn list_chapters(catalog: &Catalog, search: Option<&str>) {
    let chapters = catalog.search_chapters(search.unwrap_or_default());
    if chapters.is_empty() {
        println!("No chapters match.");
        return;
    }

    for chapter in chapters {
        println!(
            "{:>3}  {:<22} {:<28} {:>3} verses  {:<7}  {}",
            chapter.number,
            chapter.english_name,
            chapter.english_name_translation,
            chapter.verse_count,
            chapter.revelation_type.as_str(),
            chapter.name,
        );
    }
}

/// Print reciters with their source mode
pub fn list_reciters(catalog: &Catalog) {
    for reciter in catalog.reciters() {
        let mode = match &reciter.source {
            ReciterSource::Segmented { edition } => format!("per verse ({})", edition),
            ReciterSource::SingleFile { server, .. } => format!("per chapter ({})", server),
        };
        println!(
            "{:<18} {:<28} {}  {}",
            reciter.id, reciter.english_name, reciter.name, mode
        );
    }
}
