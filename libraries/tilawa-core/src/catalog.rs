//! Static recitation catalog
//!
//! Chapter and reciter tables are embedded at compile time and parsed once
//! at startup. After construction the catalog is read-only.

use crate::error::{Result, TilawaError};
use crate::types::{ChapterInfo, ReciterId, ReciterInfo, CHAPTER_COUNT};
use crate::verse_index::VerseOffsets;

const CHAPTERS_JSON: &str = include_str!("../data/chapters.json");
const RECITERS_JSON: &str = include_str!("../data/reciters.json");

/// Chapter and reciter lookup tables
#[derive(Debug, Clone)]
pub struct Catalog {
    chapters: Vec<ChapterInfo>,
    reciters: Vec<ReciterInfo>,
    offsets: VerseOffsets,
}

impl Catalog {
    /// Load the embedded catalog
    pub fn builtin() -> Result<Self> {
        let chapters: Vec<ChapterInfo> = serde_json::from_str(CHAPTERS_JSON)?;
        let reciters: Vec<ReciterInfo> = serde_json::from_str(RECITERS_JSON)?;
        Self::new(chapters, reciters)
    }

    /// Build a catalog from explicit tables
    ///
    /// Chapters must be numbered 1..=114 in order; reciter ids must be unique.
    pub fn new(chapters: Vec<ChapterInfo>, reciters: Vec<ReciterInfo>) -> Result<Self> {
        for (index, chapter) in chapters.iter().enumerate() {
            if usize::from(chapter.number) != index + 1 {
                return Err(TilawaError::catalog(format!(
                    "chapter at position {} is numbered {}",
                    index + 1,
                    chapter.number
                )));
            }
        }

        for (index, reciter) in reciters.iter().enumerate() {
            if reciters[..index].iter().any(|r| r.id == reciter.id) {
                return Err(TilawaError::catalog(format!(
                    "duplicate reciter id {}",
                    reciter.id
                )));
            }
        }

        let counts: Vec<u16> = chapters.iter().map(|c| c.verse_count).collect();
        let offsets = VerseOffsets::from_counts(&counts)?;

        Ok(Self {
            chapters,
            reciters,
            offsets,
        })
    }

    /// All chapters in order
    pub fn chapters(&self) -> &[ChapterInfo] {
        &self.chapters
    }

    /// All reciters in catalog order
    pub fn reciters(&self) -> &[ReciterInfo] {
        &self.reciters
    }

    /// Look up a chapter by number
    pub fn chapter(&self, number: u16) -> Result<&ChapterInfo> {
        if number == 0 || number > CHAPTER_COUNT {
            return Err(TilawaError::InvalidChapterNumber(number));
        }
        Ok(&self.chapters[usize::from(number) - 1])
    }

    /// Look up a reciter by id
    pub fn reciter(&self, id: &ReciterId) -> Result<&ReciterInfo> {
        self.reciters
            .iter()
            .find(|r| &r.id == id)
            .ok_or_else(|| TilawaError::ReciterNotFound(id.to_string()))
    }

    /// The chapter after `number`, or `None` once the book is complete
    pub fn next_chapter(&self, number: u16) -> Option<&ChapterInfo> {
        number
            .checked_add(1)
            .and_then(|next| self.chapter(next).ok())
    }

    /// Global number of the first verse of a chapter
    pub fn global_verse_offset(&self, chapter_number: u16) -> Result<u32> {
        self.offsets.offset(chapter_number)
    }

    /// The verse offset table
    pub fn verse_offsets(&self) -> &VerseOffsets {
        &self.offsets
    }

    /// Filter chapters by number, Arabic name, transliteration or translation
    ///
    /// Matching is case-insensitive on the trimmed query. An empty query
    /// returns every chapter.
    pub fn search_chapters(&self, query: &str) -> Vec<&ChapterInfo> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return self.chapters.iter().collect();
        }
        self.chapters.iter().filter(|c| c.matches(&query)).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::RevelationType;

    #[test]
    fn builtin_catalog_has_every_chapter() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.chapters().len(), 114);
        assert_eq!(catalog.verse_offsets().total_verses(), 6236);
    }

    #[test]
    fn known_offsets() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.global_verse_offset(1).unwrap(), 1);
        assert_eq!(catalog.global_verse_offset(2).unwrap(), 8);
        assert_eq!(catalog.global_verse_offset(3).unwrap(), 294);
        assert_eq!(catalog.global_verse_offset(114).unwrap(), 6231);
    }

    #[test]
    fn chapter_lookup_rejects_out_of_range() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            catalog.chapter(0),
            Err(TilawaError::InvalidChapterNumber(0))
        ));
        assert!(matches!(
            catalog.chapter(115),
            Err(TilawaError::InvalidChapterNumber(115))
        ));
        assert_eq!(catalog.chapter(9).unwrap().revelation_type, RevelationType::Medinan);
    }

    #[test]
    fn next_chapter_stops_after_last() {
        let catalog = Catalog::builtin().unwrap();
        assert_eq!(catalog.next_chapter(1).map(|c| c.number), Some(2));
        assert!(catalog.next_chapter(114).is_none());
    }

    #[test]
    fn reciter_lookup() {
        let catalog = Catalog::builtin().unwrap();
        let reciter = catalog.reciter(&ReciterId::new("alafasy")).unwrap();
        assert!(!reciter.is_segmented());
        assert!(matches!(
            catalog.reciter(&ReciterId::new("nobody")),
            Err(TilawaError::ReciterNotFound(_))
        ));
    }

    #[test]
    fn search_by_number_and_names() {
        let catalog = Catalog::builtin().unwrap();

        let by_translation = catalog.search_chapters("  THE COW ");
        assert_eq!(by_translation.len(), 1);
        assert_eq!(by_translation[0].number, 2);

        let by_arabic = catalog.search_chapters("الكهف");
        assert_eq!(by_arabic[0].number, 18);

        // "11" appears in 11, 110, 111, 112, 113, 114
        let by_number: Vec<u16> = catalog
            .search_chapters("11")
            .iter()
            .map(|c| c.number)
            .collect();
        assert!(by_number.contains(&11));
        assert!(by_number.contains(&114));

        assert_eq!(catalog.search_chapters("").len(), 114);
    }

    #[test]
    fn rejects_misnumbered_chapters() {
        let catalog = Catalog::builtin().unwrap();
        let mut chapters = catalog.chapters().to_vec();
        chapters.swap(0, 1);
        assert!(Catalog::new(chapters, Vec::new()).is_err());
    }

    #[test]
    fn rejects_duplicate_reciters() {
        let catalog = Catalog::builtin().unwrap();
        let mut reciters = catalog.reciters().to_vec();
        reciters.push(reciters[0].clone());
        assert!(Catalog::new(catalog.chapters().to_vec(), reciters).is_err());
    }
}
