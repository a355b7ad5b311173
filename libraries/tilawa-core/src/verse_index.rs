//! Global verse numbering
//!
//! Per-verse remote recordings are addressed by the verse's position in the
//! whole book (1..=6236), not by its number inside the chapter. The offset
//! table maps a chapter to the global number of its first verse.

use crate::error::{Result, TilawaError};
use crate::types::CHAPTER_COUNT;

/// Prefix-sum table of chapter start offsets
///
/// `offset(1) == 1` and `offset(n + 1) == offset(n) + verse_count(n)`.
/// Built once from the catalog and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerseOffsets {
    /// `starts[i]` is the global number of the first verse of chapter `i + 1`
    starts: Vec<u32>,
    total_verses: u32,
}

impl VerseOffsets {
    /// Build the table from verse counts in chapter order
    ///
    /// # Errors
    /// Returns `TilawaError::Catalog` if the list does not hold exactly
    /// `CHAPTER_COUNT` positive counts.
    pub fn from_counts(verse_counts: &[u16]) -> Result<Self> {
        if verse_counts.len() != usize::from(CHAPTER_COUNT) {
            return Err(TilawaError::catalog(format!(
                "expected {} chapters, got {}",
                CHAPTER_COUNT,
                verse_counts.len()
            )));
        }

        let mut starts = Vec::with_capacity(verse_counts.len());
        let mut next = 1u32;
        for (index, &count) in verse_counts.iter().enumerate() {
            if count == 0 {
                return Err(TilawaError::catalog(format!(
                    "chapter {} has no verses",
                    index + 1
                )));
            }
            starts.push(next);
            next += u32::from(count);
        }

        Ok(Self {
            starts,
            total_verses: next - 1,
        })
    }

    /// Global number of the first verse of `chapter_number`
    ///
    /// # Errors
    /// Returns `TilawaError::InvalidChapterNumber` outside 1..=114. Never clamps.
    pub fn offset(&self, chapter_number: u16) -> Result<u32> {
        if chapter_number == 0 || chapter_number > CHAPTER_COUNT {
            return Err(TilawaError::InvalidChapterNumber(chapter_number));
        }
        Ok(self.starts[usize::from(chapter_number) - 1])
    }

    /// Total verses in the book
    pub fn total_verses(&self) -> u32 {
        self.total_verses
    }
}
