use serde::{Deserialize, Serialize};

/// Number of chapters in the book
pub const CHAPTER_COUNT: u16 = 114;

/// Where a chapter was revealed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RevelationType {
    Meccan,
    Medinan,
}

impl RevelationType {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Meccan => "meccan",
            Self::Medinan => "medinan",
        }
    }
}

/// Static chapter metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChapterInfo {
    /// Chapter number (1..=114)
    pub number: u16,

    /// Arabic name
    pub name: String,

    /// Transliterated name
    pub english_name: String,

    /// English meaning of the name
    pub english_name_translation: String,

    /// Number of verses, always positive
    pub verse_count: u16,

    pub revelation_type: RevelationType,
}

impl ChapterInfo {
    /// Whether `query` (already lowercased and trimmed) matches this chapter
    pub(crate) fn matches(&self, query: &str) -> bool {
        self.number.to_string().contains(query)
            || self.name.to_lowercase().contains(query)
            || self.english_name.to_lowercase().contains(query)
            || self.english_name_translation.to_lowercase().contains(query)
    }
}
