use serde::{Deserialize, Serialize};

use super::ReciterId;

/// How a reciter's recordings are addressed
///
/// Serialized with a `mode` tag so catalog entries stay flat:
/// `{"id": "...", "mode": "segmented", "edition": "ar.husary"}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ReciterSource {
    /// One remote file per verse, addressed by global verse number
    Segmented {
        /// Remote edition identifier (e.g. `ar.husary`)
        edition: String,
    },

    /// One file per chapter, either cached offline or fetched remotely
    SingleFile {
        /// Server base URL
        server: String,
        /// Path of the reciter's folder on the server
        path: String,
    },
}

/// Address of a whole-chapter recording on a single-file server
///
/// The chapter number is zero-padded to three digits.
pub fn single_file_url(server: &str, path: &str, chapter_number: u16) -> String {
    format!("{}/{}/{:03}.mp3", server, path, chapter_number)
}

/// Static reciter metadata
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReciterInfo {
    pub id: ReciterId,

    /// Display name (Arabic)
    pub name: String,

    pub english_name: String,

    #[serde(flatten)]
    pub source: ReciterSource,
}

impl ReciterInfo {
    /// Whether chapters are played verse by verse
    pub fn is_segmented(&self) -> bool {
        matches!(self.source, ReciterSource::Segmented { .. })
    }

    /// Remote address of a whole-chapter recording
    ///
    /// Returns `None` for segmented reciters, which have no single file.
    pub fn chapter_file_url(&self, chapter_number: u16) -> Option<String> {
        match &self.source {
            ReciterSource::SingleFile { server, path } => {
                Some(single_file_url(server, path, chapter_number))
            }
            ReciterSource::Segmented { .. } => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn single_file() -> ReciterInfo {
        ReciterInfo {
            id: ReciterId::new("alafasy"),
            name: "مشاري راشد العفاسي".to_string(),
            english_name: "Mishary Rashid Alafasy".to_string(),
            source: ReciterSource::SingleFile {
                server: "https://server8.mp3quran.net".to_string(),
                path: "afs".to_string(),
            },
        }
    }

    #[test]
    fn chapter_file_url_pads_to_three_digits() {
        let reciter = single_file();
        assert_eq!(
            reciter.chapter_file_url(2).as_deref(),
            Some("https://server8.mp3quran.net/afs/002.mp3")
        );
        assert_eq!(
            reciter.chapter_file_url(114).as_deref(),
            Some("https://server8.mp3quran.net/afs/114.mp3")
        );
    }

    #[test]
    fn segmented_reciter_has_no_chapter_file() {
        let reciter = ReciterInfo {
            source: ReciterSource::Segmented {
                edition: "ar.husary".to_string(),
            },
            ..single_file()
        };
        assert!(reciter.is_segmented());
        assert_eq!(reciter.chapter_file_url(1), None);
    }

    #[test]
    fn deserializes_flat_catalog_entry() {
        let json = r#"{"id": "husary_verses", "name": "x", "english_name": "y",
                       "mode": "segmented", "edition": "ar.husary"}"#;
        let reciter: ReciterInfo = serde_json::from_str(json).unwrap();
        assert_eq!(
            reciter.source,
            ReciterSource::Segmented {
                edition: "ar.husary".to_string()
            }
        );
    }
}
