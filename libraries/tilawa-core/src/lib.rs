//! Tilawa Core
//!
//! Platform-agnostic domain types, the static recitation catalog, verse index
//! arithmetic and the offline track store contract.
//!
//! # Architecture
//!
//! The core crate defines:
//! - **Domain Types**: `ChapterInfo`, `ReciterInfo`, `StoredTrack`, ids
//! - **Catalog**: chapter and reciter lookup tables plus global verse offsets
//! - **Store Contract**: the async `OfflineTrackStore` trait
//! - **Error Handling**: unified `TilawaError` and `Result` types
//!
//! # Example
//!
//! ```rust
//! use tilawa_core::Catalog;
//!
//! let catalog = Catalog::builtin().unwrap();
//!
//! let chapter = catalog.chapter(2).unwrap();
//! assert_eq!(chapter.verse_count, 286);
//!
//! // Chapter 2 starts right after the 7 verses of chapter 1
//! assert_eq!(catalog.global_verse_offset(2).unwrap(), 8);
//! ```

#![forbid(unsafe_code)]

pub mod catalog;
pub mod error;
pub mod store;
pub mod types;
pub mod verse_index;

// Re-export commonly used types
pub use catalog::Catalog;
pub use error::{Result, TilawaError};
pub use store::{group_downloads_by_reciter, OfflineTrackStore, ReciterDownloads};
pub use verse_index::VerseOffsets;

pub use types::{
    single_file_url, ChapterInfo, DownloadedTrack, ReciterId, ReciterInfo, ReciterSource, RevelationType,
    StoredTrack, TrackKey, CHAPTER_COUNT,
};
