//! Core types for playback management

use serde::{Deserialize, Serialize};
use std::fmt;
use tilawa_core::ReciterId;

use crate::error::{PlaybackError, Result};
use crate::local::LocalHandle;

/// What is currently selected for playback
///
/// Built from catalog data when a playlist is installed, so display code
/// never needs a catalog lookup.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackDescriptor {
    pub reciter_id: ReciterId,
    pub reciter_name: String,
    pub chapter_number: u16,
    pub chapter_name: String,

    /// 1-based verse within the chapter, only tracked in segmented mode
    pub verse: Option<u16>,
}

/// One playable entry of a playlist
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceAddress {
    /// Remote stream URL
    Remote(String),

    /// Transient in-process resource checked out from a `LocalSourceRegistry`
    Local(LocalHandle),
}

impl SourceAddress {
    pub fn local_handle(&self) -> Option<LocalHandle> {
        match self {
            Self::Local(handle) => Some(*handle),
            Self::Remote(_) => None,
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local(_))
    }
}

impl fmt::Display for SourceAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remote(url) => write!(f, "{}", url),
            Self::Local(handle) => write!(f, "{}", handle),
        }
    }
}

/// Ordered, non-empty sequence of entries for one chapter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Playlist {
    entries: Vec<SourceAddress>,
    segmented: bool,
}

impl Playlist {
    /// Create a playlist
    ///
    /// # Errors
    /// Returns `PlaybackError::EmptyPlaylist` if `entries` is empty.
    pub fn new(entries: Vec<SourceAddress>, segmented: bool) -> Result<Self> {
        if entries.is_empty() {
            return Err(PlaybackError::EmptyPlaylist);
        }
        Ok(Self { entries, segmented })
    }

    /// Single whole-chapter entry
    pub fn single(entry: SourceAddress) -> Self {
        Self {
            entries: vec![entry],
            segmented: false,
        }
    }

    pub fn entries(&self) -> &[SourceAddress] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&SourceAddress> {
        self.entries.get(index)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the playlist has no entries (never true once constructed)
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// One entry per verse
    pub fn is_segmented(&self) -> bool {
        self.segmented
    }

    /// Local handles referenced by this playlist
    pub fn local_handles(&self) -> impl Iterator<Item = LocalHandle> + '_ {
        self.entries.iter().filter_map(SourceAddress::local_handle)
    }
}

/// Position within the current playlist
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PlaybackPosition {
    pub entry_index: usize,

    /// Seconds into the current entry
    pub elapsed_seconds: f64,

    /// Length of the current entry, once the device has reported it
    pub total_duration_seconds: Option<f64>,
}

/// Transport state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PlaybackState {
    /// No session
    Idle,

    /// Playlist is being resolved
    Loading,

    /// Currently playing
    Playing,

    /// Track loaded but not playing
    Paused,
}

/// Playback configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlaybackConfig {
    /// Base URL for per-verse recordings
    ///
    /// Entries are addressed as `{segment_cdn_base}/{edition}/{global_verse}.mp3`.
    pub segment_cdn_base: String,
}

impl Default for PlaybackConfig {
    fn default() -> Self {
        Self {
            segment_cdn_base: "https://cdn.islamic.network/quran/audio/128".to_string(),
        }
    }
}

/// Read-only view of the session for presentation
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlaybackSnapshot {
    pub state: PlaybackState,
    pub track: Option<TrackDescriptor>,
    pub is_playing: bool,
    pub position: PlaybackPosition,
    pub entry_count: usize,
    pub segmented: bool,

    /// Last non-fatal device failure for the current track
    pub last_error: Option<String>,
}

impl Default for PlaybackSnapshot {
    fn default() -> Self {
        Self {
            state: PlaybackState::Idle,
            track: None,
            is_playing: false,
            position: PlaybackPosition::default(),
            entry_count: 0,
            segmented: false,
            last_error: None,
        }
    }
}

impl PlaybackSnapshot {
    /// Now-playing title
    ///
    /// The chapter name, with the verse appended in segmented mode.
    pub fn display_title(&self) -> Option<String> {
        let track = self.track.as_ref()?;
        Some(match track.verse {
            Some(verse) if self.segmented => format!("{} (verse {})", track.chapter_name, verse),
            _ => track.chapter_name.clone(),
        })
    }

    /// Whether a catalog item is the one currently loaded
    pub fn is_active(&self, reciter_id: &ReciterId, chapter_number: u16) -> bool {
        self.track
            .as_ref()
            .is_some_and(|t| &t.reciter_id == reciter_id && t.chapter_number == chapter_number)
    }

    /// `elapsed / total` as `MM:SS / MM:SS`
    pub fn clock(&self) -> String {
        format!(
            "{} / {}",
            format_clock(self.position.elapsed_seconds),
            format_clock(self.position.total_duration_seconds.unwrap_or(0.0))
        )
    }
}

/// Render seconds as zero-padded `MM:SS`
///
/// Fractions are floored; negative or non-finite input renders as `00:00`.
pub fn format_clock(seconds: f64) -> String {
    if !seconds.is_finite() || seconds < 0.0 {
        return "00:00".to_string();
    }
    let whole = seconds.floor() as u64;
    format!("{:02}:{:02}", whole / 60, whole % 60)
}
