/// ID types for Tilawa entities
use serde::{Deserialize, Serialize};
use std::fmt;

/// Reciter identifier
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReciterId(String);

impl ReciterId {
    /// Create a new reciter ID
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReciterId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for ReciterId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

/// Offline store key for one downloaded chapter recording
///
/// Always formatted as `{reciter_id}_{chapter_number}`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TrackKey(String);

impl TrackKey {
    /// Build the key for a reciter/chapter pair
    pub fn for_track(reciter_id: &ReciterId, chapter_number: u16) -> Self {
        Self(format!("{}_{}", reciter_id.as_str(), chapter_number))
    }

    /// Wrap an existing raw key (e.g. one read back from storage)
    pub fn from_raw(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    /// Get the inner string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn track_key_joins_reciter_and_chapter() {
        let key = TrackKey::for_track(&ReciterId::new("alafasy"), 2);
        assert_eq!(key.as_str(), "alafasy_2");
    }

    #[test]
    fn track_key_is_not_zero_padded() {
        let key = TrackKey::for_track(&ReciterId::new("ghamdi"), 114);
        assert_eq!(key.to_string(), "ghamdi_114");
    }

    #[test]
    fn reciter_id_display() {
        let id = ReciterId::new("husary_verses");
        assert_eq!(format!("{}", id), "husary_verses");
    }
}
