//! Transient local playback resources
//!
//! A cached recording is checked out into the registry and referenced by a
//! `LocalHandle` until it is released. Handles are never reused, so a
//! released handle can not alias a later checkout.

use bytes::Bytes;
use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use crate::types::Playlist;

/// Reference to a checked-out local resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LocalHandle(u64);

impl fmt::Display for LocalHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "local:{}", self.0)
    }
}

#[derive(Default)]
struct RegistryInner {
    next_id: u64,
    resources: HashMap<u64, Bytes>,
    checkouts: u64,
}

/// Shared table of outstanding local resources
///
/// Cloning yields another reference to the same table. The resolver checks
/// resources out; the session manager releases them.
#[derive(Clone, Default)]
pub struct LocalSourceRegistry {
    inner: Arc<Mutex<RegistryInner>>,
}

impl LocalSourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, RegistryInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Register a payload and return its handle
    pub fn checkout(&self, payload: Bytes) -> LocalHandle {
        let mut inner = self.lock();
        inner.next_id += 1;
        inner.checkouts += 1;
        let id = inner.next_id;
        inner.resources.insert(id, payload);
        LocalHandle(id)
    }

    /// Release a handle
    ///
    /// Returns `false` if the handle was not outstanding.
    pub fn release(&self, handle: LocalHandle) -> bool {
        let released = self.lock().resources.remove(&handle.0).is_some();
        if !released {
            tracing::warn!(handle = %handle, "Release of a handle that is not outstanding");
        }
        released
    }

    /// Release every local handle a playlist references
    pub fn release_playlist(&self, playlist: &Playlist) {
        for handle in playlist.local_handles() {
            self.release(handle);
        }
    }

    /// Payload behind an outstanding handle
    pub fn open(&self, handle: LocalHandle) -> Option<Bytes> {
        self.lock().resources.get(&handle.0).cloned()
    }

    /// Number of handles checked out and not yet released
    pub fn outstanding(&self) -> usize {
        self.lock().resources.len()
    }

    /// Total checkouts over the registry's lifetime
    pub fn total_checkouts(&self) -> u64 {
        self.lock().checkouts
    }
}

impl fmt::Debug for LocalSourceRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocalSourceRegistry")
            .field("outstanding", &self.outstanding())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::SourceAddress;

    #[test]
    fn test_checkout_and_release() {
        let registry = LocalSourceRegistry::new();
        let handle = registry.checkout(Bytes::from_static(b"abc"));

        assert_eq!(registry.outstanding(), 1);
        assert_eq!(registry.open(handle).as_deref(), Some(&b"abc"[..]));

        assert!(registry.release(handle));
        assert!(!registry.release(handle));
        assert_eq!(registry.outstanding(), 0);
        assert!(registry.open(handle).is_none());
    }

    #[test]
    fn test_handles_are_not_reused() {
        let registry = LocalSourceRegistry::new();
        let first = registry.checkout(Bytes::new());
        registry.release(first);
        let second = registry.checkout(Bytes::new());
        assert_ne!(first, second);
        assert_eq!(registry.total_checkouts(), 2);
    }

    #[test]
    fn test_clones_share_state() {
        let registry = LocalSourceRegistry::new();
        let other = registry.clone();
        let handle = registry.checkout(Bytes::from_static(b"x"));
        other.release_playlist(&Playlist::single(SourceAddress::Local(handle)));
        assert_eq!(registry.outstanding(), 0);
    }
}
