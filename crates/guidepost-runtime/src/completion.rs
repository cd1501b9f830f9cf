#![forbid(unsafe_code)]

//! The "user has seen the tour" flag.
//!
//! The flag is read once when the store is created and cached; later reads
//! never touch the backend. Writes update the cache first, so a failing
//! backend degrades to a per-session flag instead of an error the user sees.
//! A backend that reports itself unavailable when the store is opened is
//! never touched again.

use std::fmt;

use crate::state_persistence::{KeyValueStore, StorageResult};

/// Storage key for the completion flag.
pub const TOUR_COMPLETED_KEY: &str = "cuga_tour_completed";

const COMPLETED_VALUE: &str = "true";

/// Persisted seen/not-seen flag.
pub struct CompletionStore {
    backend: Box<dyn KeyValueStore>,
    key: String,
    completed: bool,
    persistent: bool,
}

impl CompletionStore {
    /// Open the store under [`TOUR_COMPLETED_KEY`].
    pub fn new(backend: impl KeyValueStore + 'static) -> Self {
        Self::with_key(backend, TOUR_COMPLETED_KEY)
    }

    /// Open the store under a custom key.
    pub fn with_key(backend: impl KeyValueStore + 'static, key: impl Into<String>) -> Self {
        let backend: Box<dyn KeyValueStore> = Box::new(backend);
        let key = key.into();
        let persistent = backend.is_available();
        if !persistent {
            tracing::warn!(
                backend = backend.name(),
                key = %key,
                "tour completion storage unavailable, flag kept for this session only"
            );
        }
        let completed = persistent && match backend.get(&key) {
            Ok(value) => value.as_deref() == Some(COMPLETED_VALUE),
            Err(err) => {
                tracing::warn!(
                    backend = backend.name(),
                    key = %key,
                    error = %err,
                    "failed to read tour completion flag, assuming not completed"
                );
                false
            }
        };
        tracing::debug!(backend = backend.name(), key = %key, completed, "loaded tour completion flag");
        Self {
            backend,
            key,
            completed,
            persistent,
        }
    }

    /// Whether the user has finished or skipped a tour.
    pub fn has_completed_tour(&self) -> bool {
        self.completed
    }

    /// Record that the tour was finished or skipped.
    pub fn mark_completed(&mut self) -> StorageResult<()> {
        self.completed = true;
        if !self.persistent {
            return Ok(());
        }
        self.backend.set(&self.key, COMPLETED_VALUE)
    }

    /// Forget that the tour was seen.
    pub fn reset(&mut self) -> StorageResult<()> {
        self.completed = false;
        if !self.persistent {
            return Ok(());
        }
        self.backend.remove(&self.key)
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// `false` when the backend was unavailable at open.
    pub fn is_persistent(&self) -> bool {
        self.persistent
    }

    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

impl fmt::Debug for CompletionStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompletionStore")
            .field("backend", &self.backend.name())
            .field("key", &self.key)
            .field("completed", &self.completed)
            .field("persistent", &self.persistent)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;
    use std::sync::Arc;

    use super::*;
    use crate::state_persistence::{MemoryStorage, StorageError};

    #[test]
    fn fresh_store_is_not_completed() {
        let store = CompletionStore::new(MemoryStorage::new());
        assert!(!store.has_completed_tour());
        assert_eq!(store.key(), TOUR_COMPLETED_KEY);
    }

    #[test]
    fn only_literal_true_counts() {
        let store = CompletionStore::new(MemoryStorage::with_entries([(TOUR_COMPLETED_KEY, "yes")]));
        assert!(!store.has_completed_tour());
        let store = CompletionStore::new(MemoryStorage::with_entries([(TOUR_COMPLETED_KEY, "true")]));
        assert!(store.has_completed_tour());
    }

    #[test]
    fn mark_and_reset_persist() {
        let backend = Arc::new(MemoryStorage::new());
        let mut store = CompletionStore::new(Arc::clone(&backend));
        store.mark_completed().unwrap();
        assert!(store.has_completed_tour());
        assert_eq!(backend.get(TOUR_COMPLETED_KEY).unwrap().as_deref(), Some("true"));

        store.reset().unwrap();
        assert!(!store.has_completed_tour());
        assert_eq!(backend.get(TOUR_COMPLETED_KEY).unwrap(), None);
    }

    #[test]
    fn survives_reload() {
        let backend = Arc::new(MemoryStorage::new());
        CompletionStore::new(Arc::clone(&backend)).mark_completed().unwrap();
        let reloaded = CompletionStore::new(Arc::clone(&backend));
        assert!(reloaded.has_completed_tour());
    }

    #[test]
    fn custom_key_is_isolated() {
        let backend = Arc::new(MemoryStorage::new());
        CompletionStore::with_key(Arc::clone(&backend), "other").mark_completed().unwrap();
        assert!(!CompletionStore::new(Arc::clone(&backend)).has_completed_tour());
    }

    struct Broken {
        reads: Cell<u32>,
    }

    impl KeyValueStore for Broken {
        fn name(&self) -> &str {
            "Broken"
        }
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            self.reads.set(self.reads.get() + 1);
            Err(StorageError::Unavailable("disabled".into()))
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disabled".into()))
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            Err(StorageError::Unavailable("disabled".into()))
        }
    }

    #[test]
    fn broken_backend_degrades_to_session_flag() {
        let mut store = CompletionStore::new(Broken { reads: Cell::new(0) });
        assert!(!store.has_completed_tour());
        assert!(store.mark_completed().is_err());
        assert!(store.has_completed_tour());
        assert!(store.reset().is_err());
        assert!(!store.has_completed_tour());
    }

    #[test]
    fn backend_read_once() {
        let backend = Arc::new(Broken { reads: Cell::new(0) });
        let store = CompletionStore::new(Arc::clone(&backend));
        let _ = store.has_completed_tour();
        let _ = store.has_completed_tour();
        assert_eq!(backend.reads.get(), 1);
    }

    struct Offline {
        calls: Cell<u32>,
    }

    impl Offline {
        fn touched(&self) -> StorageResult<()> {
            self.calls.set(self.calls.get() + 1);
            Err(StorageError::Unavailable("offline".into()))
        }
    }

    impl KeyValueStore for Offline {
        fn name(&self) -> &str {
            "Offline"
        }
        fn get(&self, _key: &str) -> StorageResult<Option<String>> {
            self.touched().map(|()| None)
        }
        fn set(&self, _key: &str, _value: &str) -> StorageResult<()> {
            self.touched()
        }
        fn remove(&self, _key: &str) -> StorageResult<()> {
            self.touched()
        }
        fn is_available(&self) -> bool {
            false
        }
    }

    #[test]
    fn unavailable_backend_is_never_touched() {
        let backend = Arc::new(Offline { calls: Cell::new(0) });
        let mut store = CompletionStore::new(Arc::clone(&backend));
        assert!(!store.is_persistent());
        assert!(!store.has_completed_tour());

        store.mark_completed().unwrap();
        assert!(store.has_completed_tour());
        store.reset().unwrap();
        assert!(!store.has_completed_tour());
        assert_eq!(backend.calls.get(), 0);
    }

    #[test]
    fn available_backend_is_persistent() {
        assert!(CompletionStore::new(MemoryStorage::new()).is_persistent());
    }
}
