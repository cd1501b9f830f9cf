//! Key-value persistence for tour state that outlives a session.
//!
//! The tour persists a single flag, but the engine never talks to a storage
//! singleton: it receives a [`KeyValueStore`] and the host decides what backs
//! it.
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     CompletionStore                           │
//! │   - caches the flag read at startup                           │
//! └──────────────────────────────────────────────────────────────┘
//!                              │
//!                              ▼
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     KeyValueStore                             │
//! │   - MemoryStorage: in-memory (testing, ephemeral)             │
//! │   - FileStorage: JSON file (requires state-persistence)       │
//! │   - LocalStorage: window.localStorage (guidepost-web)         │
//! └──────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | `StorageError::Io` | File I/O failure | Returns error, caller logs |
//! | `StorageError::Serialization` | JSON encode/decode | Returns error, caller logs |
//! | `StorageError::Unavailable` | Storage disabled by the host | Returns error, caller logs |
//! | Missing key | First run | `get` returns `Ok(None)` |

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, RwLock};

// ─────────────────────────────────────────────────────────────────────────────
// Error Types
// ─────────────────────────────────────────────────────────────────────────────

/// Errors that can occur during storage operations.
#[derive(Debug)]
pub enum StorageError {
    /// I/O error during file operations.
    Io(std::io::Error),
    /// Serialization or deserialization error.
    Serialization(String),
    /// Stored data is unreadable.
    Corruption(String),
    /// Backend is not available (private browsing, quota, disabled storage).
    Unavailable(String),
}

impl fmt::Display for StorageError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageError::Io(e) => write!(f, "I/O error: {e}"),
            StorageError::Serialization(msg) => write!(f, "serialization error: {msg}"),
            StorageError::Corruption(msg) => write!(f, "storage corruption: {msg}"),
            StorageError::Unavailable(msg) => write!(f, "storage unavailable: {msg}"),
        }
    }
}

impl std::error::Error for StorageError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            StorageError::Io(e) => Some(e),
            StorageError::Serialization(_)
            | StorageError::Corruption(_)
            | StorageError::Unavailable(_) => None,
        }
    }
}

impl From<std::io::Error> for StorageError {
    fn from(e: std::io::Error) -> Self {
        StorageError::Io(e)
    }
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

// ─────────────────────────────────────────────────────────────────────────────
// Storage Trait
// ─────────────────────────────────────────────────────────────────────────────

/// String-keyed, string-valued durable storage.
///
/// Mirrors the Web Storage API. Single-threaded hosts (the browser) are the
/// main target, so implementations are not required to be `Send`.
pub trait KeyValueStore {
    /// Human-readable name for logging.
    fn name(&self) -> &str;

    /// Read a value. `Ok(None)` when the key is absent.
    fn get(&self, key: &str) -> StorageResult<Option<String>>;

    /// Write a value, replacing any previous one.
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;

    /// Remove a key. Removing an absent key is not an error.
    fn remove(&self, key: &str) -> StorageResult<()>;

    /// Check if the backend is usable. Must not modify anything.
    ///
    /// [`CompletionStore`](crate::CompletionStore) asks once when opened and
    /// keeps the flag in memory only when this returns `false`.
    fn is_available(&self) -> bool {
        true
    }
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for Arc<T> {
    fn name(&self) -> &str {
        (**self).name()
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn is_available(&self) -> bool {
        (**self).is_available()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Memory Storage (always available)
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage backend for testing and ephemeral state.
///
/// Wrap it in an [`Arc`] to share one store between several consumers, for
/// example to simulate a page reload in tests.
#[derive(Default)]
pub struct MemoryStorage {
    data: RwLock<HashMap<String, String>>,
}

impl MemoryStorage {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create memory storage pre-populated with entries.
    #[must_use]
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        let data = entries
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        Self {
            data: RwLock::new(data),
        }
    }

    pub fn len(&self) -> usize {
        self.data.read().map(|g| g.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl KeyValueStore for MemoryStorage {
    fn name(&self) -> &str {
        "MemoryStorage"
    }

    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let guard = self
            .data
            .read()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        Ok(guard.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.insert(key.to_owned(), value.to_owned());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        let mut guard = self
            .data
            .write()
            .map_err(|_| StorageError::Corruption("lock poisoned".into()))?;
        guard.remove(key);
        Ok(())
    }
}

impl fmt::Debug for MemoryStorage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MemoryStorage")
            .field("entries", &self.len())
            .finish()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// File Storage (requires state-persistence feature)
// ─────────────────────────────────────────────────────────────────────────────

#[cfg(feature = "state-persistence")]
mod file_storage {
    use super::*;
    use serde::{Deserialize, Serialize};
    use std::fs::{self, File};
    use std::io::{BufReader, BufWriter, Write};
    use std::path::{Path, PathBuf};

    /// On-disk format.
    #[derive(Serialize, Deserialize)]
    struct StateFile {
        format_version: u32,
        entries: HashMap<String, String>,
    }

    impl StateFile {
        const FORMAT_VERSION: u32 = 1;

        fn new() -> Self {
            Self {
                format_version: Self::FORMAT_VERSION,
                entries: HashMap::new(),
            }
        }
    }

    /// File-based storage backend using JSON.
    ///
    /// # File Format
    ///
    /// ```json
    /// {
    ///   "format_version": 1,
    ///   "entries": {
    ///     "cuga_tour_completed": "true"
    ///   }
    /// }
    /// ```
    ///
    /// Writes go to `{path}.tmp` first and are renamed into place.
    pub struct FileStorage {
        path: PathBuf,
    }

    impl FileStorage {
        /// The file does not need to exist; it is created on first write.
        #[must_use]
        pub fn new(path: impl AsRef<Path>) -> Self {
            Self {
                path: path.as_ref().to_path_buf(),
            }
        }

        /// `$XDG_STATE_HOME/guidepost/{app_name}/state.json` on Linux, with
        /// `~/.local/state` and the current directory as fallbacks.
        #[must_use]
        pub fn default_for_app(app_name: &str) -> Self {
            let base = dirs_or_fallback();
            let path = base.join("guidepost").join(app_name).join("state.json");
            Self { path }
        }

        pub fn path(&self) -> &Path {
            &self.path
        }

        fn temp_path(&self) -> PathBuf {
            let mut tmp = self.path.clone();
            tmp.set_extension("json.tmp");
            tmp
        }

        fn read(&self) -> StorageResult<StateFile> {
            if !self.path.exists() {
                return Ok(StateFile::new());
            }
            let reader = BufReader::new(File::open(&self.path)?);
            let state: StateFile = serde_json::from_reader(reader).map_err(|e| {
                StorageError::Serialization(format!("failed to parse state file: {e}"))
            })?;
            if state.format_version != StateFile::FORMAT_VERSION {
                tracing::warn!(
                    stored = state.format_version,
                    expected = StateFile::FORMAT_VERSION,
                    "state file format version mismatch, ignoring stored state"
                );
                return Ok(StateFile::new());
            }
            Ok(state)
        }

        fn write(&self, state: &StateFile) -> StorageResult<()> {
            if let Some(parent) = self.path.parent()
                && !parent.as_os_str().is_empty()
            {
                fs::create_dir_all(parent)?;
            }

            let tmp_path = self.temp_path();
            {
                let file = File::create(&tmp_path)?;
                let mut writer = BufWriter::new(file);
                serde_json::to_writer_pretty(&mut writer, state).map_err(|e| {
                    StorageError::Serialization(format!("failed to serialize state: {e}"))
                })?;
                writer.flush()?;
                writer.get_ref().sync_all()?;
            }
            fs::rename(&tmp_path, &self.path)?;

            tracing::debug!(
                path = %self.path.display(),
                entries = state.entries.len(),
                "saved tour state"
            );
            Ok(())
        }
    }

    fn dirs_or_fallback() -> PathBuf {
        if let Ok(state_home) = std::env::var("XDG_STATE_HOME") {
            return PathBuf::from(state_home);
        }
        if let Ok(home) = std::env::var("HOME") {
            return PathBuf::from(home).join(".local").join("state");
        }
        PathBuf::from(".")
    }

    impl KeyValueStore for FileStorage {
        fn name(&self) -> &str {
            "FileStorage"
        }

        fn get(&self, key: &str) -> StorageResult<Option<String>> {
            Ok(self.read()?.entries.remove(key))
        }

        fn set(&self, key: &str, value: &str) -> StorageResult<()> {
            let mut state = self.read()?;
            state.entries.insert(key.to_owned(), value.to_owned());
            self.write(&state)
        }

        fn remove(&self, key: &str) -> StorageResult<()> {
            let mut state = self.read()?;
            if state.entries.remove(key).is_none() {
                return Ok(());
            }
            self.write(&state)
        }

        /// A path occupied by a directory can never hold the state file.
        /// Missing parent directories are created on first write.
        fn is_available(&self) -> bool {
            !self.path.is_dir()
        }
    }

    impl fmt::Debug for FileStorage {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("FileStorage")
                .field("path", &self.path)
                .finish()
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        #[test]
        fn missing_file_reads_as_empty() {
            let dir = tempfile::tempdir().unwrap();
            let store = FileStorage::new(dir.path().join("state.json"));
            assert_eq!(store.get("k").unwrap(), None);
        }

        #[test]
        fn set_get_remove_round_trip_on_disk() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("nested").join("state.json");
            let store = FileStorage::new(&path);
            store.set("cuga_tour_completed", "true").unwrap();
            assert!(path.exists());

            let reopened = FileStorage::new(&path);
            assert_eq!(
                reopened.get("cuga_tour_completed").unwrap().as_deref(),
                Some("true")
            );

            reopened.remove("cuga_tour_completed").unwrap();
            assert_eq!(store.get("cuga_tour_completed").unwrap(), None);
        }

        #[test]
        fn corrupt_file_is_serialization_error() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            fs::write(&path, b"{not json").unwrap();
            let store = FileStorage::new(&path);
            assert!(matches!(
                store.get("k"),
                Err(StorageError::Serialization(_))
            ));
        }

        #[test]
        fn version_mismatch_ignores_stored_entries() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            fs::write(
                &path,
                br#"{"format_version":99,"entries":{"cuga_tour_completed":"true"}}"#,
            )
            .unwrap();
            let store = FileStorage::new(&path);
            assert_eq!(store.get("cuga_tour_completed").unwrap(), None);
        }

        #[test]
        fn no_temp_file_left_behind() {
            let dir = tempfile::tempdir().unwrap();
            let path = dir.path().join("state.json");
            FileStorage::new(&path).set("a", "b").unwrap();
            assert!(!dir.path().join("state.json.tmp").exists());
        }

        #[test]
        fn availability_check_has_no_side_effects() {
            let dir = tempfile::tempdir().unwrap();
            let nested = dir.path().join("nested");
            assert!(FileStorage::new(nested.join("state.json")).is_available());
            assert!(!nested.exists());
        }

        #[test]
        fn directory_path_is_unavailable() {
            let dir = tempfile::tempdir().unwrap();
            assert!(!FileStorage::new(dir.path()).is_available());
        }
    }
}

#[cfg(feature = "state-persistence")]
pub use file_storage::FileStorage;
