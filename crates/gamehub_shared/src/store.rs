//! # Persistent Store
//!
//! The load/save contract for the whole [`Snapshot`].
//!
//! ## Guarantees
//!
//! 1. **Durability**: once `save()` returns `Ok`, the snapshot survives a restart
//! 2. **All-or-nothing**: a failed `save()` leaves the previous snapshot readable
//! 3. **Lossless**: `load()` after `save(s)` yields exactly `s`
//!
//! ## Stores
//!
//! - [`JsonFileStore`]: one JSON document on disk, replaced by rename
//! - [`MemoryStore`]: keeps the last saved snapshot in memory; used by tests
//!   and by embedders that persist elsewhere

use std::fs::{self, File, OpenOptions};
use std::io::{BufReader, BufWriter, ErrorKind, Write};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;
use thiserror::Error;

use crate::model::Snapshot;

/// Errors raised by a store.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Filesystem failure.
    #[error("i/o error on {path}: {source}")]
    Io {
        /// File being read or written.
        path: PathBuf,
        /// Underlying error.
        #[source]
        source: std::io::Error,
    },

    /// The document could not be encoded or decoded.
    #[error("snapshot serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// The store refused the write.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result type for store operations.
pub type StoreResult<T> = Result<T, StoreError>;

/// Durable home of the application state.
///
/// Implementations must be callable from any thread. Callers serialize
/// writes themselves (see [`crate::state::SharedState`]).
pub trait PersistentStore: Send + Sync {
    /// Loads the last saved snapshot, or `None` if nothing was ever saved.
    ///
    /// # Errors
    ///
    /// Returns error if saved data exists but cannot be read.
    fn load(&self) -> StoreResult<Option<Snapshot>>;

    /// Durably replaces the saved snapshot.
    ///
    /// # Errors
    ///
    /// Returns error if the snapshot was not recorded. The previous
    /// snapshot stays authoritative in that case.
    fn save(&self, snapshot: &Snapshot) -> StoreResult<()>;
}

/// Stores the snapshot as a pretty-printed JSON file.
///
/// Writes go to a sibling `.tmp` file which is synced and then renamed over
/// the real file, so readers never see a torn document.
pub struct JsonFileStore {
    /// Path to the snapshot file.
    path: PathBuf,
}

impl JsonFileStore {
    /// Creates a store backed by the given file. The file need not exist yet.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Returns the snapshot file path.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let mut name = self.path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
        name.push(".tmp");
        self.path.with_file_name(name)
    }

    fn io_error(path: &Path, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl PersistentStore for JsonFileStore {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        let file = match File::open(&self.path) {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(Self::io_error(&self.path, e)),
        };

        let snapshot = serde_json::from_reader(BufReader::new(file))?;
        tracing::debug!(path = %self.path.display(), "snapshot loaded");
        Ok(Some(snapshot))
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        let temp = self.temp_path();

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Self::io_error(parent, e))?;
        }

        {
            let file = OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(&temp)
                .map_err(|e| Self::io_error(&temp, e))?;

            let mut writer = BufWriter::new(file);
            serde_json::to_writer_pretty(&mut writer, snapshot)?;
            writer.flush().map_err(|e| Self::io_error(&temp, e))?;
            writer
                .get_ref()
                .sync_all()
                .map_err(|e| Self::io_error(&temp, e))?;
        }

        fs::rename(&temp, &self.path).map_err(|e| Self::io_error(&self.path, e))?;
        Ok(())
    }
}

/// Keeps the last saved snapshot in memory.
///
/// Writes can be switched off with [`MemoryStore::set_fail_writes`] to
/// exercise the persistence-failure path.
#[derive(Default)]
pub struct MemoryStore {
    /// Last saved snapshot.
    saved: Mutex<Option<Snapshot>>,
    /// When set, every save fails.
    fail_writes: AtomicBool,
    /// Number of successful saves.
    save_count: AtomicU64,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store that already holds a snapshot.
    #[must_use]
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            saved: Mutex::new(Some(snapshot)),
            ..Self::default()
        }
    }

    /// Makes subsequent saves fail (or succeed again).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of successful saves so far.
    #[must_use]
    pub fn save_count(&self) -> u64 {
        self.save_count.load(Ordering::SeqCst)
    }

    /// Returns a copy of the last saved snapshot.
    #[must_use]
    pub fn saved(&self) -> Option<Snapshot> {
        self.saved.lock().clone()
    }
}

impl PersistentStore for MemoryStore {
    fn load(&self) -> StoreResult<Option<Snapshot>> {
        Ok(self.saved.lock().clone())
    }

    fn save(&self, snapshot: &Snapshot) -> StoreResult<()> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("writes disabled".to_string()));
        }
        *self.saved.lock() = Some(snapshot.clone());
        self.save_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Item, Receipt, Report, User};

    fn temp_state_path() -> PathBuf {
        let id = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .unwrap()
            .as_nanos();
        std::env::temp_dir().join(format!("test_gamehub_store_{id}.json"))
    }

    fn sample_snapshot() -> Snapshot {
        let mut snapshot = Snapshot::with_catalog(vec![
            Item::new("pet_egg_basic", "Basic Pet Egg", 100, Some(10_000)),
            Item::new("sticker", "Sticker", 5, None),
        ]);
        snapshot.items[0].minted = 1;

        let mut alice = User::with_balance(900);
        alice.inventory.push("pet_egg_basic".to_string());
        alice.receipts.push(Receipt {
            id: "rcpt-1".to_string(),
            item_id: "pet_egg_basic".to_string(),
            amount: 100,
            timestamp: 1_700_000_000_000,
        });
        snapshot.users.insert("alice".to_string(), alice);
        snapshot.users.insert("Alice".to_string(), User::with_balance(1000));

        snapshot.reports.push(Report {
            id: "rep-1".to_string(),
            user_id: "alice".to_string(),
            report_type: "chat".to_string(),
            target_id: "bob".to_string(),
            reason: "said **** twice".to_string(),
            flagged: true,
            timestamp: 1_700_000_000_001,
        });
        snapshot
    }

    #[test]
    fn test_json_store_missing_file_loads_none() {
        let store = JsonFileStore::new(temp_state_path());
        assert!(store.load().unwrap().is_none());
    }

    #[test]
    fn test_json_store_round_trip() {
        let path = temp_state_path();
        let store = JsonFileStore::new(&path);
        let snapshot = sample_snapshot();

        store.save(&snapshot).unwrap();
        let loaded = store.load().unwrap().unwrap();

        assert_eq!(loaded, snapshot);
        assert!(!store.temp_path().exists());

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_json_store_overwrites() {
        let path = temp_state_path();
        let store = JsonFileStore::new(&path);

        store.save(&sample_snapshot()).unwrap();
        store.save(&Snapshot::default()).unwrap();

        assert_eq!(store.load().unwrap(), Some(Snapshot::default()));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_json_store_corrupt_file() {
        let path = temp_state_path();
        std::fs::write(&path, b"{ not json").unwrap();

        let store = JsonFileStore::new(&path);
        assert!(matches!(store.load(), Err(StoreError::Serialization(_))));

        std::fs::remove_file(&path).ok();
    }

    #[test]
    fn test_memory_store_failure_keeps_previous() {
        let store = MemoryStore::new();
        let snapshot = sample_snapshot();
        store.save(&snapshot).unwrap();

        store.set_fail_writes(true);
        assert!(store.save(&Snapshot::default()).is_err());

        assert_eq!(store.load().unwrap(), Some(snapshot));
        assert_eq!(store.save_count(), 1);
    }
}
