//! Persistence gateway: durable storage of the session snapshot and the auth flag.
//!
//! Backends only know how to get and put string values under a key; the snapshot
//! encoding and the seeded fallback live here so every backend behaves the same.

use chrono::{DateTime, Utc};
use thiserror::Error;

use nexus_inventory::Snapshot;

pub mod file;
pub mod in_memory;
#[cfg(feature = "sqlite")]
pub mod sqlite;

pub use file::FileStore;
pub use in_memory::InMemoryStore;
#[cfg(feature = "sqlite")]
pub use sqlite::SqliteStore;

/// Key of the serialized snapshot blob.
pub const SNAPSHOT_KEY: &str = "nexus_stock_state";
/// Where an unreadable snapshot blob is copied before the demo data replaces it.
pub const CORRUPT_SNAPSHOT_KEY: &str = "nexus_stock_state.corrupt";
/// Key of the "signed in" flag, stored apart from the snapshot.
pub const AUTH_KEY: &str = "nexus_auth";

#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("storage io failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("stored value could not be (de)serialized: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("storage backend failed: {0}")]
    Backend(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Raw key-value access implemented by each backend.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError>;

    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError>;
}

impl<T> KeyValueStore for Box<T>
where
    T: KeyValueStore + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, PersistenceError> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &str) -> Result<(), PersistenceError> {
        (**self).put(key, value)
    }
}

/// Snapshot-level storage operations.
pub trait SnapshotStore: Send + Sync {
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), PersistenceError>;

    /// `Ok(None)` when nothing has been saved yet.
    fn load_snapshot(&self) -> Result<Option<Snapshot>, PersistenceError>;

    /// Copy the raw snapshot blob to [`CORRUPT_SNAPSHOT_KEY`]. Returns `false` when
    /// nothing is stored.
    fn set_aside_snapshot(&self) -> Result<bool, PersistenceError>;

    fn save_auth_flag(&self, authenticated: bool) -> Result<(), PersistenceError>;

    /// `false` when the flag has never been written.
    fn load_auth_flag(&self) -> Result<bool, PersistenceError>;
}

impl<T> SnapshotStore for T
where
    T: KeyValueStore + ?Sized,
{
    fn save_snapshot(&self, snapshot: &Snapshot) -> Result<(), PersistenceError> {
        let blob = serde_json::to_string(snapshot)?;
        self.put(SNAPSHOT_KEY, &blob)
    }

    fn load_snapshot(&self) -> Result<Option<Snapshot>, PersistenceError> {
        match self.get(SNAPSHOT_KEY)? {
            Some(blob) => Ok(Some(serde_json::from_str(&blob)?)),
            None => Ok(None),
        }
    }

    fn set_aside_snapshot(&self) -> Result<bool, PersistenceError> {
        match self.get(SNAPSHOT_KEY)? {
            Some(blob) => {
                self.put(CORRUPT_SNAPSHOT_KEY, &blob)?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    fn save_auth_flag(&self, authenticated: bool) -> Result<(), PersistenceError> {
        self.put(AUTH_KEY, if authenticated { "true" } else { "false" })
    }

    fn load_auth_flag(&self) -> Result<bool, PersistenceError> {
        Ok(self.get(AUTH_KEY)?.is_some_and(|v| v.trim() == "true"))
    }
}

/// Stored snapshot, or the seeded demo snapshot when nothing usable is stored.
///
/// A blob that does not decode is copied to [`CORRUPT_SNAPSHOT_KEY`] first, so the next
/// save of the demo data does not destroy it.
pub fn load_or_default<S>(store: &S, now: DateTime<Utc>) -> Snapshot
where
    S: SnapshotStore + ?Sized,
{
    match store.load_snapshot() {
        Ok(Some(snapshot)) => snapshot,
        Ok(None) => {
            tracing::info!("no stored snapshot, starting from demo data");
            Snapshot::seeded(now)
        }
        Err(err @ PersistenceError::Serialization(_)) => {
            match store.set_aside_snapshot() {
                Ok(_) => tracing::warn!(
                    error = %err,
                    key = CORRUPT_SNAPSHOT_KEY,
                    "stored snapshot unreadable, kept a copy and starting from demo data"
                ),
                Err(copy_err) => tracing::error!(
                    error = %err,
                    copy_error = %copy_err,
                    "stored snapshot unreadable and could not be set aside, starting from demo data"
                ),
            }
            Snapshot::seeded(now)
        }
        Err(err) => {
            tracing::warn!(error = %err, "stored snapshot unavailable, starting from demo data");
            Snapshot::seeded(now)
        }
    }
}
