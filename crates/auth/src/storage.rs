//! Durable client-side key-value storage for the session.
//!
//! The session is persisted as two keys: the raw token and the privilege flag
//! (stored as its string encoding). Every write goes through to the backing
//! store before returning; nothing is cached in memory on top of it, so
//! concurrent readers always observe the latest login/logout.

use std::collections::{BTreeMap, HashMap};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use thiserror::Error;

use crate::Session;

/// Key holding the session token.
pub const TOKEN_KEY: &str = "token";

/// Key holding the privilege flag (`"true"` / `"false"`).
pub const PRIVILEGE_KEY: &str = "isAdmin";

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("storage I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("storage is corrupt: {0}")]
    Corrupt(String),

    #[error("storage lock poisoned")]
    Poisoned,
}

/// Process-wide key-value store outliving a single session.
///
/// Implementations must be safe to share: several components read the same
/// store and a login flow may write it at any time.
pub trait SessionStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError>;

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError>;

    /// Removing a missing key is not an error.
    fn remove(&self, key: &str) -> Result<(), StorageError>;

    /// Write several keys as one unit: readers see all of them or none.
    ///
    /// The default writes key by key and restores the previous values if a
    /// later write fails; backends that can do better override it.
    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut written: Vec<(&str, Option<String>)> = Vec::with_capacity(entries.len());
        for &(key, value) in entries {
            let previous = self.get(key)?;
            if let Err(err) = self.set(key, value) {
                for (key, previous) in written.into_iter().rev() {
                    let restored = match previous {
                        Some(previous) => self.set(key, &previous),
                        None => self.remove(key),
                    };
                    if let Err(restore) = restored {
                        tracing::error!(key, "failed to restore session key: {restore}");
                    }
                }
                return Err(err);
            }
            written.push((key, previous));
        }
        Ok(())
    }
}

impl<S> SessionStorage for Arc<S>
where
    S: SessionStorage + ?Sized,
{
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        (**self).remove(key)
    }

    fn set_all(&self, entries: &[(&str, &str)]) -> Result<(), StorageError> {
        (**self).set_all(entries)
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Session persistence format
// ─────────────────────────────────────────────────────────────────────────────

/// Read the persisted session; missing token means the anonymous session.
pub fn load_session(storage: &dyn SessionStorage) -> Result<Session, StorageError> {
    let Some(token) = storage.get(TOKEN_KEY)? else {
        return Ok(Session::anonymous());
    };

    let is_privileged = storage
        .get(PRIVILEGE_KEY)?
        .as_deref()
        .is_some_and(decode_flag);

    Ok(Session {
        token: Some(token),
        is_privileged,
    })
}

/// Persist an authenticated session.
///
/// Token and flag are written together; a failed write leaves the previous
/// session in place.
pub fn persist_session(storage: &dyn SessionStorage, session: &Session) -> Result<(), StorageError> {
    let Some(token) = session.token() else {
        return clear_session(storage);
    };

    storage.set_all(&[(TOKEN_KEY, token), (PRIVILEGE_KEY, encode_flag(session.is_privileged))])
}

/// Remove every session key. Idempotent.
pub fn clear_session(storage: &dyn SessionStorage) -> Result<(), StorageError> {
    storage.remove(TOKEN_KEY)?;
    storage.remove(PRIVILEGE_KEY)
}

fn encode_flag(value: bool) -> &'static str {
    if value { "true" } else { "false" }
}

fn decode_flag(raw: &str) -> bool {
    matches!(raw.trim(), "true" | "1")
}

// ─────────────────────────────────────────────────────────────────────────────
// In-memory storage
// ─────────────────────────────────────────────────────────────────────────────

/// In-memory storage.
///
/// Intended for tests and embedding; does not survive the process.
#[derive(Debug, Default)]
pub struct InMemoryStorage {
    entries: RwLock<HashMap<String, String>>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStorage for InMemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        let entries = self.entries.read().map_err(|_| StorageError::Poisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        entries.remove(key);
        Ok(())
    }

    fn set_all(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        let mut entries = self.entries.write().map_err(|_| StorageError::Poisoned)?;
        for &(key, value) in pairs {
            entries.insert(key.to_string(), value.to_string());
        }
        Ok(())
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// JSON file storage
// ─────────────────────────────────────────────────────────────────────────────

/// Storage backed by a single JSON object on disk.
///
/// The file is re-read on every `get` so that other processes (or another
/// handle in this one) see each other's writes. Writes replace the file
/// atomically via a sibling temp file.
#[derive(Debug)]
pub struct FileStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl FileStorage {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<BTreeMap<String, String>, StorageError> {
        let bytes = match fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(BTreeMap::new()),
            Err(err) => return Err(err.into()),
        };

        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(BTreeMap::new());
        }

        serde_json::from_slice(&bytes)
            .map_err(|e| StorageError::Corrupt(format!("{}: {e}", self.path.display())))
    }

    fn store(&self, entries: &BTreeMap<String, String>) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }

        let body = serde_json::to_vec_pretty(entries)
            .map_err(|e| StorageError::Corrupt(e.to_string()))?;

        let mut tmp = self.path.clone().into_os_string();
        tmp.push(".tmp");
        let tmp = PathBuf::from(tmp);

        fs::write(&tmp, body)?;
        fs::rename(&tmp, &self.path)?;
        tracing::debug!(path = %self.path.display(), "session storage written");
        Ok(())
    }

    fn update<F>(&self, mutate: F) -> Result<(), StorageError>
    where
        F: FnOnce(&mut BTreeMap<String, String>) -> bool,
    {
        let _guard = self.write_lock.lock().map_err(|_| StorageError::Poisoned)?;
        let mut entries = self.load()?;
        if mutate(&mut entries) {
            self.store(&entries)?;
        }
        Ok(())
    }
}

impl SessionStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>, StorageError> {
        Ok(self.load()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<(), StorageError> {
        self.update(|entries| {
            entries.insert(key.to_string(), value.to_string());
            true
        })
    }

    fn remove(&self, key: &str) -> Result<(), StorageError> {
        self.update(|entries| entries.remove(key).is_some())
    }

    /// One file rewrite for all pairs.
    fn set_all(&self, pairs: &[(&str, &str)]) -> Result<(), StorageError> {
        self.update(|entries| {
            for &(key, value) in pairs {
                entries.insert(key.to_string(), value.to_string());
            }
            true
        })
    }
}
