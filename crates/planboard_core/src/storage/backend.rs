//! Raw key/value backends.
//!
//! # Responsibility
//! - Store opaque string payloads under string keys.
//! - Report failures as `StorageError`; never panic.
//!
//! # Invariants
//! - `set_raw` on an existing key replaces its payload (last write wins).
//! - `keys` lists every stored key, prefixed or not.

use super::{StorageError, StorageResult};
use log::debug;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::{Cell, RefCell};
use std::collections::BTreeMap;

/// Flat string store standing in for browser local storage.
///
/// Methods take `&self`; implementations use interior mutability the way a
/// `rusqlite::Connection` does.
pub trait KeyValueBackend {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>>;
    fn set_raw(&self, key: &str, payload: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
    fn keys(&self) -> StorageResult<Vec<String>>;

    /// Cheap write/remove round trip used by availability checks.
    fn check_writable(&self) -> StorageResult<()> {
        const CHECK_KEY: &str = "__storage_check__";
        self.set_raw(CHECK_KEY, CHECK_KEY)?;
        self.remove(CHECK_KEY)
    }
}

impl<B: KeyValueBackend + ?Sized> KeyValueBackend for &B {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get_raw(key)
    }

    fn set_raw(&self, key: &str, payload: &str) -> StorageResult<()> {
        (**self).set_raw(key, payload)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        (**self).keys()
    }

    fn check_writable(&self) -> StorageResult<()> {
        (**self).check_writable()
    }
}

/// SQLite-backed store over the `kv_entries` table.
pub struct SqliteKeyValueBackend {
    conn: Connection,
}

impl SqliteKeyValueBackend {
    /// Wraps a connection returned by [`crate::db::open_db`] or
    /// [`crate::db::open_db_in_memory`].
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl KeyValueBackend for SqliteKeyValueBackend {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        let payload = self
            .conn
            .query_row(
                "SELECT payload FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(payload)
    }

    fn set_raw(&self, key: &str, payload: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, payload, updated_at)
             VALUES (?1, ?2, ?3)
             ON CONFLICT(key) DO UPDATE SET
                payload = excluded.payload,
                updated_at = excluded.updated_at;",
            params![key, payload, chrono::Utc::now().timestamp_millis()],
        )?;
        debug!(
            "event=kv_write module=storage status=ok backend=sqlite bytes={}",
            payload.len()
        );
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        let mut stmt = self
            .conn
            .prepare("SELECT key FROM kv_entries ORDER BY key ASC;")?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;
        let mut keys = Vec::new();
        for key in rows {
            keys.push(key?);
        }
        Ok(keys)
    }

    fn check_writable(&self) -> StorageResult<()> {
        self.conn
            .query_row("SELECT 1;", [], |row| row.get::<_, i64>(0))?;
        Ok(())
    }
}

/// In-memory store for tests and ephemeral sessions.
///
/// An optional byte quota (sum of key and payload lengths) emulates a full
/// browser store; `set_available(false)` emulates a disabled one.
#[derive(Debug)]
pub struct MemoryKeyValueBackend {
    entries: RefCell<BTreeMap<String, String>>,
    quota_bytes: Option<usize>,
    available: Cell<bool>,
}

impl MemoryKeyValueBackend {
    pub fn new() -> Self {
        Self {
            entries: RefCell::new(BTreeMap::new()),
            quota_bytes: None,
            available: Cell::new(true),
        }
    }

    pub fn with_quota(quota_bytes: usize) -> Self {
        Self {
            quota_bytes: Some(quota_bytes),
            ..Self::new()
        }
    }

    pub fn set_available(&self, available: bool) {
        self.available.set(available);
    }

    pub fn used_bytes(&self) -> usize {
        self.entries
            .borrow()
            .iter()
            .map(|(key, payload)| key.len() + payload.len())
            .sum()
    }

    fn ensure_available(&self) -> StorageResult<()> {
        if self.available.get() {
            Ok(())
        } else {
            Err(StorageError::Unavailable)
        }
    }
}

impl Default for MemoryKeyValueBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueBackend for MemoryKeyValueBackend {
    fn get_raw(&self, key: &str) -> StorageResult<Option<String>> {
        self.ensure_available()?;
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set_raw(&self, key: &str, payload: &str) -> StorageResult<()> {
        self.ensure_available()?;
        if let Some(quota) = self.quota_bytes {
            let replaced = self
                .entries
                .borrow()
                .get(key)
                .map_or(0, |old| key.len() + old.len());
            let projected = self.used_bytes() - replaced + key.len() + payload.len();
            if projected > quota {
                return Err(StorageError::QuotaExceeded {
                    needed: projected,
                    quota,
                });
            }
        }
        self.entries
            .borrow_mut()
            .insert(key.to_string(), payload.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.ensure_available()?;
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn keys(&self) -> StorageResult<Vec<String>> {
        self.ensure_available()?;
        Ok(self.entries.borrow().keys().cloned().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueBackend, MemoryKeyValueBackend, SqliteKeyValueBackend};
    use crate::db::open_db_in_memory;
    use crate::storage::StorageError;

    #[test]
    fn sqlite_backend_upserts_and_lists_keys() {
        let backend = SqliteKeyValueBackend::new(open_db_in_memory().unwrap());
        backend.set_raw("b", "1").unwrap();
        backend.set_raw("a", "2").unwrap();
        backend.set_raw("b", "3").unwrap();

        assert_eq!(backend.get_raw("b").unwrap().as_deref(), Some("3"));
        assert_eq!(backend.keys().unwrap(), vec!["a", "b"]);

        backend.remove("a").unwrap();
        assert_eq!(backend.get_raw("a").unwrap(), None);
        assert!(backend.check_writable().is_ok());
    }

    #[test]
    fn memory_quota_rejects_oversized_writes_but_allows_replacement() {
        let backend = MemoryKeyValueBackend::with_quota(10);
        backend.set_raw("k", "12345").unwrap();
        backend.set_raw("k", "123456789").unwrap();

        let err = backend.set_raw("other", "xxxxxx").unwrap_err();
        assert!(matches!(err, StorageError::QuotaExceeded { quota: 10, .. }));
        assert_eq!(backend.get_raw("other").unwrap(), None);
    }

    #[test]
    fn disabled_memory_backend_reports_unavailable() {
        let backend = MemoryKeyValueBackend::new();
        backend.set_available(false);
        assert!(matches!(backend.check_writable(), Err(StorageError::Unavailable)));
        assert!(matches!(backend.get_raw("x"), Err(StorageError::Unavailable)));
    }
}
