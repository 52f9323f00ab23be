//! Persistence layer over a flat key/value store.
//!
//! # Responsibility
//! - Wrap every value in a versioned [`envelope::Envelope`] under a
//!   namespaced key.
//! - Expose typed accessors per entity kind, cascade delete, search,
//!   notifications, settings and backup/restore.
//!
//! # Invariants
//! - Public accessors never propagate storage failures: they log the
//!   underlying [`StorageError`] and return `false`, `None` or the default.
//! - `try_*` methods expose the raw [`StorageResult`] for callers that need
//!   the cause.
//! - Every read-modify-write is one full-collection read and one write.

pub mod backend;
mod backup;
pub mod envelope;
pub mod keys;
mod manager;

pub use backend::{KeyValueBackend, MemoryKeyValueBackend, SqliteKeyValueBackend};
pub use manager::{AppStats, StorageManager, StorageUsage};

pub type StorageResult<T> = Result<T, StorageError>;

/// Backend failure behind the persistence layer.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("storage quota exceeded: {needed} bytes needed, quota is {quota}")]
    QuotaExceeded { needed: usize, quota: usize },
    #[error("storage backend is unavailable")]
    Unavailable,
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
    #[error("serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl StorageError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::Unavailable => "unavailable",
            Self::Sqlite(_) => "sqlite",
            Self::Serialization(_) => "serialization",
        }
    }
}

/// Persistence layer settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageConfig {
    /// Namespace prepended to every logical key except registered users.
    pub key_prefix: String,
    /// Written into every envelope; mismatches on read are logged.
    pub schema_version: String,
    /// Newest notifications kept.
    pub notification_cap: usize,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            key_prefix: keys::DEFAULT_PREFIX.to_string(),
            schema_version: "1.0.0".to_string(),
            notification_cap: 100,
        }
    }
}
