//! Key-value storage boundary.
//!
//! The worker persists everything through a durable string-keyed store with
//! plain `get`/`put` semantics — no transactions, no compare-and-swap. The
//! hosting platform provides the real store; this module defines the trait
//! and ships two implementations:
//!
//! - [`InMemoryKv`] — `HashMap` behind a lock, for tests and development.
//! - [`FileKv`] — one file per key under a data directory.

mod file;
mod in_memory;

use std::fmt;

pub use file::FileKv;
pub use in_memory::InMemoryKv;

/// Durable string-keyed storage.
///
/// `get` returns `None` for an absent key. `put` overwrites unconditionally —
/// last write wins, with no protection against concurrent writers.
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`, if any.
    fn get(&self, key: &str) -> Result<Option<String>, KvError>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: String) -> Result<(), KvError>;
}

/// Error type for key-value store operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KvError {
    /// Storage-level failure (I/O, poisoned lock).
    Storage(String),
    /// Value could not be serialized for storage.
    Serde(String),
}

impl fmt::Display for KvError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KvError::Storage(msg) => write!(f, "kv storage error: {}", msg),
            KvError::Serde(msg) => write!(f, "kv serialization error: {}", msg),
        }
    }
}

impl std::error::Error for KvError {}
