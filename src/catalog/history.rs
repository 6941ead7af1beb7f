//! HistoryLog - bounded audit trail of catalog mutations.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use super::{decode_or_empty, now_millis, Product};
use crate::kv::{KeyValueStore, KvError};

/// KV key the serialized audit trail lives under.
pub const HISTORY_KEY: &str = "history";

/// Maximum retained entries. Overflow drops the oldest entries first — a
/// lossy ring-buffer policy, not full auditability.
pub const HISTORY_CAP: usize = 500;

/// What a history entry records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum HistoryAction {
    Add,
    Update,
    Delete,
    ClearAll,
}

/// Product state captured alongside an entry: a before/after pair for
/// updates, the full record for adds and deletes.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Snapshot {
    Change { before: Product, after: Product },
    Record(Product),
}

/// One audit record. `id` is absent for collection-wide actions.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    pub action: HistoryAction,
    #[serde(default)]
    pub title: String,
    pub timestamp: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub snapshot: Option<Snapshot>,
}

impl HistoryEntry {
    pub fn added(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            action: HistoryAction::Add,
            title: product.title.clone(),
            timestamp: now_millis(),
            snapshot: Some(Snapshot::Record(product.clone())),
        }
    }

    pub fn updated(before: &Product, after: &Product) -> Self {
        Self {
            id: Some(after.id.clone()),
            action: HistoryAction::Update,
            title: after.title.clone(),
            timestamp: now_millis(),
            snapshot: Some(Snapshot::Change {
                before: before.clone(),
                after: after.clone(),
            }),
        }
    }

    pub fn deleted(product: &Product) -> Self {
        Self {
            id: Some(product.id.clone()),
            action: HistoryAction::Delete,
            title: product.title.clone(),
            timestamp: now_millis(),
            snapshot: Some(Snapshot::Record(product.clone())),
        }
    }

    pub fn cleared() -> Self {
        Self {
            id: None,
            action: HistoryAction::ClearAll,
            title: String::new(),
            timestamp: now_millis(),
            snapshot: None,
        }
    }
}

/// Append-only mutation log with capacity-driven truncation. Callers can
/// append and list; nothing else — no deletion, no redaction.
#[derive(Clone)]
pub struct HistoryLog {
    kv: Arc<dyn KeyValueStore>,
    key: String,
    cap: usize,
}

impl HistoryLog {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, HISTORY_KEY, HISTORY_CAP)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>, cap: usize) -> Self {
        Self {
            kv,
            key: key.into(),
            cap,
        }
    }

    /// Append one entry, truncating to the newest `cap` entries.
    pub fn append(&self, entry: HistoryEntry) -> Result<(), KvError> {
        let mut entries = self.list();
        entries.push(entry);
        if entries.len() > self.cap {
            let excess = entries.len() - self.cap;
            entries.drain(..excess);
        }
        let body = serde_json::to_string(&entries).map_err(|e| KvError::Serde(e.to_string()))?;
        self.kv.put(&self.key, body)
    }

    /// The stored trail, oldest first. Fail-open like the product list.
    pub fn list(&self) -> Vec<HistoryEntry> {
        decode_or_empty(self.kv.get(&self.key), &self.key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(id: &str, title: &str) -> Product {
        Product {
            id: id.to_string(),
            title: title.to_string(),
            added: 1_000,
            ..Default::default()
        }
    }

    #[test]
    fn actions_serialize_screaming_snake() {
        let entry = HistoryEntry::cleared();
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["action"], "CLEAR_ALL");
        assert!(value.get("id").is_none());
        assert!(value.get("snapshot").is_none());
    }

    #[test]
    fn update_snapshot_is_a_before_after_pair() {
        let before = product("p1", "old");
        let after = product("p1", "new");
        let entry = HistoryEntry::updated(&before, &after);
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["action"], "UPDATE");
        assert_eq!(value["title"], "new");
        assert_eq!(value["snapshot"]["before"]["title"], "old");
        assert_eq!(value["snapshot"]["after"]["title"], "new");
    }

    #[test]
    fn add_snapshot_is_the_full_record() {
        let entry = HistoryEntry::added(&product("p1", "X"));
        let value = serde_json::to_value(&entry).unwrap();
        assert_eq!(value["snapshot"]["id"], "p1");
    }

    #[test]
    fn entries_round_trip_through_storage() {
        let before = product("p1", "old");
        let after = product("p1", "new");
        let raw =
            serde_json::to_string(&vec![HistoryEntry::updated(&before, &after)]).unwrap();
        let parsed: Vec<HistoryEntry> = serde_json::from_str(&raw).unwrap();
        match &parsed[0].snapshot {
            Some(Snapshot::Change { before, after }) => {
                assert_eq!(before.title, "old");
                assert_eq!(after.title, "new");
            }
            other => panic!("expected a before/after pair, got {:?}", other),
        }
    }
}
