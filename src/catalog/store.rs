//! ProductStore - the canonical product collection.

use std::sync::Arc;

use serde_json::Value;
use uuid::Uuid;

use super::{decode_or_empty, now_millis, Product, ProductPatch};
use crate::kv::{KeyValueStore, KvError};

/// KV key the serialized collection lives under.
pub const PRODUCTS_KEY: &str = "products";

/// Result of an upsert: the stored record, plus the record it replaced
/// (None when the upsert created a new product). The pair is what the
/// audit trail diffs.
#[derive(Debug, Clone)]
pub struct UpsertOutcome {
    pub product: Product,
    pub previous: Option<Product>,
}

impl UpsertOutcome {
    /// True when the upsert inserted rather than merged.
    pub fn created(&self) -> bool {
        self.previous.is_none()
    }
}

/// Owner of the canonical product collection.
///
/// Every operation is a full read-modify-write of the serialized value.
/// There is no cross-request coordination: two concurrent mutations race and
/// the last write wins (the backing store offers no compare-and-swap).
#[derive(Clone)]
pub struct ProductStore {
    kv: Arc<dyn KeyValueStore>,
    key: String,
}

impl ProductStore {
    pub fn new(kv: Arc<dyn KeyValueStore>) -> Self {
        Self::with_key(kv, PRODUCTS_KEY)
    }

    pub fn with_key(kv: Arc<dyn KeyValueStore>, key: impl Into<String>) -> Self {
        Self {
            kv,
            key: key.into(),
        }
    }

    /// The stored collection. Fail-open: read failures, an absent key, and
    /// malformed content all yield an empty collection, never an error.
    pub fn list(&self) -> Vec<Product> {
        decode_or_empty(self.kv.get(&self.key), &self.key)
    }

    /// Insert-or-merge keyed by `patch.id`.
    ///
    /// A matching id merges the patch over the stored record (patch fields
    /// win, id preserved, `modified` refreshed). Otherwise a new record is
    /// appended, generating an id when the patch carries none. The collection
    /// is persisted before returning.
    pub fn upsert(&self, patch: ProductPatch) -> Result<UpsertOutcome, KvError> {
        let mut products = self.list();
        let now = now_millis();

        let existing = patch
            .id
            .as_deref()
            .and_then(|id| products.iter().position(|p| p.id == id));

        let outcome = match existing {
            Some(idx) => {
                let previous = products[idx].clone();
                let merged = previous.updated(patch, now);
                products[idx] = merged.clone();
                UpsertOutcome {
                    product: merged,
                    previous: Some(previous),
                }
            }
            None => {
                let id = patch.id.clone().unwrap_or_else(generate_id);
                let product = Product::created(patch, id, now);
                products.push(product.clone());
                UpsertOutcome {
                    product,
                    previous: None,
                }
            }
        };

        self.persist(&products)?;
        Ok(outcome)
    }

    /// Remove the record with the given id, returning it when one existed.
    /// Removing an absent id is a no-op that still persists (and succeeds).
    pub fn remove(&self, id: &str) -> Result<Option<Product>, KvError> {
        let mut products = self.list();
        let removed = products
            .iter()
            .position(|p| p.id == id)
            .map(|idx| products.remove(idx));
        self.persist(&products)?;
        Ok(removed)
    }

    /// Overwrite the whole collection with raw values. Validation is limited
    /// to "is a sequence" — the type signature enforces it; item shapes are
    /// the client's responsibility.
    pub fn replace_all(&self, values: Vec<Value>) -> Result<(), KvError> {
        let body = serde_json::to_string(&values).map_err(|e| KvError::Serde(e.to_string()))?;
        self.kv.put(&self.key, body)
    }

    /// Wipe the collection.
    pub fn clear(&self) -> Result<(), KvError> {
        self.replace_all(Vec::new())
    }

    fn persist(&self, products: &[Product]) -> Result<(), KvError> {
        let body = serde_json::to_string(products).map_err(|e| KvError::Serde(e.to_string()))?;
        self.kv.put(&self.key, body)
    }
}

fn generate_id() -> String {
    Uuid::new_v4().to_string()
}
