//! Catalog domain - product records, their merge semantics, and persistence.
//!
//! The whole collection lives as one serialized JSON array under a fixed key
//! in the [`KeyValueStore`](crate::kv::KeyValueStore); every mutation is a
//! read-modify-write of that value. A bounded audit trail of mutations lives
//! alongside it under its own key.

mod history;
mod store;

use std::collections::BTreeMap;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::kv::KvError;

pub use history::{HistoryAction, HistoryEntry, HistoryLog, Snapshot, HISTORY_CAP, HISTORY_KEY};
pub use store::{ProductStore, UpsertOutcome, PRODUCTS_KEY};

/// Sentinel price text meaning "price on request". A blank price is coerced
/// to this on write, matching what the storefront renders.
pub const PRICE_ON_REQUEST: &str = "Cena na upit";

/// The fixed tag vocabulary the admin UI offers. Stored tags outside this set
/// are tolerated; the set exists for clients, not for validation.
pub const TAGS: [&str; 4] = ["Novo", "Poslovni", "Gamer", "Premium"];

/// Spec-sheet checklist labels the admin UI renders by default. The specs map
/// itself is extensible beyond these.
pub const SPEC_LABELS: [&str; 13] = [
    "CPU",
    "RAM",
    "GPU",
    "Memorija",
    "Ekran",
    "Baterija",
    "OS",
    "Težina",
    "Dimenzije",
    "Portovi",
    "Bežične konekcije",
    "Kamera",
    "Audio",
];

/// Upper bound on stored image URLs per product.
pub const MAX_IMAGES: usize = 30;

/// One catalog record.
///
/// Every field is defaulted so loosely shaped stored data (older records,
/// bulk imports) still loads. `added`/`modified` are millisecond timestamps.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Product {
    pub id: String,
    pub title: String,
    pub short_desc: String,
    pub description: String,
    pub price: String,
    pub tag: String,
    pub specs: BTreeMap<String, String>,
    pub images: Vec<String>,
    pub added: u64,
    pub modified: Option<u64>,
}

/// Partial product as sent by the admin client.
///
/// `None` fields leave the stored value untouched; present fields win on
/// conflict. The merge is shallow: a present `specs` or `images` replaces the
/// stored one wholesale.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct ProductPatch {
    pub id: Option<String>,
    pub title: Option<String>,
    pub short_desc: Option<String>,
    pub description: Option<String>,
    pub price: Option<String>,
    pub tag: Option<String>,
    pub specs: Option<BTreeMap<String, String>>,
    pub images: Option<Vec<String>>,
}

impl Product {
    /// Build a brand-new record from a patch. `added` is stamped now,
    /// `modified` stays unset until the first update.
    pub(crate) fn created(patch: ProductPatch, id: String, now: u64) -> Product {
        Product {
            id,
            title: patch.title.unwrap_or_default(),
            short_desc: patch.short_desc.unwrap_or_default(),
            description: patch.description.unwrap_or_default(),
            price: normalize_price(patch.price.unwrap_or_default()),
            tag: patch.tag.unwrap_or_default(),
            specs: patch.specs.unwrap_or_default(),
            images: cap_images(patch.images.unwrap_or_default()),
            added: now,
            modified: None,
        }
    }

    /// Merge a patch over this record. `id` and `added` are preserved;
    /// `modified` is always stamped strictly newer than the last timestamp,
    /// so back-to-back updates within one millisecond stay ordered.
    pub(crate) fn updated(&self, patch: ProductPatch, now: u64) -> Product {
        let last = self.modified.unwrap_or(self.added);
        Product {
            id: self.id.clone(),
            title: patch.title.unwrap_or_else(|| self.title.clone()),
            short_desc: patch.short_desc.unwrap_or_else(|| self.short_desc.clone()),
            description: patch
                .description
                .unwrap_or_else(|| self.description.clone()),
            price: patch
                .price
                .map(normalize_price)
                .unwrap_or_else(|| self.price.clone()),
            tag: patch.tag.unwrap_or_else(|| self.tag.clone()),
            specs: patch.specs.unwrap_or_else(|| self.specs.clone()),
            images: patch
                .images
                .map(cap_images)
                .unwrap_or_else(|| self.images.clone()),
            added: self.added,
            modified: Some(now.max(last + 1)),
        }
    }
}

fn normalize_price(raw: String) -> String {
    if raw.trim().is_empty() {
        PRICE_ON_REQUEST.to_string()
    } else {
        raw
    }
}

fn cap_images(mut images: Vec<String>) -> Vec<String> {
    images.truncate(MAX_IMAGES);
    images
}

/// Current wall-clock time in milliseconds since the epoch.
pub(crate) fn now_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}

/// The documented fail-open path: an absent key, a failed read, or an
/// undecodable stored value all become an empty collection. Discarded
/// content is logged, never surfaced.
pub(crate) fn decode_or_empty<T: DeserializeOwned>(
    read: Result<Option<String>, KvError>,
    key: &str,
) -> Vec<T> {
    let raw = match read {
        Ok(Some(raw)) => raw,
        Ok(None) => return Vec::new(),
        Err(e) => {
            tracing::warn!(key, error = %e, "kv read failed, serving empty collection");
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(items) => items,
        Err(e) => {
            tracing::warn!(key, error = %e, "stored value undecodable, serving empty collection");
            Vec::new()
        }
    }
}
