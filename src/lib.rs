pub mod catalog;
pub mod config;
pub mod endpoint;
pub mod images;
pub mod kv;

pub use catalog::{
    HistoryAction, HistoryEntry, HistoryLog, Product, ProductPatch, ProductStore, Snapshot,
    UpsertOutcome, HISTORY_CAP, HISTORY_KEY, MAX_IMAGES, PRICE_ON_REQUEST, PRODUCTS_KEY,
    SPEC_LABELS, TAGS,
};
pub use config::Config;
pub use endpoint::{router, serve, ApiError, AppState};
pub use images::{ImageHost, ImageHostError, ImgurHost};
pub use kv::{FileKv, InMemoryKv, KeyValueStore, KvError};
