//! HTTP surface — maps requests onto the product store, history log, and
//! image host. Uses axum for routing.
//!
//! ## Routes
//!
//! - `OPTIONS *` — CORS preflight, 204, handled before routing.
//! - `GET /` — public catalog read; `GET /?history=true` — token-gated
//!   audit read.
//! - `POST /` — token-gated mutation: `{"clear":true}` wipes the collection,
//!   `{"products":[...]}` replaces it, anything else upserts one product.
//! - `POST /upload` — token-gated image-upload proxy, multipart field `image`.
//! - `DELETE /?id=<id>` — token-gated removal.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use catalog_worker::{endpoint, AppState, Config, HistoryLog, ImgurHost, InMemoryKv, ProductStore};
//!
//! let kv: Arc<dyn KeyValueStore> = Arc::new(InMemoryKv::new());
//! let state = Arc::new(AppState::new(
//!     ProductStore::new(kv.clone()),
//!     HistoryLog::new(kv),
//!     Arc::new(ImgurHost::new("client-id")),
//!     Config::default(),
//! ));
//!
//! // Get the router to compose with other axum routes
//! let app = endpoint::router(state.clone());
//!
//! // Or serve directly
//! endpoint::serve(state, "0.0.0.0:8787").await?;
//! ```

mod cors;
mod error;
mod handlers;

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};

use crate::catalog::{HistoryLog, ProductStore};
use crate::config::Config;
use crate::images::ImageHost;

pub use error::ApiError;

/// Everything a request handler needs, passed through axum state. Explicit
/// application state; no module-level globals.
pub struct AppState {
    pub store: ProductStore,
    pub history: HistoryLog,
    pub images: Arc<dyn ImageHost>,
    pub config: Config,
}

impl AppState {
    pub fn new(
        store: ProductStore,
        history: HistoryLog,
        images: Arc<dyn ImageHost>,
        config: Config,
    ) -> Self {
        Self {
            store,
            history,
            images,
            config,
        }
    }
}

/// Build the axum `Router` for the worker.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route(
            "/",
            get(handlers::root_get)
                .post(handlers::root_post)
                .delete(handlers::root_delete),
        )
        .route("/upload", post(handlers::upload))
        .fallback(handlers::not_found)
        .layer(middleware::from_fn_with_state(state.clone(), cors::apply))
        .with_state(state)
}

/// Serve the worker over HTTP at the given address (e.g. `"0.0.0.0:8787"`).
pub async fn serve(state: Arc<AppState>, addr: &str) -> Result<(), std::io::Error> {
    let app = router(state);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!(addr = %listener.local_addr()?, "catalog worker listening");
    axum::serve(listener, app).await
}
