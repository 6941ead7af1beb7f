//! Request handlers — dispatch by method, path, and query.

use std::collections::HashMap;
use std::sync::Arc;

use axum::body::Bytes;
use axum::extract::{Multipart, Query, State};
use axum::http::{header, HeaderMap};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::{json, Value};

use super::error::ApiError;
use super::AppState;
use crate::catalog::{HistoryEntry, ProductPatch};

/// `GET /` — public catalog read; `GET /?history=true` — audit read.
///
/// The catalog read never fails: any storage trouble degrades to an empty
/// collection. The history read is privileged.
pub(super) async fn root_get(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Response, ApiError> {
    if params.get("history").map(String::as_str) == Some("true") {
        require_bearer(&state, &headers)?;
        return Ok(Json(state.history.list()).into_response());
    }
    Ok(Json(json!({ "products": state.store.list() })).into_response())
}

/// `POST /` — privileged mutation, dispatched on body shape:
/// `{"clear":true}` wipes, `{"products":[...]}` replaces wholesale,
/// anything else upserts one product (`?id=` may select the target).
///
/// A missing or non-JSON body is treated as an empty object.
pub(super) async fn root_post(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&state, &headers)?;
    let body: Value = serde_json::from_slice(&body).unwrap_or_else(|_| json!({}));

    if body.get("clear").and_then(Value::as_bool) == Some(true) {
        state.store.clear()?;
        log_history(&state, HistoryEntry::cleared());
        tracing::info!("catalog cleared");
        return Ok(Json(json!({ "success": true })));
    }

    if let Some(products) = body.get("products") {
        let products: Vec<Value> = serde_json::from_value(products.clone())
            .map_err(|_| ApiError::BadRequest("products must be an array".into()))?;
        let count = products.len();
        state.store.replace_all(products)?;
        tracing::info!(count, "catalog replaced");
        return Ok(Json(json!({ "success": true, "count": count })));
    }

    let mut patch: ProductPatch = serde_json::from_value(body)
        .map_err(|e| ApiError::BadRequest(format!("unusable product body: {}", e)))?;
    if patch.id.is_none() {
        patch.id = params.get("id").cloned();
    }
    let outcome = state.store.upsert(patch)?;
    let entry = match &outcome.previous {
        Some(before) => HistoryEntry::updated(before, &outcome.product),
        None => HistoryEntry::added(&outcome.product),
    };
    log_history(&state, entry);
    tracing::info!(
        id = %outcome.product.id,
        created = outcome.created(),
        "product upserted"
    );
    Ok(Json(json!({ "success": true, "product": outcome.product })))
}

/// `DELETE /?id=<id>` — privileged removal. Idempotent: an absent id still
/// succeeds, reporting `removed: false`.
pub(super) async fn root_delete(
    State(state): State<Arc<AppState>>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&state, &headers)?;
    let id = params
        .get("id")
        .filter(|id| !id.is_empty())
        .ok_or_else(|| ApiError::BadRequest("missing id".into()))?;

    match state.store.remove(id)? {
        Some(product) => {
            log_history(&state, HistoryEntry::deleted(&product));
            tracing::info!(id = %product.id, "product deleted");
            Ok(Json(json!({ "success": true, "removed": true })))
        }
        None => Ok(Json(json!({ "success": true, "removed": false }))),
    }
}

/// `POST /upload` — privileged image-upload proxy. Reads the multipart field
/// named `image`, forwards it to the image host, answers `{"link": url}`.
/// Never touches the product store.
pub(super) async fn upload(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> Result<Json<Value>, ApiError> {
    require_bearer(&state, &headers)?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("unreadable multipart body: {}", e)))?
    {
        if field.name() != Some("image") {
            continue;
        }
        let filename = field.file_name().unwrap_or("image").to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::BadRequest(format!("unreadable image field: {}", e)))?;
        if bytes.is_empty() {
            return Err(ApiError::BadRequest("empty image payload".into()));
        }
        let link = state.images.upload(bytes.to_vec(), &filename).await?;
        tracing::info!(%link, "image uploaded");
        return Ok(Json(json!({ "link": link })));
    }

    Err(ApiError::BadRequest("missing image field".into()))
}

/// Anything not matched above.
pub(super) async fn not_found() -> ApiError {
    ApiError::NotFound
}

/// Auth gate for privileged operations. Runs before any store access. A
/// deployment without a configured token runs open.
fn require_bearer(state: &AppState, headers: &HeaderMap) -> Result<(), ApiError> {
    let Some(expected) = state.config.admin_token.as_deref() else {
        return Ok(());
    };
    let presented = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "));
    match presented {
        Some(token) if token == expected => Ok(()),
        _ => {
            tracing::warn!("privileged request rejected: missing or wrong bearer token");
            Err(ApiError::Unauthorized)
        }
    }
}

/// Record a mutation in the audit trail. The mutation itself has already
/// persisted, so a failed append is logged and swallowed rather than turning
/// a committed write into an error response.
fn log_history(state: &AppState, entry: HistoryEntry) {
    if !state.config.history_enabled {
        return;
    }
    if let Err(e) = state.history.append(entry) {
        tracing::error!(error = %e, "history append failed");
    }
}
