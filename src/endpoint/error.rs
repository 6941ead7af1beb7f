//! Error taxonomy for the HTTP surface.

use std::error::Error;
use std::fmt;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::images::ImageHostError;
use crate::kv::KvError;

/// Error type for request handling.
#[derive(Debug)]
pub enum ApiError {
    /// Missing or incorrect bearer credential on a privileged operation.
    Unauthorized,
    /// Missing required identifier, unusable body, or missing upload payload.
    BadRequest(String),
    /// Unrecognized method/path combination.
    NotFound,
    /// KV store write failed mid-mutation.
    Store(KvError),
    /// The image host failed or answered nonsense.
    Upload(ImageHostError),
}

impl ApiError {
    /// Map this error to an HTTP status code.
    pub fn status_code(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::Upload(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Unauthorized => write!(f, "unauthorized"),
            ApiError::BadRequest(msg) => write!(f, "bad request: {}", msg),
            ApiError::NotFound => write!(f, "not found"),
            ApiError::Store(e) => write!(f, "store error: {}", e),
            ApiError::Upload(e) => write!(f, "upload failed: {}", e),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            ApiError::Store(e) => Some(e),
            ApiError::Upload(e) => Some(e),
            _ => None,
        }
    }
}

impl From<KvError> for ApiError {
    fn from(err: KvError) -> Self {
        ApiError::Store(err)
    }
}

impl From<ImageHostError> for ApiError {
    fn from(err: ImageHostError) -> Self {
        ApiError::Upload(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = json!({ "error": self.to_string() });
        (self.status_code(), Json(body)).into_response()
    }
}
