//! Image hosting boundary.
//!
//! Product images are not stored here: uploads are proxied to a third-party
//! image host, and only the resulting public URL enters the catalog. The
//! trait keeps the endpoint testable against a stub host.

mod imgur;

use std::fmt;

use async_trait::async_trait;

pub use imgur::{ImgurHost, IMGUR_UPLOAD_URL};

/// A third-party host that turns an uploaded binary into a public URL.
#[async_trait]
pub trait ImageHost: Send + Sync {
    /// Upload one image, returning its public URL.
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageHostError>;
}

/// Error type for image-host operations.
#[derive(Debug, Clone)]
pub enum ImageHostError {
    /// The request never completed (DNS, connect, timeout).
    Request(String),
    /// The host answered with a non-success status.
    Rejected { status: u16, body: String },
    /// The host answered success but the payload held no usable link.
    MalformedResponse(String),
}

impl fmt::Display for ImageHostError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageHostError::Request(msg) => write!(f, "image host unreachable: {}", msg),
            ImageHostError::Rejected { status, body } => {
                write!(f, "image host rejected upload ({}): {}", status, body)
            }
            ImageHostError::MalformedResponse(msg) => {
                write!(f, "image host response unusable: {}", msg)
            }
        }
    }
}

impl std::error::Error for ImageHostError {}
