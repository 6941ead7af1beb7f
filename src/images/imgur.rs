//! ImgurHost - anonymous uploads via the Imgur v3 API.

use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;

use super::{ImageHost, ImageHostError};

/// Production upload endpoint.
pub const IMGUR_UPLOAD_URL: &str = "https://api.imgur.com/3/image";

/// Imgur-backed image host. Authenticates with a `Client-ID` credential and
/// sends the image as a base64 form field; the public URL comes back as
/// `data.link` in the response.
pub struct ImgurHost {
    client: reqwest::Client,
    client_id: String,
    endpoint: String,
}

impl ImgurHost {
    pub fn new(client_id: impl Into<String>) -> Self {
        Self::with_endpoint(client_id, IMGUR_UPLOAD_URL)
    }

    /// Point uploads at a different endpoint. Tests use this to target a
    /// local stub server.
    pub fn with_endpoint(client_id: impl Into<String>, endpoint: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            client_id: client_id.into(),
            endpoint: endpoint.into(),
        }
    }
}

#[async_trait]
impl ImageHost for ImgurHost {
    async fn upload(&self, bytes: Vec<u8>, filename: &str) -> Result<String, ImageHostError> {
        let form = reqwest::multipart::Form::new()
            .text("type", "base64")
            .text("name", filename.to_string())
            .text("image", BASE64.encode(&bytes));

        let response = self
            .client
            .post(&self.endpoint)
            .header("Authorization", format!("Client-ID {}", self.client_id))
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::Request(e.to_string()))?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| ImageHostError::Request(e.to_string()))?;

        if !status.is_success() {
            return Err(ImageHostError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        let payload: serde_json::Value = serde_json::from_str(&body)
            .map_err(|e| ImageHostError::MalformedResponse(e.to_string()))?;
        payload
            .get("data")
            .and_then(|data| data.get("link"))
            .and_then(|link| link.as_str())
            .map(str::to_string)
            .ok_or_else(|| {
                ImageHostError::MalformedResponse("no data.link in upload response".into())
            })
    }
}
