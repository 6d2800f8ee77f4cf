/// External image host client
///
/// Profile images are not stored by this service. The raw bytes are
/// forwarded to a configured image host as an unsigned multipart upload
/// and only the URL returned by the host is persisted on the user record.
///
/// The wire format follows the common unsigned-upload convention: a
/// multipart form with a `file` part and an `upload_preset` field, the
/// response a JSON object carrying the hosted image's `secure_url`.

use crate::config::ImageHostConfig;
use serde::Deserialize;

/// Error type for image host operations
#[derive(Debug, thiserror::Error)]
pub enum ImageHostError {
    /// The host rejected the upload (bad format, too large, ...)
    #[error("Image host rejected upload: {0}")]
    Rejected(String),

    /// Transport-level failure reaching the host
    #[error("Image host unreachable: {0}")]
    Transport(String),

    /// The host responded with an unexpected payload
    #[error("Malformed image host response: {0}")]
    MalformedResponse(String),
}

/// Successful upload response from the image host
#[derive(Debug, Deserialize)]
struct UploadResponse {
    /// Publicly reachable URL of the hosted image
    secure_url: String,
}

/// Client for the external image host
#[derive(Debug, Clone)]
pub struct ImageHostClient {
    http: reqwest::Client,
    config: ImageHostConfig,
}

impl ImageHostClient {
    /// Creates a new client from configuration
    pub fn new(config: ImageHostConfig) -> Self {
        Self {
            http: reqwest::Client::new(),
            config,
        }
    }

    /// Uploads image bytes and returns the hosted URL
    ///
    /// The `public_id` names the image at the host; uploads for the same
    /// user replace each other.
    ///
    /// # Errors
    ///
    /// - `ImageHostError::Rejected` on a 4xx response from the host
    /// - `ImageHostError::Transport` when the host is unreachable
    /// - `ImageHostError::MalformedResponse` when the response lacks a URL
    pub async fn upload(&self, bytes: Vec<u8>, public_id: &str) -> Result<String, ImageHostError> {
        let part = reqwest::multipart::Part::bytes(bytes).file_name(public_id.to_string());

        let form = reqwest::multipart::Form::new()
            .part("file", part)
            .text("upload_preset", self.config.upload_preset.clone())
            .text("public_id", public_id.to_string());

        let response = self
            .http
            .post(&self.config.upload_url)
            .multipart(form)
            .send()
            .await
            .map_err(|e| ImageHostError::Transport(e.to_string()))?;

        let status = response.status();
        if status.is_client_error() {
            let body = response.text().await.unwrap_or_default();
            tracing::warn!(status = %status, "Image host rejected upload");
            return Err(ImageHostError::Rejected(body));
        }
        if !status.is_success() {
            return Err(ImageHostError::Transport(format!(
                "Image host returned status {}",
                status
            )));
        }

        let upload: UploadResponse = response
            .json()
            .await
            .map_err(|e| ImageHostError::MalformedResponse(e.to_string()))?;

        Ok(upload.secure_url)
    }
}
