//! OpenAI Images API generation backend
//!
//! Posts the user photo and reference images with a prompt to the images
//! edits endpoint and returns the decoded image bytes from the response.

use super::{GenerationBackend, GenerationRequest, SourceImage};
use crate::error::{PosterError, Result};
use async_trait::async_trait;
use base64::engine::general_purpose;
use base64::Engine;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Default images edits endpoint
pub const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/images/edits";

/// Default image model
pub const DEFAULT_MODEL: &str = "gpt-image-1";

/// Generation backend talking to the OpenAI Images API
pub struct OpenAiBackend {
    client: reqwest::Client,
    api_key: String,
    model: String,
    endpoint: String,
}

#[derive(Deserialize, Debug)]
struct ImagesEditResponse {
    data: Vec<ImageData>,
}

#[derive(Deserialize, Debug)]
struct ImageData {
    #[serde(default)]
    b64_json: Option<String>,
    #[serde(default)]
    url: Option<String>,
}

/// Decoded image payload variants the API may return
#[derive(Debug)]
enum ImagePayload {
    Bytes(Vec<u8>),
    Url(String),
}

impl OpenAiBackend {
    /// Create a backend with the default model and endpoint
    ///
    /// # Errors
    /// - HTTP client construction failures
    pub fn new<S: Into<String>>(api_key: S) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(120))
            .connect_timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| PosterError::generation(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            model: DEFAULT_MODEL.to_string(),
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Override the image model
    #[must_use]
    pub fn with_model<S: Into<String>>(mut self, model: S) -> Self {
        self.model = model.into();
        self
    }

    /// Override the API endpoint (tests point this at a local server)
    #[must_use]
    pub fn with_endpoint<S: Into<String>>(mut self, endpoint: S) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    fn mime_for(file_name: &str) -> &'static str {
        let extension = file_name.rsplit('.').next().unwrap_or("").to_lowercase();
        match extension.as_str() {
            "jpg" | "jpeg" => "image/jpeg",
            _ => "image/png",
        }
    }

    fn image_part(image: &SourceImage) -> Result<reqwest::multipart::Part> {
        reqwest::multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(Self::mime_for(&image.file_name))
            .map_err(|e| {
                PosterError::generation(format!(
                    "Failed to build upload part for '{}': {}",
                    image.file_name, e
                ))
            })
    }

    /// Pull the first usable payload out of a successful response
    fn first_payload(response: ImagesEditResponse) -> Result<ImagePayload> {
        let first = response
            .data
            .into_iter()
            .next()
            .ok_or_else(|| PosterError::generation("Images API returned no image data"))?;

        if let Some(b64) = first.b64_json {
            let bytes = general_purpose::STANDARD.decode(b64).map_err(|e| {
                PosterError::generation(format!("Failed to base64-decode image payload: {}", e))
            })?;
            Ok(ImagePayload::Bytes(bytes))
        } else if let Some(url) = first.url {
            Ok(ImagePayload::Url(url))
        } else {
            Err(PosterError::generation(
                "Images API response missing both b64_json and url",
            ))
        }
    }
}

#[async_trait]
impl GenerationBackend for OpenAiBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<u8>> {
        if request.images.is_empty() {
            return Err(PosterError::invalid_config(
                "the images edits endpoint requires at least one source image",
            ));
        }

        info!(
            model = %self.model,
            size = %request.size,
            image_count = request.images.len(),
            "submitting generation request"
        );

        let mut form = reqwest::multipart::Form::new()
            .text("model", self.model.clone())
            .text("prompt", request.prompt.clone())
            .text("size", request.size.clone());
        for image in &request.images {
            form = form.part("image[]", Self::image_part(image)?);
        }

        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| PosterError::generation(format!("Images API request failed: {}", e)))?;

        let status = response.status();
        let bytes = response
            .bytes()
            .await
            .map_err(|e| PosterError::generation(format!("Failed reading Images API body: {}", e)))?;

        if !status.is_success() {
            return Err(PosterError::generation(format!(
                "Images API error {}: {}",
                status,
                String::from_utf8_lossy(&bytes)
            )));
        }

        let parsed: ImagesEditResponse = serde_json::from_slice(&bytes).map_err(|e| {
            PosterError::generation(format!("Failed to parse Images API response: {}", e))
        })?;

        match Self::first_payload(parsed)? {
            ImagePayload::Bytes(image_bytes) => {
                debug!(byte_count = image_bytes.len(), "decoded base64 image payload");
                Ok(image_bytes)
            },
            ImagePayload::Url(url) => {
                debug!(%url, "fetching image payload from url");
                let fetched = self
                    .client
                    .get(&url)
                    .send()
                    .await
                    .map_err(|e| {
                        PosterError::generation(format!("Failed to download generated image: {}", e))
                    })?
                    .bytes()
                    .await
                    .map_err(|e| {
                        PosterError::generation(format!("Failed to read downloaded image: {}", e))
                    })?;
                Ok(fetched.to_vec())
            },
        }
    }

    fn name(&self) -> &'static str {
        "openai"
    }
}
