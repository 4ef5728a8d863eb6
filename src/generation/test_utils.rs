//! Test utilities and mock backends for testing generation functionality
//!
//! Provides a mock implementation of the `GenerationBackend` trait so the
//! pipeline can be exercised without network access or API credentials.

use super::{GenerationBackend, GenerationRequest};
use crate::error::{PosterError, Result};
use async_trait::async_trait;
use image::{Rgba, RgbaImage};
use std::sync::{Arc, Mutex};

/// Mock generation backend for testing
#[derive(Debug, Clone)]
pub struct MockGenerationBackend {
    /// Encoded image bytes returned by `generate`
    response_bytes: Vec<u8>,
    /// Prompts received, for verification in tests
    received_prompts: Arc<Mutex<Vec<String>>>,
    /// Whether to simulate a generation failure
    should_fail: bool,
}

impl MockGenerationBackend {
    /// Create a mock returning the given encoded image bytes
    #[must_use]
    pub fn new(response_bytes: Vec<u8>) -> Self {
        Self {
            response_bytes,
            received_prompts: Arc::new(Mutex::new(Vec::new())),
            should_fail: false,
        }
    }

    /// Create a mock returning a synthetic blue-backdrop portrait PNG with a
    /// red square "subject" in the middle
    #[must_use]
    pub fn with_synthetic_portrait(width: u32, height: u32) -> Self {
        Self::new(synthetic_portrait_png(width, height))
    }

    /// Create a mock that fails every generation call
    #[must_use]
    pub fn new_failing() -> Self {
        Self {
            response_bytes: Vec::new(),
            received_prompts: Arc::new(Mutex::new(Vec::new())),
            should_fail: true,
        }
    }

    /// Prompts received so far, for verification in tests
    pub fn received_prompts(&self) -> Vec<String> {
        self.received_prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl GenerationBackend for MockGenerationBackend {
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<u8>> {
        if let Ok(mut prompts) = self.received_prompts.lock() {
            prompts.push(request.prompt.clone());
        }

        if self.should_fail {
            return Err(PosterError::generation("mock backend configured to fail"));
        }

        Ok(self.response_bytes.clone())
    }

    fn name(&self) -> &'static str {
        "mock"
    }
}

/// Encode a synthetic portrait: solid blue backdrop, centered red square.
#[must_use]
pub fn synthetic_portrait_png(width: u32, height: u32) -> Vec<u8> {
    let mut image = RgbaImage::from_pixel(width, height, Rgba([0, 0, 255, 255]));
    let (cx, cy) = (width / 2, height / 2);
    let half = (width.min(height) / 8).max(1);
    for y in cy.saturating_sub(half)..(cy + half).min(height) {
        for x in cx.saturating_sub(half)..(cx + half).min(width) {
            image.put_pixel(x, y, Rgba([255, 0, 0, 255]));
        }
    }

    let mut buffer = Vec::new();
    let mut cursor = std::io::Cursor::new(&mut buffer);
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .expect("encoding a synthetic fixture image cannot fail");
    buffer
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generation::SourceImage;

    #[tokio::test]
    async fn test_mock_returns_configured_bytes() {
        let backend = MockGenerationBackend::new(vec![7, 7, 7]);
        let request = GenerationRequest::new("portrait prompt")
            .with_image(SourceImage::new("me.png", vec![0]));

        let bytes = backend.generate(&request).await.unwrap();
        assert_eq!(bytes, vec![7, 7, 7]);
        assert_eq!(backend.received_prompts(), vec!["portrait prompt"]);
    }

    #[tokio::test]
    async fn test_failing_mock() {
        let backend = MockGenerationBackend::new_failing();
        let request = GenerationRequest::new("any");
        let err = backend.generate(&request).await.unwrap_err();
        assert!(matches!(err, PosterError::Generation(_)));
    }

    #[test]
    fn test_synthetic_portrait_decodes() {
        let bytes = synthetic_portrait_png(64, 96);
        let image = image::load_from_memory(&bytes).unwrap().to_rgba8();
        assert_eq!(image.dimensions(), (64, 96));
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 255, 255]);
        assert_eq!(image.get_pixel(32, 48).0, [255, 0, 0, 255]);
    }
}
