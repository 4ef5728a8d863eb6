//! Generation backends for the portrait stage
//!
//! The remote image-generation call is kept behind a narrow interface so the
//! chroma-key and compositing stages can be exercised fully offline.

pub mod openai;

// Test utilities for backend testing
#[cfg(test)]
pub mod test_utils;

pub use self::openai::OpenAiBackend;

use crate::error::{PosterError, Result};
use async_trait::async_trait;
use std::path::Path;

/// Default size spec for generated portraits (portrait orientation)
pub const DEFAULT_PORTRAIT_SIZE: &str = "1024x1536";

/// Default prompt for the portrait stage.
///
/// Asks for the subject in the reference sweater on a solid deep-blue
/// backdrop; the solid backdrop is what the chroma-key stage keys out.
pub const DEFAULT_PORTRAIT_PROMPT: &str = "\
Create a portrait of the person wearing the exact sweater from the reference images.
Reproduce the specific sweater texture:

- marled red thick yarn mixed with thin black yarn
- no cable braids
- regular jersey sweater
- fuzzy 1990s acrylic texture
- loose fit
- ribbed collar, cuffs, and hem in the same marled yarn

Do NOT generate a cable knit pattern.
Use the real marled pattern like the references.
Use the provided sweater reference images for accuracy.

Background:
- deep solid blue
- no text, no logos, no additional elements.

Keep the person's face realistic and sharp.
";

/// An input image forwarded to the generation service
#[derive(Debug, Clone)]
pub struct SourceImage {
    /// File name sent with the upload (drives mime detection server-side)
    pub file_name: String,

    /// Raw encoded image bytes
    pub bytes: Vec<u8>,
}

impl SourceImage {
    /// Create a source image from in-memory bytes
    #[must_use]
    pub fn new<S: Into<String>>(file_name: S, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }

    /// Read a source image from disk.
    ///
    /// # Errors
    /// - `MissingInput` when the path does not exist
    /// - File read errors
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path_ref = path.as_ref();
        if !path_ref.exists() {
            return Err(PosterError::missing_input("Source image", path_ref));
        }

        let bytes = std::fs::read(path_ref)
            .map_err(|e| PosterError::file_io_error("read source image", path_ref, &e))?;
        let file_name = path_ref
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image.png".to_string());

        Ok(Self { file_name, bytes })
    }
}

/// Request sent to a generation backend: prompt, size spec, and the ordered
/// source images (user photo first, then references)
#[derive(Debug, Clone)]
pub struct GenerationRequest {
    /// Text prompt describing the portrait to generate
    pub prompt: String,

    /// Output size spec, e.g. "1024x1536"
    pub size: String,

    /// Ordered source images forwarded to the service
    pub images: Vec<SourceImage>,
}

impl GenerationRequest {
    /// Create a request with the default size and no images
    #[must_use]
    pub fn new<S: Into<String>>(prompt: S) -> Self {
        Self {
            prompt: prompt.into(),
            size: DEFAULT_PORTRAIT_SIZE.to_string(),
            images: Vec::new(),
        }
    }

    /// Override the output size spec
    #[must_use]
    pub fn with_size<S: Into<String>>(mut self, size: S) -> Self {
        self.size = size.into();
        self
    }

    /// Append a source image
    #[must_use]
    pub fn with_image(mut self, image: SourceImage) -> Self {
        self.images.push(image);
        self
    }
}

/// Trait for portrait generation backends
///
/// Input is a prompt plus source images; output is encoded image bytes or an
/// explicit failure. No retries happen at this seam.
#[async_trait]
pub trait GenerationBackend: Send + Sync {
    /// Generate an image for the given request
    ///
    /// # Errors
    /// - Transport failures
    /// - Non-success API responses
    /// - Responses carrying no usable image payload
    async fn generate(&self, request: &GenerationRequest) -> Result<Vec<u8>>;

    /// Short backend name for logging
    fn name(&self) -> &'static str;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_builder() {
        let request = GenerationRequest::new("a portrait")
            .with_size("512x512")
            .with_image(SourceImage::new("me.png", vec![1, 2, 3]))
            .with_image(SourceImage::new("ref.jpg", vec![4]));

        assert_eq!(request.prompt, "a portrait");
        assert_eq!(request.size, "512x512");
        assert_eq!(request.images.len(), 2);
        assert_eq!(request.images[0].file_name, "me.png");
    }

    #[test]
    fn test_source_image_from_missing_path() {
        let err = SourceImage::from_path("nope/missing.png").unwrap_err();
        assert!(matches!(err, PosterError::MissingInput(_)));
    }

    #[test]
    fn test_source_image_from_path_reads_bytes() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("photo.png");
        std::fs::write(&path, [9, 9, 9]).unwrap();

        let source = SourceImage::from_path(&path).unwrap();
        assert_eq!(source.file_name, "photo.png");
        assert_eq!(source.bytes, vec![9, 9, 9]);
    }

    #[test]
    fn test_default_prompt_requests_solid_backdrop() {
        // The chroma-key stage depends on the generated backdrop staying solid
        assert!(DEFAULT_PORTRAIT_PROMPT.contains("deep solid blue"));
    }
}
