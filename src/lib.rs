//! # Poster Forge
//!
//! A small pipeline library and CLI for generating composited poster images:
//! a portrait is produced by a generative images API (or reused from a prior
//! run), its solid-color backdrop is keyed out locally with a color-distance
//! chroma key, and the resulting cutout is scaled and alpha-composited onto a
//! static poster template.
//!
//! ## Pipeline
//!
//! 1. **Generation** (optional) — user photo + reference photos + prompt go
//!    to the images API; the response is saved as the stage image.
//! 2. **Chroma key** — a single background pixel is sampled, every pixel is
//!    classified by squared RGB distance against a threshold, the binary
//!    mask is feathered with a Gaussian blur and written into the alpha
//!    channel.
//! 3. **Compositing** — the cutout is scaled to a target width (aspect
//!    preserved, Lanczos3), centered horizontally on the template at a fixed
//!    vertical offset, and alpha-blended onto it.
//! 4. **Output** — the cutout and the final poster are written to disk.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use poster_forge::{compose_onto_template, key_out_background_from_bytes, ProcessorConfig};
//!
//! # fn example() -> poster_forge::Result<()> {
//! let config = ProcessorConfig::default();
//!
//! let stage_bytes = std::fs::read("portrait_stage.png")?;
//! let cutout = key_out_background_from_bytes(&stage_bytes, &config)?;
//! cutout.save_png("portrait_cutout.png")?;
//!
//! let poster = compose_onto_template(&cutout, "templates/bg.jpg", &config)?;
//! poster.save("poster_final.png")?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Full pipeline with a generation backend
//!
//! ```rust,no_run
//! use poster_forge::{OpenAiBackend, PosterProcessor, PosterRequest, ProcessorConfig};
//!
//! # async fn example() -> poster_forge::Result<()> {
//! let backend = OpenAiBackend::new(std::env::var("OPENAI_API_KEY").unwrap())?;
//! let processor =
//!     PosterProcessor::with_backend(ProcessorConfig::default(), Box::new(backend))?;
//!
//! let request = PosterRequest {
//!     user_photo: Some("me.jpg".into()),
//!     references: vec!["references/sweater1.jpg".into()],
//!     ..PosterRequest::default()
//! };
//! let result = processor.process(&request).await?;
//! println!("{}", result.timings.timing_summary());
//! # Ok(())
//! # }
//! ```
//!
//! ## Library vs CLI Usage
//!
//! All pipeline functionality is available by default as a library; enable
//! the `cli` feature (default) for the command-line interface and tracing
//! subscriber setup.

pub mod chroma_key;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compositor;
pub mod config;
pub mod error;
pub mod generation;
pub mod processor;
pub mod services;
#[cfg(feature = "cli")]
pub mod tracing_config;
pub mod types;

// Internal imports for lib functions
use std::path::Path;
use tokio::io::AsyncRead;

// Public API exports
pub use chroma_key::ChromaKeyExtractor;
pub use compositor::Compositor;
pub use config::{ChromaKeyConfig, CompositeConfig, OutputFormat, SamplePoint};
pub use error::{PosterError, Result};
pub use generation::{
    GenerationBackend, GenerationRequest, OpenAiBackend, SourceImage, DEFAULT_PORTRAIT_PROMPT,
    DEFAULT_PORTRAIT_SIZE,
};
pub use processor::{PosterProcessor, PosterRequest, ProcessorConfig, ProcessorConfigBuilder};
pub use services::{ImageIOService, OutputFormatHandler};
pub use types::{AlphaMask, CutoutResult, MaskStatistics, PosterResult, StageTimings};

#[cfg(feature = "cli")]
pub use tracing_config::{init_cli_tracing, TracingConfig, TracingFormat};

/// Key out the backdrop of an image provided as encoded bytes.
///
/// Suitable for processing an API payload without touching the filesystem.
///
/// # Errors
/// - Decode failures for invalid image bytes
/// - Extraction failures
pub fn key_out_background_from_bytes(
    image_bytes: &[u8],
    config: &ProcessorConfig,
) -> Result<CutoutResult> {
    let image = image::load_from_memory(image_bytes).map_err(|e| {
        PosterError::processing(format!("Failed to decode image from bytes: {}", e))
    })?;

    key_out_background_from_image(&image, config)
}

/// Key out the backdrop of a pre-loaded `DynamicImage`.
///
/// # Errors
/// - Invalid chroma-key configuration
/// - Extraction failures
pub fn key_out_background_from_image(
    image: &image::DynamicImage,
    config: &ProcessorConfig,
) -> Result<CutoutResult> {
    let extractor = ChromaKeyExtractor::new(config.chroma_key)?;
    extractor.extract(image)
}

/// Key out the backdrop of an image read from an async stream.
///
/// # Errors
/// - Stream read failures
/// - Decode and extraction failures
pub async fn key_out_background_from_reader<R: AsyncRead + Unpin>(
    mut reader: R,
    config: &ProcessorConfig,
) -> Result<CutoutResult> {
    let mut buffer = Vec::new();
    tokio::io::AsyncReadExt::read_to_end(&mut reader, &mut buffer)
        .await
        .map_err(|e| PosterError::processing(format!("Failed to read from stream: {}", e)))?;

    key_out_background_from_bytes(&buffer, config)
}

/// Composite a cutout onto the template at the given path.
///
/// # Errors
/// - `MissingInput` when the template file is absent
/// - Compositing failures
pub fn compose_onto_template<P: AsRef<Path>>(
    cutout: &CutoutResult,
    template_path: P,
    config: &ProcessorConfig,
) -> Result<image::RgbaImage> {
    let template_ref = template_path.as_ref();
    if !template_ref.exists() {
        return Err(PosterError::missing_input(
            "Background template",
            template_ref,
        ));
    }

    let template = ImageIOService::load_image(template_ref)?;
    let compositor = Compositor::new(config.composite)?;
    compositor.compose(&template, &cutout.image)
}
