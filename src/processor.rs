//! Unified poster pipeline processor
//!
//! This module provides the main `PosterProcessor` that consolidates the
//! pipeline stages: remote portrait generation, chroma-key extraction,
//! template compositing, and output writing. The CLI drives this processor;
//! library users can call the individual stage methods directly.

use crate::{
    chroma_key::ChromaKeyExtractor,
    compositor::Compositor,
    config::{ChromaKeyConfig, CompositeConfig, OutputFormat, SamplePoint},
    error::{PosterError, Result},
    generation::{
        GenerationBackend, GenerationRequest, SourceImage, DEFAULT_PORTRAIT_PROMPT,
        DEFAULT_PORTRAIT_SIZE,
    },
    services::ImageIOService,
    types::{CutoutResult, PosterResult, StageTimings},
};
use image::{DynamicImage, RgbaImage};
use instant::Instant;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Unified configuration for the poster processor
#[derive(Debug, Clone)]
pub struct ProcessorConfig {
    /// Chroma-key extraction settings
    pub chroma_key: ChromaKeyConfig,
    /// Compositing settings
    pub composite: CompositeConfig,
    /// Output format for the final poster
    pub output_format: OutputFormat,
    /// JPEG quality (0-100)
    pub jpeg_quality: u8,
    /// Enable debug mode (mask dump and additional logging)
    pub debug: bool,
}

impl ProcessorConfig {
    /// Create a new processor configuration builder
    #[must_use]
    pub fn builder() -> ProcessorConfigBuilder {
        ProcessorConfigBuilder::new()
    }
}

impl Default for ProcessorConfig {
    fn default() -> Self {
        Self {
            chroma_key: ChromaKeyConfig::default(),
            composite: CompositeConfig::default(),
            output_format: OutputFormat::default(),
            jpeg_quality: 90,
            debug: false,
        }
    }
}

/// Builder for `ProcessorConfig`
pub struct ProcessorConfigBuilder {
    config: ProcessorConfig,
}

impl ProcessorConfigBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: ProcessorConfig::default(),
        }
    }

    #[must_use]
    pub fn sample_point(mut self, sample_point: SamplePoint) -> Self {
        self.config.chroma_key.sample_point = sample_point;
        self
    }

    #[must_use]
    pub fn threshold(mut self, threshold: u32) -> Self {
        self.config.chroma_key.threshold = threshold;
        self
    }

    #[must_use]
    pub fn feather_sigma(mut self, sigma: f32) -> Self {
        self.config.chroma_key.feather_sigma = sigma;
        self
    }

    #[must_use]
    pub fn target_width(mut self, width: u32) -> Self {
        self.config.composite.target_width = width;
        self
    }

    #[must_use]
    pub fn offset_y(mut self, offset: i64) -> Self {
        self.config.composite.offset_y = offset;
        self
    }

    #[must_use]
    pub fn output_format(mut self, format: OutputFormat) -> Self {
        self.config.output_format = format;
        self
    }

    #[must_use]
    pub fn jpeg_quality(mut self, quality: u8) -> Self {
        self.config.jpeg_quality = quality;
        self
    }

    #[must_use]
    pub fn debug(mut self, debug: bool) -> Self {
        self.config.debug = debug;
        self
    }

    /// Build the processor configuration
    ///
    /// # Errors
    /// - Invalid stage configuration values
    /// - JPEG quality above 100
    pub fn build(self) -> Result<ProcessorConfig> {
        self.config.chroma_key.validate()?;
        self.config.composite.validate()?;

        if self.config.jpeg_quality > 100 {
            return Err(PosterError::config_value_error(
                "JPEG quality",
                self.config.jpeg_quality,
                "0-100",
                Some(90),
            ));
        }

        Ok(self.config)
    }
}

impl Default for ProcessorConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Inputs for a full pipeline run
#[derive(Debug, Clone)]
pub struct PosterRequest {
    /// User photo forwarded to the generation backend (required unless
    /// generation is skipped)
    pub user_photo: Option<PathBuf>,

    /// Reference photos forwarded after the user photo
    pub references: Vec<PathBuf>,

    /// Generation prompt
    pub prompt: String,

    /// Generation size spec
    pub size: String,

    /// Reuse an existing stage image instead of calling the backend
    pub skip_generation: bool,

    /// Where the raw generated portrait is written / read from
    pub stage_path: PathBuf,

    /// Where the intermediate cutout is written
    pub cutout_path: PathBuf,

    /// Background template the cutout is pasted onto
    pub template_path: PathBuf,

    /// Final poster output path
    pub output_path: PathBuf,
}

impl Default for PosterRequest {
    fn default() -> Self {
        Self {
            user_photo: None,
            references: Vec::new(),
            prompt: DEFAULT_PORTRAIT_PROMPT.to_string(),
            size: DEFAULT_PORTRAIT_SIZE.to_string(),
            skip_generation: false,
            stage_path: PathBuf::from("portrait_stage.png"),
            cutout_path: PathBuf::from("portrait_cutout.png"),
            template_path: PathBuf::from("templates/bg.jpg"),
            output_path: PathBuf::from("poster_final.png"),
        }
    }
}

/// Poster processor running the linear pipeline
pub struct PosterProcessor {
    config: ProcessorConfig,
    extractor: ChromaKeyExtractor,
    compositor: Compositor,
    backend: Option<Box<dyn GenerationBackend>>,
}

impl PosterProcessor {
    /// Create a processor without a generation backend.
    ///
    /// Runs require `skip_generation` (an existing stage image) until a
    /// backend is installed.
    ///
    /// # Errors
    /// - Invalid processor configuration
    pub fn new(config: ProcessorConfig) -> Result<Self> {
        let extractor = ChromaKeyExtractor::new(config.chroma_key)?;
        let compositor = Compositor::new(config.composite)?;

        Ok(Self {
            config,
            extractor,
            compositor,
            backend: None,
        })
    }

    /// Create a processor with a generation backend installed
    ///
    /// # Errors
    /// - Invalid processor configuration
    pub fn with_backend(config: ProcessorConfig, backend: Box<dyn GenerationBackend>) -> Result<Self> {
        let mut processor = Self::new(config)?;
        processor.backend = Some(backend);
        Ok(processor)
    }

    /// The configuration this processor was built with
    #[must_use]
    pub fn config(&self) -> &ProcessorConfig {
        &self.config
    }

    /// Call the generation backend with the user photo and references.
    ///
    /// # Errors
    /// - `InvalidConfig` when no backend is installed
    /// - `MissingInput` for absent photo paths
    /// - Backend failures
    pub async fn generate_portrait(
        &self,
        user_photo: &Path,
        references: &[PathBuf],
        prompt: &str,
        size: &str,
    ) -> Result<Vec<u8>> {
        let backend = self.backend.as_ref().ok_or_else(|| {
            PosterError::invalid_config(
                "no generation backend installed; skip generation to reuse an existing stage image",
            )
        })?;

        let mut request = GenerationRequest::new(prompt)
            .with_size(size)
            .with_image(SourceImage::from_path(user_photo)?);
        for reference in references {
            request = request.with_image(SourceImage::from_path(reference)?);
        }

        info!(
            backend = backend.name(),
            references = references.len(),
            "generating portrait"
        );
        backend.generate(&request).await
    }

    /// Run chroma-key extraction on an in-memory image
    ///
    /// # Errors
    /// - Extraction failures (empty image)
    pub fn key_out_image(&self, image: &DynamicImage) -> Result<CutoutResult> {
        self.extractor.extract(image)
    }

    /// Load an image file and run chroma-key extraction on it
    ///
    /// # Errors
    /// - `MissingInput` / decode errors from loading
    /// - Extraction failures
    pub fn key_out_file<P: AsRef<Path>>(&self, path: P) -> Result<CutoutResult> {
        let image = ImageIOService::load_image(path)?;
        self.key_out_image(&image)
    }

    /// Composite a cutout onto the background template
    ///
    /// # Errors
    /// - `MissingInput` when the template file is absent
    /// - Compositing failures
    pub fn compose_poster<P: AsRef<Path>>(
        &self,
        cutout: &CutoutResult,
        template_path: P,
    ) -> Result<RgbaImage> {
        let template_ref = template_path.as_ref();
        if !template_ref.exists() {
            return Err(PosterError::missing_input(
                "Background template",
                template_ref,
            ));
        }

        let template = ImageIOService::load_image(template_ref)?;
        self.compositor.compose(&template, &cutout.image)
    }

    /// Run the full pipeline: generate (unless skipped), key out the
    /// backdrop, composite onto the template, write all artifacts.
    ///
    /// Each stage fully consumes its input before the next begins; a failing
    /// stage aborts the run and no final output file is produced.
    ///
    /// # Errors
    /// - `InvalidConfig` when generation is requested without a backend or a
    ///   user photo
    /// - `MissingInput` for absent inputs at the stage that needs them
    /// - `Generation`, decode, processing and I/O failures
    pub async fn process(&self, request: &PosterRequest) -> Result<PosterResult> {
        let total_start = Instant::now();
        let mut timings = StageTimings::default();

        if request.skip_generation {
            info!(
                stage = %request.stage_path.display(),
                "skipping generation, reusing existing stage image"
            );
            if !request.stage_path.exists() {
                return Err(PosterError::missing_input(
                    "Stage image (generate it first, or check the path)",
                    &request.stage_path,
                ));
            }
        } else {
            let user_photo = request.user_photo.as_deref().ok_or_else(|| {
                PosterError::invalid_config("a user photo is required unless generation is skipped")
            })?;

            let generation_start = Instant::now();
            let portrait_bytes = self
                .generate_portrait(user_photo, &request.references, &request.prompt, &request.size)
                .await?;
            timings.generation_ms = Some(generation_start.elapsed().as_millis() as u64);

            std::fs::write(&request.stage_path, &portrait_bytes).map_err(|e| {
                PosterError::file_io_error("write stage image", &request.stage_path, &e)
            })?;
            info!(path = %request.stage_path.display(), "stage image saved");
        }

        let decode_start = Instant::now();
        let stage_image = ImageIOService::load_image(&request.stage_path)?;
        timings.decode_ms = decode_start.elapsed().as_millis() as u64;

        let keying_start = Instant::now();
        let cutout = self.key_out_image(&stage_image)?;
        timings.keying_ms = keying_start.elapsed().as_millis() as u64;

        cutout.save_png(&request.cutout_path)?;
        info!(path = %request.cutout_path.display(), "cutout saved");

        if self.config.debug {
            let mask_path = request.cutout_path.with_extension("mask.png");
            cutout.mask.save_png(&mask_path)?;
            let stats = cutout.mask.statistics();
            debug!(
                path = %mask_path.display(),
                foreground_pixels = stats.foreground_pixels,
                background_pixels = stats.background_pixels,
                "mask dumped"
            );
        }

        let compositing_start = Instant::now();
        let poster = self.compose_poster(&cutout, &request.template_path)?;
        timings.compositing_ms = compositing_start.elapsed().as_millis() as u64;

        let encode_start = Instant::now();
        let poster_dynamic = DynamicImage::ImageRgba8(poster);
        ImageIOService::save_image(
            &poster_dynamic,
            &request.output_path,
            self.config.output_format,
            self.config.jpeg_quality,
        )?;
        timings.encode_ms = Some(encode_start.elapsed().as_millis() as u64);

        timings.total_ms = total_start.elapsed().as_millis() as u64;
        info!(
            output = %request.output_path.display(),
            "poster created ({})",
            timings.timing_summary()
        );

        Ok(PosterResult {
            poster: poster_dynamic.into_rgba8(),
            cutout,
            timings,
        })
    }
}
