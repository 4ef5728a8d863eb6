//! Chroma-key background extraction
//!
//! Classifies pixels by squared Euclidean RGB distance to a single sampled
//! background color, feathers the resulting binary mask, and writes it into
//! the image's alpha channel.

use crate::{
    config::ChromaKeyConfig,
    error::{PosterError, Result},
    types::{AlphaMask, CutoutResult},
};
use image::{DynamicImage, Rgba, RgbaImage};
use tracing::debug;

/// Extracts a cutout from an image by keying out its backdrop color
pub struct ChromaKeyExtractor {
    config: ChromaKeyConfig,
}

impl ChromaKeyExtractor {
    /// Create a new extractor with the given configuration
    ///
    /// # Errors
    /// - Invalid chroma-key configuration
    pub fn new(config: ChromaKeyConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this extractor was built with
    #[must_use]
    pub fn config(&self) -> &ChromaKeyConfig {
        &self.config
    }

    /// Sample the background key color from the configured sample point.
    ///
    /// Exactly one pixel is read. If that pixel happens to belong to the
    /// foreground the whole image is misclassified; callers that control the
    /// backdrop (a generated solid-color portrait) rely on this staying a
    /// single sample.
    ///
    /// # Errors
    /// - Zero-dimension image
    pub fn sample_key_color(&self, image: &RgbaImage) -> Result<Rgba<u8>> {
        let (width, height) = image.dimensions();
        if width == 0 || height == 0 {
            return Err(PosterError::processing(
                "cannot sample background color from an empty image",
            ));
        }

        let (x, y) = self.config.sample_point.resolve(width, height);
        Ok(*image.get_pixel(x, y))
    }

    /// Build the pre-feather binary mask: 255 where the squared RGB distance
    /// to the key color exceeds the squared threshold, 0 otherwise.
    #[must_use]
    pub fn build_mask(&self, image: &RgbaImage, key_color: Rgba<u8>) -> AlphaMask {
        let threshold_sq = self.config.threshold * self.config.threshold;
        let (width, height) = image.dimensions();

        let mut data = Vec::with_capacity((width as usize) * (height as usize));
        for pixel in image.pixels() {
            let dr = i32::from(pixel[0]) - i32::from(key_color[0]);
            let dg = i32::from(pixel[1]) - i32::from(key_color[1]);
            let db = i32::from(pixel[2]) - i32::from(key_color[2]);
            let distance_sq = (dr * dr + dg * dg + db * db) as u32;

            data.push(if distance_sq > threshold_sq { 255 } else { 0 });
        }

        AlphaMask::new(data, (width, height))
    }

    /// Run the full extraction: sample, threshold, feather, apply as alpha.
    ///
    /// RGB channels are never modified; only the alpha channel is replaced.
    ///
    /// # Errors
    /// - Zero-dimension input image
    /// - Mask application failures
    pub fn extract(&self, image: &DynamicImage) -> Result<CutoutResult> {
        let mut rgba = image.to_rgba8();
        let original_dimensions = rgba.dimensions();

        let key_color = self.sample_key_color(&rgba)?;
        debug!(
            key_color = ?key_color.0,
            threshold = self.config.threshold,
            sample_point = %self.config.sample_point,
            "sampled background key color"
        );

        let mask = self
            .build_mask(&rgba, key_color)
            .feather(self.config.feather_sigma)?;
        mask.apply_to_image(&mut rgba)?;

        let stats = mask.statistics();
        debug!(
            foreground_ratio = stats.foreground_ratio,
            background_ratio = stats.background_ratio,
            "chroma-key mask applied"
        );

        Ok(CutoutResult {
            image: rgba,
            mask,
            key_color,
            original_dimensions,
        })
    }
}
