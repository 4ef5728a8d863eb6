//! Core types for poster generation operations

use crate::{config::OutputFormat, error::Result};
use image::{ImageBuffer, Luma, Rgba, RgbaImage};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Single-channel opacity mask driving the cutout
///
/// Each value is the opacity to apply: 0 removes the pixel, 255 keeps it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AlphaMask {
    /// Mask data as grayscale values (0-255)
    pub data: Vec<u8>,

    /// Mask dimensions (width, height)
    pub dimensions: (u32, u32),
}

impl AlphaMask {
    /// Create a new alpha mask
    #[must_use]
    pub fn new(data: Vec<u8>, dimensions: (u32, u32)) -> Self {
        Self { data, dimensions }
    }

    /// Create a mask from a grayscale image
    #[must_use]
    pub fn from_image(image: &ImageBuffer<Luma<u8>, Vec<u8>>) -> Self {
        let (width, height) = image.dimensions();
        let data = image.as_raw().clone();

        Self::new(data, (width, height))
    }

    /// Convert the mask to a grayscale image
    pub fn to_image(&self) -> Result<ImageBuffer<Luma<u8>, Vec<u8>>> {
        let (width, height) = self.dimensions;
        ImageBuffer::from_raw(width, height, self.data.clone()).ok_or_else(|| {
            crate::error::PosterError::processing("Failed to create image from mask data")
        })
    }

    /// Soften mask edges with a Gaussian blur of the given sigma.
    ///
    /// A sigma of zero returns the mask unchanged. Interior regions far from
    /// a foreground/background boundary keep their original value.
    pub fn feather(&self, sigma: f32) -> Result<AlphaMask> {
        if sigma <= 0.0 {
            return Ok(self.clone());
        }

        let image = self.to_image()?;
        let blurred = image::imageops::blur(&image, sigma);
        Ok(AlphaMask::from_image(&blurred))
    }

    /// Write the mask into an RGBA image's alpha channel.
    ///
    /// RGB channels are left untouched.
    pub fn apply_to_image(&self, image: &mut RgbaImage) -> Result<()> {
        let (img_width, img_height) = image.dimensions();
        let (mask_width, mask_height) = self.dimensions;

        if img_width != mask_width || img_height != mask_height {
            return Err(crate::error::PosterError::processing(
                "Image and mask dimensions do not match",
            ));
        }

        for (pixel, alpha) in image.pixels_mut().zip(self.data.iter()) {
            pixel[3] = *alpha;
        }

        Ok(())
    }

    /// Get mask statistics
    #[must_use]
    pub fn statistics(&self) -> MaskStatistics {
        let total_pixels = self.data.len();
        let foreground_pixels = self.data.iter().filter(|&&x| x > 127).count();
        let background_pixels = total_pixels - foreground_pixels;

        MaskStatistics {
            total_pixels,
            foreground_pixels,
            background_pixels,
            foreground_ratio: foreground_pixels as f32 / total_pixels.max(1) as f32,
            background_ratio: background_pixels as f32 / total_pixels.max(1) as f32,
        }
    }

    /// Save the mask as PNG
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let image = self.to_image()?;
        image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }
}

/// Statistics about an alpha mask
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MaskStatistics {
    pub total_pixels: usize,
    pub foreground_pixels: usize,
    pub background_pixels: usize,
    pub foreground_ratio: f32,
    pub background_ratio: f32,
}

/// Result of the chroma-key extraction stage
#[derive(Debug, Clone)]
pub struct CutoutResult {
    /// The keyed image with the mask applied as its alpha channel
    pub image: RgbaImage,

    /// The mask that was applied
    pub mask: AlphaMask,

    /// The sampled background key color
    pub key_color: Rgba<u8>,

    /// Source image dimensions
    pub original_dimensions: (u32, u32),
}

impl CutoutResult {
    /// Save the cutout as PNG with alpha channel
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        self.image.save_with_format(path, image::ImageFormat::Png)?;
        Ok(())
    }

    /// Get cutout dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.image.dimensions()
    }
}

/// Result of a full poster pipeline run
#[derive(Debug, Clone)]
pub struct PosterResult {
    /// The final composited poster canvas
    pub poster: RgbaImage,

    /// The intermediate cutout
    pub cutout: CutoutResult,

    /// Processing timings per stage
    pub timings: StageTimings,
}

impl PosterResult {
    /// Save the poster in the specified format.
    ///
    /// JPEG output is flattened to opaque RGB; PNG keeps the alpha channel.
    pub fn save<P: AsRef<Path>>(&self, path: P, format: OutputFormat, quality: u8) -> Result<()> {
        match format {
            OutputFormat::Png => {
                self.poster
                    .save_with_format(path, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let rgb_image = image::DynamicImage::ImageRgba8(self.poster.clone()).to_rgb8();
                let mut jpeg_encoder = image::codecs::jpeg::JpegEncoder::new_with_quality(
                    std::fs::File::create(path)?,
                    quality,
                );
                jpeg_encoder.encode_image(&rgb_image)?;
            },
        }
        Ok(())
    }

    /// Get the poster as encoded bytes in the specified format
    pub fn to_bytes(&self, format: OutputFormat, quality: u8) -> Result<Vec<u8>> {
        let mut buffer = Vec::new();
        let mut cursor = std::io::Cursor::new(&mut buffer);
        match format {
            OutputFormat::Png => {
                self.poster.write_to(&mut cursor, image::ImageFormat::Png)?;
            },
            OutputFormat::Jpeg => {
                let rgb_image = image::DynamicImage::ImageRgba8(self.poster.clone()).to_rgb8();
                let mut jpeg_encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(&mut cursor, quality);
                jpeg_encoder.encode_image(&rgb_image)?;
            },
        }
        Ok(buffer)
    }

    /// Get poster dimensions
    #[must_use]
    pub fn dimensions(&self) -> (u32, u32) {
        self.poster.dimensions()
    }
}

/// Timing breakdown for a poster pipeline run
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StageTimings {
    /// Remote generation call (absent when generation was skipped)
    pub generation_ms: Option<u64>,

    /// Stage image loading and decoding
    pub decode_ms: u64,

    /// Chroma-key mask computation, feathering and alpha application
    pub keying_ms: u64,

    /// Template loading, cutout scaling and alpha compositing
    pub compositing_ms: u64,

    /// Final image encoding (if saving to file)
    pub encode_ms: Option<u64>,

    /// Total end-to-end processing time
    pub total_ms: u64,
}

impl StageTimings {
    /// Get a human-readable timing summary for display
    #[must_use]
    pub fn timing_summary(&self) -> String {
        let mut summary = String::new();

        if let Some(generation_ms) = self.generation_ms {
            summary.push_str(&format!("Generation: {}ms | ", generation_ms));
        }

        summary.push_str(&format!(
            "Decode: {}ms | Key: {}ms | Composite: {}ms",
            self.decode_ms, self.keying_ms, self.compositing_ms
        ));

        if let Some(encode_ms) = self.encode_ms {
            summary.push_str(&format!(" | Encode: {}ms", encode_ms));
        }

        summary.push_str(&format!(" | Total: {}ms", self.total_ms));
        summary
    }
}
