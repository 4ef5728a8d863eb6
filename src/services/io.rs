//! Image I/O operations service
//!
//! This module separates file I/O operations from the pipeline stages,
//! making the system more testable and maintainable.

use crate::{
    config::OutputFormat,
    error::{PosterError, Result},
};
use image::DynamicImage;
use std::path::Path;
use tracing::debug;

/// Service for handling image file input/output operations
pub struct ImageIOService;

impl ImageIOService {
    /// Load an image from a file path.
    ///
    /// The path is existence-checked first so a missing file surfaces as a
    /// `MissingInput` error naming the path. Decoding tries extension-based
    /// format detection and falls back to content sniffing.
    ///
    /// # Errors
    /// - `MissingInput` when the path does not exist
    /// - Decode errors when the bytes are not a valid raster image
    pub fn load_image<P: AsRef<Path>>(path: P) -> Result<DynamicImage> {
        let path_ref = path.as_ref();

        if !path_ref.exists() {
            return Err(PosterError::missing_input("Image file", path_ref));
        }

        match image::open(path_ref) {
            Ok(img) => Ok(img),
            Err(e) => {
                // Extension-based loading failed; try content-based detection
                debug!(
                    path = %path_ref.display(),
                    error = %e,
                    "extension-based decode failed, attempting content-based detection"
                );

                let data = std::fs::read(path_ref)
                    .map_err(|io_err| PosterError::file_io_error("read image data", path_ref, &io_err))?;

                image::load_from_memory(&data)
                    .map_err(|content_err| {
                        PosterError::processing_stage_error(
                            "image loading",
                            &format!(
                                "Failed to decode with both extension-based ({}) and content-based detection: {}",
                                e, content_err
                            ),
                            Some(&format!("path: {}, size: {} bytes", path_ref.display(), data.len())),
                        )
                    })
            },
        }
    }

    /// Save an image to a file in the specified format.
    ///
    /// Parent directories are created as needed. JPEG output is flattened to
    /// opaque RGB at the given quality; PNG keeps the alpha channel.
    ///
    /// # Errors
    /// - File I/O errors (directory creation, write failures)
    /// - Encode errors
    pub fn save_image<P: AsRef<Path>>(
        image: &DynamicImage,
        path: P,
        format: OutputFormat,
        jpeg_quality: u8,
    ) -> Result<()> {
        let path_ref = path.as_ref();

        if let Some(parent) = path_ref.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent).map_err(|e| {
                    PosterError::file_io_error("create output directory", parent, &e)
                })?;
            }
        }

        match format {
            OutputFormat::Png => image
                .save_with_format(path_ref, image::ImageFormat::Png)
                .map_err(|e| {
                    PosterError::processing_stage_error(
                        "image save",
                        &format!("Failed to save as PNG: {}", e),
                        Some(&format!("path: {}", path_ref.display())),
                    )
                }),
            OutputFormat::Jpeg => {
                let rgb_image = image.to_rgb8();
                let file = std::fs::File::create(path_ref)
                    .map_err(|e| PosterError::file_io_error("create output file", path_ref, &e))?;
                let mut encoder =
                    image::codecs::jpeg::JpegEncoder::new_with_quality(file, jpeg_quality);
                encoder.encode_image(&rgb_image).map_err(|e| {
                    PosterError::processing_stage_error(
                        "image save",
                        &format!("Failed to save as JPEG: {}", e),
                        Some(&format!("path: {}", path_ref.display())),
                    )
                })
            },
        }
    }
}
