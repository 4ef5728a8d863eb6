//! Configuration types for the poster pipeline stages

use crate::error::{PosterError, Result};
use serde::{Deserialize, Serialize};

/// Default chroma-key distance threshold (RGB Euclidean distance)
pub const DEFAULT_THRESHOLD: u32 = 35;

/// Default Gaussian sigma applied to the binary mask to soften edges
pub const DEFAULT_FEATHER_SIGMA: f32 = 2.0;

/// Default vertical offset of the background sample point from the top edge
pub const DEFAULT_SAMPLE_OFFSET_Y: u32 = 10;

/// Default width the cutout is scaled to before pasting
pub const DEFAULT_TARGET_WIDTH: u32 = 950;

/// Default vertical paste offset on the template
pub const DEFAULT_OFFSET_Y: i64 = 330;

/// Maximum possible RGB Euclidean distance (sqrt(3 * 255^2), rounded up)
const MAX_RGB_DISTANCE: u32 = 442;

/// Where the background key color is sampled from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SamplePoint {
    /// Horizontal center, a small fixed offset below the top edge
    TopCenter,
    /// Explicit pixel coordinate
    Fixed { x: u32, y: u32 },
}

impl Default for SamplePoint {
    fn default() -> Self {
        Self::TopCenter
    }
}

impl SamplePoint {
    /// Resolve to a concrete coordinate inside an image of the given size.
    ///
    /// Coordinates are clamped to the image bounds so short or narrow images
    /// still sample their nearest edge pixel.
    #[must_use]
    pub fn resolve(&self, width: u32, height: u32) -> (u32, u32) {
        let (x, y) = match *self {
            Self::TopCenter => (width / 2, DEFAULT_SAMPLE_OFFSET_Y),
            Self::Fixed { x, y } => (x, y),
        };
        (
            x.min(width.saturating_sub(1)),
            y.min(height.saturating_sub(1)),
        )
    }
}

impl std::fmt::Display for SamplePoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::TopCenter => write!(f, "top-center"),
            Self::Fixed { x, y } => write!(f, "({}, {})", x, y),
        }
    }
}

/// Configuration for the chroma-key extraction stage
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ChromaKeyConfig {
    /// Where to sample the background key color
    pub sample_point: SamplePoint,

    /// Distance threshold: pixels farther than this from the key color are
    /// classified foreground
    pub threshold: u32,

    /// Gaussian sigma for mask feathering (0.0 disables the blur)
    pub feather_sigma: f32,
}

impl Default for ChromaKeyConfig {
    fn default() -> Self {
        Self {
            sample_point: SamplePoint::default(),
            threshold: DEFAULT_THRESHOLD,
            feather_sigma: DEFAULT_FEATHER_SIGMA,
        }
    }
}

impl ChromaKeyConfig {
    /// Validate configuration parameters
    ///
    /// # Errors
    /// - Threshold above the maximum possible RGB distance
    /// - Negative or non-finite feather sigma
    pub fn validate(&self) -> Result<()> {
        if self.threshold > MAX_RGB_DISTANCE {
            return Err(PosterError::config_value_error(
                "chroma threshold",
                self.threshold,
                "0-442",
                Some(DEFAULT_THRESHOLD),
            ));
        }

        if !self.feather_sigma.is_finite() || self.feather_sigma < 0.0 {
            return Err(PosterError::invalid_config(format!(
                "feather sigma must be a non-negative finite number, got {}",
                self.feather_sigma
            )));
        }

        Ok(())
    }
}

/// Configuration for the compositing stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompositeConfig {
    /// Width the cutout is scaled to (aspect ratio preserved)
    pub target_width: u32,

    /// Vertical paste offset on the template
    pub offset_y: i64,
}

impl Default for CompositeConfig {
    fn default() -> Self {
        Self {
            target_width: DEFAULT_TARGET_WIDTH,
            offset_y: DEFAULT_OFFSET_Y,
        }
    }
}

impl CompositeConfig {
    /// Validate configuration parameters
    ///
    /// # Errors
    /// - Zero target width
    pub fn validate(&self) -> Result<()> {
        if self.target_width == 0 {
            return Err(PosterError::config_value_error(
                "target width",
                self.target_width,
                "1 or greater",
                Some(DEFAULT_TARGET_WIDTH),
            ));
        }

        Ok(())
    }
}

/// Output image format options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// PNG with alpha channel transparency
    Png,
    /// JPEG (no transparency, flattened RGB output)
    Jpeg,
}

impl Default for OutputFormat {
    fn default() -> Self {
        Self::Png
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Png => write!(f, "png"),
            Self::Jpeg => write!(f, "jpeg"),
        }
    }
}
