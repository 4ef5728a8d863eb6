//! Cutout scaling and template compositing
//!
//! Scales a keyed cutout to a fixed target width (aspect preserved), centers
//! it horizontally on the template at a fixed vertical offset, and
//! alpha-blends it onto the canvas.

use crate::{
    config::CompositeConfig,
    error::{PosterError, Result},
};
use image::{imageops, DynamicImage, RgbaImage};
use tracing::debug;

/// Places a masked cutout onto a background template
pub struct Compositor {
    config: CompositeConfig,
}

impl Compositor {
    /// Create a new compositor with the given configuration
    ///
    /// # Errors
    /// - Invalid composite configuration
    pub fn new(config: CompositeConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// The configuration this compositor was built with
    #[must_use]
    pub fn config(&self) -> &CompositeConfig {
        &self.config
    }

    /// Compute the scaled cutout dimensions: width is the configured target,
    /// height preserves the source aspect ratio (rounded to the nearest
    /// pixel, never below one).
    ///
    /// # Errors
    /// - Zero-dimension cutout
    pub fn scaled_dimensions(&self, source: (u32, u32)) -> Result<(u32, u32)> {
        let (width, height) = source;
        if width == 0 || height == 0 {
            return Err(PosterError::processing(
                "cannot scale a zero-dimension cutout",
            ));
        }

        let target_width = self.config.target_width;
        let target_height = (f64::from(height) * f64::from(target_width) / f64::from(width))
            .round()
            .max(1.0) as u32;

        Ok((target_width, target_height))
    }

    /// Compute the paste offset: horizontally centered, vertically fixed.
    ///
    /// Signed arithmetic so a cutout wider than the template yields a
    /// negative x and clips at the canvas edges instead of wrapping.
    #[must_use]
    pub fn placement(&self, template_width: u32, cutout_width: u32) -> (i64, i64) {
        let x = (i64::from(template_width) - i64::from(cutout_width)) / 2;
        (x, self.config.offset_y)
    }

    /// Scale the cutout and alpha-composite it onto the template.
    ///
    /// Returns the full-size template canvas with the cutout blended in.
    ///
    /// # Errors
    /// - Zero-dimension cutout
    pub fn compose(&self, template: &DynamicImage, cutout: &RgbaImage) -> Result<RgbaImage> {
        let mut canvas = template.to_rgba8();

        let (target_width, target_height) = self.scaled_dimensions(cutout.dimensions())?;
        let scaled = imageops::resize(
            cutout,
            target_width,
            target_height,
            imageops::FilterType::Lanczos3,
        );

        let (x, y) = self.placement(canvas.width(), target_width);
        debug!(
            cutout_size = format!("{}x{}", target_width, target_height),
            template_size = format!("{}x{}", canvas.width(), canvas.height()),
            x,
            y,
            "compositing cutout onto template"
        );

        imageops::overlay(&mut canvas, &scaled, x, y);
        Ok(canvas)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgba;

    fn compositor(config: CompositeConfig) -> Compositor {
        Compositor::new(config).unwrap()
    }

    #[test]
    fn test_scaled_dimensions_example() {
        let compositor = compositor(CompositeConfig::default());
        assert_eq!(compositor.scaled_dimensions((2000, 3000)).unwrap(), (950, 1425));
    }

    #[test]
    fn test_scaling_preserves_aspect_ratio() {
        let compositor = compositor(CompositeConfig::default());
        for source in [(1024, 1536), (333, 777), (4000, 1000), (951, 950)] {
            let (w, h) = compositor.scaled_dimensions(source).unwrap();
            let expected = f64::from(source.1) / f64::from(source.0) * f64::from(w);
            assert!(
                (f64::from(h) - expected).abs() <= 1.0,
                "aspect drifted for {:?}: got {}x{}",
                source,
                w,
                h
            );
        }
    }

    #[test]
    fn test_scaled_dimensions_rejects_empty() {
        let compositor = compositor(CompositeConfig::default());
        assert!(compositor.scaled_dimensions((0, 100)).is_err());
        assert!(compositor.scaled_dimensions((100, 0)).is_err());
    }

    #[test]
    fn test_placement_centers_horizontally() {
        let compositor = compositor(CompositeConfig::default());

        for (template_w, cutout_w) in [(1920u32, 950u32), (1000, 950), (951, 950), (500, 950)] {
            let (x, y) = compositor.placement(template_w, cutout_w);
            let expected = (i64::from(template_w) - i64::from(cutout_w)) / 2;
            assert!((x - expected).abs() <= 1);
            assert_eq!(y, 330);
        }
    }

    #[test]
    fn test_compose_blends_at_offset() {
        let template = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            200,
            600,
            Rgba([10, 10, 10, 255]),
        ));
        // Fully opaque white cutout, already at a 1:1 aspect
        let cutout = RgbaImage::from_pixel(100, 100, Rgba([255, 255, 255, 255]));

        let compositor = compositor(CompositeConfig {
            target_width: 100,
            offset_y: 50,
        });
        let canvas = compositor.compose(&template, &cutout).unwrap();

        assert_eq!(canvas.dimensions(), (200, 600));
        // Inside the paste window: cutout pixels
        assert_eq!(canvas.get_pixel(100, 100).0, [255, 255, 255, 255]);
        // Outside: template pixels
        assert_eq!(canvas.get_pixel(10, 10).0, [10, 10, 10, 255]);
        assert_eq!(canvas.get_pixel(100, 400).0, [10, 10, 10, 255]);
    }

    #[test]
    fn test_compose_transparent_pixels_keep_template() {
        let template = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            100,
            500,
            Rgba([10, 10, 10, 255]),
        ));
        let cutout = RgbaImage::from_pixel(50, 50, Rgba([255, 0, 0, 0]));

        let compositor = compositor(CompositeConfig {
            target_width: 50,
            offset_y: 0,
        });
        let canvas = compositor.compose(&template, &cutout).unwrap();

        // A fully transparent cutout leaves the template untouched
        assert_eq!(canvas.get_pixel(25, 25).0, [10, 10, 10, 255]);
    }

    #[test]
    fn test_compose_oversized_cutout_clips() {
        let template = DynamicImage::ImageRgba8(RgbaImage::from_pixel(
            100,
            100,
            Rgba([10, 10, 10, 255]),
        ));
        let cutout = RgbaImage::from_pixel(300, 300, Rgba([0, 255, 0, 255]));

        let compositor = compositor(CompositeConfig {
            target_width: 300,
            offset_y: 0,
        });
        let canvas = compositor.compose(&template, &cutout).unwrap();

        // The whole visible canvas is covered; no panic despite negative x
        assert_eq!(canvas.dimensions(), (100, 100));
        assert_eq!(canvas.get_pixel(50, 50).0, [0, 255, 0, 255]);
    }
}
