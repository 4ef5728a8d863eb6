//! Error types for poster generation operations

use thiserror::Error;

/// Result type alias for poster generation operations
pub type Result<T> = std::result::Result<T, PosterError>;

/// Error types for the poster pipeline
#[derive(Error, Debug)]
pub enum PosterError {
    /// Input/output errors (permission denied, disk full, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Image decode or encode errors
    #[error("Image processing error: {0}")]
    Image(#[from] image::ImageError),

    /// A required input file does not exist
    #[error("Missing input: {0}")]
    MissingInput(String),

    /// The remote generation call failed or returned no usable image payload
    #[error("Generation error: {0}")]
    Generation(String),

    /// Invalid configuration or parameters
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// Pixel-level processing errors (dimension mismatches, empty buffers)
    #[error("Processing error: {0}")]
    Processing(String),
}

impl PosterError {
    /// Create a new missing-input error naming the absent path
    pub fn missing_input<P: AsRef<std::path::Path>>(description: &str, path: P) -> Self {
        Self::MissingInput(format!("{} '{}'", description, path.as_ref().display()))
    }

    /// Create a new generation error
    pub fn generation<S: Into<String>>(msg: S) -> Self {
        Self::Generation(msg.into())
    }

    /// Create a new invalid configuration error
    pub fn invalid_config<S: Into<String>>(msg: S) -> Self {
        Self::InvalidConfig(msg.into())
    }

    /// Create a new processing error
    pub fn processing<S: Into<String>>(msg: S) -> Self {
        Self::Processing(msg.into())
    }

    /// Create file I/O error with operation context
    pub fn file_io_error<P: AsRef<std::path::Path>>(
        operation: &str,
        path: P,
        error: &std::io::Error,
    ) -> Self {
        let path_display = path.as_ref().display();
        Self::Io(std::io::Error::new(
            error.kind(),
            format!("Failed to {} '{}': {}", operation, path_display, error),
        ))
    }

    /// Create image decode error with format context
    pub fn image_load_error<P: AsRef<std::path::Path>>(path: P, error: &image::ImageError) -> Self {
        let path_display = path.as_ref().display();
        let extension = path
            .as_ref()
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("unknown");

        Self::Image(image::ImageError::IoError(std::io::Error::new(
            std::io::ErrorKind::InvalidData,
            format!(
                "Failed to decode image '{}' (format: {}): {}. Supported formats: PNG, JPEG",
                path_display, extension, error
            ),
        )))
    }

    /// Create configuration error with valid ranges
    pub fn config_value_error<T: std::fmt::Display>(
        parameter: &str,
        value: T,
        valid_range: &str,
        recommended: Option<T>,
    ) -> Self {
        let recommendation = match recommended {
            Some(rec) => format!(" Recommended: {}", rec),
            None => String::new(),
        };

        Self::InvalidConfig(format!(
            "Invalid {}: {} (valid range: {}).{}",
            parameter, value, valid_range, recommendation
        ))
    }

    /// Create processing error with stage context
    pub fn processing_stage_error(stage: &str, details: &str, input_info: Option<&str>) -> Self {
        let input_context = match input_info {
            Some(info) => format!(" (input: {})", info),
            None => String::new(),
        };

        Self::Processing(format!(
            "Processing failed at stage '{}'{}: {}",
            stage, input_context, details
        ))
    }
}
