//! Output format handling service

use crate::config::OutputFormat;

/// Service for output format inference and capability queries
pub struct OutputFormatHandler;

impl OutputFormatHandler {
    /// Infer the output format from a path extension.
    ///
    /// Returns `None` for unknown or missing extensions; callers pick their
    /// own fallback (the CLI defaults to PNG).
    #[must_use]
    pub fn from_extension<P: AsRef<std::path::Path>>(path: P) -> Option<OutputFormat> {
        let extension = path.as_ref().extension()?.to_str()?.to_lowercase();
        match extension.as_str() {
            "png" => Some(OutputFormat::Png),
            "jpg" | "jpeg" => Some(OutputFormat::Jpeg),
            _ => None,
        }
    }

    /// Get the appropriate file extension for a given output format
    #[must_use]
    pub fn get_extension(format: OutputFormat) -> &'static str {
        match format {
            OutputFormat::Png => "png",
            OutputFormat::Jpeg => "jpg",
        }
    }

    /// Check if a format supports transparency (alpha channel)
    #[must_use]
    pub fn supports_alpha(format: OutputFormat) -> bool {
        match format {
            OutputFormat::Png => true,
            OutputFormat::Jpeg => false,
        }
    }
}
