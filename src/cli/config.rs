//! Configuration conversion utilities for CLI arguments

use crate::cli::main_impl::{Cli, CliOutputFormat};
use crate::{
    config::OutputFormat,
    processor::{ProcessorConfig, ProcessorConfigBuilder},
    services::OutputFormatHandler,
};
use anyhow::{Context, Result};

/// Convert CLI arguments to a unified `ProcessorConfig`
pub(crate) struct CliConfigBuilder;

impl CliConfigBuilder {
    /// Build a `ProcessorConfig` from CLI arguments
    pub(crate) fn from_cli(cli: &Cli) -> Result<ProcessorConfig> {
        let output_format = Self::resolve_output_format(cli);

        let config = ProcessorConfigBuilder::new()
            .threshold(cli.threshold)
            .feather_sigma(cli.feather)
            .target_width(cli.target_width)
            .offset_y(cli.offset_y)
            .output_format(output_format)
            .jpeg_quality(cli.jpeg_quality)
            .debug(cli.verbose >= 2)
            .build()
            .context("Invalid configuration")?;

        Ok(config)
    }

    /// Pick the output format: explicit flag wins, then the output path
    /// extension, then PNG.
    pub(crate) fn resolve_output_format(cli: &Cli) -> OutputFormat {
        if let Some(format) = cli.format {
            return match format {
                CliOutputFormat::Png => OutputFormat::Png,
                CliOutputFormat::Jpeg => OutputFormat::Jpeg,
            };
        }

        OutputFormatHandler::from_extension(&cli.output).unwrap_or(OutputFormat::Png)
    }

    /// Validate CLI arguments for consistency
    pub(crate) fn validate_cli(cli: &Cli) -> Result<()> {
        if cli.jpeg_quality > 100 {
            anyhow::bail!("JPEG quality must be 0-100, got {}", cli.jpeg_quality);
        }

        if !cli.skip_generation && cli.api_key.is_none() {
            anyhow::bail!(
                "OPENAI_API_KEY is missing. Set the environment variable or pass --api-key \
                 (or use --skip-generation to reuse an existing stage image)."
            );
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn create_test_cli() -> Cli {
        Cli {
            input: Some(PathBuf::from("me.jpg")),
            reference: vec![],
            template: PathBuf::from("templates/bg.jpg"),
            output: PathBuf::from("poster_final.png"),
            stage_file: PathBuf::from("portrait_stage.png"),
            cutout_file: PathBuf::from("portrait_cutout.png"),
            skip_generation: false,
            threshold: 35,
            feather: 2.0,
            target_width: 950,
            offset_y: 330,
            prompt: None,
            model: "gpt-image-1".to_string(),
            size: "1024x1536".to_string(),
            api_key: Some("sk-test".to_string()),
            format: None,
            jpeg_quality: 90,
            verbose: 0,
        }
    }

    #[test]
    fn test_cli_config_conversion() {
        let cli = create_test_cli();
        let config = CliConfigBuilder::from_cli(&cli).unwrap();

        assert_eq!(config.chroma_key.threshold, 35);
        assert_eq!(config.composite.target_width, 950);
        assert_eq!(config.composite.offset_y, 330);
        assert_eq!(config.output_format, OutputFormat::Png);
        assert_eq!(config.jpeg_quality, 90);
        assert!(!config.debug);
    }

    #[test]
    fn test_verbose_enables_debug() {
        let mut cli = create_test_cli();
        cli.verbose = 2;
        let config = CliConfigBuilder::from_cli(&cli).unwrap();
        assert!(config.debug);
    }

    #[test]
    fn test_output_format_resolution() {
        let mut cli = create_test_cli();
        assert_eq!(
            CliConfigBuilder::resolve_output_format(&cli),
            OutputFormat::Png
        );

        cli.output = PathBuf::from("poster.jpg");
        assert_eq!(
            CliConfigBuilder::resolve_output_format(&cli),
            OutputFormat::Jpeg
        );

        // Explicit flag wins over the extension
        cli.format = Some(CliOutputFormat::Png);
        assert_eq!(
            CliConfigBuilder::resolve_output_format(&cli),
            OutputFormat::Png
        );

        // Unknown extension falls back to PNG
        cli.format = None;
        cli.output = PathBuf::from("poster.webp");
        assert_eq!(
            CliConfigBuilder::resolve_output_format(&cli),
            OutputFormat::Png
        );
    }

    #[test]
    fn test_cli_validation() {
        let mut cli = create_test_cli();
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());

        cli.jpeg_quality = 150;
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        cli.jpeg_quality = 90;
        cli.api_key = None;
        assert!(CliConfigBuilder::validate_cli(&cli).is_err());

        // Without generation no API key is needed
        cli.skip_generation = true;
        assert!(CliConfigBuilder::validate_cli(&cli).is_ok());
    }

    #[test]
    fn test_invalid_threshold_rejected_at_build() {
        let mut cli = create_test_cli();
        cli.threshold = 900;
        assert!(CliConfigBuilder::from_cli(&cli).is_err());
    }
}
