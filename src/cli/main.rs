//! Poster generation CLI tool
//!
//! Command-line interface for the full poster pipeline: generate a portrait
//! via the images API (or reuse an existing one), key out the backdrop, and
//! composite the cutout onto the poster template.

use super::config::CliConfigBuilder;
use crate::{
    config::{
        DEFAULT_FEATHER_SIGMA, DEFAULT_OFFSET_Y, DEFAULT_TARGET_WIDTH, DEFAULT_THRESHOLD,
    },
    generation::{
        openai::DEFAULT_MODEL, OpenAiBackend, DEFAULT_PORTRAIT_PROMPT, DEFAULT_PORTRAIT_SIZE,
    },
    processor::{PosterProcessor, PosterRequest},
    tracing_config::init_cli_tracing,
};
use anyhow::{Context, Result};
use clap::{Parser, ValueEnum};
use instant::Instant;
use std::path::PathBuf;
use tracing::info;

/// Poster generation CLI tool
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
#[command(name = "poster-forge")]
pub struct Cli {
    /// User photo forwarded to the generation backend
    #[arg(value_name = "INPUT", required_unless_present = "skip_generation")]
    pub input: Option<PathBuf>,

    /// Reference photo forwarded after the user photo (repeatable)
    #[arg(short, long, value_name = "PATH")]
    pub reference: Vec<PathBuf>,

    /// Background template the cutout is pasted onto
    #[arg(short, long, default_value = "templates/bg.jpg")]
    pub template: PathBuf,

    /// Final poster output path
    #[arg(short, long, default_value = "poster_final.png")]
    pub output: PathBuf,

    /// Where the raw generated portrait is written (and read with --skip-generation)
    #[arg(long, default_value = "portrait_stage.png")]
    pub stage_file: PathBuf,

    /// Where the intermediate cutout with alpha is written
    #[arg(long, default_value = "portrait_cutout.png")]
    pub cutout_file: PathBuf,

    /// Do not call the generation API; reuse the existing stage image
    #[arg(long)]
    pub skip_generation: bool,

    /// Chroma-key distance threshold
    #[arg(long, default_value_t = DEFAULT_THRESHOLD)]
    pub threshold: u32,

    /// Gaussian sigma for mask edge feathering (0 disables)
    #[arg(long, default_value_t = DEFAULT_FEATHER_SIGMA)]
    pub feather: f32,

    /// Width the cutout is scaled to before pasting
    #[arg(long, default_value_t = DEFAULT_TARGET_WIDTH)]
    pub target_width: u32,

    /// Vertical paste offset on the template
    #[arg(long, default_value_t = DEFAULT_OFFSET_Y, allow_negative_numbers = true)]
    pub offset_y: i64,

    /// Generation prompt override
    #[arg(long)]
    pub prompt: Option<String>,

    /// Image model used for generation
    #[arg(long, default_value = DEFAULT_MODEL)]
    pub model: String,

    /// Generated portrait size spec
    #[arg(long, default_value = DEFAULT_PORTRAIT_SIZE)]
    pub size: String,

    /// OpenAI API key (unused with --skip-generation)
    #[arg(long, env = "OPENAI_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// Output format [default: inferred from the output extension]
    #[arg(short, long, value_enum)]
    pub format: Option<CliOutputFormat>,

    /// JPEG quality (0-100)
    #[arg(long, default_value_t = 90)]
    pub jpeg_quality: u8,

    /// Enable verbose logging (-v: INFO, -vv: DEBUG, -vvv: TRACE)
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,
}

#[derive(Copy, Clone, PartialEq, Eq, ValueEnum, Debug)]
pub enum CliOutputFormat {
    Png,
    Jpeg,
}

pub async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_cli_tracing(cli.verbose).context("Failed to initialize tracing")?;

    CliConfigBuilder::validate_cli(&cli).context("Invalid CLI arguments")?;
    let config = CliConfigBuilder::from_cli(&cli).context("Failed to build configuration")?;

    info!("Starting poster pipeline");
    if let Some(input) = &cli.input {
        info!("User photo: {}", input.display());
    }
    info!(
        "Template: {}, output: {} ({})",
        cli.template.display(),
        cli.output.display(),
        config.output_format
    );

    let processor = if cli.skip_generation {
        PosterProcessor::new(config)
    } else {
        let api_key = cli
            .api_key
            .clone()
            .context("OPENAI_API_KEY is missing")?;
        let backend = OpenAiBackend::new(api_key)?.with_model(cli.model.clone());
        PosterProcessor::with_backend(config, Box::new(backend))
    }
    .context("Failed to create poster processor")?;

    let request = PosterRequest {
        user_photo: cli.input.clone(),
        references: cli.reference.clone(),
        prompt: cli
            .prompt
            .clone()
            .unwrap_or_else(|| DEFAULT_PORTRAIT_PROMPT.to_string()),
        size: cli.size.clone(),
        skip_generation: cli.skip_generation,
        stage_path: cli.stage_file.clone(),
        cutout_path: cli.cutout_file.clone(),
        template_path: cli.template.clone(),
        output_path: cli.output.clone(),
    };

    let start_time = Instant::now();
    let result = processor
        .process(&request)
        .await
        .context("Poster pipeline failed")?;

    let (width, height) = result.dimensions();
    info!(
        "Poster created: {} ({}x{}) in {:.2}s",
        cli.output.display(),
        width,
        height,
        start_time.elapsed().as_secs_f64()
    );
    println!("Saved: {}", cli.output.display());

    Ok(())
}
