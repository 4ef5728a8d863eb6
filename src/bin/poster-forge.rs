//! Poster Forge CLI Tool
//!
//! Command-line interface for the poster pipeline: portrait generation,
//! chroma-key cutout, and template compositing.

#[cfg(feature = "cli")]
use poster_forge::cli;

#[cfg(feature = "cli")]
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    cli::main().await
}

#[cfg(not(feature = "cli"))]
fn main() {
    panic!("CLI feature not enabled. Please rebuild with --features cli");
}
