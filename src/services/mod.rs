//! Service layer for I/O and format concerns
//!
//! Keeps file handling separate from the pixel-level pipeline stages.

mod format;
mod io;

pub use format::OutputFormatHandler;
pub use io::ImageIOService;
