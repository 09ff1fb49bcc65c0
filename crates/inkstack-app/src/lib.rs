//! inkstack application
//!
//! Native host that replays a recorded editing session through the core
//! editor and exports the operation history and the rendered drawing.

mod script;
mod session;

pub use script::{DEFAULT_INTERVAL_MS, Script, Step};
pub use session::{Args, Replay, SessionReport, parse_args, replay, run};

use inkstack_render::RendererError;
use std::path::PathBuf;
use thiserror::Error;

/// Application errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Usage: inkstack <script.json> [--out <dir>] ({0})")]
    Usage(String),
    #[error("IO error on {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid script: {0}")]
    Script(#[source] serde_json::Error),
    #[error("Failed to serialize session: {0}")]
    Serialize(#[source] serde_json::Error),
    #[error("Render error: {0}")]
    Render(#[from] RendererError),
}

/// Result type for application operations.
pub type AppResult<T> = Result<T, AppError>;
