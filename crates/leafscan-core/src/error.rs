//! Error types for the leafscan diagnosis pipeline.
//!
//! Two independent families: `ConfigError` for everything that can go wrong
//! before a run starts, `PipelineError` for faults during one. The CLI wraps
//! both in `anyhow` at the top, so no unifying enum is needed.

use std::path::PathBuf;
use thiserror::Error;

/// Configuration-specific errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to read the config file from disk
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] std::io::Error),

    /// Failed to parse TOML configuration
    #[error("Failed to parse config: {0}")]
    ParseError(#[from] toml::de::Error),

    /// Configuration values are invalid
    #[error("Invalid configuration: {0}")]
    ValidationError(String),
}

/// Pipeline processing errors, organized by stage.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// Image folder does not exist or is not a directory
    #[error("Image folder not found: {0}")]
    FolderNotFound(PathBuf),

    /// Image folder contains no supported image files
    #[error("No supported images found in {0}")]
    NoImages(PathBuf),

    /// Reading image bytes from disk failed
    #[error("Failed to read {path}: {message}")]
    Read { path: PathBuf, message: String },

    /// Vision model invocation failed
    #[error("Vision model error: {message}")]
    Llm {
        message: String,
        status_code: Option<u16>,
    },

    /// Submission to the downstream webapp failed
    #[error("Submission error: {message}")]
    Submit {
        message: String,
        status_code: Option<u16>,
    },
}

/// Convenience type alias for pipeline-specific results.
pub type PipelineResult<T> = std::result::Result<T, PipelineError>;
