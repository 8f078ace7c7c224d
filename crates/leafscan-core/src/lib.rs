//! Leafscan Core - Embeddable plant disease diagnosis library.
//!
//! Leafscan scans a folder for plant images, asks a vision language model for
//! a disease diagnosis per image, and forwards the result plus the original
//! image bytes to a downstream web service.
//!
//! # Architecture
//!
//! A straight-line sequential pipeline, one image at a time:
//!
//! ```text
//! Folder → Discover → Read + Encode → Vision model → Parse → POST to webapp
//! ```
//!
//! Per-image faults become data (an `{"error": ...}` analysis) and are still
//! submitted; only the initial folder validation can abort a run.
//!
//! # Usage
//!
//! ```rust,ignore
//! use leafscan_core::{Config, Pipeline};
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load()?;
//!     let pipeline = Pipeline::from_config(&config)?;
//!     let summary = pipeline.run(&config.image_dir()).await?;
//!     println!("Submitted {} of {}", summary.submitted, summary.total());
//!     Ok(())
//! }
//! ```

// Module declarations
pub mod config;
pub mod error;
pub mod llm;
pub mod pipeline;
pub mod submit;
pub mod types;

// Re-exports for convenient access
pub use config::Config;
pub use error::{ConfigError, PipelineError, PipelineResult};
pub use llm::{ImageInput, VisionProvider, VisionProviderFactory, VisionRequest, VisionResponse};
pub use pipeline::{DiscoveredFile, FileDiscovery, ImageProcessor, Pipeline};
pub use submit::WebAppClient;
pub use types::{BatchSummary, Diagnosis, SubmissionOutcome, SubmissionPayload};

/// Library version.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version() {
        assert!(!VERSION.is_empty());
    }

    #[test]
    fn test_pipeline_from_default_config_needs_api_key() {
        // Default provider is gemini; without GOOGLE_API_KEY in the
        // environment the factory must fail fast rather than start a run.
        std::env::remove_var("GOOGLE_API_KEY");
        let config = Config::default();
        assert!(Pipeline::from_config(&config).is_err());
    }

    #[test]
    fn test_pipeline_from_ollama_config() {
        let mut config = Config::default();
        config.llm.provider = "ollama".to_string();
        assert!(Pipeline::from_config(&config).is_ok());
    }
}
