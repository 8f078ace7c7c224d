//! The sequential batch diagnosis pipeline.
//!
//! Control flow is a straight line: discover files, then for each file read →
//! diagnose → submit, one image start-to-finish before the next. The only
//! shared state across iterations is the fixed configuration established at
//! construction.

pub mod discovery;
pub mod processor;

pub use discovery::{DiscoveredFile, FileDiscovery};
pub use processor::ImageProcessor;

use std::path::Path;

use crate::config::Config;
use crate::error::PipelineResult;
use crate::llm::VisionProviderFactory;
use crate::submit::WebAppClient;
use crate::types::{BatchSummary, SubmissionOutcome};

/// The batch diagnosis pipeline: discovery + per-image processing.
pub struct Pipeline {
    discovery: FileDiscovery,
    processor: ImageProcessor,
}

impl Pipeline {
    /// Assemble a pipeline from pre-built parts (used by tests and callers
    /// that construct their own provider).
    pub fn new(discovery: FileDiscovery, processor: ImageProcessor) -> Self {
        Self {
            discovery,
            processor,
        }
    }

    /// Build a pipeline from configuration.
    ///
    /// Fails fast when the provider cannot be constructed, e.g. a missing
    /// API key — before any file is read or any request is sent.
    pub fn from_config(config: &Config) -> PipelineResult<Self> {
        let provider = VisionProviderFactory::create(&config.llm.provider, &config.llm, None)?;
        tracing::debug!(provider = provider.name(), "Vision provider ready");

        let submitter = WebAppClient::new(&config.submit.endpoint, config.submit.timeout_secs);
        if !submitter.is_configured() {
            tracing::warn!("No webapp endpoint configured — results will not be submitted");
        }

        Ok(Self::new(
            FileDiscovery::new(&config.general.supported_formats),
            ImageProcessor::new(provider, submitter),
        ))
    }

    /// Name of the configured vision provider.
    pub fn provider_name(&self) -> &str {
        self.processor.provider_name()
    }

    /// Probe the provider before the batch starts.
    ///
    /// Returns `false` when the provider reports itself unreachable (e.g. a
    /// stopped Ollama daemon). Callers warn and may still proceed; per-image
    /// calls will surface the concrete error.
    pub async fn preflight(&self) -> bool {
        self.processor.provider_available().await
    }

    /// Discover the images to process in `folder`.
    pub fn discover(&self, folder: &Path) -> PipelineResult<Vec<DiscoveredFile>> {
        self.discovery.discover(folder)
    }

    /// Process all discovered files sequentially.
    ///
    /// Calls `on_result` after each image so the CLI can tick its progress
    /// bar. One failed image never stops the batch.
    pub async fn run_batch<F>(&self, files: &[DiscoveredFile], on_result: F) -> BatchSummary
    where
        F: Fn(&DiscoveredFile, &SubmissionOutcome),
    {
        let mut summary = BatchSummary::default();

        for file in files {
            let outcome = self.processor.process(&file.path).await;
            match outcome {
                SubmissionOutcome::Accepted(_) => summary.submitted += 1,
                SubmissionOutcome::Rejected => summary.failed += 1,
            }
            on_result(file, &outcome);
        }

        summary
    }

    /// Validate the folder, then run the whole batch.
    ///
    /// Only the folder validation can abort the run; per-image failures are
    /// counted in the returned summary.
    pub async fn run(&self, folder: &Path) -> PipelineResult<BatchSummary> {
        let files = self.discover(folder)?;
        tracing::info!("Found {} image(s) in {}", files.len(), folder.display());
        Ok(self.run_batch(&files, |_, _| {}).await)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::PipelineError;
    use crate::llm::{VisionProvider, VisionRequest, VisionResponse};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;
    use std::time::Duration;

    /// Counts model invocations; fails every call when `fail` is set.
    struct CountingProvider {
        calls: Arc<AtomicU32>,
        fail: bool,
    }

    #[async_trait]
    impl VisionProvider for CountingProvider {
        fn name(&self) -> &str {
            "counting"
        }

        async fn is_available(&self) -> bool {
            !self.fail
        }

        async fn generate(
            &self,
            _request: &VisionRequest,
        ) -> Result<VisionResponse, PipelineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(PipelineError::Llm {
                    message: "synthetic failure".to_string(),
                    status_code: Some(500),
                });
            }
            Ok(VisionResponse {
                text: "{\"disease_name\":\"none\"}".to_string(),
                model: "counting-v1".to_string(),
                latency_ms: 1,
            })
        }

        fn timeout(&self) -> Duration {
            Duration::from_secs(5)
        }
    }

    fn pipeline_with(fail: bool) -> (Pipeline, Arc<AtomicU32>) {
        let calls = Arc::new(AtomicU32::new(0));
        let provider = CountingProvider {
            calls: calls.clone(),
            fail,
        };
        let pipeline = Pipeline::new(
            FileDiscovery::new(&["jpg".to_string(), "jpeg".to_string(), "png".to_string()]),
            // Endpoint unset: every submission is rejected without network I/O
            ImageProcessor::new(Box::new(provider), WebAppClient::new("", 30)),
        );
        (pipeline, calls)
    }

    fn folder_with_images(count: usize) -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        for i in 0..count {
            std::fs::write(dir.path().join(format!("leaf_{i}.jpg")), [0xFF, 0xD8]).unwrap();
        }
        dir
    }

    #[tokio::test]
    async fn test_preflight_reports_provider_availability() {
        let (healthy, _) = pipeline_with(false);
        assert!(healthy.preflight().await);
        assert_eq!(healthy.provider_name(), "counting");

        let (broken, _) = pipeline_with(true);
        assert!(!broken.preflight().await);
    }

    #[tokio::test]
    async fn test_run_missing_folder_makes_zero_calls() {
        let (pipeline, calls) = pipeline_with(false);
        let err = pipeline
            .run(Path::new("/nonexistent/plants"))
            .await
            .unwrap_err();
        assert!(matches!(err, PipelineError::FolderNotFound(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_run_empty_folder_makes_zero_calls() {
        let (pipeline, calls) = pipeline_with(false);
        let dir = tempfile::tempdir().unwrap();
        let err = pipeline.run(dir.path()).await.unwrap_err();
        assert!(matches!(err, PipelineError::NoImages(_)));
        assert_eq!(calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_batch_processes_every_image() {
        let (pipeline, calls) = pipeline_with(false);
        let dir = folder_with_images(4);

        let files = pipeline.discover(dir.path()).unwrap();
        assert_eq!(files.len(), 4);

        let seen = Arc::new(AtomicU32::new(0));
        let seen_cb = seen.clone();
        let summary = pipeline
            .run_batch(&files, move |_, _| {
                seen_cb.fetch_add(1, Ordering::SeqCst);
            })
            .await;

        // One model call per image, one callback per image
        assert_eq!(calls.load(Ordering::SeqCst), 4);
        assert_eq!(seen.load(Ordering::SeqCst), 4);
        assert_eq!(summary.total(), 4);
    }

    #[tokio::test]
    async fn test_batch_does_not_short_circuit_on_failures() {
        // Every model call fails, yet every image is still processed
        let (pipeline, calls) = pipeline_with(true);
        let dir = folder_with_images(3);

        let summary = pipeline.run(dir.path()).await.unwrap();
        assert_eq!(calls.load(Ordering::SeqCst), 3);
        assert_eq!(summary.failed, 3);
        assert_eq!(summary.submitted, 0);
    }
}
