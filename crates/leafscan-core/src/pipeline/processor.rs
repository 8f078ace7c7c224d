//! Per-image processing: encode once, diagnose, package, submit.
//!
//! The whole per-image step sits inside a single failure boundary: any fault
//! in reading, encoding, or model invocation becomes a `Diagnosis::Failed`
//! entry that is still submitted downstream. Failures are reported to the
//! webapp, not silently dropped, and never abort the batch.

use std::path::Path;

use crate::llm::{parse_response, ImageInput, VisionProvider, VisionRequest};
use crate::submit::WebAppClient;
use crate::types::{Diagnosis, SubmissionOutcome, SubmissionPayload};

/// Processes one image end to end.
pub struct ImageProcessor {
    provider: Box<dyn VisionProvider>,
    submitter: WebAppClient,
}

impl ImageProcessor {
    pub fn new(provider: Box<dyn VisionProvider>, submitter: WebAppClient) -> Self {
        Self {
            provider,
            submitter,
        }
    }

    /// Name of the configured vision provider.
    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Whether the configured provider is currently reachable.
    pub async fn provider_available(&self) -> bool {
        self.provider.is_available().await
    }

    /// Ask the vision model about an already-encoded image.
    ///
    /// Never errors: provider faults and unparseable output both collapse
    /// into a `Diagnosis` variant.
    pub async fn analyze(&self, image: &ImageInput) -> Diagnosis {
        let request = VisionRequest::diagnose_plant(image.clone());
        match self.provider.generate(&request).await {
            Ok(response) => {
                tracing::debug!(
                    provider = self.provider.name(),
                    model = %response.model,
                    latency_ms = response.latency_ms,
                    "Model responded"
                );
                parse_response(&response.text)
            }
            Err(e) => {
                tracing::warn!("Analysis failed: {e}");
                Diagnosis::failed(e)
            }
        }
    }

    /// Process a single image: read and encode once, diagnose, build the
    /// submission payload, and POST it.
    ///
    /// The base64 string from the single read is threaded through both the
    /// model request and the payload's `image_data`. When the file itself is
    /// unreadable the payload still goes out, carrying the fault as its
    /// analysis and an empty `image_data`.
    pub async fn process(&self, path: &Path) -> SubmissionOutcome {
        let image_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.to_string_lossy().into_owned());
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S").to_string();

        tracing::info!("Analyzing {image_name}");

        let (analysis, image_data) = match ImageInput::from_path(path) {
            Ok(image) => {
                let data = image.data.clone();
                (self.analyze(&image).await, data)
            }
            Err(e) => {
                tracing::warn!("Could not read {image_name}: {e}");
                (Diagnosis::failed(e), String::new())
            }
        };

        let payload = SubmissionPayload {
            timestamp,
            image_name: image_name.clone(),
            analysis,
            image_data,
            status: "completed".to_string(),
        };

        let outcome = self.submitter.submit(&payload).await;
        match &outcome {
            SubmissionOutcome::Accepted(id) => {
                tracing::info!("Processed {image_name} (id: {id})");
            }
            SubmissionOutcome::Rejected => {
                tracing::error!("Failed to process {image_name}");
            }
        }
        outcome
    }
}
