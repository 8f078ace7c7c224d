//! Ollama backend for running diagnosis against a local vision model.
//!
//! Useful for field setups with no network uplink and for testing the
//! pipeline without burning API quota. Ollama needs no credential; the
//! diagnosis contract is enforced by requesting JSON output mode, so a
//! well-behaved model responds with a bare JSON object rather than fenced
//! markdown.

use super::provider::{VisionProvider, VisionRequest, VisionResponse};
use crate::error::PipelineError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

pub struct OllamaProvider {
    endpoint: String,
    model: String,
    client: reqwest::Client,
}

impl OllamaProvider {
    pub fn new(endpoint: &str, model: &str) -> Self {
        Self {
            endpoint: endpoint.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    fn diagnosis_body(&self, request: &VisionRequest) -> GenerateBody {
        GenerateBody {
            model: self.model.clone(),
            prompt: request.prompt.clone(),
            images: vec![request.image.data.clone()],
            format: "json",
            stream: false,
            options: ModelOptions {
                temperature: request.temperature,
                num_predict: request.max_tokens,
            },
        }
    }
}

/// `/api/generate` request, non-streaming, single inline image.
#[derive(Serialize)]
struct GenerateBody {
    model: String,
    prompt: String,
    images: Vec<String>,
    format: &'static str,
    stream: bool,
    options: ModelOptions,
}

#[derive(Serialize)]
struct ModelOptions {
    temperature: f32,
    num_predict: u32,
}

/// `/api/generate` response. Ollama reports faults (e.g. a model that was
/// never pulled) as an `error` field in the body.
#[derive(Deserialize)]
struct GenerateReply {
    #[serde(default)]
    response: String,
    #[serde(default)]
    error: Option<String>,
}

#[async_trait]
impl VisionProvider for OllamaProvider {
    fn name(&self) -> &str {
        "ollama"
    }

    async fn is_available(&self) -> bool {
        // Cheapest liveness probe the API offers
        let url = format!("{}/api/version", self.endpoint);
        self.client
            .get(&url)
            .timeout(Duration::from_secs(5))
            .send()
            .await
            .map(|resp| resp.status().is_success())
            .unwrap_or(false)
    }

    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse, PipelineError> {
        let url = format!("{}/api/generate", self.endpoint);
        let start = Instant::now();

        let resp = self
            .client
            .post(&url)
            .json(&self.diagnosis_body(request))
            .timeout(self.timeout())
            .send()
            .await
            .map_err(|e| PipelineError::Llm {
                message: format!("Ollama unreachable at {}: {e}", self.endpoint),
                status_code: None,
            })?;

        let status = resp.status();
        let reply: GenerateReply = resp.json().await.map_err(|e| PipelineError::Llm {
            message: format!("Unparseable Ollama reply (HTTP {status}): {e}"),
            status_code: Some(status.as_u16()),
        })?;

        if let Some(error) = reply.error {
            return Err(PipelineError::Llm {
                message: format!("Ollama refused the request: {error}"),
                status_code: status.is_success().then_some(status.as_u16()),
            });
        }

        let text = reply.response.trim().to_string();
        if text.is_empty() {
            return Err(PipelineError::Llm {
                message: format!("Model {} produced no output", self.model),
                status_code: None,
            });
        }

        Ok(VisionResponse {
            text,
            model: self.model.clone(),
            latency_ms: start.elapsed().as_millis() as u64,
        })
    }

    fn timeout(&self) -> Duration {
        // A local vision model on modest hardware needs minutes, not seconds
        Duration::from_secs(120)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::ImageInput;

    #[test]
    fn test_endpoint_trailing_slash_trimmed() {
        let provider = OllamaProvider::new("http://localhost:11434/", "llava");
        assert_eq!(provider.endpoint, "http://localhost:11434");
    }

    #[test]
    fn test_diagnosis_body_shape() {
        let provider = OllamaProvider::new("http://localhost:11434", "llava");
        let image = ImageInput::from_bytes(&[0xFF, 0xD8], "jpeg");
        let request = VisionRequest::diagnose_plant(image);

        let body = serde_json::to_value(provider.diagnosis_body(&request)).unwrap();
        assert_eq!(body["model"], "llava");
        assert_eq!(body["format"], "json");
        assert_eq!(body["stream"], false);
        assert_eq!(body["images"].as_array().unwrap().len(), 1);
        assert_eq!(body["options"]["num_predict"], 1024);
    }

    #[test]
    fn test_reply_error_field_deserializes() {
        let reply: GenerateReply =
            serde_json::from_str(r#"{"error":"model 'llava' not found"}"#).unwrap();
        assert_eq!(reply.error.as_deref(), Some("model 'llava' not found"));
        assert!(reply.response.is_empty());
    }
}
