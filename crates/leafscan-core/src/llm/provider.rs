//! Vision model provider trait and request/response types.
//!
//! Defines the interface that all vision providers implement, plus the
//! factory that creates the right provider from config and CLI overrides.

use crate::config::LlmConfig;
use crate::error::PipelineError;
use async_trait::async_trait;
use base64::Engine;
use std::path::Path;
use std::time::Duration;

/// Base64-encoded image ready to send to a vision model API.
#[derive(Debug, Clone)]
pub struct ImageInput {
    /// Base64-encoded image bytes
    pub data: String,
    /// MIME type (e.g., "image/jpeg", "image/png")
    pub media_type: String,
}

impl ImageInput {
    /// Create an `ImageInput` from raw bytes and format string.
    ///
    /// The format is the image format identifier (e.g., "jpeg", "png").
    pub fn from_bytes(bytes: &[u8], format: &str) -> Self {
        let media_type = match format {
            "jpeg" | "jpg" => "image/jpeg",
            "png" => "image/png",
            other => {
                tracing::warn!("Unknown image format '{other}', defaulting to image/jpeg");
                "image/jpeg"
            }
        };

        Self {
            data: base64::engine::general_purpose::STANDARD.encode(bytes),
            media_type: media_type.to_string(),
        }
    }

    /// Read a file and encode it, deriving the format from the extension.
    ///
    /// The file handle is scoped to the read; bytes are encoded once and the
    /// base64 string is reused for both the model request and the submission
    /// payload.
    pub fn from_path(path: &Path) -> Result<Self, PipelineError> {
        let bytes = std::fs::read(path).map_err(|e| PipelineError::Read {
            path: path.to_path_buf(),
            message: e.to_string(),
        })?;
        let format = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_lowercase())
            .unwrap_or_default();
        Ok(Self::from_bytes(&bytes, &format))
    }
}

/// A request to diagnose a plant image.
#[derive(Debug, Clone)]
pub struct VisionRequest {
    /// The image to diagnose
    pub image: ImageInput,
    /// Text prompt for the model
    pub prompt: String,
    /// Maximum tokens to generate
    pub max_tokens: u32,
    /// Sampling temperature
    pub temperature: f32,
}

impl VisionRequest {
    /// Build a plant diagnosis request for an image.
    ///
    /// The prompt asks for exactly five fields and JSON-only formatting so the
    /// response can be parsed into a structured diagnosis.
    pub fn diagnose_plant(image: ImageInput) -> Self {
        let prompt = "You are an expert agricultural assistant. \
                      Analyze the image of this plant and provide the following:\n\n\
                      1. Name of the disease (if any)\n\
                      2. Description of symptoms\n\
                      3. Suggested treatment or medicine\n\
                      4. Probability/confidence score of the diagnosis\n\
                      5. Affected areas in the image (for heat mapping)\n\n\
                      Format your response as a JSON object with these keys: \
                      disease_name, symptoms, treatment, confidence_score, affected_areas."
            .to_string();

        Self {
            image,
            prompt,
            max_tokens: 1024,
            temperature: 0.2,
        }
    }
}

/// The response from a vision model call.
#[derive(Debug, Clone)]
pub struct VisionResponse {
    /// Generated text (hopefully JSON-shaped, but untrusted)
    pub text: String,
    /// Model identifier used
    pub model: String,
    /// Round-trip latency in milliseconds
    pub latency_ms: u64,
}

/// Trait that all vision model providers implement.
///
/// Uses `async_trait` because native async fn in trait is not object-safe
/// (we need `Box<dyn VisionProvider>` for dynamic dispatch).
#[async_trait]
pub trait VisionProvider: Send + Sync {
    /// Provider name for logging (e.g., "gemini", "ollama").
    fn name(&self) -> &str;

    /// Check whether the provider is configured and reachable.
    async fn is_available(&self) -> bool;

    /// Generate a diagnosis for the given request.
    async fn generate(&self, request: &VisionRequest) -> Result<VisionResponse, PipelineError>;

    /// Per-request timeout for this provider.
    fn timeout(&self) -> Duration;
}

impl std::fmt::Debug for dyn VisionProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "VisionProvider({})", self.name())
    }
}

/// Resolve `${ENV_VAR}` references in config strings.
pub fn resolve_env_var(value: &str) -> Option<String> {
    if value.starts_with("${") && value.ends_with('}') {
        let var_name = &value[2..value.len() - 1];
        std::env::var(var_name).ok()
    } else if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Factory that creates the appropriate provider from config and overrides.
pub struct VisionProviderFactory;

impl VisionProviderFactory {
    /// Create a vision provider based on provider name, config, and optional
    /// model override.
    ///
    /// # Arguments
    /// * `provider` - Provider identifier ("gemini", "ollama")
    /// * `config` - The full LLM config section
    /// * `model_override` - Optional model name that overrides the config default
    pub fn create(
        provider: &str,
        config: &LlmConfig,
        model_override: Option<&str>,
    ) -> Result<Box<dyn VisionProvider>, PipelineError> {
        match provider {
            "gemini" => {
                let cfg = config.gemini.clone().unwrap_or_default();
                let api_key = resolve_env_var(&cfg.api_key).ok_or_else(|| PipelineError::Llm {
                    message: "Gemini API key not set. Set GOOGLE_API_KEY env var.".to_string(),
                    status_code: None,
                })?;
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Box::new(super::gemini::GeminiProvider::new(
                    &api_key, &model,
                )))
            }
            "ollama" => {
                let cfg = config.ollama.clone().unwrap_or_default();
                let model = model_override
                    .map(String::from)
                    .unwrap_or(cfg.model.clone());
                Ok(Box::new(super::ollama::OllamaProvider::new(
                    &cfg.endpoint,
                    &model,
                )))
            }
            other => Err(PipelineError::Llm {
                message: format!("Unknown vision provider: {other}"),
                status_code: None,
            }),
        }
    }
}
