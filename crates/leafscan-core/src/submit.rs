//! Submission client for the downstream webapp.
//!
//! One POST per image, JSON body, fixed timeout. Failures are reported as a
//! `SubmissionOutcome::Rejected` value rather than an error — a rejected
//! submission must never abort the batch.

use crate::types::{SubmissionOutcome, SubmissionPayload};
use std::time::Duration;

/// HTTP client for the downstream diagnosis endpoint.
pub struct WebAppClient {
    /// None when no endpoint is configured — submissions are skipped.
    endpoint: Option<String>,
    timeout: Duration,
    client: reqwest::Client,
}

impl WebAppClient {
    /// Create a client for the given endpoint URL.
    ///
    /// An empty URL disables submission: `submit` warns and returns
    /// `Rejected` without touching the network.
    pub fn new(endpoint: &str, timeout_secs: u64) -> Self {
        let endpoint = if endpoint.trim().is_empty() {
            None
        } else {
            Some(endpoint.trim().to_string())
        };
        Self {
            endpoint,
            timeout: Duration::from_secs(timeout_secs),
            client: reqwest::Client::new(),
        }
    }

    /// Whether an endpoint is configured.
    pub fn is_configured(&self) -> bool {
        self.endpoint.is_some()
    }

    /// POST one payload to the webapp.
    ///
    /// Returns `Accepted(id)` only for an HTTP 200 response whose JSON body
    /// carries a usable `id`. Everything else — unset endpoint, transport
    /// fault, non-200 status, malformed body, missing id — is `Rejected`.
    /// No retry, no backoff.
    pub async fn submit(&self, payload: &SubmissionPayload) -> SubmissionOutcome {
        let Some(endpoint) = &self.endpoint else {
            tracing::warn!("Webapp endpoint not configured — skipping submission");
            return SubmissionOutcome::Rejected;
        };

        let resp = match self
            .client
            .post(endpoint)
            .json(payload)
            .timeout(self.timeout)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                tracing::error!("Failed to send to webapp: {e}");
                return SubmissionOutcome::Rejected;
            }
        };

        let status = resp.status();
        if status != reqwest::StatusCode::OK {
            tracing::error!("Webapp rejected submission: HTTP {status}");
            return SubmissionOutcome::Rejected;
        }

        let body: serde_json::Value = match resp.json().await {
            Ok(body) => body,
            Err(e) => {
                tracing::error!("Malformed webapp response: {e}");
                return SubmissionOutcome::Rejected;
            }
        };

        match extract_id(&body) {
            Some(id) => SubmissionOutcome::Accepted(id),
            None => {
                tracing::error!("Webapp response missing a usable id field");
                SubmissionOutcome::Rejected
            }
        }
    }
}

/// Pull a non-empty opaque identifier out of the webapp response body.
///
/// Numeric ids are coerced to their decimal string so a zero id is still a
/// valid identifier rather than a falsy failure.
fn extract_id(body: &serde_json::Value) -> Option<String> {
    match body.get("id")? {
        serde_json::Value::String(s) if !s.is_empty() => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
