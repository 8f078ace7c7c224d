//! Core data types shared across the diagnosis pipeline.

use serde::{Deserialize, Serialize};

/// The outcome of asking the vision model about one image.
///
/// The model's output is untrusted free text coerced into JSON, so this is a
/// tagged union of three shapes rather than a fixed schema. `untagged` makes
/// each variant serialize as its natural JSON shape: a `Report` is the parsed
/// object verbatim, the fallbacks are single-key objects.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Diagnosis {
    /// Extracted text failed to parse as JSON — keep the model's words.
    Raw { raw_response: String },

    /// Something faulted before a response could be parsed (file read,
    /// encoding, model invocation). The message carries an `Error: ` prefix.
    Failed { error: String },

    /// The model's JSON, parsed verbatim. Expected keys are `disease_name`,
    /// `symptoms`, `treatment`, `confidence_score`, `affected_areas`, but
    /// nothing guarantees they are present or correctly typed.
    Report(serde_json::Value),
}

impl Diagnosis {
    /// Wrap a fault message as a `Failed` diagnosis.
    pub fn failed(message: impl std::fmt::Display) -> Self {
        Diagnosis::Failed {
            error: format!("Error: {message}"),
        }
    }

    /// Whether this diagnosis records a processing fault.
    pub fn is_failed(&self) -> bool {
        matches!(self, Diagnosis::Failed { .. })
    }
}

/// One record POSTed to the downstream webapp, built fresh per image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionPayload {
    /// Local time, formatted `YYYY-MM-DD HH:MM:SS`
    pub timestamp: String,
    /// Base filename of the image
    pub image_name: String,
    /// Model output (or fallback) for this image
    pub analysis: Diagnosis,
    /// Base64-encoded original image bytes
    pub image_data: String,
    /// Always "completed" — the webapp's ingest contract
    pub status: String,
}

/// What the downstream webapp said about one submission.
///
/// An id is valid iff its string form is non-empty; numeric ids (including 0)
/// are coerced to their decimal string so a zero id is not mistaken for
/// failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SubmissionOutcome {
    /// The webapp accepted the payload and returned an identifier.
    Accepted(String),
    /// The payload was not accepted: endpoint unset, non-200 status,
    /// transport fault, or a response without a usable id.
    Rejected,
}

impl SubmissionOutcome {
    pub fn is_accepted(&self) -> bool {
        matches!(self, SubmissionOutcome::Accepted(_))
    }
}

/// Counts for one batch run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BatchSummary {
    /// Images whose payload was accepted by the webapp
    pub submitted: u64,
    /// Images whose submission was rejected or failed
    pub failed: u64,
}

impl BatchSummary {
    pub fn total(&self) -> u64 {
        self.submitted + self.failed
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_report_serializes_verbatim() {
        let diagnosis = Diagnosis::Report(json!({"disease_name": "rust"}));
        let value = serde_json::to_value(&diagnosis).unwrap();
        assert_eq!(value, json!({"disease_name": "rust"}));
    }

    #[test]
    fn test_raw_serializes_as_single_key_object() {
        let diagnosis = Diagnosis::Raw {
            raw_response: "no json here".to_string(),
        };
        let value = serde_json::to_value(&diagnosis).unwrap();
        assert_eq!(value, json!({"raw_response": "no json here"}));
    }

    #[test]
    fn test_failed_carries_error_prefix() {
        let diagnosis = Diagnosis::failed("boom");
        let value = serde_json::to_value(&diagnosis).unwrap();
        assert_eq!(value, json!({"error": "Error: boom"}));
        assert!(diagnosis.is_failed());
    }

    #[test]
    fn test_payload_shape() {
        let payload = SubmissionPayload {
            timestamp: "2026-01-01 12:00:00".to_string(),
            image_name: "leaf.jpg".to_string(),
            analysis: Diagnosis::Report(json!({"disease_name": "mildew"})),
            image_data: "aGVsbG8=".to_string(),
            status: "completed".to_string(),
        };
        let value = serde_json::to_value(&payload).unwrap();
        assert_eq!(value["status"], "completed");
        assert_eq!(value["image_name"], "leaf.jpg");
        assert_eq!(value["analysis"]["disease_name"], "mildew");
    }

    #[test]
    fn test_outcome_accepted() {
        assert!(SubmissionOutcome::Accepted("42".to_string()).is_accepted());
        assert!(!SubmissionOutcome::Rejected.is_accepted());
    }
}
