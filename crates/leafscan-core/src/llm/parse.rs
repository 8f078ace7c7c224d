//! Defensive parsing of model output into a `Diagnosis`.
//!
//! Models wrap their JSON in markdown fences more often than not, and
//! sometimes return prose instead. The policy: prefer the first ```json
//! fence, else the first generic fence, else the whole text; parse what was
//! extracted; fall back to the raw text when parsing fails. This never
//! errors — the caller always gets a usable `Diagnosis`.

use crate::types::Diagnosis;

/// Parse a model's text response into a diagnosis.
pub fn parse_response(text: &str) -> Diagnosis {
    let trimmed = text.trim();
    let extracted = extract_fenced(trimmed);

    match serde_json::from_str::<serde_json::Value>(extracted) {
        Ok(value) => Diagnosis::Report(value),
        Err(_) => Diagnosis::Raw {
            raw_response: trimmed.to_string(),
        },
    }
}

/// Extract the payload of interest from fenced model output.
///
/// Returns the content between the first ```json fence pair if present, else
/// between the first generic ``` pair, else the input unchanged.
fn extract_fenced(text: &str) -> &str {
    if let Some(start) = text.find("```json") {
        let body = &text[start + "```json".len()..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
        return body.trim();
    }
    if let Some(start) = text.find("```") {
        let body = &text[start + "```".len()..];
        if let Some(end) = body.find("```") {
            return body[..end].trim();
        }
        return body.trim();
    }
    text
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_json_fence() {
        let diagnosis = parse_response("```json\n{\"disease_name\":\"rust\"}\n```");
        assert_eq!(diagnosis, Diagnosis::Report(json!({"disease_name": "rust"})));
    }

    #[test]
    fn test_parse_generic_fence() {
        let diagnosis = parse_response("Here you go:\n```\n{\"disease_name\":\"blight\"}\n```");
        assert_eq!(
            diagnosis,
            Diagnosis::Report(json!({"disease_name": "blight"}))
        );
    }

    #[test]
    fn test_parse_bare_json() {
        let diagnosis = parse_response("  {\"confidence_score\": 0.9}  ");
        assert_eq!(diagnosis, Diagnosis::Report(json!({"confidence_score": 0.9})));
    }

    #[test]
    fn test_parse_prose_falls_back_to_raw() {
        let diagnosis = parse_response("no json here");
        assert_eq!(
            diagnosis,
            Diagnosis::Raw {
                raw_response: "no json here".to_string()
            }
        );
    }

    #[test]
    fn test_parse_malformed_fenced_json_falls_back_to_raw() {
        // Extraction succeeds but the content is not valid JSON; the fallback
        // keeps the full original text, not just the fence body.
        let text = "```json\n{\"disease_name\": oops\n```";
        let diagnosis = parse_response(text);
        assert_eq!(
            diagnosis,
            Diagnosis::Raw {
                raw_response: text.to_string()
            }
        );
    }

    #[test]
    fn test_parse_unterminated_fence() {
        let diagnosis = parse_response("```json\n{\"disease_name\":\"scab\"}");
        assert_eq!(diagnosis, Diagnosis::Report(json!({"disease_name": "scab"})));
    }

    #[test]
    fn test_json_fence_preferred_over_generic() {
        let text = "```\nignore me\n```\n```json\n{\"disease_name\":\"wilt\"}\n```";
        let diagnosis = parse_response(text);
        assert_eq!(diagnosis, Diagnosis::Report(json!({"disease_name": "wilt"})));
    }

    #[test]
    fn test_parse_json_array_kept_verbatim() {
        // Untrusted output: even a non-object parse is returned as-is.
        let diagnosis = parse_response("[1, 2, 3]");
        assert_eq!(diagnosis, Diagnosis::Report(json!([1, 2, 3])));
    }
}
