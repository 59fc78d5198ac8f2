//! Response normalization: raw completion text → [`Answer`].
//!
//! Models under a JSON-only contract still wrap their output in markdown
//! code fences often enough that stripping the common forms is required for
//! a usable pipeline. Beyond that, no semantic repair is attempted: a
//! completion that is not one of the two expected shapes is reported as a
//! [`Answer::ParseFailure`] with the raw text intact, so a human can
//! diagnose prompt drift.

use docquery_core::{Answer, Reference};

/// Strip surrounding whitespace and the common markdown code-fence forms
/// (```` ```json ```` / ```` ``` ````). Each step is idempotent; already
/// clean text passes through unchanged.
fn strip_code_fence(text: &str) -> &str {
    let mut cleaned = text.trim();
    if let Some(rest) = cleaned.strip_prefix("```json") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_prefix("```") {
        cleaned = rest;
    }
    if let Some(rest) = cleaned.strip_suffix("```") {
        cleaned = rest;
    }
    cleaned.trim()
}

/// Classify a raw completion as references, a not-found signal, or a parse
/// failure.
///
/// - a JSON object with a non-empty string `error` → [`Answer::NotFound`]
/// - a JSON object whose `references` is a non-empty array of well-formed
///   reference objects → [`Answer::References`]
/// - anything else → [`Answer::ParseFailure`] carrying the original text
pub fn parse_completion(raw: &str) -> Answer {
    let cleaned = strip_code_fence(raw);

    let Ok(value) = serde_json::from_str::<serde_json::Value>(cleaned) else {
        return Answer::ParseFailure { raw: raw.to_string() };
    };

    if let Some(message) = value.get("error").and_then(|v| v.as_str()) {
        if !message.is_empty() {
            return Answer::NotFound { message: message.to_string() };
        }
    }

    if let Some(entries) = value.get("references").and_then(|v| v.as_array()) {
        if !entries.is_empty() {
            if let Ok(references) =
                serde_json::from_value::<Vec<Reference>>(value["references"].clone())
            {
                return Answer::References { references };
            }
        }
    }

    Answer::ParseFailure { raw: raw.to_string() }
}
