//! Pulling a JSON document out of a model's free-text reply.
//!
//! Models wrap JSON in Markdown fences (```` ```json ... ``` ````), add a
//! sentence before or after it, or return the bare object. All three shapes
//! are accepted; anything else is a recoverable [`AiError`].

use serde::de::DeserializeOwned;

use crate::error::AiError;

/// Return the JSON text inside a reply.
pub fn extract_json(response: &str) -> Result<&str, AiError> {
    let trimmed = response.trim();

    if let Some(fence_start) = trimmed.find("```") {
        let after_fence = &trimmed[fence_start + 3..];
        // Skip the language tag (`json`, `JSON`, ...) up to the first newline.
        let body_start = after_fence
            .find('\n')
            .filter(|&nl| after_fence[..nl].trim().chars().all(|c| c.is_ascii_alphabetic()))
            .map(|nl| nl + 1)
            .unwrap_or(0);
        let body = &after_fence[body_start..];
        // A reply cut off mid-stream may lack the closing fence.
        let body = match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        };
        let body = body.trim();
        if body.is_empty() {
            return Err(AiError::ResponseParse("empty JSON block".to_string()));
        }
        return Ok(body);
    }

    let start = trimmed
        .find(['{', '['])
        .ok_or_else(|| AiError::ResponseParse("no JSON found in response".to_string()))?;
    let end = trimmed
        .rfind(['}', ']'])
        .filter(|&end| end > start)
        .ok_or_else(|| AiError::ResponseParse("unterminated JSON in response".to_string()))?;

    Ok(&trimmed[start..=end])
}

/// Extract and deserialize. Malformed JSON is a `ResponseParse` error; valid
/// JSON of the wrong shape is a `SchemaViolation`.
pub fn parse_json<T: DeserializeOwned>(response: &str) -> Result<T, AiError> {
    let json = extract_json(response)?;
    serde_json::from_str(json).map_err(|e| match e.classify() {
        serde_json::error::Category::Data => AiError::SchemaViolation(e.to_string()),
        _ => AiError::ResponseParse(e.to_string()),
    })
}
