use serde::{Deserialize, Serialize};

use crate::{
    error::{ErrorCategory, RelayError, Result},
    schemas::{CompletionSchema, SchemaHandle},
};

/// Success body returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelaySuccess {
    pub text: String,
}

/// Failure body returned by the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RelayFailure {
    pub error: ErrorCategory,
    pub message: String,
}

/// Removes a surrounding Markdown code fence (```json ... ```), if any.
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };

    let body = skip_info_string(rest).trim_end();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Drops a language tag ("json", "JSON", ...) after the opening fence, whether
/// the payload starts on the next line or on the same one.
fn skip_info_string(rest: &str) -> &str {
    let tag_len = rest
        .find(|c: char| !c.is_ascii_alphabetic())
        .unwrap_or(rest.len());
    let after_tag = &rest[tag_len..];
    match after_tag.chars().next() {
        None => after_tag,
        Some(c) if c.is_whitespace() || c == '{' || c == '[' => after_tag,
        Some(_) => rest,
    }
}

/// Parses model text into `T`, tolerating a code fence around the JSON.
pub fn parse_structured_text<T>(raw: &str) -> Result<T>
where
    T: CompletionSchema,
{
    let schema = T::schema();
    deserialize_structured_response::<T>(strip_code_fences(raw), schema)
}

fn deserialize_structured_response<T>(payload: &str, schema: &SchemaHandle) -> Result<T>
where
    T: CompletionSchema,
{
    let mut deserializer = serde_json::Deserializer::from_str(payload);
    let value = serde_path_to_error::deserialize(&mut deserializer).map_err(|err| {
        let path = err.path().to_string();
        let location = if path.is_empty() || path == "." {
            "<root>".to_string()
        } else {
            path
        };
        RelayError::Processing(format!(
            "failed to read `{}` at {}: {}",
            schema.schema_name(),
            location,
            err.inner()
        ))
    })?;

    deserializer
        .end()
        .map_err(|err| RelayError::Processing(format!("trailing data after JSON: {err}")))?;

    Ok(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        let raw = "```json\n{\"a\": 1}\n```";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn strips_bare_fence_and_whitespace() {
        let raw = "  ```\n{\"a\": 1}\n```  \n";
        assert_eq!(strip_code_fences(raw), "{\"a\": 1}");
    }

    #[test]
    fn unfenced_text_is_only_trimmed() {
        assert_eq!(strip_code_fences("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn single_line_fence_is_stripped() {
        assert_eq!(strip_code_fences("```json {\"a\": 1} ```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```JSON{\"a\": 1}```"), "{\"a\": 1}");
        assert_eq!(strip_code_fences("```[1, 2]```"), "[1, 2]");
    }

    #[test]
    fn single_line_fenced_itinerary_parses_like_bare_json() {
        let bare = r#"{"days":[],"estimatedTotalCost":"x","tips":[]}"#;
        let fenced = format!("```json {bare} ```");

        let expected: crate::types::Itinerary = parse_structured_text(bare).unwrap();
        let parsed: crate::types::Itinerary = parse_structured_text(&fenced).unwrap();
        assert_eq!(parsed, expected);
    }

    #[test]
    fn unterminated_fence_keeps_body() {
        assert_eq!(strip_code_fences("```json\n{\"a\": 1}"), "{\"a\": 1}");
    }

    #[test]
    fn failure_body_uses_tag() {
        let failure = RelayError::Network("down".into()).to_error_payload();
        let value = serde_json::to_value(&failure).unwrap();
        assert_eq!(value["error"], "NETWORK_ERROR");
        assert_eq!(value["message"], ErrorCategory::NetworkError.user_message());
    }
}
