use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::{debug, warn};

use super::{response_handler::extract_text, ModelBackend};
use crate::{
    config::{DEFAULT_BASE_URL, DEFAULT_MODEL},
    error::{ErrorCategory, RelayError, Result},
    types::{ChatMessage, Envelope, RequestKind, Role},
};

const API_KEY_HEADER: &str = "x-goog-api-key";
const SAFETY_THRESHOLD: &str = "BLOCK_MEDIUM_AND_ABOVE";
const SAFETY_CATEGORIES: [&str; 4] = [
    "HARM_CATEGORY_HARASSMENT",
    "HARM_CATEGORY_HATE_SPEECH",
    "HARM_CATEGORY_SEXUALLY_EXPLICIT",
    "HARM_CATEGORY_DANGEROUS_CONTENT",
];

/// Sampling parameters chosen per request kind.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerationConfig {
    pub temperature: f32,
    pub max_output_tokens: u32,
}

impl GenerationConfig {
    pub fn for_kind(kind: RequestKind) -> Self {
        match kind {
            RequestKind::Itinerary => Self {
                temperature: 0.7,
                max_output_tokens: 8192,
            },
            RequestKind::Generate | RequestKind::Translate => Self {
                temperature: 0.8,
                max_output_tokens: 2048,
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Part {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<&'static str>,
    pub parts: Vec<Part>,
}

impl Content {
    fn text(role: Option<&'static str>, text: impl Into<String>) -> Self {
        Self {
            role,
            parts: vec![Part { text: text.into() }],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SafetySetting {
    pub category: &'static str,
    pub threshold: &'static str,
}

/// Body of a `generateContent` call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateContentRequest {
    pub contents: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub system_instruction: Option<Content>,
    pub generation_config: GenerationConfig,
    pub safety_settings: Vec<SafetySetting>,
}

impl GenerateContentRequest {
    pub fn from_envelope(envelope: &Envelope, kind: RequestKind) -> Self {
        let (contents, system_instruction) = match envelope {
            Envelope::Single {
                prompt,
                system_prompt,
            } => {
                let text = match system_prompt {
                    Some(system) => format!("{system}\n\nUser: {prompt}"),
                    None => prompt.clone(),
                };
                (vec![Content::text(Some("user"), text)], None)
            }
            Envelope::Chat {
                messages,
                system_prompt,
            } => (
                messages.iter().map(chat_content).collect(),
                system_prompt
                    .as_ref()
                    .map(|system| Content::text(None, system.clone())),
            ),
        };

        Self {
            contents,
            system_instruction,
            generation_config: GenerationConfig::for_kind(kind),
            safety_settings: SAFETY_CATEGORIES
                .into_iter()
                .map(|category| SafetySetting {
                    category,
                    threshold: SAFETY_THRESHOLD,
                })
                .collect(),
        }
    }
}

fn chat_content(message: &ChatMessage) -> Content {
    let role = match message.role {
        Role::User => "user",
        Role::Assistant => "model",
    };
    Content::text(Some(role), message.content.clone())
}

/// Client for the Gemini `generateContent` endpoint.
#[derive(Clone)]
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("base_url", &self.base_url)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|err| RelayError::Config(format!("Failed to build HTTP client: {err}")))?;

        Ok(Self {
            http,
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into();
        self
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        build_generate_url(&self.base_url, &self.model)
    }

    pub async fn generate_content(&self, body: &GenerateContentRequest) -> Result<String> {
        let response = self
            .http
            .post(self.endpoint())
            .header(API_KEY_HEADER, &self.api_key)
            .json(body)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RelayError::Timeout(format!("Upstream call timed out: {err}"))
                } else {
                    RelayError::Network(format!("Upstream request failed: {err}"))
                }
            })?;

        let status = response.status();
        let response_text = response
            .text()
            .await
            .map_err(|err| RelayError::Network(format!("Failed to read upstream response: {err}")))?;

        if !status.is_success() {
            let category = ErrorCategory::from_upstream_status(status.as_u16());
            let api_message = upstream_error_message(&response_text);
            warn!(
                status = status.as_u16(),
                category = %category,
                "Upstream provider returned an error: {}",
                api_message
            );
            return Err(RelayError::Upstream {
                category,
                status: Some(status.as_u16()),
                message: api_message,
            });
        }

        debug!(bytes = response_text.len(), "Upstream call succeeded");
        extract_text(&response_text)
    }
}

#[async_trait]
impl ModelBackend for GeminiClient {
    async fn complete(&self, envelope: &Envelope, kind: RequestKind) -> Result<String> {
        let body = GenerateContentRequest::from_envelope(envelope, kind);
        self.generate_content(&body).await
    }
}

fn build_generate_url(base_url: &str, model: &str) -> String {
    let trimmed = base_url.trim_end_matches('/');
    if trimmed.ends_with(":generateContent") {
        trimmed.to_string()
    } else {
        format!("{trimmed}/v1beta/models/{model}:generateContent")
    }
}

fn upstream_error_message(body: &str) -> String {
    serde_json::from_str::<Value>(body)
        .ok()
        .and_then(|json| {
            json.get("error")
                .and_then(|error| error.get("message"))
                .and_then(|message| message.as_str())
                .map(str::to_string)
        })
        .unwrap_or_else(|| body.chars().take(500).collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn chat_payload_preserves_order_and_maps_roles() {
        let envelope = Envelope::Chat {
            messages: vec![
                ChatMessage::user("A"),
                ChatMessage::assistant("B"),
                ChatMessage::user("C"),
            ],
            system_prompt: None,
        };

        let body = serde_json::to_value(GenerateContentRequest::from_envelope(
            &envelope,
            RequestKind::Generate,
        ))
        .unwrap();

        assert_eq!(
            body["contents"],
            json!([
                {"role": "user", "parts": [{"text": "A"}]},
                {"role": "model", "parts": [{"text": "B"}]},
                {"role": "user", "parts": [{"text": "C"}]},
            ])
        );
        assert!(body.get("systemInstruction").is_none());
    }

    #[test]
    fn single_payload_joins_system_and_prompt() {
        let envelope = Envelope::Single {
            prompt: "Plan Jaipur".into(),
            system_prompt: Some("You are a planner.".into()),
        };

        let body = GenerateContentRequest::from_envelope(&envelope, RequestKind::Itinerary);

        assert_eq!(body.contents.len(), 1);
        assert_eq!(
            body.contents[0].parts[0].text,
            "You are a planner.\n\nUser: Plan Jaipur"
        );
        assert_eq!(body.generation_config.max_output_tokens, 8192);
        assert!((body.generation_config.temperature - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn single_payload_without_system_is_prompt_only() {
        let envelope = Envelope::Single {
            prompt: "Hello".into(),
            system_prompt: None,
        };
        let body = GenerateContentRequest::from_envelope(&envelope, RequestKind::Translate);

        assert_eq!(body.contents[0].parts[0].text, "Hello");
        assert_eq!(body.generation_config.max_output_tokens, 2048);
    }

    #[test]
    fn chat_system_prompt_becomes_instruction() {
        let envelope = Envelope::Chat {
            messages: vec![ChatMessage::user("Is tipping expected?")],
            system_prompt: Some("Etiquette guide".into()),
        };
        let body = serde_json::to_value(GenerateContentRequest::from_envelope(
            &envelope,
            RequestKind::Generate,
        ))
        .unwrap();

        assert_eq!(
            body["systemInstruction"],
            json!({"parts": [{"text": "Etiquette guide"}]})
        );
        assert_eq!(body["generationConfig"]["maxOutputTokens"], 2048);
        assert_eq!(body["safetySettings"].as_array().unwrap().len(), 4);
    }

    #[test]
    fn generate_url_is_built_from_base_and_model() {
        assert_eq!(
            build_generate_url("https://example.test/", "gemini-2.0-flash"),
            "https://example.test/v1beta/models/gemini-2.0-flash:generateContent"
        );
        assert_eq!(
            build_generate_url("https://example.test/custom:generateContent", "ignored"),
            "https://example.test/custom:generateContent"
        );
    }

    #[test]
    fn error_message_prefers_structured_body() {
        let body = r#"{"error": {"code": 429, "message": "Resource exhausted"}}"#;
        assert_eq!(upstream_error_message(body), "Resource exhausted");
        assert_eq!(upstream_error_message("plain failure"), "plain failure");
    }
}
