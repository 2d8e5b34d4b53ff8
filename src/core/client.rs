use std::time::Duration;

use serde_json::Value;
use tracing::{debug, error, info};

use crate::{
    core::conversation::Conversation,
    error::{ErrorCategory, RelayError, Result},
    services::prompts::{itinerary_prompt, translation_prompt, CULTURAL_GUIDE_SYSTEM_PROMPT},
    types::{parse_structured_text, ChatMessage, Itinerary, RelayRequest, RequestKind, TripPreferences},
};

pub const DEFAULT_RELAY_URL: &str = "http://127.0.0.1:8787";

/// Client-side request helper used by front-end code to reach the relay.
///
/// Each call makes a single attempt; retrying is left to the caller.
#[derive(Clone, Debug)]
pub struct RelayClient {
    http: reqwest::Client,
    endpoint: String,
    timeout: Duration,
}

impl RelayClient {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            timeout: Duration::from_secs(60),
        }
    }

    pub fn from_env() -> Self {
        let endpoint =
            std::env::var("YATRA_RELAY_URL").unwrap_or_else(|_| DEFAULT_RELAY_URL.to_string());
        Self::new(endpoint)
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Single-turn completion.
    pub async fn invoke(&self, prompt: &str, system_prompt: Option<&str>) -> Result<String> {
        self.send(&RelayRequest::single(
            prompt,
            system_prompt.map(str::to_string),
        ))
        .await
    }

    /// Multi-turn completion; `messages` are sent oldest first.
    pub async fn invoke_chat(&self, messages: &[ChatMessage]) -> Result<String> {
        self.send(&RelayRequest::chat(messages.to_vec())).await
    }

    /// Asks for a day-by-day plan and parses it into an [`Itinerary`].
    ///
    /// Output that is not valid itinerary JSON fails with [`RelayError::Processing`].
    pub async fn generate_itinerary(&self, preferences: &TripPreferences) -> Result<Itinerary> {
        preferences.validate()?;

        let (system_prompt, prompt) = itinerary_prompt(preferences);
        let request =
            RelayRequest::single(prompt, Some(system_prompt)).with_kind(RequestKind::Itinerary);
        let raw = self.send(&request).await?;

        let itinerary: Itinerary = parse_structured_text(&raw).inspect_err(|err| {
            error!("Itinerary response could not be parsed: {}", err);
        })?;
        info!(
            days = itinerary.days.len(),
            activities = itinerary.activity_count(),
            "Itinerary generated"
        );
        Ok(itinerary)
    }

    /// Translation with transliteration and pronunciation, returned verbatim.
    pub async fn translate(&self, text: &str, target_language: &str) -> Result<String> {
        if text.trim().is_empty() {
            return Err(RelayError::InvalidRequest(
                "Nothing to translate".to_string(),
            ));
        }
        let (system_prompt, prompt) = translation_prompt(text, target_language);
        let request =
            RelayRequest::single(prompt, Some(system_prompt)).with_kind(RequestKind::Translate);
        self.send(&request).await
    }

    /// Sends the whole etiquette-guide history and returns the assistant's reply.
    pub async fn ask_cultural_guide(&self, history: &[ChatMessage]) -> Result<String> {
        let request = RelayRequest::chat(history.to_vec())
            .with_system_prompt(CULTURAL_GUIDE_SYSTEM_PROMPT);
        self.send(&request).await
    }

    /// Appends `question`, asks the guide, and records the reply.
    ///
    /// On failure the question is removed again so the history stays answerable.
    pub async fn continue_conversation(
        &self,
        conversation: &mut Conversation,
        question: &str,
    ) -> Result<String> {
        conversation.push_user(question);
        match self.ask_cultural_guide(conversation.messages()).await {
            Ok(reply) => {
                conversation.push_assistant(reply.clone());
                Ok(reply)
            }
            Err(err) => {
                conversation.pop_unanswered();
                Err(err)
            }
        }
    }

    pub async fn send(&self, request: &RelayRequest) -> Result<String> {
        debug!(endpoint = %self.endpoint, kind = ?request.kind, "Calling relay");

        let response = self
            .http
            .post(&self.endpoint)
            .timeout(self.timeout)
            .json(request)
            .send()
            .await
            .map_err(|err| {
                if err.is_timeout() {
                    RelayError::Timeout(format!("Relay call timed out: {err}"))
                } else {
                    RelayError::Network(format!("Relay request failed: {err}"))
                }
            })?;

        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|err| RelayError::Network(format!("Failed to read relay response: {err}")))?;

        interpret_relay_body(status.as_u16(), &body)
    }
}

/// Turns a relay status and body into text or a tagged error.
fn interpret_relay_body(status: u16, body: &str) -> Result<String> {
    let parsed: Option<Value> = serde_json::from_str(body).ok();

    if let Some(error) = parsed.as_ref().and_then(|json| json.get("error")) {
        let message = parsed
            .as_ref()
            .and_then(|json| json.get("message"))
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        return Err(match error.as_str().and_then(ErrorCategory::from_tag) {
            Some(category) => RelayError::Upstream {
                category,
                status: Some(status),
                message,
            },
            None => RelayError::Unknown(format!("HTTP {status}: {error}")),
        });
    }

    if !(200..300).contains(&status) {
        return Err(RelayError::Unknown(format!(
            "HTTP {status}: {}",
            body.chars().take(200).collect::<String>()
        )));
    }

    parsed
        .as_ref()
        .and_then(|json| json.get("text"))
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| RelayError::InvalidResponse("No text in response".to_string()))
}
