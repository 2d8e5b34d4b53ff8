use serde::{Deserialize, Serialize};

use crate::error::{RelayError, Result};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Single,
    Chat,
}

/// Which front-end feature issued the call; selects generation parameters.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RequestKind {
    #[default]
    Generate,
    Itinerary,
    Translate,
}

/// JSON body accepted by the relay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RelayRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub system_prompt: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub messages: Option<Vec<ChatMessage>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mode: Option<Mode>,
    #[serde(default, rename = "type")]
    pub kind: RequestKind,
}

impl RelayRequest {
    pub fn single(prompt: impl Into<String>, system_prompt: Option<String>) -> Self {
        Self {
            prompt: Some(prompt.into()),
            system_prompt,
            mode: Some(Mode::Single),
            ..Self::default()
        }
    }

    pub fn chat(messages: Vec<ChatMessage>) -> Self {
        Self {
            messages: Some(messages),
            mode: Some(Mode::Chat),
            ..Self::default()
        }
    }

    pub fn with_kind(mut self, kind: RequestKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }

    /// Resolves the mode and rejects bodies with nothing to send upstream.
    pub fn into_envelope(self) -> Result<Envelope> {
        let system_prompt = self
            .system_prompt
            .filter(|system| !system.trim().is_empty());

        let mode = self.mode.unwrap_or(match &self.messages {
            Some(messages) if !messages.is_empty() => Mode::Chat,
            _ => Mode::Single,
        });

        match mode {
            Mode::Single => {
                let prompt = self
                    .prompt
                    .filter(|prompt| !prompt.trim().is_empty())
                    .ok_or_else(|| RelayError::InvalidRequest("Prompt is required".to_string()))?;
                Ok(Envelope::Single {
                    prompt,
                    system_prompt,
                })
            }
            Mode::Chat => {
                let messages = self.messages.unwrap_or_default();
                if !messages
                    .iter()
                    .any(|message| !message.content.trim().is_empty())
                {
                    return Err(RelayError::InvalidRequest(
                        "At least one non-empty message is required".to_string(),
                    ));
                }
                Ok(Envelope::Chat {
                    messages,
                    system_prompt,
                })
            }
        }
    }
}

/// A validated request, ready to be turned into a provider payload.
#[derive(Debug, Clone, PartialEq)]
pub enum Envelope {
    Single {
        prompt: String,
        system_prompt: Option<String>,
    },
    Chat {
        messages: Vec<ChatMessage>,
        system_prompt: Option<String>,
    },
}

impl Envelope {
    pub fn mode(&self) -> Mode {
        match self {
            Envelope::Single { .. } => Mode::Single,
            Envelope::Chat { .. } => Mode::Chat,
        }
    }
}
