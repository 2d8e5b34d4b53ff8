use serde::Deserialize;
use tracing::{error, warn};

use crate::error::{ErrorCategory, RelayError, Result};

const SAFETY_FINISH_REASONS: [&str; 4] = ["SAFETY", "BLOCKLIST", "PROHIBITED_CONTENT", "SPII"];

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Candidate {
    content: Option<CandidateContent>,
    finish_reason: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

/// Pulls `candidates[0].content.parts[0].text` out of a successful upstream body.
pub(crate) fn extract_text(body: &str) -> Result<String> {
    let response: GenerateContentResponse = serde_json::from_str(body).map_err(|err| {
        error!("Upstream body is not a generateContent response: {}", err);
        RelayError::InvalidResponse(format!("Unreadable upstream response: {err}"))
    })?;

    if let Some(reason) = response
        .prompt_feedback
        .as_ref()
        .and_then(|feedback| feedback.block_reason.as_deref())
    {
        warn!(reason, "Prompt blocked by upstream safety filters");
        return Err(RelayError::tagged(
            ErrorCategory::SafetyBlock,
            format!("Prompt blocked: {reason}"),
        ));
    }

    let Some(candidate) = response.candidates.first() else {
        error!("Upstream response carried no candidates");
        return Err(RelayError::InvalidResponse(
            "No candidates in upstream response".to_string(),
        ));
    };

    let text = candidate
        .content
        .as_ref()
        .and_then(|content| content.parts.first())
        .and_then(|part| part.text.as_deref())
        .filter(|text| !text.is_empty());

    match (text, candidate.finish_reason.as_deref()) {
        (Some(text), _) => Ok(text.to_string()),
        (None, Some(reason)) if SAFETY_FINISH_REASONS.contains(&reason) => {
            warn!(reason, "Candidate withheld by upstream safety filters");
            Err(RelayError::tagged(
                ErrorCategory::SafetyBlock,
                format!("Response blocked: {reason}"),
            ))
        }
        (None, reason) => {
            error!(?reason, "Upstream candidate carried no text");
            Err(RelayError::InvalidResponse(
                "No text in upstream response".to_string(),
            ))
        }
    }
}
