use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::types::RelayFailure;

/// Closed set of outcome tags attached to every failed call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCategory {
    RateLimit,
    AuthError,
    SafetyBlock,
    InvalidRequest,
    InvalidResponse,
    PaymentRequired,
    NetworkError,
    ApiError,
    UnknownError,
}

impl ErrorCategory {
    pub const ALL: [ErrorCategory; 9] = [
        ErrorCategory::RateLimit,
        ErrorCategory::AuthError,
        ErrorCategory::SafetyBlock,
        ErrorCategory::InvalidRequest,
        ErrorCategory::InvalidResponse,
        ErrorCategory::PaymentRequired,
        ErrorCategory::NetworkError,
        ErrorCategory::ApiError,
        ErrorCategory::UnknownError,
    ];

    /// Wire tag, e.g. `RATE_LIMIT`.
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorCategory::RateLimit => "RATE_LIMIT",
            ErrorCategory::AuthError => "AUTH_ERROR",
            ErrorCategory::SafetyBlock => "SAFETY_BLOCK",
            ErrorCategory::InvalidRequest => "INVALID_REQUEST",
            ErrorCategory::InvalidResponse => "INVALID_RESPONSE",
            ErrorCategory::PaymentRequired => "PAYMENT_REQUIRED",
            ErrorCategory::NetworkError => "NETWORK_ERROR",
            ErrorCategory::ApiError => "API_ERROR",
            ErrorCategory::UnknownError => "UNKNOWN_ERROR",
        }
    }

    pub fn from_tag(tag: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|category| category.as_str() == tag)
    }

    /// Fixed message shown to the traveller for this category.
    pub fn user_message(&self) -> &'static str {
        match self {
            ErrorCategory::RateLimit => "Too many requests. Please wait a moment and try again.",
            ErrorCategory::AuthError => "Authentication failed. Please contact support.",
            ErrorCategory::SafetyBlock => {
                "Your request was blocked by safety filters. Please rephrase it."
            }
            ErrorCategory::InvalidRequest | ErrorCategory::InvalidResponse => {
                "Invalid request or response. Please try different inputs."
            }
            ErrorCategory::PaymentRequired => {
                "AI credits exhausted. Please add credits to continue."
            }
            ErrorCategory::NetworkError => {
                "Unable to connect. Please check your internet connection."
            }
            ErrorCategory::ApiError | ErrorCategory::UnknownError => {
                "An unexpected error occurred. Please try again."
            }
        }
    }

    /// Status the relay answers with for this category.
    pub fn http_status(&self) -> u16 {
        match self {
            ErrorCategory::RateLimit => 429,
            ErrorCategory::AuthError => 401,
            ErrorCategory::SafetyBlock => 400,
            ErrorCategory::InvalidRequest => 400,
            ErrorCategory::InvalidResponse => 502,
            ErrorCategory::PaymentRequired => 402,
            ErrorCategory::NetworkError => 503,
            ErrorCategory::ApiError => 500,
            ErrorCategory::UnknownError => 500,
        }
    }

    /// Classify a non-2xx status returned by the upstream provider.
    pub fn from_upstream_status(status: u16) -> Self {
        match status {
            400 => ErrorCategory::InvalidRequest,
            401 | 403 => ErrorCategory::AuthError,
            402 => ErrorCategory::PaymentRequired,
            429 => ErrorCategory::RateLimit,
            _ => ErrorCategory::ApiError,
        }
    }
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// What the UI should offer after a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UserAction {
    TryAgain,
    WaitAndRetry,
    CheckConnection,
    Rephrase,
    ContactSupport,
}

/// Main error type for relay and client calls
#[derive(Error, Debug)]
pub enum RelayError {
    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// The model answered but its output could not be turned into the expected structure.
    #[error("Response could not be processed: {0}")]
    Processing(String),

    #[error("{category}: {message}")]
    Upstream {
        category: ErrorCategory,
        status: Option<u16>,
        message: String,
    },

    #[error("Network error: {0}")]
    Network(String),

    #[error("Timeout error: {0}")]
    Timeout(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Unknown error: {0}")]
    Unknown(String),
}

/// Result type alias
pub type Result<T> = std::result::Result<T, RelayError>;

impl RelayError {
    pub fn tagged(category: ErrorCategory, message: impl Into<String>) -> Self {
        RelayError::Upstream {
            category,
            status: None,
            message: message.into(),
        }
    }

    pub fn category(&self) -> ErrorCategory {
        match self {
            RelayError::Config(_) => ErrorCategory::ApiError,
            RelayError::InvalidRequest(_) => ErrorCategory::InvalidRequest,
            RelayError::InvalidResponse(_) | RelayError::Processing(_) => {
                ErrorCategory::InvalidResponse
            }
            RelayError::Upstream { category, .. } => *category,
            RelayError::Network(_) | RelayError::Timeout(_) => ErrorCategory::NetworkError,
            RelayError::Serialization(_) => ErrorCategory::InvalidResponse,
            RelayError::Unknown(_) => ErrorCategory::UnknownError,
        }
    }

    pub fn error_code(&self) -> &'static str {
        self.category().as_str()
    }

    pub fn user_message(&self) -> &'static str {
        match self {
            RelayError::Processing(_) => {
                "We couldn't read the generated plan. Please try again."
            }
            other => other.category().user_message(),
        }
    }

    /// Status the relay answers with when this error ends a request.
    pub fn http_status(&self) -> u16 {
        match self {
            RelayError::Config(_) => 500,
            other => other.category().http_status(),
        }
    }

    /// Check if re-issuing the same call may succeed
    pub fn is_retryable(&self) -> bool {
        if let RelayError::Config(_) = self {
            return false;
        }
        matches!(
            self.category(),
            ErrorCategory::RateLimit
                | ErrorCategory::NetworkError
                | ErrorCategory::ApiError
                | ErrorCategory::UnknownError
        ) || matches!(self, RelayError::Processing(_))
    }

    pub fn suggested_action(&self) -> UserAction {
        match self {
            RelayError::Processing(_) => return UserAction::TryAgain,
            RelayError::Config(_) => return UserAction::ContactSupport,
            _ => {}
        }
        match self.category() {
            ErrorCategory::RateLimit => UserAction::WaitAndRetry,
            ErrorCategory::NetworkError => UserAction::CheckConnection,
            ErrorCategory::SafetyBlock
            | ErrorCategory::InvalidRequest
            | ErrorCategory::InvalidResponse => UserAction::Rephrase,
            ErrorCategory::AuthError | ErrorCategory::PaymentRequired => {
                UserAction::ContactSupport
            }
            ErrorCategory::ApiError | ErrorCategory::UnknownError => UserAction::TryAgain,
        }
    }

    /// Body the relay sends back on failure.
    pub fn to_error_payload(&self) -> RelayFailure {
        RelayFailure {
            error: self.category(),
            message: self.user_message().to_string(),
        }
    }
}
