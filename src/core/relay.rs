use std::sync::Arc;

use tracing::info;

use crate::{
    config::RelayConfig,
    error::{RelayError, Result},
    services::{gemini_client::GeminiClient, throttle::Throttle, ModelBackend},
    types::RelayRequest,
};

/// Server-side half: validates a request, spaces it out and forwards it upstream.
///
/// Holds no per-caller state. Multi-turn continuity depends on callers resending
/// the full history every time.
pub struct Relay {
    backend: Option<Arc<dyn ModelBackend>>,
    throttle: Throttle,
}

impl Relay {
    pub fn new(backend: Arc<dyn ModelBackend>) -> Self {
        Self {
            backend: Some(backend),
            throttle: Throttle::disabled(),
        }
    }

    /// A relay with no upstream credential. Every relayed call fails with a
    /// configuration error, while preflight and static routes keep working.
    pub fn unconfigured() -> Self {
        Self {
            backend: None,
            throttle: Throttle::disabled(),
        }
    }

    pub fn with_throttle(mut self, throttle: Throttle) -> Self {
        self.throttle = throttle;
        self
    }

    pub fn from_config(config: &RelayConfig) -> Result<Self> {
        let relay = match &config.api_key {
            Some(api_key) => {
                let client = GeminiClient::new(api_key.clone(), config.upstream_timeout)?
                    .with_base_url(config.base_url.clone())
                    .with_model(config.model.clone());
                Self::new(Arc::new(client))
            }
            None => Self::unconfigured(),
        };
        Ok(relay.with_throttle(Throttle::new(config.min_interval)))
    }

    pub fn is_configured(&self) -> bool {
        self.backend.is_some()
    }

    pub fn throttle(&self) -> &Throttle {
        &self.throttle
    }

    pub async fn handle(&self, request: RelayRequest) -> Result<String> {
        let kind = request.kind;
        let envelope = request.into_envelope()?;

        let backend = self
            .backend
            .as_ref()
            .ok_or_else(|| RelayError::Config("GEMINI_API_KEY is not configured".to_string()))?;

        let waited = self.throttle.wait().await;
        info!(
            mode = ?envelope.mode(),
            kind = ?kind,
            throttled_ms = waited.as_millis() as u64,
            "Relaying request upstream"
        );

        backend.complete(&envelope, kind).await
    }
}
