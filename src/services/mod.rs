use async_trait::async_trait;

use crate::{
    error::Result,
    types::{Envelope, RequestKind},
};

pub mod gemini_client;
pub mod prompts;
pub(crate) mod response_handler;
pub mod throttle;

/// Upstream text-generation provider behind the relay.
///
/// `Send + Sync` so a single instance can be shared across request handlers as
/// `Arc<dyn ModelBackend>`.
#[async_trait]
pub trait ModelBackend: Send + Sync {
    /// Issues exactly one upstream call and returns the generated text.
    async fn complete(&self, envelope: &Envelope, kind: RequestKind) -> Result<String>;
}
