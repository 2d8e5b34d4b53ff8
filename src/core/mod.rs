pub mod client;
pub mod conversation;
pub mod relay;

pub use client::{RelayClient, DEFAULT_RELAY_URL};
pub use conversation::Conversation;
pub use relay::Relay;
