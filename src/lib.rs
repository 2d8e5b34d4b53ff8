//! yatra: the AI backend of an India trip planner.
//!
//! Two halves share one set of types:
//!
//! - [`Relay`] and [`server`]: a stateless HTTP relay that holds the Gemini
//!   credential, forwards single-turn prompts or chat histories upstream and
//!   maps every failure into an [`ErrorCategory`].
//! - [`RelayClient`]: the request helper front-end code calls. It returns text,
//!   a parsed [`Itinerary`], or a [`RelayError`] carrying its category as a field.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use yatra::{RelayClient, TripPreferences};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let client = RelayClient::new("http://127.0.0.1:8787");
//!     let trip = TripPreferences::new("jaipur", 3).with_interests(["culture", "food"]);
//!
//!     match client.generate_itinerary(&trip).await {
//!         Ok(itinerary) => println!("{} days planned", itinerary.days.len()),
//!         Err(err) => eprintln!("{}", err.user_message()),
//!     }
//!     Ok(())
//! }
//! ```

extern crate self as yatra;

pub mod config;
pub mod core;
pub mod emergency;
pub mod error;
pub mod schemas;
pub mod server;
pub mod services;
pub mod types;

pub use config::RelayConfig;
pub use core::{Conversation, Relay, RelayClient};
pub use error::{ErrorCategory, RelayError, Result, UserAction};
pub use schemas::{CompletionSchema, SchemaHandle};
pub use services::{gemini_client::GeminiClient, throttle::Throttle, ModelBackend};
pub use types::{
    ChatMessage, Envelope, Itinerary, RelayRequest, RequestKind, Role, TripPreferences,
};
pub use yatra_macros::completion_schema;

pub use schemas as schema;

#[cfg(feature = "cli")]
pub mod cli;
