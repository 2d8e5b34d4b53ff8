use std::{sync::Arc, time::Duration};

use mockito::{Matcher, Server, ServerGuard};
use serde_json::json;
use tokio::net::TcpListener;
use yatra::{
    server, ChatMessage, Conversation, ErrorCategory, Relay, RelayClient, RelayConfig,
    RelayError, TripPreferences,
};

const GENERATE_PATH: &str = "/v1beta/models/gemini-2.0-flash:generateContent";

const ITINERARY_JSON: &str = r#"{
  "days": [
    {
      "day": 1,
      "label": "Pink City",
      "activities": [
        {
          "time": "Morning",
          "description": "Amber Fort",
          "cost": "₹500 (~$6)",
          "safetyNote": "Use registered guides",
          "culturalNote": "Dress modestly"
        }
      ]
    }
  ],
  "estimatedTotalCost": "₹12,000 (~$145)",
  "tips": ["Carry cash for markets"]
}"#;

fn gemini_text(text: &str) -> String {
    json!({
        "candidates": [{
            "content": { "role": "model", "parts": [{ "text": text }] },
            "finishReason": "STOP"
        }]
    })
    .to_string()
}

/// Starts a relay in front of `upstream` and returns a client pointed at it.
async fn spawn_relay(upstream: &ServerGuard) -> RelayClient {
    let config = RelayConfig::default()
        .with_api_key("test-key")
        .with_base_url(upstream.url())
        .with_min_interval(Duration::ZERO);
    let relay = Arc::new(Relay::from_config(&config).unwrap());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(server::serve(listener, relay));

    RelayClient::new(format!("http://{addr}/")).with_timeout(Duration::from_secs(10))
}

async fn itinerary_from(raw: &str) -> yatra::Result<yatra::Itinerary> {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::PartialJson(json!({
            "generationConfig": { "maxOutputTokens": 8192 }
        })))
        .with_status(200)
        .with_body(gemini_text(raw))
        .create_async()
        .await;

    let client = spawn_relay(&upstream).await;
    let trip = TripPreferences::new("jaipur", 1).with_interests(["culture"]);
    client.generate_itinerary(&trip).await
}

#[tokio::test]
async fn invoke_returns_relayed_text() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(gemini_text("Namaste!"))
        .create_async()
        .await;

    let client = spawn_relay(&upstream).await;
    let text = client.invoke("Say hello", None).await.unwrap();
    assert_eq!(text, "Namaste!");
}

#[tokio::test]
async fn fenced_and_bare_itineraries_parse_identically() {
    let bare = itinerary_from(ITINERARY_JSON).await.unwrap();
    let fenced = itinerary_from(&format!("```json\n{ITINERARY_JSON}\n```"))
        .await
        .unwrap();

    assert_eq!(bare, fenced);
    assert_eq!(bare.days.len(), 1);
    assert_eq!(bare.days[0].activities[0].safety_note, "Use registered guides");
    assert_eq!(bare.tips, ["Carry cash for markets"]);
}

#[tokio::test]
async fn prose_itinerary_is_processing_error() {
    let err = itinerary_from("Sorry, I can only describe Jaipur in words.")
        .await
        .unwrap_err();

    assert!(matches!(err, RelayError::Processing(_)), "got {err:?}");
    assert_ne!(err.category(), ErrorCategory::NetworkError);
    assert_eq!(
        err.user_message(),
        "We couldn't read the generated plan. Please try again."
    );
}

#[tokio::test]
async fn invalid_trip_never_reaches_relay() {
    let client = RelayClient::new("http://127.0.0.1:1/");
    let err = client
        .generate_itinerary(&TripPreferences::new("", 3))
        .await
        .unwrap_err();
    assert_eq!(err.category(), ErrorCategory::InvalidRequest);
}

#[tokio::test]
async fn translation_is_returned_verbatim() {
    let reply = "Translation: धन्यवाद\nTransliteration: Dhanyavaad\nPronunciation: dhun-yuh-VAAD";
    let mut upstream = Server::new_async().await;
    upstream
        .mock("POST", GENERATE_PATH)
        .match_body(Matcher::Regex("Thank you".to_string()))
        .with_status(200)
        .with_body(gemini_text(reply))
        .create_async()
        .await;

    let client = spawn_relay(&upstream).await;
    let text = client.translate("Thank you", "Hindi").await.unwrap();
    assert_eq!(text, reply);
}

#[tokio::test]
async fn guide_conversation_keeps_history() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("POST", GENERATE_PATH)
        .with_status(200)
        .with_body(gemini_text("Use your right hand."))
        .create_async()
        .await;

    let client = spawn_relay(&upstream).await;
    let mut conversation = Conversation::new();
    let reply = client
        .continue_conversation(&mut conversation, "How should I eat?")
        .await
        .unwrap();

    assert_eq!(reply, "Use your right hand.");
    assert_eq!(
        conversation.messages(),
        [
            ChatMessage::user("How should I eat?"),
            ChatMessage::assistant("Use your right hand."),
        ]
    );
}

#[tokio::test]
async fn rate_limit_keeps_its_category() {
    let mut upstream = Server::new_async().await;
    upstream
        .mock("POST", GENERATE_PATH)
        .with_status(429)
        .with_body(json!({ "error": { "message": "quota exceeded" } }).to_string())
        .create_async()
        .await;

    let client = spawn_relay(&upstream).await;
    let mut conversation = Conversation::with_messages(vec![
        ChatMessage::user("Hi"),
        ChatMessage::assistant("Hello!"),
    ]);
    let err = client
        .continue_conversation(&mut conversation, "Is tipping expected?")
        .await
        .unwrap_err();

    assert_eq!(err.category(), ErrorCategory::RateLimit);
    assert!(err.is_retryable());
    assert_eq!(conversation.len(), 2);
}

#[tokio::test]
async fn unreachable_relay_is_network_error() {
    let client = RelayClient::new("http://127.0.0.1:1/");
    let err = client.invoke("Hello", None).await.unwrap_err();

    assert_eq!(err.category(), ErrorCategory::NetworkError);
}
