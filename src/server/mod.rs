//! HTTP surface of the relay.
//!
//! ```text
//! POST /          relay a prompt or chat history upstream
//! POST /gemini    same handler, kept for existing front-end callers
//! GET  /health    liveness
//! GET  /emergency static emergency panel
//! OPTIONS *       CORS preflight, empty body
//! ```

use std::{net::SocketAddr, sync::Arc};

use axum::{
    body::Bytes,
    extract::State,
    http::{
        header::{ACCESS_CONTROL_ALLOW_HEADERS, AUTHORIZATION, CONTENT_TYPE},
        HeaderName, HeaderValue, Method, StatusCode,
    },
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use tokio::net::TcpListener;
use tower_http::{
    cors::{Any, CorsLayer},
    set_header::SetResponseHeaderLayer,
    trace::TraceLayer,
};
use tracing::{info, warn};

use crate::{
    config::RelayConfig,
    core::Relay,
    emergency,
    error::RelayError,
    types::{RelayRequest, RelaySuccess},
};

pub const ALLOWED_HEADERS: &str = "authorization, x-client-info, apikey, content-type";

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_error_payload())).into_response()
    }
}

pub fn router(relay: Arc<Relay>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::POST, Method::GET, Method::OPTIONS])
        .allow_headers([
            AUTHORIZATION,
            HeaderName::from_static("x-client-info"),
            HeaderName::from_static("apikey"),
            CONTENT_TYPE,
        ]);

    Router::new()
        .route("/", post(relay_handler))
        .route("/gemini", post(relay_handler))
        .route("/health", get(health_check))
        .route("/emergency", get(emergency_panel))
        .fallback(not_found)
        .layer(cors)
        .layer(SetResponseHeaderLayer::if_not_present(
            ACCESS_CONTROL_ALLOW_HEADERS,
            HeaderValue::from_static(ALLOWED_HEADERS),
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(relay)
}

async fn relay_handler(State(relay): State<Arc<Relay>>, body: Bytes) -> Response {
    let request: RelayRequest = match serde_json::from_slice(&body) {
        Ok(request) => request,
        Err(err) => {
            warn!("Rejected malformed relay body: {}", err);
            return RelayError::InvalidRequest(format!("Malformed request body: {err}"))
                .into_response();
        }
    };

    match relay.handle(request).await {
        Ok(text) => (StatusCode::OK, Json(RelaySuccess { text })).into_response(),
        Err(err) => {
            warn!(
                category = %err.category(),
                status = err.http_status(),
                "Relay call failed: {}",
                err
            );
            err.into_response()
        }
    }
}

pub async fn health_check() -> &'static str {
    "ok"
}

async fn emergency_panel() -> Json<emergency::EmergencyPanel> {
    Json(emergency::panel())
}

async fn not_found() -> Response {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "error": "INVALID_REQUEST",
            "message": "Unknown route",
        })),
    )
        .into_response()
}

/// Serves the relay on an already-bound listener until the process is interrupted.
pub async fn serve(listener: TcpListener, relay: Arc<Relay>) -> std::io::Result<()> {
    axum::serve(listener, router(relay))
        .with_graceful_shutdown(shutdown_signal())
        .await
}

pub async fn run_server(config: RelayConfig) -> anyhow::Result<()> {
    let relay = Arc::new(Relay::from_config(&config)?);
    if !relay.is_configured() {
        warn!("GEMINI_API_KEY is not set; relayed calls will fail until it is configured");
    }

    let listener = TcpListener::bind(config.bind).await?;
    let addr: SocketAddr = listener.local_addr()?;

    info!("yatra relay listening on http://{}", addr);
    info!("  model:        {}", config.model);
    info!("  min interval: {:?}", config.min_interval);
    info!("  timeout:      {:?}", config.upstream_timeout);

    serve(listener, relay).await?;
    info!("yatra relay stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", err);
        std::future::pending::<()>().await;
    }
}
