//! HTTP Routing
//!
//! Thin transport shim over the session orchestrator: handlers map inbound
//! requests to [`ChatService`] calls and results to JSON responses. Error
//! detail goes to the logs; response bodies stay generic.
//!
//! # Endpoints
//!
//! - GET /sessions/:username - Conversation history for a session
//! - POST /sessions/:username - Process one chat turn
//! - DELETE /sessions/:username - Clear a session
//! - GET /health - Health check

use crate::chat::ChatService;
use crate::memory::Message;
use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tower_http::cors::CorsLayer;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    /// Session orchestrator
    pub chat: Arc<ChatService>,
}

/// Build the application router with a permissive CORS layer (the API is
/// consumed directly from a browser frontend).
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route(
            "/sessions/:username",
            get(get_session)
                .post(post_message)
                .delete(delete_session),
        )
        .route("/health", get(health))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Bind the listener and serve until ctrl-c.
pub async fn serve(router: Router, port: u16) -> anyhow::Result<()> {
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Chat API server running on port {}", port);

    axum::serve(listener, router)
        .with_graceful_shutdown(async {
            tokio::signal::ctrl_c().await.ok();
            tracing::info!("Chat API server shutting down gracefully");
        })
        .await?;

    Ok(())
}

async fn get_session(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<Vec<Message>> {
    Json(state.chat.fetch_history(&username).await)
}

async fn post_message(
    State(state): State<AppState>,
    Path(username): Path<String>,
    Json(payload): Json<serde_json::Value>,
) -> Response {
    // Extract by hand so a missing field yields a 400, not a 422.
    let message = match payload.get("message").and_then(|v| v.as_str()) {
        Some(m) => m,
        None => {
            return (
                StatusCode::BAD_REQUEST,
                Json(json!({"error": "Message is required"})),
            )
                .into_response();
        }
    };

    match state.chat.process_turn(&username, message).await {
        Ok(reply) => Json(json!({"response": reply})).into_response(),
        Err(e) => {
            tracing::error!("Error processing chat for {}: {}", username, e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({"error": "Failed to process chat"})),
            )
                .into_response()
        }
    }
}

async fn delete_session(
    State(state): State<AppState>,
    Path(username): Path<String>,
) -> Json<serde_json::Value> {
    state.chat.clear_session(&username).await;
    Json(json!({"success": true}))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}
