//! HTTP API: layout management and player registration.
//!
//! | Method   | Path              | Body / response                                   |
//! |----------|-------------------|---------------------------------------------------|
//! | `GET`    | `/`               | `{"status": ...}`                                 |
//! | `GET`    | `/layouts`        | every layout, keyed by name                       |
//! | `GET`    | `/layouts/{name}` | one layout, or 404                                |
//! | `POST`   | `/layouts/{name}` | layout JSON in, `{"message": ...}` out            |
//! | `DELETE` | `/layouts/{name}` | `{"message": ...}`, 403 for `Arrows`, 404 if gone |
//! | `POST`   | `/join`           | `{"player_id": n}`                                |
//! | `GET`    | `/players`        | `{"players": [...], "count": n}`                  |
//! | `GET`    | `/ws/{player_id}` | WebSocket upgrade, see [`super::ws_server`]       |
//!
//! Errors are returned as `{"detail": "..."}`.  CORS is open to any origin
//! because the controller page may be served from anywhere on the LAN.

use std::sync::Arc;

use anyhow::Context;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use padcast_core::{Layout, LayoutMap, PlayerAllocator, PlayerId};
use serde::Serialize;
use serde_json::json;
use thiserror::Error;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;

use super::shutdown_requested;
use super::ws_server::{drain_sessions, ws_handler};
use crate::application::layout_store::{LayoutStore, StoreError};
use crate::application::session::SessionManager;

const STATUS_TEXT: &str = "Backend is running and ready for remote control.";

/// Shared handles every handler needs.
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<LayoutStore>,
    pub allocator: Arc<PlayerAllocator>,
    pub sessions: Arc<SessionManager>,
    /// Set to `true` to close every WebSocket session.
    pub shutdown: watch::Receiver<bool>,
}

/// Errors a handler can return.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Layout not found")]
    LayoutNotFound,
    #[error("The default '{0}' layout cannot be deleted.")]
    Protected(String),
    #[error("{0}")]
    Internal(String),
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::LayoutNotFound => StatusCode::NOT_FOUND,
            ApiError::Protected(_) => StatusCode::FORBIDDEN,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound(_) => ApiError::LayoutNotFound,
            StoreError::Protected(name) => ApiError::Protected(name),
            other => ApiError::Internal(other.to_string()),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (self.status(), body).into_response()
    }
}

#[derive(Debug, Serialize)]
struct MessageBody {
    message: String,
}

#[derive(Debug, Serialize)]
struct JoinBody {
    player_id: PlayerId,
}

#[derive(Debug, Serialize)]
struct PlayersBody {
    players: Vec<PlayerId>,
    count: usize,
}

/// Builds the router with CORS and request tracing applied.
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(status))
        .route("/layouts", get(list_layouts))
        .route(
            "/layouts/:name",
            get(get_layout).post(save_layout).delete(delete_layout),
        )
        .route("/join", post(join))
        .route("/players", get(players))
        .route("/ws/:player_id", get(ws_handler))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Serves the API and the WebSocket endpoint on `listener` until
/// `state.shutdown` is set, then waits briefly for sessions to close.
///
/// # Errors
///
/// Returns an error if the server fails while running.
pub async fn serve(listener: TcpListener, state: AppState) -> anyhow::Result<()> {
    if let Ok(addr) = listener.local_addr() {
        info!("listening on {addr} (HTTP API and /ws)");
    }
    let sessions = Arc::clone(&state.sessions);
    let mut shutdown = state.shutdown.clone();
    axum::serve(listener, router(state))
        .with_graceful_shutdown(async move { shutdown_requested(&mut shutdown).await })
        .await
        .context("HTTP server failed")?;
    drain_sessions(&sessions).await;
    Ok(())
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn status() -> Json<serde_json::Value> {
    Json(json!({ "status": STATUS_TEXT }))
}

async fn list_layouts(State(state): State<AppState>) -> Json<LayoutMap> {
    Json(state.store.get_all().await)
}

async fn get_layout(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<Layout>, ApiError> {
    state
        .store
        .get(&name)
        .await
        .map(Json)
        .ok_or(ApiError::LayoutNotFound)
}

// A body that is not a layout is rejected by the `Json` extractor with 422.
async fn save_layout(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(layout): Json<Layout>,
) -> Json<MessageBody> {
    state.store.put(&name, layout).await;
    info!(layout = %name, "layout saved via API");
    Json(MessageBody {
        message: format!("Layout '{name}' saved successfully!"),
    })
}

async fn delete_layout(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageBody>, ApiError> {
    state.store.delete(&name).await?;
    info!(layout = %name, "layout deleted via API");
    Ok(Json(MessageBody {
        message: format!("Layout '{name}' deleted successfully!"),
    }))
}

async fn join(State(state): State<AppState>) -> Json<JoinBody> {
    let player_id = state.allocator.allocate();
    info!(player = %player_id, "player joined");
    Json(JoinBody { player_id })
}

async fn players(State(state): State<AppState>) -> Json<PlayersBody> {
    let players = state.sessions.connected_players();
    Json(PlayersBody {
        count: players.len(),
        players,
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_api_statuses() {
        // Arrange
        let not_found: ApiError = StoreError::NotFound("x".to_string()).into();
        let protected: ApiError = StoreError::Protected("Arrows".to_string()).into();

        // Assert
        assert_eq!(not_found.status(), StatusCode::NOT_FOUND);
        assert_eq!(not_found.to_string(), "Layout not found");
        assert_eq!(protected.status(), StatusCode::FORBIDDEN);
        assert_eq!(
            protected.to_string(),
            "The default 'Arrows' layout cannot be deleted."
        );
    }

    #[test]
    fn test_encode_errors_are_internal() {
        let err: ApiError = StoreError::Encode(serde_json::from_str::<u8>("x").unwrap_err()).into();
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
