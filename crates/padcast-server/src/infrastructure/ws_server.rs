//! WebSocket endpoint: `/ws/{player_id}?layout_name=...`.
//!
//! The endpoint is a route on the same axum router as the HTTP API, so one
//! address serves both.  This module is responsible for:
//!
//! 1. Validating the player id before the upgrade (HTTP 400 if it is not an
//!    integer ≥ 1).
//! 2. Opening a session for the player, or closing with code 1008 when the
//!    layout is unknown.
//! 3. Feeding every text frame to the session, one at a time, in arrival
//!    order.
//! 4. Closing the session when the same player connects again elsewhere
//!    (code 1008) or when the server shuts down (code 1001).
//!
//! # Scalability
//!
//! hyper runs every upgraded connection in its own Tokio task, so one slow
//! browser never holds up another.

use std::sync::Arc;
use std::time::Duration;

use axum::extract::ws::{close_code, CloseFrame, Message as WsMessage, WebSocket, WebSocketUpgrade};
use axum::extract::{Path, RawQuery, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use futures_util::stream::SplitSink;
use futures_util::{SinkExt, StreamExt};
use padcast_core::domain::layout::DEFAULT_LAYOUT_NAME;
use padcast_core::PlayerId;
use serde_json::json;
use thiserror::Error;
use tokio::sync::watch;
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::http_api::AppState;
use super::shutdown_requested;
use crate::application::session::SessionManager;

/// How long shutdown waits for sessions to send their close frames.
const SESSION_DRAIN_TIMEOUT: Duration = Duration::from_secs(2);

/// Close reason sent to a session whose player connected again elsewhere.
pub const REPLACED_REASON: &str = "Player connected from another session";

type WsSink = SplitSink<WebSocket, WsMessage>;

// ── Connection target ─────────────────────────────────────────────────────────

/// What a browser asked for in its upgrade request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConnectTarget {
    pub player: PlayerId,
    pub layout_name: String,
}

/// Why an upgrade request was refused before the WebSocket opened.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TargetError {
    #[error("invalid player id {0:?}")]
    BadPlayerId(String),
}

impl IntoResponse for TargetError {
    fn into_response(self) -> Response {
        let body = Json(json!({ "detail": self.to_string() }));
        (StatusCode::BAD_REQUEST, body).into_response()
    }
}

/// Parses the `{player_id}` path segment.  Ids start at 1.
///
/// # Errors
///
/// [`TargetError::BadPlayerId`] if `raw` is not an integer ≥ 1.
pub fn parse_player_id(raw: &str) -> Result<PlayerId, TargetError> {
    raw.parse::<PlayerId>()
        .ok()
        .filter(|player| player.get() >= 1)
        .ok_or_else(|| TargetError::BadPlayerId(raw.to_string()))
}

/// Picks the layout name out of the query string.
///
/// `layout` is accepted as a shorter alias of `layout_name`.  Without either,
/// the `"default"` layout is used.
pub fn layout_from_query(query: Option<&str>) -> String {
    let mut layout_name = None;
    let mut layout_alias = None;
    for (key, value) in url::form_urlencoded::parse(query.unwrap_or("").as_bytes()) {
        match key.as_ref() {
            "layout_name" => layout_name = Some(value.into_owned()),
            "layout" => layout_alias = Some(value.into_owned()),
            _ => {}
        }
    }
    layout_name
        .or(layout_alias)
        .unwrap_or_else(|| DEFAULT_LAYOUT_NAME.to_string())
}

/// Parses the path segment and query string of an upgrade request.
///
/// # Errors
///
/// See [`parse_player_id`].
pub fn parse_target(raw_id: &str, query: Option<&str>) -> Result<ConnectTarget, TargetError> {
    Ok(ConnectTarget {
        player: parse_player_id(raw_id)?,
        layout_name: layout_from_query(query),
    })
}

// ── Handler ───────────────────────────────────────────────────────────────────

/// `GET /ws/:player_id`: validates the target, then upgrades.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Path(raw_id): Path<String>,
    RawQuery(query): RawQuery,
    State(state): State<AppState>,
) -> Response {
    let target = match parse_target(&raw_id, query.as_deref()) {
        Ok(target) => target,
        Err(e) => {
            warn!("rejecting WebSocket upgrade: {e}");
            return e.into_response();
        }
    };
    let sessions = Arc::clone(&state.sessions);
    let shutdown = state.shutdown.clone();
    ws.on_upgrade(move |socket| run_session(socket, target, sessions, shutdown))
}

/// Runs one browser connection from upgrade to close.
async fn run_session(
    socket: WebSocket,
    target: ConnectTarget,
    sessions: Arc<SessionManager>,
    mut shutdown: watch::Receiver<bool>,
) {
    let conn = Uuid::new_v4();
    let (mut ws_tx, mut ws_rx) = socket.split();

    // ── Step 1: Connecting → Active ──────────────────────────────────────────
    let session = match sessions.open(target.player, &target.layout_name).await {
        Ok(session) => session,
        Err(e) => {
            warn!(
                %conn,
                player = %target.player,
                layout = %target.layout_name,
                "refusing session: {e}"
            );
            send_close(&mut ws_tx, close_code::POLICY, e.to_string()).await;
            return;
        }
    };
    info!(%conn, player = %target.player, "browser connected");

    // ── Step 2: frame loop ───────────────────────────────────────────────────
    //
    // Frames are handled one at a time, so events from this browser are
    // injected in the order they were sent.
    loop {
        let frame = tokio::select! {
            frame = ws_rx.next() => frame,
            _ = session.replaced() => {
                info!(%conn, player = %target.player, "closing session replaced by a newer connection");
                send_close(&mut ws_tx, close_code::POLICY, REPLACED_REASON.to_string()).await;
                break;
            }
            _ = shutdown_requested(&mut shutdown) => {
                send_close(&mut ws_tx, close_code::AWAY, "server shutting down".to_string()).await;
                break;
            }
        };

        let msg = match frame {
            Some(Ok(msg)) => msg,
            Some(Err(e)) => {
                debug!(%conn, "browser WebSocket closed with error: {e}");
                break;
            }
            None => {
                debug!(%conn, "browser stream ended");
                break;
            }
        };

        match msg {
            WsMessage::Text(text) => {
                session.handle_message(&text);
            }
            WsMessage::Binary(_) => {
                // Events are JSON text only.
                warn!(%conn, "unexpected binary WebSocket frame (ignored)");
            }
            WsMessage::Ping(_) | WsMessage::Pong(_) => {}
            WsMessage::Close(_) => {
                debug!(%conn, "WebSocket Close frame received");
                break;
            }
        }
    }

    // Dropping `session` here removes the player from the connected set.
    drop(session);
}

async fn send_close(ws_tx: &mut WsSink, code: u16, reason: String) {
    let frame = CloseFrame {
        code,
        reason: reason.into(),
    };
    if let Err(e) = ws_tx.send(WsMessage::Close(Some(frame))).await {
        debug!("failed to send close frame: {e}");
    }
}

/// Waits until every session has closed, for at most two seconds.
pub async fn drain_sessions(sessions: &SessionManager) {
    let drained = async {
        while !sessions.connected_players().is_empty() {
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    };
    if tokio::time::timeout(SESSION_DRAIN_TIMEOUT, drained).await.is_err() {
        warn!("some sessions did not close in time");
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
