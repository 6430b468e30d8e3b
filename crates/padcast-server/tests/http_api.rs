//! Tests for the HTTP API router, driven through `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use padcast_core::domain::layout::default_layouts;
use padcast_core::{KeyTable, LayoutMap, Platform, PlayerAllocator, PlayerId};
use padcast_server::application::{LayoutStore, SessionManager};
use padcast_server::infrastructure::http_api::{router, AppState};
use padcast_server::infrastructure::injection::mock::RecordingBackend;
use padcast_server::infrastructure::storage::MemoryDocument;
use serde_json::{json, Value};
use tokio::sync::watch;
use tower::ServiceExt;

struct Fixture {
    app: Router,
    document: Arc<MemoryDocument>,
    sessions: Arc<SessionManager>,
}

async fn fixture() -> Fixture {
    let document = Arc::new(MemoryDocument::with(default_layouts()));
    let store = Arc::new(LayoutStore::load(document.clone()).await);
    let sessions = Arc::new(SessionManager::new(
        Arc::clone(&store),
        Arc::new(KeyTable::for_platform(Platform::Linux)),
        Arc::new(RecordingBackend::new()),
    ));
    let app = router(AppState {
        store,
        allocator: Arc::new(PlayerAllocator::default()),
        sessions: Arc::clone(&sessions),
        // A dropped sender means the server is never asked to stop.
        shutdown: watch::channel(false).1,
    });
    Fixture {
        app,
        document,
        sessions,
    }
}

async fn call(app: &Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut request = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(value) => {
            request = request.header(header::CONTENT_TYPE, "application/json");
            Body::from(value.to_string())
        }
        None => Body::empty(),
    };
    let response = app
        .clone()
        .oneshot(request.body(body).unwrap())
        .await
        .unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap_or(Value::Null)
    };
    (status, value)
}

#[tokio::test]
async fn test_root_reports_status() {
    let f = fixture().await;

    let (status, body) = call(&f.app, Method::GET, "/", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        body,
        json!({ "status": "Backend is running and ready for remote control." })
    );
}

#[tokio::test]
async fn test_list_layouts_returns_every_layout() {
    // Arrange
    let f = fixture().await;

    // Act
    let (status, body) = call(&f.app, Method::GET, "/layouts", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    let layouts: LayoutMap = serde_json::from_value(body).unwrap();
    assert_eq!(layouts, default_layouts());
}

#[tokio::test]
async fn test_get_missing_layout_is_404() {
    let f = fixture().await;

    let (status, body) = call(&f.app, Method::GET, "/layouts/nope", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Layout not found" }));
}

#[tokio::test]
async fn test_save_then_get_layout() {
    // Arrange
    let f = fixture().await;
    let layout = json!({
        "items": [
            { "i": "jump", "x": 10, "y": 20, "w": 2, "h": 2, "icon": "A",
              "keybinds": { "default": " ", "player2": "KeyJ" } }
        ]
    });

    // Act
    let (status, body) = call(&f.app, Method::POST, "/layouts/racing", Some(layout)).await;
    let (get_status, fetched) = call(&f.app, Method::GET, "/layouts/racing", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Layout 'racing' saved successfully!" }));
    assert_eq!(get_status, StatusCode::OK);
    assert_eq!(fetched["items"][0]["i"], "jump");
    assert_eq!(fetched["items"][0]["w"], 2);
    assert_eq!(fetched["items"][0]["keybinds"]["player2"], "KeyJ");
    assert!(f.document.current().unwrap().contains_key("racing"));
}

#[tokio::test]
async fn test_save_rejects_body_that_is_not_a_layout() {
    let f = fixture().await;

    let (status, _) = call(
        &f.app,
        Method::POST,
        "/layouts/bad",
        Some(json!({ "items": "nope" })),
    )
    .await;

    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert!(!f.document.current().unwrap().contains_key("bad"));
}

#[tokio::test]
async fn test_delete_layout() {
    // Arrange
    let f = fixture().await;

    // Act
    let (status, body) = call(&f.app, Method::DELETE, "/layouts/default", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "message": "Layout 'default' deleted successfully!" }));
    let (get_status, _) = call(&f.app, Method::GET, "/layouts/default", None).await;
    assert_eq!(get_status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_arrows_is_forbidden() {
    // Arrange
    let f = fixture().await;

    // Act
    let (status, body) = call(&f.app, Method::DELETE, "/layouts/Arrows", None).await;

    // Assert
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(
        body,
        json!({ "detail": "The default 'Arrows' layout cannot be deleted." })
    );
    assert!(f.document.current().unwrap().contains_key("Arrows"));
}

#[tokio::test]
async fn test_delete_missing_layout_is_404() {
    let f = fixture().await;

    let (status, body) = call(&f.app, Method::DELETE, "/layouts/ghost", None).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body, json!({ "detail": "Layout not found" }));
}

#[tokio::test]
async fn test_join_hands_out_increasing_ids() {
    // Arrange
    let f = fixture().await;

    // Act
    let (_, first) = call(&f.app, Method::POST, "/join", None).await;
    let (_, second) = call(&f.app, Method::POST, "/join", None).await;

    // Assert
    assert_eq!(first, json!({ "player_id": 1 }));
    assert_eq!(second, json!({ "player_id": 2 }));
}

#[tokio::test]
async fn test_players_lists_active_sessions() {
    // Arrange
    let f = fixture().await;
    let _a = f.sessions.open(PlayerId(3), "default").await.unwrap();
    let _b = f.sessions.open(PlayerId(1), "Arrows").await.unwrap();

    // Act
    let (status, body) = call(&f.app, Method::GET, "/players", None).await;

    // Assert
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "players": [1, 3], "count": 2 }));
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    // Arrange
    let f = fixture().await;
    let request = Request::builder()
        .method(Method::GET)
        .uri("/")
        .header(header::ORIGIN, "http://192.168.1.20:3000")
        .body(Body::empty())
        .unwrap();

    // Act
    let response = f.app.clone().oneshot(request).await.unwrap();

    // Assert
    assert_eq!(
        response.headers()[header::ACCESS_CONTROL_ALLOW_ORIGIN],
        "*"
    );
}
