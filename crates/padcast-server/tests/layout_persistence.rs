//! Layout documents on disk, loaded through the store the way the server
//! does at startup.

use std::sync::Arc;

use padcast_core::{KeyTable, Platform, PlayerId};
use padcast_server::application::{LayoutStore, SessionManager};
use padcast_server::infrastructure::injection::mock::RecordingBackend;
use padcast_server::infrastructure::storage::JsonFileDocument;
use serde_json::{json, Value};

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

fn sessions_over(store: Arc<LayoutStore>) -> SessionManager {
    SessionManager::new(
        store,
        Arc::new(KeyTable::for_platform(Platform::Linux)),
        Arc::new(RecordingBackend::new()),
    )
}

#[tokio::test]
async fn test_empty_document_starts_with_both_built_in_layouts() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layouts.json");
    std::fs::write(&path, "{}").unwrap();

    // Act
    let store = Arc::new(LayoutStore::load(Arc::new(JsonFileDocument::new(&path))).await);
    let sessions = sessions_over(Arc::clone(&store));

    // Assert
    assert_eq!(store.names().await, vec!["Arrows", "default"]);
    assert!(sessions.open(PlayerId(1), "default").await.is_ok());
    let on_disk = read_json(&path);
    assert!(on_disk.get("Arrows").is_some());
    assert!(on_disk.get("default").is_some());
}

#[tokio::test]
async fn test_null_keybind_does_not_reset_saved_layouts() {
    // Arrange: an editor wrote a cleared player binding as null
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layouts.json");
    let saved = json!({
        "racing": { "items": [
            { "i": "gas", "x": 3, "y": 4, "w": 2, "h": 2, "icon": "",
              "keybinds": { "default": "KeyW", "player2": null } }
        ]},
        "Arrows": { "items": [
            { "i": "up_button", "x": 100, "y": 0,
              "keybinds": { "default": "ArrowUp" } }
        ]}
    });
    std::fs::write(&path, serde_json::to_string_pretty(&saved).unwrap()).unwrap();

    // Act
    let store = Arc::new(LayoutStore::load(Arc::new(JsonFileDocument::new(&path))).await);
    let sessions = sessions_over(Arc::clone(&store));

    // Assert
    assert_eq!(store.names().await, vec!["Arrows", "racing"]);
    assert!(sessions.open(PlayerId(2), "racing").await.is_ok());
    // Nothing needed repair, so the file is exactly as the editor left it.
    assert_eq!(read_json(&path), saved);
}

#[tokio::test]
async fn test_unreadable_layout_is_kept_when_another_is_saved() {
    // Arrange
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("layouts.json");
    let broken = json!({ "items": { "not": "a list" } });
    std::fs::write(
        &path,
        json!({ "broken": broken, "Arrows": { "items": [] } }).to_string(),
    )
    .unwrap();
    let store = LayoutStore::load(Arc::new(JsonFileDocument::new(&path))).await;

    // Act
    store
        .put("mine", serde_json::from_value(json!({ "items": [] })).unwrap())
        .await;

    // Assert
    assert_eq!(store.names().await, vec!["Arrows", "mine"]);
    let on_disk = read_json(&path);
    assert_eq!(on_disk["broken"], broken);
    assert!(on_disk.get("mine").is_some());
}
