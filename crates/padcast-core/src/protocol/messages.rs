//! The button event a browser sends over its WebSocket.
//!
//! Every text frame is one JSON object:
//!
//! ```json
//! { "itemId": "up_button", "action": "down" }
//! ```
//!
//! `action` is `"down"` when the button is pressed and `"up"` when it is
//! released.  Anything else is a malformed event and is dropped by the
//! session; a bad event never closes the connection.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

/// Raw shape of a text frame, before validation.
///
/// Both fields are optional here so that a missing field produces a precise
/// [`EventError`] instead of a generic parse failure.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InboundMessage {
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub action: Option<String>,
}

/// Press or release.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KeyAction {
    Down,
    Up,
}

impl KeyAction {
    /// `true` for [`KeyAction::Down`].
    pub fn is_press(self) -> bool {
        matches!(self, KeyAction::Down)
    }
}

/// A validated button event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyEvent {
    pub item_id: String,
    pub action: KeyAction,
}

/// Why a text frame is not a usable [`KeyEvent`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EventError {
    #[error("malformed event: {0}")]
    Malformed(String),
    #[error("event has no itemId")]
    MissingItemId,
    #[error("unknown action {0:?}")]
    UnknownAction(Option<String>),
}

impl TryFrom<InboundMessage> for KeyEvent {
    type Error = EventError;

    fn try_from(message: InboundMessage) -> Result<Self, Self::Error> {
        let item_id = match message.item_id {
            Some(id) if !id.is_empty() => id,
            _ => return Err(EventError::MissingItemId),
        };
        let action = match message.action.as_deref() {
            Some("down") => KeyAction::Down,
            Some("up") => KeyAction::Up,
            _ => return Err(EventError::UnknownAction(message.action)),
        };
        Ok(KeyEvent { item_id, action })
    }
}

impl KeyEvent {
    /// Parses and validates one text frame.
    ///
    /// # Errors
    ///
    /// - [`EventError::Malformed`] if the frame is not a JSON object of the
    ///   expected shape.
    /// - [`EventError::MissingItemId`] if `itemId` is missing or empty.
    /// - [`EventError::UnknownAction`] if `action` is not `"down"` or `"up"`.
    pub fn parse(text: &str) -> Result<Self, EventError> {
        let value: Value =
            serde_json::from_str(text).map_err(|e| EventError::Malformed(e.to_string()))?;
        // The derived deserializer would also take `["id","down"]`.
        if !value.is_object() {
            return Err(EventError::Malformed("event is not a JSON object".to_string()));
        }
        let message: InboundMessage =
            serde_json::from_value(value).map_err(|e| EventError::Malformed(e.to_string()))?;
        KeyEvent::try_from(message)
    }
}
