//! Controller layouts.
//!
//! A layout is the set of on-screen buttons a browser draws.  Each button
//! (an [`Item`]) carries a position, an icon, and a table of keybinds: one
//! `default` key plus optional per-player overrides such as `player2`.
//!
//! # JSON shape
//!
//! Layouts are stored and exchanged in the shape the browser editor produces:
//!
//! ```json
//! {
//!   "items": [
//!     {
//!       "i": "up_button", "x": 100, "y": 0, "icon": "↑",
//!       "keybinds": { "default": "ArrowUp", "player2": "w" }
//!     }
//!   ]
//! }
//! ```
//!
//! Fields the server does not use (grid width and height, colours, …) are
//! kept in `extra` so that a layout saved by the editor comes back unchanged.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use super::player::PlayerId;

/// Name of the built-in layout that can never be deleted.
pub const PROTECTED_LAYOUT: &str = "Arrows";

/// Layout a session uses when the client does not name one.
pub const DEFAULT_LAYOUT_NAME: &str = "default";

/// All layouts, keyed by name.
pub type LayoutMap = BTreeMap<String, Layout>;

/// A named controller layout.  The name is the key it is stored under.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Layout {
    #[serde(default)]
    pub items: Vec<Item>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Layout {
    pub fn new(items: Vec<Item>) -> Self {
        Self {
            items,
            extra: Map::new(),
        }
    }

    /// A layout with no items cannot drive a session.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// One on-screen button.
///
/// Only `i` and `keybinds` matter to the server.  Position and icon are
/// display data: they are kept as the raw JSON values the editor sent, so
/// `"x": 100` is written back as `100` and an odd value never makes the
/// whole layout unreadable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    #[serde(rename = "i", default)]
    pub id: String,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub x: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub y: Value,
    #[serde(default, skip_serializing_if = "Value::is_null")]
    pub icon: Value,
    #[serde(default)]
    pub keybinds: Keybinds,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Item {
    pub fn new(
        id: impl Into<String>,
        x: impl Into<Value>,
        y: impl Into<Value>,
        icon: impl Into<String>,
        keybinds: Keybinds,
    ) -> Self {
        Self {
            id: id.into(),
            x: x.into(),
            y: y.into(),
            icon: Value::String(icon.into()),
            keybinds,
            extra: Map::new(),
        }
    }

    /// Position in editor units, if both coordinates are numbers.
    pub fn position(&self) -> Option<(f64, f64)> {
        Some((self.x.as_f64()?, self.y.as_f64()?))
    }

    pub fn icon(&self) -> Option<&str> {
        self.icon.as_str().filter(|icon| !icon.is_empty())
    }
}

/// Which keybind slot of an item a binding fills.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeybindRole {
    /// Used by every player without an override.
    Default,
    /// Override for one player.
    Player(PlayerId),
}

impl fmt::Display for KeybindRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            KeybindRole::Default => f.write_str("default"),
            KeybindRole::Player(id) => write!(f, "player{id}"),
        }
    }
}

impl FromStr for KeybindRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == "default" {
            return Ok(KeybindRole::Default);
        }
        s.strip_prefix("player")
            .and_then(|n| n.parse::<PlayerId>().ok())
            .map(KeybindRole::Player)
            .ok_or_else(|| format!("invalid keybind role {s:?}"))
    }
}

/// Role → key name table of one item.
///
/// Keys are stored as plain strings so that roles the server does not
/// understand survive a save/load cycle.  When reading, a binding that is
/// not a string (`null`, a number) counts as absent, and a `null` table is
/// an empty one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Keybinds(BTreeMap<String, String>);

impl<'de> Deserialize<'de> for Keybinds {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Option::<BTreeMap<String, Value>>::deserialize(deserializer)?;
        let bindings = raw
            .unwrap_or_default()
            .into_iter()
            .filter_map(|(role, key)| match key {
                Value::String(key) => Some((role, key)),
                _ => None,
            })
            .collect();
        Ok(Self(bindings))
    }
}

impl Keybinds {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder form of [`insert`](Self::insert).
    pub fn with(mut self, role: KeybindRole, key: impl Into<String>) -> Self {
        self.insert(role, key);
        self
    }

    pub fn insert(&mut self, role: KeybindRole, key: impl Into<String>) {
        self.0.insert(role.to_string(), key.into());
    }

    /// The binding for `role`.  An empty string counts as no binding.
    pub fn get(&self, role: KeybindRole) -> Option<&str> {
        self.0
            .get(&role.to_string())
            .map(String::as_str)
            .filter(|key| !key.is_empty())
    }

    /// The key `player` sends: their override if present, else the default.
    pub fn for_player(&self, player: PlayerId) -> Option<&str> {
        self.get(KeybindRole::Player(player))
            .or_else(|| self.get(KeybindRole::Default))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// The layouts a fresh installation starts with.
///
/// Both `"Arrows"` and `"default"` contain the same four arrow buttons.
/// Player 1 uses the arrow keys, player 2 `WASD`, player 3 `IJKL`.
pub fn default_layouts() -> LayoutMap {
    let mut layouts = LayoutMap::new();
    layouts.insert(PROTECTED_LAYOUT.to_string(), arrow_layout());
    layouts.insert(DEFAULT_LAYOUT_NAME.to_string(), arrow_layout());
    layouts
}

/// The built-in four-button arrow pad.
pub fn arrow_layout() -> Layout {
    // (id, x, y, icon, default, player1, player2, player3)
    const BUTTONS: [(&str, i64, i64, &str, &str, &str, &str, &str); 4] = [
        ("up_button", 100, 0, "↑", "ArrowUp", "ArrowUp", "w", "i"),
        ("down_button", 100, 100, "↓", "ArrowDown", "ArrowDown", "s", "k"),
        ("left_button", 0, 100, "←", "ArrowLeft", "ArrowLeft", "a", "j"),
        ("right_button", 200, 100, "→", "ArrowRight", "ArrowRight", "d", "l"),
    ];

    let items = BUTTONS
        .iter()
        .map(|&(id, x, y, icon, default, p1, p2, p3)| {
            let keybinds = Keybinds::new()
                .with(KeybindRole::Default, default)
                .with(KeybindRole::Player(PlayerId(1)), p1)
                .with(KeybindRole::Player(PlayerId(2)), p2)
                .with(KeybindRole::Player(PlayerId(3)), p3);
            Item::new(id, x, y, icon, keybinds)
        })
        .collect();
    Layout::new(items)
}
