//! Per-player keybind resolution.
//!
//! When a session opens, the server copies the chosen layout into an
//! [`ItemIndex`].  Every button event is then resolved against that copy:
//! edits saved to the layout while the session is live are not seen until
//! the browser reconnects.

use std::collections::HashMap;

use thiserror::Error;

use super::layout::{Keybinds, Layout};
use super::player::PlayerId;

/// Why an item could not be resolved to a key name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    #[error("no item {0:?} in this layout")]
    UnknownItem(String),
    #[error("item {item_id:?} has no keybind for player {player} and no default")]
    NoKeybind { item_id: String, player: PlayerId },
}

/// Item id → keybinds, built once per session.
#[derive(Debug, Clone, Default)]
pub struct ItemIndex {
    items: HashMap<String, Keybinds>,
}

impl ItemIndex {
    /// Indexes `layout` by item id.  If two items share an id the later one
    /// wins.
    pub fn from_layout(layout: &Layout) -> Self {
        let items = layout
            .items
            .iter()
            .map(|item| (item.id.clone(), item.keybinds.clone()))
            .collect();
        Self { items }
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn contains(&self, item_id: &str) -> bool {
        self.items.contains_key(item_id)
    }

    /// Shorthand for [`resolve`].
    pub fn resolve(&self, item_id: &str, player: PlayerId) -> Result<&str, ResolveError> {
        resolve(self, item_id, player)
    }
}

/// Picks the key name `player` sends when pressing `item_id`.
///
/// The item's `player<N>` binding wins; otherwise its `default` binding is
/// used.  Empty bindings are treated as missing.
///
/// # Errors
///
/// - [`ResolveError::UnknownItem`] if the layout has no such item.
/// - [`ResolveError::NoKeybind`] if neither binding is set.
pub fn resolve<'a>(index: &'a ItemIndex, item_id: &str, player: PlayerId) -> Result<&'a str, ResolveError> {
    let keybinds = index
        .items
        .get(item_id)
        .ok_or_else(|| ResolveError::UnknownItem(item_id.to_string()))?;
    keybinds.for_player(player).ok_or_else(|| ResolveError::NoKeybind {
        item_id: item_id.to_string(),
        player,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::layout::{arrow_layout, Item, KeybindRole};

    fn layout_with(items: Vec<Item>) -> Layout {
        Layout::new(items)
    }

    #[test]
    fn test_player_override_wins_over_default() {
        // Arrange
        let index = ItemIndex::from_layout(&arrow_layout());

        // Act
        let key = resolve(&index, "up_button", PlayerId(2)).unwrap();

        // Assert
        assert_eq!(key, "w");
    }

    #[test]
    fn test_falls_back_to_default_without_override() {
        let index = ItemIndex::from_layout(&arrow_layout());
        assert_eq!(resolve(&index, "left_button", PlayerId(9)).unwrap(), "ArrowLeft");
    }

    #[test]
    fn test_unknown_item() {
        // Arrange
        let index = ItemIndex::from_layout(&arrow_layout());

        // Act
        let err = resolve(&index, "fire_button", PlayerId(1)).unwrap_err();

        // Assert
        assert_eq!(err, ResolveError::UnknownItem("fire_button".to_string()));
    }

    #[test]
    fn test_no_keybind_when_neither_binding_exists() {
        // Arrange
        let only_p2 = Keybinds::new().with(KeybindRole::Player(PlayerId(2)), "x");
        let index = ItemIndex::from_layout(&layout_with(vec![Item::new("b", 0.0, 0.0, "", only_p2)]));

        // Act
        let err = index.resolve("b", PlayerId(1)).unwrap_err();

        // Assert
        assert_eq!(
            err,
            ResolveError::NoKeybind {
                item_id: "b".to_string(),
                player: PlayerId(1)
            }
        );
        assert_eq!(index.resolve("b", PlayerId(2)).unwrap(), "x");
    }

    #[test]
    fn test_precedence_is_per_item() {
        // Arrange
        let with_override = Keybinds::new()
            .with(KeybindRole::Default, "a")
            .with(KeybindRole::Player(PlayerId(5)), "z");
        let without_override = Keybinds::new().with(KeybindRole::Default, "b");
        let index = ItemIndex::from_layout(&layout_with(vec![
            Item::new("one", 0.0, 0.0, "", with_override),
            Item::new("two", 0.0, 0.0, "", without_override),
        ]));

        // Act / Assert
        assert_eq!(index.resolve("one", PlayerId(5)).unwrap(), "z");
        assert_eq!(index.resolve("two", PlayerId(5)).unwrap(), "b");
    }

    #[test]
    fn test_later_duplicate_item_wins() {
        let first = Keybinds::new().with(KeybindRole::Default, "a");
        let second = Keybinds::new().with(KeybindRole::Default, "b");
        let index = ItemIndex::from_layout(&layout_with(vec![
            Item::new("dup", 0.0, 0.0, "", first),
            Item::new("dup", 0.0, 0.0, "", second),
        ]));
        assert_eq!(index.len(), 1);
        assert_eq!(index.resolve("dup", PlayerId(1)).unwrap(), "b");
    }

    #[test]
    fn test_index_is_a_copy_of_the_layout() {
        // Arrange
        let mut layout = arrow_layout();
        let index = ItemIndex::from_layout(&layout);

        // Act
        layout.items.clear();

        // Assert
        assert!(index.contains("up_button"));
        assert_eq!(index.len(), 4);
    }
}
