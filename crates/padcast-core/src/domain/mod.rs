//! Domain entities: layouts, keybind resolution and player identity.

pub mod layout;
pub mod player;
pub mod resolver;
