//! # padcast-core
//!
//! Shared library for padcast containing the key tables, the layout domain
//! types, the keybind resolver, player identity, and the inbound event wire
//! type.
//!
//! It has zero dependencies on OS APIs, async runtimes, or network sockets.
//!
//! # Architecture overview
//!
//! padcast turns browser tabs into virtual game controllers for one host
//! machine.  Each browser renders a named *layout* of on-screen buttons; when
//! a button is pressed the browser sends `{"itemId": "...", "action": "down"}`
//! over a WebSocket, and the host injects the matching keyboard key into the
//! operating system.
//!
//! This crate defines:
//!
//! - **`keymap`** – Logical key names (`"ArrowUp"`, `"w"`, `"Shift"`) and the
//!   per-platform tables that turn them into Linux input event codes or
//!   Windows virtual-key codes.
//!
//! - **`domain`** – Layouts, items and keybinds, the per-player resolver that
//!   picks which key an item sends for a given player, and the player id
//!   allocator.
//!
//! - **`protocol`** – The JSON message a browser sends for each button event.

pub mod domain;
pub mod keymap;
pub mod protocol;

pub use domain::layout::{Item, KeybindRole, Keybinds, Layout, LayoutMap};
pub use domain::player::{PlayerAllocator, PlayerId};
pub use domain::resolver::{ItemIndex, ResolveError};
pub use keymap::{KeyEntry, KeyLookupError, KeyName, KeyTable, Platform};
pub use protocol::messages::{EventError, KeyAction, KeyEvent};
