//! padcast-server library crate.
//!
//! Browsers open a controller page, join as a numbered player and send
//! button events over a WebSocket.  This crate resolves each event to a key
//! through the player's layout and injects it into the host OS.
//!
//! # Architecture
//!
//! ```text
//! Browser (JSON over WebSocket, layouts over HTTP, one port)
//!         ↕
//! [padcast-server]
//!   ├── domain/            ServerConfig
//!   ├── application/       SessionManager, LayoutStore, InjectionBackend trait
//!   └── infrastructure/
//!         ├── http_api/    axum router: layout and join endpoints
//!         ├── ws_server/   /ws/{player_id} upgrade and frame loop (axum ws)
//!         ├── storage/     layouts.json and the TOML config file
//!         └── injection/   uinput / SendInput backends
//! ```
//!
//! # Layer rules
//!
//! - `domain` has no I/O.
//! - `application` depends on `domain` and `padcast-core` only; it reaches
//!   the OS and the disk through traits.
//! - `infrastructure` implements those traits and owns every socket.

/// Domain layer: configuration types.
pub mod domain;

/// Application layer: sessions, layout store and the injection seam.
pub mod application;

/// Infrastructure layer: servers, storage and platform backends.
pub mod infrastructure;
