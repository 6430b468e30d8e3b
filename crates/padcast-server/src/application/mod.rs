//! Application layer for padcast-server.
//!
//! The application layer knows *what* happens to a browser event; it
//! delegates *how* keys reach the OS and *where* layouts are stored to the
//! infrastructure layer through two seams:
//!
//! - [`injection::InjectionBackend`]: press or release one native key code.
//! - [`layout_store::LayoutDocument`]: load and save the layout map.
//!
//! # What does NOT belong here?
//!
//! - Opening sockets or parsing upgrade requests (infrastructure)
//! - Talking to uinput or `SendInput` directly (infrastructure)
//! - Reading the configuration file (infrastructure)

pub mod injection;
pub mod layout_store;
pub mod session;

pub use injection::{InjectionBackend, InjectionError};
pub use layout_store::{LayoutDocument, LayoutStore, StoreError};
pub use session::{ActiveSession, EventOutcome, SessionError, SessionManager};
