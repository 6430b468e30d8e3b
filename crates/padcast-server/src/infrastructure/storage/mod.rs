//! Storage infrastructure: layout documents and the configuration file.
//!
//! - `layouts` persists the layout map as one JSON document and provides an
//!   in-memory document for tests and ephemeral servers.
//! - `config` reads the optional TOML configuration file.

pub mod config;
pub mod layouts;

pub use layouts::{JsonFileDocument, MemoryDocument};
