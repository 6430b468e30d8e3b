//! Server configuration types.
//!
//! [`ServerConfig`] is the single source of truth for all runtime settings.
//! It can be read from a TOML file, overridden from CLI arguments or
//! environment variables, or built from defaults (useful for local
//! development and tests).
//!
//! Keeping configuration as a plain struct (no global state, no environment
//! variable reads inside the domain) lets tests build a server with any
//! settings.  The binary is responsible for populating it.

use std::net::SocketAddr;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// All runtime configuration for the padcast server.
///
/// # Example
///
/// ```rust
/// use padcast_server::domain::config::ServerConfig;
///
/// let cfg = ServerConfig::default();
/// assert_eq!(cfg.bind_addr.port(), 8000);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address serving both the HTTP API and the `/ws/{player_id}`
    /// WebSocket endpoint.
    ///
    /// `0.0.0.0` accepts connections from any interface so phones on the LAN
    /// can reach it.
    #[serde(default = "default_bind_addr", alias = "http_bind_addr")]
    pub bind_addr: SocketAddr,

    /// JSON document holding every saved layout.
    #[serde(default = "default_layouts_file")]
    pub layouts_file: PathBuf,

    /// Name of the uinput virtual keyboard (Linux only).
    #[serde(default = "default_device_name")]
    pub device_name: String,

    /// `tracing` filter used when `RUST_LOG` is not set.
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

// ── Default helpers ───────────────────────────────────────────────────────────

fn default_bind_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 8000))
}
fn default_layouts_file() -> PathBuf {
    PathBuf::from("layouts.json")
}
fn default_device_name() -> String {
    "padcast virtual keyboard".to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ServerConfig {
    /// | Field          | Default                      |
    /// |----------------|------------------------------|
    /// | bind_addr      | `0.0.0.0:8000`               |
    /// | layouts_file   | `layouts.json`               |
    /// | device_name    | `padcast virtual keyboard`   |
    /// | log_level      | `info`                       |
    fn default() -> Self {
        Self {
            bind_addr: default_bind_addr(),
            layouts_file: default_layouts_file(),
            device_name: default_device_name(),
            log_level: default_log_level(),
        }
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
