//! TOML configuration file for the server.
//!
//! The file is optional and every key in it is optional:
//!
//! ```toml
//! bind_addr = "0.0.0.0:8000"
//! layouts_file = "/var/lib/padcast/layouts.json"
//! device_name = "padcast virtual keyboard"
//! log_level = "info"
//! ```
//!
//! Missing keys take the defaults from [`ServerConfig`]'s serde attributes,
//! so an old file keeps working after new settings are added.

use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::domain::ServerConfig;

/// Error type for configuration file operations.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// A file system I/O error occurred.
    #[error("I/O error accessing config at {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The TOML content could not be parsed.
    #[error("failed to parse config TOML: {0}")]
    Parse(#[from] toml::de::Error),

    /// The config could not be serialized to TOML.
    #[error("failed to serialize config: {0}")]
    Serialize(#[from] toml::ser::Error),
}

/// Loads `ServerConfig` from `path`.
///
/// # Errors
///
/// [`ConfigError::Io`] if the file cannot be read (including when it does
/// not exist, since the path was given explicitly) and
/// [`ConfigError::Parse`] if the TOML is malformed.
pub fn load_config(path: &Path) -> Result<ServerConfig, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_config(&content)
}

/// Parses `ServerConfig` from TOML text.
///
/// # Errors
///
/// [`ConfigError::Parse`] if the TOML is malformed or a value has the wrong
/// type.
pub fn parse_config(content: &str) -> Result<ServerConfig, ConfigError> {
    Ok(toml::from_str(content)?)
}

/// Renders `config` as TOML, e.g. for `--print-config`.
///
/// # Errors
///
/// [`ConfigError::Serialize`] if serialization fails.
pub fn render_config(config: &ServerConfig) -> Result<String, ConfigError> {
    Ok(toml::to_string_pretty(config)?)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
