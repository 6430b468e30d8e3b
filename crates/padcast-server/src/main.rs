//! padcast server: entry point.
//!
//! Serves the layout HTTP API and the `/ws/{player_id}` endpoint browsers
//! send button events to on one address, and injects the resolved keys into
//! this machine.
//!
//! # Usage
//!
//! ```text
//! padcast-server [OPTIONS]
//!
//! Options:
//!   --config <PATH>        TOML configuration file
//!   --addr <ADDR>          HTTP and WebSocket address [default: 0.0.0.0:8000]
//!   --layouts <PATH>       Layout document         [default: layouts.json]
//!   --log-level <FILTER>   Log filter              [default: info]
//!   --device-name <NAME>   uinput device name
//!   --ephemeral            Keep layouts in memory only
//!   --print-config         Print the effective configuration and exit
//! ```
//!
//! # Precedence
//!
//! CLI flag, then environment variable, then configuration file, then the
//! built-in default.  `RUST_LOG` overrides the log level when set.
//!
//! | Variable            | Flag           |
//! |---------------------|----------------|
//! | `PADCAST_CONFIG`    | `--config`     |
//! | `PADCAST_ADDR`      | `--addr`       |
//! | `PADCAST_LAYOUTS`   | `--layouts`    |
//! | `PADCAST_LOG`       | `--log-level`  |

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

use padcast_core::{KeyTable, PlayerAllocator};
use padcast_server::application::{LayoutDocument, LayoutStore, SessionManager};
use padcast_server::domain::ServerConfig;
use padcast_server::infrastructure::http_api::{self, AppState};
use padcast_server::infrastructure::platform_backend;
use padcast_server::infrastructure::storage::config::{load_config, render_config};
use padcast_server::infrastructure::storage::{JsonFileDocument, MemoryDocument};

// ── CLI argument definitions ──────────────────────────────────────────────────

/// Browser gamepads as local keyboard input.
#[derive(Debug, Parser)]
#[command(
    name = "padcast-server",
    about = "Turns browser controllers into keyboard input on this machine",
    version
)]
struct Cli {
    /// TOML configuration file.  Every key in it is optional.
    #[arg(long, env = "PADCAST_CONFIG")]
    config: Option<PathBuf>,

    /// Address serving both the HTTP API and `/ws`.
    #[arg(long, env = "PADCAST_ADDR")]
    addr: Option<SocketAddr>,

    /// JSON document holding the saved layouts.
    #[arg(long, env = "PADCAST_LAYOUTS")]
    layouts: Option<PathBuf>,

    /// `tracing` filter, e.g. `info` or `padcast_server=debug`.
    #[arg(long, env = "PADCAST_LOG")]
    log_level: Option<String>,

    /// Name of the uinput virtual keyboard (Linux).
    #[arg(long)]
    device_name: Option<String>,

    /// Keep layouts in memory; nothing is read from or written to disk.
    #[arg(long)]
    ephemeral: bool,

    /// Print the effective configuration as TOML and exit.
    #[arg(long)]
    print_config: bool,
}

impl Cli {
    /// Builds the effective [`ServerConfig`] from the file (if any) and the
    /// flags.
    ///
    /// # Errors
    ///
    /// Returns an error if `--config` names a file that cannot be read or
    /// parsed.
    fn server_config(&self) -> anyhow::Result<ServerConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("failed to load config from {}", path.display()))?,
            None => ServerConfig::default(),
        };

        if let Some(addr) = self.addr {
            config.bind_addr = addr;
        }
        if let Some(path) = &self.layouts {
            config.layouts_file = path.clone();
        }
        if let Some(level) = &self.log_level {
            config.log_level = level.clone();
        }
        if let Some(name) = &self.device_name {
            config.device_name = name.clone();
        }
        Ok(config)
    }
}

// ── Entry point ───────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = cli.server_config()?;

    if cli.print_config {
        print!("{}", render_config(&config)?);
        return Ok(());
    }

    // ── Logging setup ─────────────────────────────────────────────────────────
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log_level)),
        )
        .init();

    info!("padcast server starting on {}", config.bind_addr);

    // ── Core services ─────────────────────────────────────────────────────────
    let key_table = Arc::new(KeyTable::current());
    let backend = platform_backend(&config, &key_table)
        .context("failed to initialise key injection")?;
    info!(backend = backend.name(), "key injection ready");

    let document: Arc<dyn LayoutDocument> = if cli.ephemeral {
        info!("ephemeral mode: layouts are kept in memory only");
        Arc::new(MemoryDocument::empty())
    } else {
        Arc::new(JsonFileDocument::new(&config.layouts_file))
    };
    let store = Arc::new(LayoutStore::load(document).await);
    let sessions = Arc::new(SessionManager::new(Arc::clone(&store), key_table, backend));

    // ── Graceful shutdown signal ──────────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("received Ctrl+C, initiating graceful shutdown");
                let _ = shutdown_tx.send(true);
            }
            Err(e) => {
                error!("failed to listen for Ctrl+C signal: {e}");
                // Keep the sender alive so the servers keep running.
                std::future::pending::<()>().await;
            }
        }
    });

    // ── Server ────────────────────────────────────────────────────────────────
    let listener = TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    let state = AppState {
        store,
        allocator: Arc::new(PlayerAllocator::default()),
        sessions,
        shutdown: shutdown_rx,
    };
    http_api::serve(listener, state).await?;

    info!("padcast server stopped");
    Ok(())
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_flags_gives_default_config() {
        // Arrange
        let cli = Cli::parse_from(["padcast-server"]);

        // Act
        let config = cli.server_config().unwrap();

        // Assert
        assert_eq!(config, ServerConfig::default());
        assert!(!cli.ephemeral);
    }

    #[test]
    fn test_flags_override_defaults() {
        // Arrange
        let cli = Cli::parse_from([
            "padcast-server",
            "--addr",
            "127.0.0.1:9000",
            "--layouts",
            "/tmp/pads.json",
            "--log-level",
            "debug",
            "--device-name",
            "den pad",
        ]);

        // Act
        let config = cli.server_config().unwrap();

        // Assert
        assert_eq!(config.bind_addr.to_string(), "127.0.0.1:9000");
        assert_eq!(config.layouts_file, PathBuf::from("/tmp/pads.json"));
        assert_eq!(config.log_level, "debug");
        assert_eq!(config.device_name, "den pad");
    }

    #[test]
    fn test_invalid_address_is_rejected_by_parser() {
        let result = Cli::try_parse_from(["padcast-server", "--addr", "not-an-addr"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_flags_override_config_file() {
        // Arrange
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("padcast.toml");
        std::fs::write(&path, "bind_addr = \"127.0.0.1:7001\"\nlog_level = \"warn\"\n").unwrap();
        let path_arg = path.to_string_lossy().into_owned();
        let cli = Cli::parse_from(["padcast-server", "--config", &path_arg, "--log-level", "trace"]);

        // Act
        let config = cli.server_config().unwrap();

        // Assert: file value kept, flag wins over file
        assert_eq!(config.bind_addr.port(), 7001);
        assert_eq!(config.log_level, "trace");
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let cli = Cli::parse_from(["padcast-server", "--config", "/definitely/not/here.toml"]);
        assert!(cli.server_config().is_err());
    }
}
