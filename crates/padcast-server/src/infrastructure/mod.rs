//! Infrastructure layer for padcast-server.
//!
//! Everything that performs I/O lives here:
//!
//! - `injection`: uinput (Linux) and `SendInput` (Windows) backends, plus a
//!   recording backend for tests
//! - `storage`: the JSON layout document and the TOML configuration file
//! - `http_api`: the axum router and server for the REST endpoints
//! - `ws_server`: the `/ws/{player_id}` endpoint mounted on that router

use tokio::sync::watch;

pub mod http_api;
pub mod injection;
pub mod storage;
pub mod ws_server;

pub use injection::platform_backend;

/// Resolves once the shutdown flag is set.
///
/// If the sender is dropped without ever setting it, this never resolves.
pub async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    let stopped = shutdown.wait_for(|stop| *stop).await.is_ok();
    if !stopped {
        std::future::pending::<()>().await;
    }
}
