//! Domain layer: plain configuration data with no I/O.

pub mod config;

pub use config::ServerConfig;
