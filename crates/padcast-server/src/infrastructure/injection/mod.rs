//! Platform-specific key injection implementations.
//!
//! The correct implementation is selected at compile time via `#[cfg(target_os = ...)]`.

use std::sync::Arc;

use padcast_core::KeyTable;

use crate::application::injection::{InjectionBackend, InjectionError};
use crate::domain::ServerConfig;

pub mod mock;

#[cfg(target_os = "windows")]
pub mod windows;

#[cfg(target_os = "linux")]
pub mod linux;

/// Creates the injection backend for the compile target.
///
/// On Linux a uinput device that cannot be created degrades to a no-op
/// backend.  On Windows a bad `INPUT` record size is fatal.
///
/// # Errors
///
/// - [`InjectionError::RecordSizeMismatch`] on Windows (see above).
/// - [`InjectionError::Platform`] on targets without a backend.
#[allow(unused_variables)]
pub fn platform_backend(
    config: &ServerConfig,
    key_table: &KeyTable,
) -> Result<Arc<dyn InjectionBackend>, InjectionError> {
    #[cfg(target_os = "linux")]
    {
        let backend = linux::EvdevBackend::open_or_degraded(&config.device_name, &key_table.codes());
        Ok(Arc::new(backend))
    }

    #[cfg(target_os = "windows")]
    {
        Ok(Arc::new(windows::SendInputBackend::new()?))
    }

    #[cfg(not(any(target_os = "linux", target_os = "windows")))]
    {
        Err(InjectionError::Platform(format!(
            "key injection is not supported on {}",
            std::env::consts::OS
        )))
    }
}
