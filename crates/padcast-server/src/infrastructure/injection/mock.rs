//! Recording injection backend for tests.
//!
//! The real backends press keys on the machine running the tests.
//! `RecordingBackend` replaces the OS call with an in-memory log so tests can
//! assert exactly which codes were injected and in what order.
//!
//! # Usage in tests
//!
//! ```ignore
//! let backend = Arc::new(RecordingBackend::new());
//! let manager = SessionManager::new(store, table, backend.clone());
//!
//! session.handle_message(r#"{"itemId":"up_button","action":"down"}"#);
//!
//! assert_eq!(backend.calls(), vec![(103, true)]);
//! ```

use std::sync::{Mutex, PoisonError};

use crate::application::injection::{InjectionBackend, InjectionError};

/// A backend that records every call without touching the OS.
#[derive(Debug, Default)]
pub struct RecordingBackend {
    calls: Mutex<Vec<(u16, bool)>>,
    /// Calls for this code fail with `InjectionFailed` and are not recorded.
    fail_code: Option<u16>,
}

impl RecordingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// A backend that rejects every event for `code`, as if the OS had.
    pub fn failing_on(code: u16) -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_code: Some(code),
        }
    }

    /// Every successful `(code, pressed)` call, oldest first.
    pub fn calls(&self) -> Vec<(u16, bool)> {
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl InjectionBackend for RecordingBackend {
    fn inject(&self, code: u16, pressed: bool) -> Result<(), InjectionError> {
        if self.fail_code == Some(code) {
            return Err(InjectionError::InjectionFailed {
                code,
                last_error: 0,
            });
        }
        self.calls
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((code, pressed));
        Ok(())
    }

    fn name(&self) -> &'static str {
        "recording"
    }
}
