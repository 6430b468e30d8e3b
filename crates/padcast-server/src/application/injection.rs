//! The seam between sessions and the operating system's input stack.
//!
//! Sessions resolve button events down to a platform key code and hand it to
//! an [`InjectionBackend`].  One backend instance is created at start-up and
//! shared by every session through an `Arc<dyn InjectionBackend>`.  The
//! platform implementations live in `infrastructure::injection`.

use thiserror::Error;

/// Size in bytes of the Windows `INPUT` record on this target.
///
/// `SendInput` rejects every record when the size it is told does not match
/// its own layout, so the Windows backend checks its record against this
/// value before accepting any events.
#[cfg(target_pointer_width = "64")]
pub const EXPECTED_INPUT_RECORD_SIZE: usize = 40;
#[cfg(not(target_pointer_width = "64"))]
pub const EXPECTED_INPUT_RECORD_SIZE: usize = 28;

/// Error type for key injection.
#[derive(Debug, Error)]
pub enum InjectionError {
    /// The virtual device or system facility could not be opened.
    #[error("injection device unavailable: {0}")]
    DeviceUnavailable(String),

    /// The OS refused one event.  `last_error` is the OS error code.
    #[error("failed to inject key code {code:#06x} (os error {last_error})")]
    InjectionFailed { code: u16, last_error: i64 },

    /// The input record layout does not match what the OS expects.
    #[error("input record is {actual} bytes, the OS expects {expected}")]
    RecordSizeMismatch { actual: usize, expected: usize },

    /// No backend exists for this platform, or a platform call failed
    /// outside of a single event.
    #[error("platform error: {0}")]
    Platform(String),
}

/// Platform-agnostic key injection.
///
/// `inject` takes `&self` so one instance can serve every session; an
/// implementation serialises its own OS calls where the OS requires it.
pub trait InjectionBackend: Send + Sync {
    /// Presses (`pressed = true`) or releases the key with platform `code`.
    ///
    /// # Errors
    ///
    /// [`InjectionError::InjectionFailed`] when the OS rejects the event.
    /// Callers log and drop the event; it is never retried.
    fn inject(&self, code: u16, pressed: bool) -> Result<(), InjectionError>;

    /// Short name for logs.
    fn name(&self) -> &'static str;
}

/// Checks an `INPUT` record size against [`EXPECTED_INPUT_RECORD_SIZE`].
///
/// # Errors
///
/// [`InjectionError::RecordSizeMismatch`] when `actual` differs.
pub fn check_input_record_size(actual: usize) -> Result<(), InjectionError> {
    if actual == EXPECTED_INPUT_RECORD_SIZE {
        Ok(())
    } else {
        Err(InjectionError::RecordSizeMismatch {
            actual,
            expected: EXPECTED_INPUT_RECORD_SIZE,
        })
    }
}
