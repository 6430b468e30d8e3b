//! Linux key injection through a uinput virtual keyboard.
//!
//! # How uinput works (for beginners)
//!
//! `/dev/uinput` lets a user-space program create an input device that the
//! kernel treats exactly like a USB keyboard.  Every application (X11,
//! Wayland compositors, games reading evdev directly) sees its key events.
//!
//! The device must declare every key code it will ever send when it is
//! created.  [`EvdevBackend::new`] therefore registers the full set of codes
//! from the key table up front, and `inject` only writes events.
//!
//! # Degraded mode
//!
//! Creating the device needs write access to `/dev/uinput`.  When that fails
//! [`EvdevBackend::open_or_degraded`] logs one warning and returns a backend
//! that accepts events without doing anything, so the rest of the server
//! (layout editing, joining) keeps working.

#![cfg(target_os = "linux")]

use std::sync::{Mutex, PoisonError};

use evdev::uinput::{VirtualDevice, VirtualDeviceBuilder};
use evdev::{AttributeSet, EventType, InputEvent, Key};
use tracing::{info, warn};

use crate::application::injection::{InjectionBackend, InjectionError};

/// Linux implementation of [`InjectionBackend`] using evdev/uinput.
pub struct EvdevBackend {
    /// `None` in degraded mode.
    device: Option<Mutex<VirtualDevice>>,
}

impl EvdevBackend {
    /// Creates the virtual keyboard, registering every code in `codes`.
    ///
    /// # Errors
    ///
    /// [`InjectionError::DeviceUnavailable`] if uinput cannot be opened or the
    /// device cannot be created.
    pub fn new(device_name: &str, codes: &[u16]) -> Result<Self, InjectionError> {
        let mut keys = AttributeSet::<Key>::new();
        for &code in codes {
            keys.insert(Key::new(code));
        }

        let device = VirtualDeviceBuilder::new()
            .and_then(|builder| builder.name(device_name).with_keys(&keys))
            .and_then(|builder| builder.build())
            .map_err(|e| InjectionError::DeviceUnavailable(format!("uinput: {e}")))?;

        info!(device = device_name, keys = codes.len(), "uinput virtual keyboard created");
        Ok(Self {
            device: Some(Mutex::new(device)),
        })
    }

    /// Like [`new`](Self::new), but falls back to a no-op backend on failure.
    pub fn open_or_degraded(device_name: &str, codes: &[u16]) -> Self {
        Self::new(device_name, codes).unwrap_or_else(|e| Self::degraded_after(&e))
    }

    /// Logs why the device could not be created, once, and returns a
    /// degraded backend.  Later injects are silent.
    pub fn degraded_after(err: &InjectionError) -> Self {
        warn!("{err}; key injection disabled (check permissions on /dev/uinput)");
        Self::degraded()
    }

    /// A backend that accepts every event and injects nothing.
    pub fn degraded() -> Self {
        Self { device: None }
    }

    pub fn is_degraded(&self) -> bool {
        self.device.is_none()
    }
}

impl InjectionBackend for EvdevBackend {
    fn inject(&self, code: u16, pressed: bool) -> Result<(), InjectionError> {
        let Some(device) = &self.device else {
            return Ok(());
        };
        let event = InputEvent::new(EventType::KEY, code, i32::from(pressed));

        // emit() appends the SYN_REPORT that makes the event visible.
        device
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .emit(&[event])
            .map_err(|e| InjectionError::InjectionFailed {
                code,
                last_error: i64::from(e.raw_os_error().unwrap_or(0)),
            })
    }

    fn name(&self) -> &'static str {
        if self.is_degraded() {
            "uinput (degraded)"
        } else {
            "uinput"
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use super::*;

    #[test]
    fn test_degraded_backend_accepts_events() {
        // Arrange
        let backend = EvdevBackend::degraded();

        // Act
        let down = backend.inject(103, true);
        let up = backend.inject(103, false);

        // Assert
        assert!(down.is_ok() && up.is_ok());
        assert!(backend.is_degraded());
        assert_eq!(backend.name(), "uinput (degraded)");
    }

    /// Counts events by level.
    #[derive(Clone, Default)]
    struct EventCounter {
        warnings: Arc<AtomicUsize>,
        total: Arc<AtomicUsize>,
    }

    impl<S: Subscriber> Layer<S> for EventCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.warnings.fetch_add(1, Ordering::SeqCst);
            }
            self.total.fetch_add(1, Ordering::SeqCst);
        }
    }

    #[test]
    fn test_uinput_failure_warns_once_then_injects_silently() {
        // Arrange
        let counter = EventCounter::default();
        let subscriber = tracing_subscriber::registry().with(counter.clone());
        let err = InjectionError::DeviceUnavailable("uinput: Permission denied".to_string());

        // Act
        let results: Vec<_> = tracing::subscriber::with_default(subscriber, || {
            let backend = EvdevBackend::degraded_after(&err);
            (0..100)
                .map(|i| backend.inject(30, i % 2 == 0))
                .collect()
        });

        // Assert
        assert!(results.iter().all(Result::is_ok));
        assert_eq!(counter.warnings.load(Ordering::SeqCst), 1);
        assert_eq!(counter.total.load(Ordering::SeqCst), 1);
    }
}
