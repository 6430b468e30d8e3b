//! Windows key injection via the SendInput API.
//!
//! Keys are injected by hardware scan code rather than virtual-key code.
//! Games that read raw keyboard input (DirectInput, Raw Input) ignore
//! VK-only events, but they see scan-code events the same way they see a
//! real keyboard.
//!
//! # Record size check
//!
//! `SendInput` is told the size of one `INPUT` record and silently rejects
//! every event if that size is wrong.  The record is a tagged union whose
//! size comes from its largest alternative (the mouse one), so a record
//! declared with only the keyboard alternative is too small.
//! [`SendInputBackend::new`] checks the size once and refuses to start on a
//! mismatch.

#![cfg(target_os = "windows")]

use windows::Win32::Foundation::GetLastError;
use windows::Win32::UI::Input::KeyboardAndMouse::{
    MapVirtualKeyW, SendInput, INPUT, INPUT_0, INPUT_KEYBOARD, KEYBDINPUT, KEYBD_EVENT_FLAGS,
    KEYEVENTF_EXTENDEDKEY, KEYEVENTF_KEYUP, KEYEVENTF_SCANCODE, MAPVK_VK_TO_VSC, VIRTUAL_KEY,
};

use padcast_core::keymap::windows_vk;
use tracing::info;

use crate::application::injection::{check_input_record_size, InjectionBackend, InjectionError};

/// Windows implementation of [`InjectionBackend`] using SendInput.
pub struct SendInputBackend;

impl SendInputBackend {
    /// Verifies the `INPUT` record layout and returns the backend.
    ///
    /// # Errors
    ///
    /// [`InjectionError::RecordSizeMismatch`] if `INPUT` is not the size
    /// `SendInput` expects on this architecture.
    pub fn new() -> Result<Self, InjectionError> {
        check_input_record_size(std::mem::size_of::<INPUT>())?;
        info!(record_size = std::mem::size_of::<INPUT>(), "SendInput backend ready");
        Ok(Self)
    }
}

impl InjectionBackend for SendInputBackend {
    fn inject(&self, code: u16, pressed: bool) -> Result<(), InjectionError> {
        send_key(code, !pressed)
    }

    fn name(&self) -> &'static str {
        "SendInput"
    }
}

// ── Helpers ───────────────────────────────────────────────────────────────────

/// Builds the scan-code flags for one event.
fn key_flags(vk: u16, key_up: bool) -> KEYBD_EVENT_FLAGS {
    let mut flags = KEYEVENTF_SCANCODE;
    if windows_vk::is_extended(vk) {
        flags |= KEYEVENTF_EXTENDEDKEY;
    }
    if key_up {
        flags |= KEYEVENTF_KEYUP;
    }
    flags
}

/// Sends one key down or key up event for virtual-key `vk` by scan code.
fn send_key(vk: u16, key_up: bool) -> Result<(), InjectionError> {
    // SAFETY: MapVirtualKeyW has no preconditions.
    let scan = unsafe { MapVirtualKeyW(u32::from(vk), MAPVK_VK_TO_VSC) } as u16;

    let input = INPUT {
        r#type: INPUT_KEYBOARD,
        Anonymous: INPUT_0 {
            ki: KEYBDINPUT {
                wVk: VIRTUAL_KEY(0),
                wScan: scan,
                dwFlags: key_flags(vk, key_up),
                time: 0,
                dwExtraInfo: 0,
            },
        },
    };

    // SAFETY: input is a fully initialised INPUT on the stack and the size
    // passed is the size of that type.
    let sent = unsafe { SendInput(&[input], std::mem::size_of::<INPUT>() as i32) };
    if sent == 0 {
        // SAFETY: GetLastError only reads thread-local state.
        let last_error = unsafe { GetLastError() };
        return Err(InjectionError::InjectionFailed {
            code: vk,
            last_error: i64::from(last_error.0),
        });
    }
    Ok(())
}
