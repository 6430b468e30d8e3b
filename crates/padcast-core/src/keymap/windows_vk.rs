//! Key name to Windows Virtual Key (VK) code translation table.
//!
//! Reference: Windows Virtual-Key Codes (winuser.h).
//!
//! # What is a Windows Virtual Key (VK) code? (for beginners)
//!
//! Windows assigns each keyboard key a number called a "Virtual Key code".
//! These are defined in `<winuser.h>` and named `VK_*` (e.g., `VK_RETURN = 0x0D`,
//! `VK_SPACE = 0x20`).  Letters and digits use their ASCII upper-case value,
//! so `VK_W` is `0x57`.
//!
//! # Extended keys
//!
//! Several keys share a hardware scan code with another key and are told
//! apart by the "extended" prefix byte (`0xE0`).  The arrow keys share scan
//! codes with the numeric keypad, for example.  When padcast injects by scan
//! code it must set `KEYEVENTF_EXTENDEDKEY` for these, or Windows delivers the
//! keypad key instead.  [`is_extended`] lists them.
//!
//! Keypad Enter has no VK of its own and maps to `VK_RETURN`, so on Windows
//! it is injected as the main Enter key.

use super::names::KeyName;

/// Translates a [`KeyName`] to its Windows Virtual Key code.
///
/// Every key padcast knows has a VK code, so this never fails.
pub fn code(key: KeyName) -> u16 {
    use KeyName::*;
    match key {
        Backspace => 0x08,
        Tab => 0x09,
        Enter | NumpadEnter => 0x0D,
        Pause => 0x13,
        CapsLock => 0x14,
        Escape => 0x1B,
        Space => 0x20,
        PageUp => 0x21,
        PageDown => 0x22,
        End => 0x23,
        Home => 0x24,
        ArrowLeft => 0x25,
        ArrowUp => 0x26,
        ArrowRight => 0x27,
        ArrowDown => 0x28,
        PrintScreen => 0x2C,
        Insert => 0x2D,
        Delete => 0x2E,
        Digit0 => 0x30,
        Digit1 => 0x31,
        Digit2 => 0x32,
        Digit3 => 0x33,
        Digit4 => 0x34,
        Digit5 => 0x35,
        Digit6 => 0x36,
        Digit7 => 0x37,
        Digit8 => 0x38,
        Digit9 => 0x39,
        KeyA => 0x41,
        KeyB => 0x42,
        KeyC => 0x43,
        KeyD => 0x44,
        KeyE => 0x45,
        KeyF => 0x46,
        KeyG => 0x47,
        KeyH => 0x48,
        KeyI => 0x49,
        KeyJ => 0x4A,
        KeyK => 0x4B,
        KeyL => 0x4C,
        KeyM => 0x4D,
        KeyN => 0x4E,
        KeyO => 0x4F,
        KeyP => 0x50,
        KeyQ => 0x51,
        KeyR => 0x52,
        KeyS => 0x53,
        KeyT => 0x54,
        KeyU => 0x55,
        KeyV => 0x56,
        KeyW => 0x57,
        KeyX => 0x58,
        KeyY => 0x59,
        KeyZ => 0x5A,
        MetaLeft => 0x5B,
        MetaRight => 0x5C,
        ContextMenu => 0x5D,
        Numpad0 => 0x60,
        Numpad1 => 0x61,
        Numpad2 => 0x62,
        Numpad3 => 0x63,
        Numpad4 => 0x64,
        Numpad5 => 0x65,
        Numpad6 => 0x66,
        Numpad7 => 0x67,
        Numpad8 => 0x68,
        Numpad9 => 0x69,
        NumpadMultiply => 0x6A,
        NumpadAdd => 0x6B,
        NumpadSubtract => 0x6D,
        NumpadDecimal => 0x6E,
        NumpadDivide => 0x6F,
        F1 => 0x70,
        F2 => 0x71,
        F3 => 0x72,
        F4 => 0x73,
        F5 => 0x74,
        F6 => 0x75,
        F7 => 0x76,
        F8 => 0x77,
        F9 => 0x78,
        F10 => 0x79,
        F11 => 0x7A,
        F12 => 0x7B,
        NumLock => 0x90,
        ScrollLock => 0x91,
        ShiftLeft => 0xA0,
        ShiftRight => 0xA1,
        ControlLeft => 0xA2,
        ControlRight => 0xA3,
        AltLeft => 0xA4,
        AltRight => 0xA5,
        Semicolon => 0xBA,
        Equal => 0xBB,
        Comma => 0xBC,
        Minus => 0xBD,
        Period => 0xBE,
        Slash => 0xBF,
        Backquote => 0xC0,
        BracketLeft => 0xDB,
        Backslash => 0xDC,
        BracketRight => 0xDD,
        Quote => 0xDE,
    }
}

/// Returns `true` when `vk` must be injected with `KEYEVENTF_EXTENDEDKEY`.
pub fn is_extended(vk: u16) -> bool {
    matches!(
        vk,
        0x21..=0x28          // PageUp, PageDown, End, Home, arrows
            | 0x2C           // PrintScreen
            | 0x2D           // Insert
            | 0x2E           // Delete
            | 0x5B           // Left Windows
            | 0x5C           // Right Windows
            | 0x5D           // Apps
            | 0x6F           // Numpad Divide
            | 0x90           // NumLock
            | 0xA3           // Right Control
            | 0xA5 // Right Alt
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use KeyName::*;

    /// Pairs of (key, expected VK code) for the standard US QWERTY keys.
    const STANDARD_MAPPINGS: &[(KeyName, u16)] = &[
        (KeyA, 0x41), (KeyW, 0x57), (KeyZ, 0x5A),
        (Digit0, 0x30), (Digit9, 0x39),
        (F1, 0x70), (F12, 0x7B),
        (ArrowLeft, 0x25), (ArrowUp, 0x26), (ArrowRight, 0x27), (ArrowDown, 0x28),
        (Enter, 0x0D), (Escape, 0x1B), (Space, 0x20), (Tab, 0x09),
        (ShiftLeft, 0xA0), (ControlRight, 0xA3), (AltRight, 0xA5), (MetaLeft, 0x5B),
        (Semicolon, 0xBA), (Quote, 0xDE), (Backquote, 0xC0),
        (Numpad5, 0x65), (NumpadDivide, 0x6F),
    ];

    #[test]
    fn test_standard_keys_map_to_documented_vk_codes() {
        for &(key, vk) in STANDARD_MAPPINGS {
            assert_eq!(code(key), vk, "{key} should map to VK {vk:#04x}");
        }
    }

    #[test]
    fn test_arrow_keys_are_extended() {
        for key in [ArrowUp, ArrowDown, ArrowLeft, ArrowRight] {
            assert!(is_extended(code(key)), "{key} must be extended");
        }
    }

    #[test]
    fn test_right_hand_modifiers_are_extended_left_hand_are_not() {
        assert!(is_extended(code(ControlRight)));
        assert!(is_extended(code(AltRight)));
        assert!(!is_extended(code(ControlLeft)));
        assert!(!is_extended(code(AltLeft)));
        assert!(!is_extended(code(ShiftLeft)));
    }

    #[test]
    fn test_letters_and_keypad_digits_are_not_extended() {
        for key in [KeyA, KeyW, Numpad8, Numpad2, Enter, Space] {
            assert!(!is_extended(code(key)), "{key} must not be extended");
        }
    }

    #[test]
    fn test_only_numpad_enter_shares_a_vk_code() {
        // Arrange
        let mut codes: Vec<u16> = KeyName::ALL
            .iter()
            .filter(|&&k| k != NumpadEnter)
            .map(|&k| code(k))
            .collect();

        // Act
        codes.sort_unstable();
        codes.dedup();

        // Assert
        assert_eq!(codes.len(), KeyName::ALL.len() - 1);
        assert_eq!(code(NumpadEnter), code(Enter));
    }
}
