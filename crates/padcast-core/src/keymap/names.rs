//! Logical key names.
//!
//! A layout stores keybinds as free-form strings typed into the layout
//! editor, usually copied from a browser `KeyboardEvent`.  [`KeyName`] is the
//! closed set of keys padcast knows how to inject, and [`spellings`] lists
//! every string accepted for each of them.
//!
//! # Accepted spellings
//!
//! | Source                    | Examples                              |
//! |---------------------------|---------------------------------------|
//! | `KeyboardEvent.code`      | `KeyW`, `Digit1`, `ShiftLeft`, `Space`|
//! | `KeyboardEvent.key`       | `w`, `1`, `Shift`, `" "`, `ArrowUp`   |
//! | Common aliases            | `Esc`, `Ctrl`, `Win`, `Up`, `Return`  |
//!
//! Matching is ASCII case-insensitive, so `"w"` and `"W"` are the same key.
//! The bare modifier names (`Shift`, `Control`, `Alt`, `Meta`) resolve to
//! the left-hand key.

use serde::{Deserialize, Serialize};

/// A key padcast can inject, named after its DOM `KeyboardEvent.code`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyName {
    // Letters
    KeyA,
    KeyB,
    KeyC,
    KeyD,
    KeyE,
    KeyF,
    KeyG,
    KeyH,
    KeyI,
    KeyJ,
    KeyK,
    KeyL,
    KeyM,
    KeyN,
    KeyO,
    KeyP,
    KeyQ,
    KeyR,
    KeyS,
    KeyT,
    KeyU,
    KeyV,
    KeyW,
    KeyX,
    KeyY,
    KeyZ,

    // Digit row
    Digit0,
    Digit1,
    Digit2,
    Digit3,
    Digit4,
    Digit5,
    Digit6,
    Digit7,
    Digit8,
    Digit9,

    // Function keys
    F1,
    F2,
    F3,
    F4,
    F5,
    F6,
    F7,
    F8,
    F9,
    F10,
    F11,
    F12,

    // Arrows
    ArrowUp,
    ArrowDown,
    ArrowLeft,
    ArrowRight,

    // Control keys
    Enter,
    Escape,
    Backspace,
    Tab,
    Space,
    CapsLock,
    NumLock,
    ScrollLock,
    PrintScreen,
    Pause,

    // Navigation block
    Insert,
    Delete,
    Home,
    End,
    PageUp,
    PageDown,

    // Punctuation / OEM
    Minus,
    Equal,
    BracketLeft,
    BracketRight,
    Backslash,
    Semicolon,
    Quote,
    Backquote,
    Comma,
    Period,
    Slash,

    // Modifiers
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,
    AltLeft,
    AltRight,
    MetaLeft,
    MetaRight,
    ContextMenu,

    // Numeric keypad
    Numpad0,
    Numpad1,
    Numpad2,
    Numpad3,
    Numpad4,
    Numpad5,
    Numpad6,
    Numpad7,
    Numpad8,
    Numpad9,
    NumpadAdd,
    NumpadSubtract,
    NumpadMultiply,
    NumpadDivide,
    NumpadDecimal,
    NumpadEnter,
}

/// Extra spellings that are neither the DOM code nor a printable character.
const ALIASES: &[(&str, KeyName)] = &[
    ("up", KeyName::ArrowUp),
    ("down", KeyName::ArrowDown),
    ("left", KeyName::ArrowLeft),
    ("right", KeyName::ArrowRight),
    ("return", KeyName::Enter),
    ("esc", KeyName::Escape),
    ("spacebar", KeyName::Space),
    ("del", KeyName::Delete),
    ("ins", KeyName::Insert),
    ("pgup", KeyName::PageUp),
    ("pgdn", KeyName::PageDown),
    ("prtsc", KeyName::PrintScreen),
    ("scroll", KeyName::ScrollLock),
    ("shift", KeyName::ShiftLeft),
    ("control", KeyName::ControlLeft),
    ("ctrl", KeyName::ControlLeft),
    ("alt", KeyName::AltLeft),
    ("altgraph", KeyName::AltRight),
    ("meta", KeyName::MetaLeft),
    ("win", KeyName::MetaLeft),
    ("os", KeyName::MetaLeft),
    ("super", KeyName::MetaLeft),
    ("lwin", KeyName::MetaLeft),
    ("rwin", KeyName::MetaRight),
    ("apps", KeyName::ContextMenu),
    ("menu", KeyName::ContextMenu),
];

impl KeyName {
    /// Every key, in declaration order.
    pub const ALL: &'static [KeyName] = &[
        KeyName::KeyA,
        KeyName::KeyB,
        KeyName::KeyC,
        KeyName::KeyD,
        KeyName::KeyE,
        KeyName::KeyF,
        KeyName::KeyG,
        KeyName::KeyH,
        KeyName::KeyI,
        KeyName::KeyJ,
        KeyName::KeyK,
        KeyName::KeyL,
        KeyName::KeyM,
        KeyName::KeyN,
        KeyName::KeyO,
        KeyName::KeyP,
        KeyName::KeyQ,
        KeyName::KeyR,
        KeyName::KeyS,
        KeyName::KeyT,
        KeyName::KeyU,
        KeyName::KeyV,
        KeyName::KeyW,
        KeyName::KeyX,
        KeyName::KeyY,
        KeyName::KeyZ,
        KeyName::Digit0,
        KeyName::Digit1,
        KeyName::Digit2,
        KeyName::Digit3,
        KeyName::Digit4,
        KeyName::Digit5,
        KeyName::Digit6,
        KeyName::Digit7,
        KeyName::Digit8,
        KeyName::Digit9,
        KeyName::F1,
        KeyName::F2,
        KeyName::F3,
        KeyName::F4,
        KeyName::F5,
        KeyName::F6,
        KeyName::F7,
        KeyName::F8,
        KeyName::F9,
        KeyName::F10,
        KeyName::F11,
        KeyName::F12,
        KeyName::ArrowUp,
        KeyName::ArrowDown,
        KeyName::ArrowLeft,
        KeyName::ArrowRight,
        KeyName::Enter,
        KeyName::Escape,
        KeyName::Backspace,
        KeyName::Tab,
        KeyName::Space,
        KeyName::CapsLock,
        KeyName::NumLock,
        KeyName::ScrollLock,
        KeyName::PrintScreen,
        KeyName::Pause,
        KeyName::Insert,
        KeyName::Delete,
        KeyName::Home,
        KeyName::End,
        KeyName::PageUp,
        KeyName::PageDown,
        KeyName::Minus,
        KeyName::Equal,
        KeyName::BracketLeft,
        KeyName::BracketRight,
        KeyName::Backslash,
        KeyName::Semicolon,
        KeyName::Quote,
        KeyName::Backquote,
        KeyName::Comma,
        KeyName::Period,
        KeyName::Slash,
        KeyName::ShiftLeft,
        KeyName::ShiftRight,
        KeyName::ControlLeft,
        KeyName::ControlRight,
        KeyName::AltLeft,
        KeyName::AltRight,
        KeyName::MetaLeft,
        KeyName::MetaRight,
        KeyName::ContextMenu,
        KeyName::Numpad0,
        KeyName::Numpad1,
        KeyName::Numpad2,
        KeyName::Numpad3,
        KeyName::Numpad4,
        KeyName::Numpad5,
        KeyName::Numpad6,
        KeyName::Numpad7,
        KeyName::Numpad8,
        KeyName::Numpad9,
        KeyName::NumpadAdd,
        KeyName::NumpadSubtract,
        KeyName::NumpadMultiply,
        KeyName::NumpadDivide,
        KeyName::NumpadDecimal,
        KeyName::NumpadEnter,
    ];

    /// Parses any accepted spelling, ignoring ASCII case.
    ///
    /// Returns `None` when the string names no known key.  This is the slow
    /// path; the session hot path goes through
    /// [`KeyTable::lookup`](super::KeyTable::lookup).
    pub fn parse(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        spellings().find(|(s, _)| *s == lower).map(|(_, key)| key)
    }

    /// The DOM `KeyboardEvent.code` string for this key.
    pub fn code_name(self) -> &'static str {
        use KeyName::*;
        match self {
            KeyA => "KeyA",
            KeyB => "KeyB",
            KeyC => "KeyC",
            KeyD => "KeyD",
            KeyE => "KeyE",
            KeyF => "KeyF",
            KeyG => "KeyG",
            KeyH => "KeyH",
            KeyI => "KeyI",
            KeyJ => "KeyJ",
            KeyK => "KeyK",
            KeyL => "KeyL",
            KeyM => "KeyM",
            KeyN => "KeyN",
            KeyO => "KeyO",
            KeyP => "KeyP",
            KeyQ => "KeyQ",
            KeyR => "KeyR",
            KeyS => "KeyS",
            KeyT => "KeyT",
            KeyU => "KeyU",
            KeyV => "KeyV",
            KeyW => "KeyW",
            KeyX => "KeyX",
            KeyY => "KeyY",
            KeyZ => "KeyZ",
            Digit0 => "Digit0",
            Digit1 => "Digit1",
            Digit2 => "Digit2",
            Digit3 => "Digit3",
            Digit4 => "Digit4",
            Digit5 => "Digit5",
            Digit6 => "Digit6",
            Digit7 => "Digit7",
            Digit8 => "Digit8",
            Digit9 => "Digit9",
            F1 => "F1",
            F2 => "F2",
            F3 => "F3",
            F4 => "F4",
            F5 => "F5",
            F6 => "F6",
            F7 => "F7",
            F8 => "F8",
            F9 => "F9",
            F10 => "F10",
            F11 => "F11",
            F12 => "F12",
            ArrowUp => "ArrowUp",
            ArrowDown => "ArrowDown",
            ArrowLeft => "ArrowLeft",
            ArrowRight => "ArrowRight",
            Enter => "Enter",
            Escape => "Escape",
            Backspace => "Backspace",
            Tab => "Tab",
            Space => "Space",
            CapsLock => "CapsLock",
            NumLock => "NumLock",
            ScrollLock => "ScrollLock",
            PrintScreen => "PrintScreen",
            Pause => "Pause",
            Insert => "Insert",
            Delete => "Delete",
            Home => "Home",
            End => "End",
            PageUp => "PageUp",
            PageDown => "PageDown",
            Minus => "Minus",
            Equal => "Equal",
            BracketLeft => "BracketLeft",
            BracketRight => "BracketRight",
            Backslash => "Backslash",
            Semicolon => "Semicolon",
            Quote => "Quote",
            Backquote => "Backquote",
            Comma => "Comma",
            Period => "Period",
            Slash => "Slash",
            ShiftLeft => "ShiftLeft",
            ShiftRight => "ShiftRight",
            ControlLeft => "ControlLeft",
            ControlRight => "ControlRight",
            AltLeft => "AltLeft",
            AltRight => "AltRight",
            MetaLeft => "MetaLeft",
            MetaRight => "MetaRight",
            ContextMenu => "ContextMenu",
            Numpad0 => "Numpad0",
            Numpad1 => "Numpad1",
            Numpad2 => "Numpad2",
            Numpad3 => "Numpad3",
            Numpad4 => "Numpad4",
            Numpad5 => "Numpad5",
            Numpad6 => "Numpad6",
            Numpad7 => "Numpad7",
            Numpad8 => "Numpad8",
            Numpad9 => "Numpad9",
            NumpadAdd => "NumpadAdd",
            NumpadSubtract => "NumpadSubtract",
            NumpadMultiply => "NumpadMultiply",
            NumpadDivide => "NumpadDivide",
            NumpadDecimal => "NumpadDecimal",
            NumpadEnter => "NumpadEnter",
        }
    }

    /// The unshifted character this key types on a US layout, if any.
    ///
    /// This is what `KeyboardEvent.key` reports for the key, so it is also
    /// an accepted spelling.
    pub fn printable(self) -> Option<char> {
        use KeyName::*;
        let c = match self {
            KeyA => 'a',
            KeyB => 'b',
            KeyC => 'c',
            KeyD => 'd',
            KeyE => 'e',
            KeyF => 'f',
            KeyG => 'g',
            KeyH => 'h',
            KeyI => 'i',
            KeyJ => 'j',
            KeyK => 'k',
            KeyL => 'l',
            KeyM => 'm',
            KeyN => 'n',
            KeyO => 'o',
            KeyP => 'p',
            KeyQ => 'q',
            KeyR => 'r',
            KeyS => 's',
            KeyT => 't',
            KeyU => 'u',
            KeyV => 'v',
            KeyW => 'w',
            KeyX => 'x',
            KeyY => 'y',
            KeyZ => 'z',
            Digit0 => '0',
            Digit1 => '1',
            Digit2 => '2',
            Digit3 => '3',
            Digit4 => '4',
            Digit5 => '5',
            Digit6 => '6',
            Digit7 => '7',
            Digit8 => '8',
            Digit9 => '9',
            Space => ' ',
            Minus => '-',
            Equal => '=',
            BracketLeft => '[',
            BracketRight => ']',
            Backslash => '\\',
            Semicolon => ';',
            Quote => '\'',
            Backquote => '`',
            Comma => ',',
            Period => '.',
            Slash => '/',
            _ => return None,
        };
        Some(c)
    }

    /// Returns `true` for the Shift, Control, Alt and Meta keys (either side).
    pub fn is_modifier(self) -> bool {
        matches!(
            self,
            KeyName::ShiftLeft
                | KeyName::ShiftRight
                | KeyName::ControlLeft
                | KeyName::ControlRight
                | KeyName::AltLeft
                | KeyName::AltRight
                | KeyName::MetaLeft
                | KeyName::MetaRight
        )
    }
}

impl std::fmt::Display for KeyName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.code_name())
    }
}

/// Every accepted spelling, lowercased, paired with the key it names.
///
/// The same key appears several times (DOM code, printable character,
/// aliases).  No spelling maps to two different keys.
pub fn spellings() -> impl Iterator<Item = (String, KeyName)> {
    let codes = KeyName::ALL
        .iter()
        .map(|&key| (key.code_name().to_ascii_lowercase(), key));
    let printable = KeyName::ALL
        .iter()
        .filter_map(|&key| key.printable().map(|c| (c.to_string(), key)));
    let aliases = ALIASES.iter().map(|&(s, key)| (s.to_string(), key));
    codes.chain(printable).chain(aliases)
}
