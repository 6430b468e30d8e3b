//! Key name to platform key code translation.
//!
//! Layout keybinds are strings.  [`KeyTable`] turns them into the code the
//! current platform's injection backend understands: a Linux input event code
//! or a Windows virtual-key code.
//!
//! The table is built once at start-up and is immutable afterwards, so it can
//! be shared by every session without locking.

pub mod linux_evdev;
pub mod names;
pub mod windows_vk;

use std::collections::{BTreeSet, HashMap};

use thiserror::Error;
use tracing::debug;

pub use names::KeyName;

/// The code space a [`KeyTable`] translates into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux input event codes (`KEY_*`).
    Linux,
    /// Windows virtual-key codes (`VK_*`).
    Windows,
}

impl Platform {
    /// The platform of the compile target.
    ///
    /// Every non-Windows target uses the Linux code space; whether a backend
    /// exists for it is decided by the server.
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Platform::Windows
        } else {
            Platform::Linux
        }
    }
}

/// A resolved key: its logical name, platform code and extended flag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyEntry {
    pub key: KeyName,
    pub code: u16,
    /// Only ever `true` on Windows.
    pub extended: bool,
}

/// Error returned by [`KeyTable::lookup`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum KeyLookupError {
    #[error("unknown key name {0:?}")]
    NotFound(String),
}

/// Immutable map from every accepted key spelling to its [`KeyEntry`].
#[derive(Debug, Clone)]
pub struct KeyTable {
    platform: Platform,
    entries: HashMap<String, KeyEntry>,
}

impl KeyTable {
    /// Builds the table for `platform`.
    pub fn for_platform(platform: Platform) -> Self {
        let entries: HashMap<String, KeyEntry> = names::spellings()
            .map(|(spelling, key)| (spelling, entry_for(platform, key)))
            .collect();
        debug!(?platform, spellings = entries.len(), "key table built");
        Self { platform, entries }
    }

    /// Builds the table for the compile target.
    pub fn current() -> Self {
        Self::for_platform(Platform::current())
    }

    pub fn platform(&self) -> Platform {
        self.platform
    }

    /// Looks up a key name, ignoring ASCII case.
    ///
    /// # Errors
    ///
    /// [`KeyLookupError::NotFound`] when `name` is not a known spelling.
    pub fn lookup(&self, name: &str) -> Result<KeyEntry, KeyLookupError> {
        let found = match self.entries.get(name) {
            Some(entry) => Some(entry),
            None => self.entries.get(&name.to_ascii_lowercase()),
        };
        found
            .copied()
            .ok_or_else(|| KeyLookupError::NotFound(name.to_string()))
    }

    /// The distinct codes of every key in the table, in ascending order.
    ///
    /// A device-emulation backend registers exactly this set up front.
    pub fn codes(&self) -> Vec<u16> {
        self.entries
            .values()
            .map(|entry| entry.code)
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Number of accepted spellings.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn entry_for(platform: Platform, key: KeyName) -> KeyEntry {
    match platform {
        Platform::Linux => KeyEntry {
            key,
            code: linux_evdev::code(key),
            extended: false,
        },
        Platform::Windows => {
            let code = windows_vk::code(key);
            KeyEntry {
                key,
                code,
                extended: windows_vk::is_extended(code),
            }
        }
    }
}
