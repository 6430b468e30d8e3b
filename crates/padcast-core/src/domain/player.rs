//! Player identity.
//!
//! A player id is a small positive integer handed out by the `/join`
//! endpoint.  The browser keeps it and uses it to open its WebSocket, and the
//! resolver uses it to pick the `player<N>` keybind of each item.

use std::fmt;
use std::num::ParseIntError;
use std::str::FromStr;
use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

/// Identifier of one browser controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PlayerId(pub u64);

impl PlayerId {
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for PlayerId {
    type Err = ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<u64>().map(PlayerId)
    }
}

impl From<u64> for PlayerId {
    fn from(value: u64) -> Self {
        PlayerId(value)
    }
}

/// Hands out player ids 1, 2, 3, … for the life of the process.
///
/// Ids are never reused, even after the player disconnects.  The counter is
/// atomic so one allocator can be shared through an `Arc` by every HTTP
/// request handler.
#[derive(Debug)]
pub struct PlayerAllocator {
    next: AtomicU64,
}

impl PlayerAllocator {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    /// Returns a fresh id, strictly greater than every id returned before.
    pub fn allocate(&self) -> PlayerId {
        PlayerId(self.next.fetch_add(1, Ordering::Relaxed))
    }

    /// The id the next call to [`allocate`](Self::allocate) will return.
    pub fn peek(&self) -> PlayerId {
        PlayerId(self.next.load(Ordering::Relaxed))
    }
}

impl Default for PlayerAllocator {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[test]
    fn test_first_id_is_one() {
        let allocator = PlayerAllocator::new();
        assert_eq!(allocator.allocate(), PlayerId(1));
    }

    #[test]
    fn test_ids_increase_by_one() {
        // Arrange
        let allocator = PlayerAllocator::new();

        // Act
        let ids: Vec<u64> = (0..5).map(|_| allocator.allocate().get()).collect();

        // Assert
        assert_eq!(ids, vec![1, 2, 3, 4, 5]);
        assert_eq!(allocator.peek(), PlayerId(6));
    }

    #[test]
    fn test_concurrent_allocation_never_repeats() {
        // Arrange
        let allocator = Arc::new(PlayerAllocator::new());

        // Act
        let handles: Vec<_> = (0..8)
            .map(|_| {
                let allocator = Arc::clone(&allocator);
                std::thread::spawn(move || {
                    (0..250).map(|_| allocator.allocate().get()).collect::<Vec<_>>()
                })
            })
            .collect();
        let mut all: Vec<u64> = handles
            .into_iter()
            .flat_map(|h| h.join().unwrap())
            .collect();

        // Assert
        all.sort_unstable();
        let expected: Vec<u64> = (1..=2000).collect();
        assert_eq!(all, expected);
    }

    #[test]
    fn test_player_id_parses_and_displays() {
        let id: PlayerId = "42".parse().unwrap();
        assert_eq!(id, PlayerId(42));
        assert_eq!(id.to_string(), "42");
        assert!("abc".parse::<PlayerId>().is_err());
        assert!("-1".parse::<PlayerId>().is_err());
    }

    #[test]
    fn test_player_id_serializes_as_bare_number() {
        let json = serde_json::to_string(&PlayerId(7)).unwrap();
        assert_eq!(json, "7");
    }
}
