//! Session use case: one browser controller driving the host keyboard.
//!
//! # Lifecycle
//!
//! ```text
//! Connecting ──open()──► Active ──drop──► Closed
//!      │                    │
//!      │                    └── same player opens again ──► replaced() fires
//!      └── layout missing ──► Closed (no injections)
//! ```
//!
//! [`SessionManager::open`] copies the requested layout out of the store at
//! that instant.  The returned [`ActiveSession`] resolves every event against
//! that copy, so layout edits reach a player only when they reconnect.
//!
//! # Per-event pipeline
//!
//! ```text
//! text frame ─► KeyEvent::parse ─► ItemIndex::resolve ─► KeyTable::lookup ─► backend.inject
//! ```
//!
//! A failure at any stage drops that one event and is logged; the session
//! carries on with the next frame.  Nothing is ever sent back to the browser.
//!
//! # Connected players
//!
//! The manager keeps the set of player ids with an active session.  A player
//! is added when `open` succeeds and removed as soon as the `ActiveSession`
//! is dropped, whichever way the connection ended.  Keys still held down at
//! that moment are not released.
//!
//! Each id has at most one active session.  Opening a second session for an
//! id that is already active takes the id over: the older session's
//! [`ActiveSession::replaced`] resolves and its owner closes it.  A browser
//! whose previous connection died without a TCP close can therefore always
//! reconnect.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, PoisonError};

use padcast_core::{
    EventError, ItemIndex, KeyEvent, KeyLookupError, KeyName, KeyTable, PlayerId, ResolveError,
};
use thiserror::Error;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use super::injection::{InjectionBackend, InjectionError};
use super::layout_store::LayoutStore;

/// Why a session could not become active.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Layout not found or invalid")]
    LayoutNotFound(String),
}

/// Why one event produced no injection.
#[derive(Debug, Error)]
pub enum DropReason {
    #[error(transparent)]
    Event(#[from] EventError),
    #[error(transparent)]
    Resolve(#[from] ResolveError),
    #[error(transparent)]
    UnknownKey(#[from] KeyLookupError),
    #[error(transparent)]
    Injection(#[from] InjectionError),
}

/// Result of handling one text frame.
#[derive(Debug)]
pub enum EventOutcome {
    Injected {
        key: KeyName,
        code: u16,
        pressed: bool,
    },
    Dropped(DropReason),
}

impl EventOutcome {
    pub fn is_injected(&self) -> bool {
        matches!(self, EventOutcome::Injected { .. })
    }
}

/// The live session of one player.
struct Registration {
    generation: u64,
    replaced: Arc<Notify>,
}

type ConnectedSet = Arc<Mutex<HashMap<PlayerId, Registration>>>;

/// Opens sessions and tracks which players are connected.
///
/// Shared by every connection task through an `Arc`.
pub struct SessionManager {
    store: Arc<LayoutStore>,
    key_table: Arc<KeyTable>,
    backend: Arc<dyn InjectionBackend>,
    connected: ConnectedSet,
    generations: AtomicU64,
}

impl SessionManager {
    pub fn new(
        store: Arc<LayoutStore>,
        key_table: Arc<KeyTable>,
        backend: Arc<dyn InjectionBackend>,
    ) -> Self {
        Self {
            store,
            key_table,
            backend,
            connected: Arc::new(Mutex::new(HashMap::new())),
            generations: AtomicU64::new(0),
        }
    }

    /// Moves a connection from Connecting to Active.
    ///
    /// # Errors
    ///
    /// [`SessionError::LayoutNotFound`] if `layout_name` does not exist or
    /// has no items.  An older session of the same player is not an error:
    /// it is told it has been replaced.
    pub async fn open(&self, player: PlayerId, layout_name: &str) -> Result<ActiveSession, SessionError> {
        let layout = self
            .store
            .get(layout_name)
            .await
            .filter(|layout| !layout.is_empty())
            .ok_or_else(|| SessionError::LayoutNotFound(layout_name.to_string()))?;

        let generation = self.generations.fetch_add(1, Ordering::Relaxed);
        let replaced = Arc::new(Notify::new());
        let previous = self
            .connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(
                player,
                Registration {
                    generation,
                    replaced: Arc::clone(&replaced),
                },
            );
        if let Some(previous) = previous {
            info!(%player, "player reconnected, replacing older session");
            previous.replaced.notify_one();
        }

        let index = ItemIndex::from_layout(&layout);
        info!(%player, layout = layout_name, items = index.len(), "session active");

        Ok(ActiveSession {
            player,
            layout_name: layout_name.to_string(),
            index,
            key_table: Arc::clone(&self.key_table),
            backend: Arc::clone(&self.backend),
            replaced,
            _guard: ConnectionGuard {
                player,
                generation,
                connected: Arc::clone(&self.connected),
            },
        })
    }

    /// Ids of every player with an active session, ascending.
    pub fn connected_players(&self) -> Vec<PlayerId> {
        let mut players: Vec<PlayerId> = self
            .connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .keys()
            .copied()
            .collect();
        players.sort_unstable();
        players
    }

    pub fn is_connected(&self, player: PlayerId) -> bool {
        self.connected
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .contains_key(&player)
    }
}

/// Removes the player from the connected set when the session ends,
/// unless a newer session has taken the id over.
struct ConnectionGuard {
    player: PlayerId,
    generation: u64,
    connected: ConnectedSet,
}

impl Drop for ConnectionGuard {
    fn drop(&mut self) {
        let mut connected = self.connected.lock().unwrap_or_else(PoisonError::into_inner);
        let current = connected
            .get(&self.player)
            .is_some_and(|registration| registration.generation == self.generation);
        if current {
            connected.remove(&self.player);
            info!(player = %self.player, "session closed");
        } else {
            debug!(player = %self.player, "replaced session closed");
        }
    }
}

/// A session in the Active state.
pub struct ActiveSession {
    player: PlayerId,
    layout_name: String,
    index: ItemIndex,
    key_table: Arc<KeyTable>,
    backend: Arc<dyn InjectionBackend>,
    replaced: Arc<Notify>,
    _guard: ConnectionGuard,
}

impl ActiveSession {
    pub fn player(&self) -> PlayerId {
        self.player
    }

    pub fn layout_name(&self) -> &str {
        &self.layout_name
    }

    /// Resolves once a newer session has opened for the same player.
    pub async fn replaced(&self) {
        self.replaced.notified().await;
    }

    /// Runs one text frame through the pipeline.
    ///
    /// Never fails: every problem becomes [`EventOutcome::Dropped`] and is
    /// logged here.
    pub fn handle_message(&self, text: &str) -> EventOutcome {
        match self.process(text) {
            Ok((key, code, pressed)) => {
                debug!(player = %self.player, %key, code, pressed, "key injected");
                EventOutcome::Injected { key, code, pressed }
            }
            Err(reason) => {
                match &reason {
                    DropReason::Injection(e) => {
                        warn!(player = %self.player, "injection failed, event dropped: {e}")
                    }
                    DropReason::UnknownKey(e) => {
                        warn!(player = %self.player, "event dropped: {e}")
                    }
                    other => debug!(player = %self.player, "event dropped: {other}"),
                }
                EventOutcome::Dropped(reason)
            }
        }
    }

    fn process(&self, text: &str) -> Result<(KeyName, u16, bool), DropReason> {
        let event = KeyEvent::parse(text)?;
        let key_name = self.index.resolve(&event.item_id, self.player)?;
        let entry = self.key_table.lookup(key_name)?;
        let pressed = event.action.is_press();
        self.backend.inject(entry.code, pressed)?;
        Ok((entry.key, entry.code, pressed))
    }
}

impl std::fmt::Debug for ActiveSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ActiveSession")
            .field("player", &self.player)
            .field("layout_name", &self.layout_name)
            .field("items", &self.index.len())
            .finish()
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
