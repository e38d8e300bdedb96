//! Favorites management
//!
//! Per-user favorite lists kept in a single key-value record. Every read
//! parses the whole record and every toggle replaces it whole; a missing
//! or unreadable record behaves as an empty database.
//!
//! The public operations never fail: bad input and storage problems are
//! logged and turned into an empty list / `false`. The `try_*` variants
//! expose the underlying error for callers that need it.

use crate::config::favorites::STORAGE_KEY;
use crate::data::events::{EventBus, FavoritesUpdated};
use crate::data::kv::KeyValueStore;
use crate::error::{AtlasError, Result};
use crossbeam_channel::Receiver;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::sync::{Arc, Mutex};
use tracing::{debug, error, warn};

/// Ordered entity IDs with no repeats
pub type FavoriteList = Vec<String>;

/// Every user's favorites, as persisted
///
/// Serialized as a plain JSON object: `{ "user": ["FRA", "DEU"] }`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FavoritesDatabase {
    users: BTreeMap<String, FavoriteList>,
}

impl FavoritesDatabase {
    /// Create an empty database
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a serialized record
    ///
    /// An empty record is an empty database; whitespace alone is not valid
    /// JSON and is rejected like any other corruption. Repeated entries
    /// within a user's list are dropped, keeping the first occurrence.
    pub fn parse(raw: &str) -> Result<Self> {
        if raw.is_empty() {
            return Ok(Self::new());
        }

        let mut db: Self = serde_json::from_str(raw)
            .map_err(|e| AtlasError::Parse(format!("Invalid favorites record: {}", e)))?;

        for (user, list) in db.users.iter_mut() {
            let before = list.len();
            let mut seen = HashSet::new();
            list.retain(|id| seen.insert(id.clone()));
            if list.len() != before {
                warn!(user = %user, dropped = before - list.len(), "Dropped repeated favorites");
            }
        }

        Ok(db)
    }

    /// Serialize for storage
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| AtlasError::Parse(format!("Failed to serialize favorites: {}", e)))
    }

    /// A user's favorites (empty if the user has none)
    pub fn favorites(&self, user_id: &str) -> &[String] {
        self.users.get(user_id).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Flip membership of `entity_id`. Returns true if it is now a favorite.
    ///
    /// Removal keeps the order of the remaining entries; addition appends.
    pub fn toggle(&mut self, user_id: &str, entity_id: &str) -> bool {
        let list = self.users.entry(user_id.to_string()).or_default();
        match list.iter().position(|id| id == entity_id) {
            Some(index) => {
                list.remove(index);
                false
            }
            None => {
                list.push(entity_id.to_string());
                true
            }
        }
    }

    /// Number of users with a stored list
    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

/// Outcome of a toggle
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Toggle {
    /// The user's list after the toggle
    pub favorites: FavoriteList,
    /// Whether the entity is in the list now
    pub is_now_favorite: bool,
}

/// Favorites backed by a key-value store, with change notification
pub struct FavoritesStore<S: KeyValueStore> {
    storage: S,
    events: Arc<EventBus>,
    /// Serializes read-modify-write cycles issued through this store
    write_lock: Mutex<()>,
}

impl<S: KeyValueStore> FavoritesStore<S> {
    /// Create a store with its own event bus
    pub fn new(storage: S) -> Self {
        Self::with_events(storage, Arc::new(EventBus::new()))
    }

    /// Create a store that announces changes on a shared bus
    pub fn with_events(storage: S, events: Arc<EventBus>) -> Self {
        Self {
            storage,
            events,
            write_lock: Mutex::new(()),
        }
    }

    /// The backing storage
    pub fn storage(&self) -> &S {
        &self.storage
    }

    /// The bus changes are announced on
    pub fn events(&self) -> &Arc<EventBus> {
        &self.events
    }

    /// Get notified after successful changes
    ///
    /// Changes made before the receiver is drained arrive as one event.
    pub fn subscribe(&self) -> Receiver<FavoritesUpdated> {
        self.events.subscribe()
    }

    /// Number of registered observers
    pub fn subscriber_count(&self) -> usize {
        self.events.subscriber_count()
    }

    fn load(&self) -> Result<FavoritesDatabase> {
        match self.storage.get(STORAGE_KEY)? {
            Some(raw) => FavoritesDatabase::parse(&raw),
            None => Ok(FavoritesDatabase::new()),
        }
    }

    /// A user's favorites, or the storage error
    ///
    /// An empty `user_id` (not signed in) yields an empty list.
    pub fn try_get_favorites(&self, user_id: &str) -> Result<FavoriteList> {
        if user_id.is_empty() {
            return Ok(Vec::new());
        }
        Ok(self.load()?.favorites(user_id).to_vec())
    }

    /// A user's favorites; empty on any failure
    pub fn get_favorites(&self, user_id: &str) -> FavoriteList {
        self.try_get_favorites(user_id).unwrap_or_else(|e| {
            error!(error = %e, "Error getting favorites");
            Vec::new()
        })
    }

    /// Toggle an entity for a user, or report why nothing changed
    ///
    /// The record is only written, and subscribers only notified, when the
    /// whole read-modify-write succeeds.
    pub fn try_toggle_favorite(&self, user_id: &str, entity_id: &str) -> Result<Toggle> {
        if user_id.is_empty() || entity_id.is_empty() {
            return Err(AtlasError::InvalidInput(
                "Missing user ID or entity ID in toggle".to_string(),
            ));
        }

        let _guard = self.write_lock.lock().unwrap_or_else(|e| e.into_inner());

        let mut db = self.load()?;
        let is_now_favorite = db.toggle(user_id, entity_id);
        self.storage.set(STORAGE_KEY, &db.to_json()?)?;

        debug!(user = %user_id, entity = %entity_id, is_now_favorite, "Favorites updated");
        self.events.emit();

        Ok(Toggle {
            favorites: db.favorites(user_id).to_vec(),
            is_now_favorite,
        })
    }

    /// Toggle an entity for a user; the default (empty, false) on any failure
    pub fn toggle_favorite(&self, user_id: &str, entity_id: &str) -> Toggle {
        self.try_toggle_favorite(user_id, entity_id)
            .unwrap_or_else(|e| {
                error!(error = %e, "Error toggling favorite");
                Toggle::default()
            })
    }

    /// Whether `entity_id` is among the user's favorites
    pub fn is_favorite(&self, user_id: &str, entity_id: &str) -> bool {
        if user_id.is_empty() || entity_id.is_empty() {
            return false;
        }
        self.get_favorites(user_id).iter().any(|id| id == entity_id)
    }
}

impl<S: KeyValueStore + std::fmt::Debug> std::fmt::Debug for FavoritesStore<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FavoritesStore")
            .field("storage", &self.storage)
            .field("events", &self.events)
            .finish()
    }
}
