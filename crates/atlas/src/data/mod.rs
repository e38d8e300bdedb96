//! Data persistence
//!
//! Handles favorites, settings, and the key-value storage beneath them.

pub mod events;
pub mod favorites;
pub mod kv;
pub mod settings;
pub mod storage;

// Re-export common types
pub use events::{EventBus, FavoritesUpdated};
pub use favorites::{FavoriteList, FavoritesDatabase, FavoritesStore, Toggle};
pub use kv::{FileStore, KeyValueStore, MemoryStore};
pub use settings::Settings;
pub use storage::{config_dir, data_path, load, save};
