//! atlas — country explorer core
//!
//! Per-user favorites persisted in a local key-value record, and
//! client-side search and filtering over country data.
//!
//! ## Quick start
//!
//! ```no_run
//! use atlas::data::{FavoritesStore, MemoryStore};
//!
//! let store = FavoritesStore::new(MemoryStore::new());
//! let toggle = store.toggle_favorite("u1", "FRA");
//! assert!(toggle.is_now_favorite);
//! ```

pub mod catalog;
pub mod config;
pub mod data;
pub mod error;
