//! Configuration constants for atlas

/// Application metadata
pub mod app {
    /// Application name (used for config directory, etc.)
    pub const NAME: &str = "atlas";
}

/// Favorites persistence
pub mod favorites {
    /// Key of the single record holding every user's favorites
    pub const STORAGE_KEY: &str = "favorites";
}

/// Country catalog defaults
pub mod catalog {
    /// Number of countries shown in the "popular" list
    pub const DEFAULT_POPULAR_LIMIT: usize = 8;

    /// Default search result limit
    pub const DEFAULT_SEARCH_LIMIT: usize = 50;
}
