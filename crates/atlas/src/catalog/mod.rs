//! Country catalog
//!
//! In-memory list of countries with the lookups the explorer views need:
//! search-as-you-type, dropdown filters, popular countries, and resolving
//! a favorites list back to country records.

pub mod filter;
pub mod types;

pub use filter::{CountryFilter, Facets};
pub use types::{Country, CountryName, Currency, Flags};

use crate::data::storage;
use crate::error::{AtlasError, Result};
use std::path::Path;
use tracing::debug;

/// A loaded list of countries
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    countries: Vec<Country>,
}

impl Catalog {
    /// Create a catalog from countries already in memory
    pub fn new(countries: Vec<Country>) -> Self {
        Self { countries }
    }

    /// Load a JSON array of countries (countries API v3.1 format)
    pub fn load_from(path: &Path) -> Result<Self> {
        let countries: Vec<Country> = storage::load_from(path)?
            .ok_or_else(|| AtlasError::NotFound(format!("Country list {:?}", path)))?;
        debug!(count = countries.len(), path = ?path, "Loaded countries");
        Ok(Self::new(countries))
    }

    /// All countries, in source order
    pub fn all(&self) -> &[Country] {
        &self.countries
    }

    /// Get number of countries
    pub fn count(&self) -> usize {
        self.countries.len()
    }

    /// Check if empty
    pub fn is_empty(&self) -> bool {
        self.countries.is_empty()
    }

    /// Countries whose common name contains `query`, ignoring case
    ///
    /// An empty query returns every country.
    pub fn search(&self, query: &str) -> Vec<&Country> {
        if query.is_empty() {
            return self.countries.iter().collect();
        }
        self.countries
            .iter()
            .filter(|c| filter::name_contains(c, query))
            .collect()
    }

    /// Countries matching every criterion of `filter`
    pub fn filtered(&self, filter: &CountryFilter) -> Vec<&Country> {
        self.countries.iter().filter(|c| filter.matches(c)).collect()
    }

    /// Values offered by each filter dropdown
    pub fn facets(&self) -> Facets {
        Facets::collect(&self.countries)
    }

    /// The `limit` most populous countries, largest first
    pub fn popular(&self, limit: usize) -> Vec<&Country> {
        let mut countries: Vec<_> = self.countries.iter().collect();
        countries.sort_by(|a, b| b.population.cmp(&a.population));
        countries.truncate(limit);
        countries
    }

    /// Look up a country by alpha-3 or alpha-2 code
    pub fn by_code(&self, code: &str) -> Option<&Country> {
        if code.is_empty() {
            return None;
        }
        self.countries.iter().find(|c| c.has_code(code))
    }

    /// Countries in a region (case-insensitive)
    pub fn by_region(&self, region: &str) -> Vec<&Country> {
        self.countries
            .iter()
            .filter(|c| c.region.eq_ignore_ascii_case(region))
            .collect()
    }

    /// Countries for a list of codes, in list order
    ///
    /// Codes the catalog doesn't know are skipped.
    pub fn resolve<S: AsRef<str>>(&self, codes: &[S]) -> Vec<&Country> {
        codes
            .iter()
            .filter_map(|code| self.by_code(code.as_ref()))
            .collect()
    }
}
