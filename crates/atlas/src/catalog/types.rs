//! Country records
//!
//! A subset of the public countries API (v3.1) record. Unknown fields are
//! ignored and missing collections default to empty, so raw API dumps load
//! as-is.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Common and official country names
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryName {
    pub common: String,
    #[serde(default)]
    pub official: String,
}

/// A currency used by a country
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Currency {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

/// Flag image URLs
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flags {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub png: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub svg: Option<String>,
}

/// A country
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Country {
    pub name: CountryName,

    /// ISO 3166-1 alpha-2 code
    #[serde(default)]
    pub cca2: String,

    /// ISO 3166-1 alpha-3 code (used as the favorites entity ID)
    #[serde(default)]
    pub cca3: String,

    #[serde(default)]
    pub region: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subregion: Option<String>,

    /// Capital cities (some countries have several, some none)
    #[serde(default)]
    pub capital: Vec<String>,

    /// Language code -> language name
    #[serde(default)]
    pub languages: BTreeMap<String, String>,

    /// Currency code -> currency
    #[serde(default)]
    pub currencies: BTreeMap<String, Currency>,

    #[serde(default)]
    pub population: u64,

    #[serde(default)]
    pub flags: Flags,
}

impl Country {
    /// Create a country with the given common name and alpha-3 code
    pub fn new(name: impl Into<String>, cca3: impl Into<String>) -> Self {
        Self {
            name: CountryName {
                common: name.into(),
                official: String::new(),
            },
            cca3: cca3.into(),
            ..Self::default()
        }
    }

    pub fn with_region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    pub fn with_capital(mut self, capital: impl Into<String>) -> Self {
        self.capital.push(capital.into());
        self
    }

    pub fn with_language(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.languages.insert(code.into(), name.into());
        self
    }

    pub fn with_currency(mut self, code: impl Into<String>, name: impl Into<String>) -> Self {
        self.currencies.insert(
            code.into(),
            Currency {
                name: name.into(),
                symbol: None,
            },
        );
        self
    }

    pub fn with_population(mut self, population: u64) -> Self {
        self.population = population;
        self
    }

    /// Common name
    pub fn name(&self) -> &str {
        &self.name.common
    }

    /// Whether `code` is this country's alpha-3 or alpha-2 code (case-insensitive)
    pub fn has_code(&self, code: &str) -> bool {
        (!self.cca3.is_empty() && self.cca3.eq_ignore_ascii_case(code))
            || (!self.cca2.is_empty() && self.cca2.eq_ignore_ascii_case(code))
    }

    /// Language names
    pub fn language_names(&self) -> impl Iterator<Item = &str> {
        self.languages.values().map(String::as_str)
    }

    /// Currency names
    pub fn currency_names(&self) -> impl Iterator<Item = &str> {
        self.currencies.values().map(|c| c.name.as_str())
    }
}
