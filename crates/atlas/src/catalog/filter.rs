//! Country filtering
//!
//! `CountryFilter` combines the search box with the region, language,
//! currency, capital and country dropdowns. `Facets` lists the values each
//! dropdown offers.

use super::types::Country;
use std::collections::BTreeSet;

/// Filter criteria for countries; unset criteria match everything
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CountryFilter {
    /// Case-insensitive substring of the common name
    pub search: Option<String>,
    /// Exact region
    pub region: Option<String>,
    /// Exact language name
    pub language: Option<String>,
    /// Exact currency name
    pub currency: Option<String>,
    /// Exact capital city
    pub capital: Option<String>,
    /// Exact common name
    pub country: Option<String>,
}

impl CountryFilter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = Some(region.into());
        self
    }

    pub fn language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    pub fn capital(mut self, capital: impl Into<String>) -> Self {
        self.capital = Some(capital.into());
        self
    }

    pub fn country(mut self, country: impl Into<String>) -> Self {
        self.country = Some(country.into());
        self
    }

    /// Number of criteria in effect (empty strings don't count)
    pub fn active_count(&self) -> usize {
        [
            &self.search,
            &self.region,
            &self.language,
            &self.currency,
            &self.capital,
            &self.country,
        ]
        .iter()
        .filter(|c| c.as_deref().is_some_and(|v| !v.is_empty()))
        .count()
    }

    /// Check if a country matches this filter
    pub fn matches(&self, country: &Country) -> bool {
        // An empty selection is "any", like a cleared dropdown
        fn set(criterion: &Option<String>) -> Option<&str> {
            criterion.as_deref().filter(|v| !v.is_empty())
        }

        if let Some(search) = set(&self.search) {
            if !name_contains(country, search) {
                return false;
            }
        }

        if let Some(region) = set(&self.region) {
            if country.region != region {
                return false;
            }
        }

        if let Some(language) = set(&self.language) {
            if !country.language_names().any(|l| l == language) {
                return false;
            }
        }

        if let Some(currency) = set(&self.currency) {
            if !country.currency_names().any(|c| c == currency) {
                return false;
            }
        }

        if let Some(capital) = set(&self.capital) {
            if !country.capital.iter().any(|c| c == capital) {
                return false;
            }
        }

        if let Some(name) = set(&self.country) {
            if country.name() != name {
                return false;
            }
        }

        true
    }
}

/// Case-insensitive substring match on the common name
pub(crate) fn name_contains(country: &Country, query: &str) -> bool {
    country
        .name()
        .to_lowercase()
        .contains(&query.to_lowercase())
}

fn nonblank<'a>(values: impl Iterator<Item = &'a str> + 'a) -> impl Iterator<Item = String> + 'a {
    values.filter(|v| !v.is_empty()).map(str::to_string)
}

/// Distinct, sorted values of each filterable attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Facets {
    pub regions: Vec<String>,
    pub languages: Vec<String>,
    pub currencies: Vec<String>,
    pub capitals: Vec<String>,
    pub countries: Vec<String>,
}

impl Facets {
    /// Collect facets from a list of countries
    pub fn collect<'a>(countries: impl IntoIterator<Item = &'a Country>) -> Self {
        let mut regions = BTreeSet::new();
        let mut languages = BTreeSet::new();
        let mut currencies = BTreeSet::new();
        let mut capitals = BTreeSet::new();
        let mut names = BTreeSet::new();

        for country in countries {
            if !country.region.is_empty() {
                regions.insert(country.region.clone());
            }
            languages.extend(nonblank(country.language_names()));
            currencies.extend(nonblank(country.currency_names()));
            capitals.extend(nonblank(country.capital.iter().map(String::as_str)));
            if !country.name().is_empty() {
                names.insert(country.name().to_string());
            }
        }

        Self {
            regions: regions.into_iter().collect(),
            languages: languages.into_iter().collect(),
            currencies: currencies.into_iter().collect(),
            capitals: capitals.into_iter().collect(),
            countries: names.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peru() -> Country {
        Country::new("Peru", "PER")
            .with_region("Americas")
            .with_capital("Lima")
            .with_language("spa", "Spanish")
            .with_language("que", "Quechua")
            .with_currency("PEN", "Peruvian sol")
    }

    fn spain() -> Country {
        Country::new("Spain", "ESP")
            .with_region("Europe")
            .with_capital("Madrid")
            .with_language("spa", "Spanish")
            .with_currency("EUR", "Euro")
    }

    #[test]
    fn test_empty_filter_matches_everything() {
        let filter = CountryFilter::new();
        assert!(filter.matches(&peru()));
        assert!(filter.matches(&Country::default()));
        assert_eq!(filter.active_count(), 0);
    }

    #[test]
    fn test_search_is_case_insensitive_substring() {
        assert!(CountryFilter::new().search("ER").matches(&peru()));
        assert!(CountryFilter::new().search("pa").matches(&spain()));
        assert!(!CountryFilter::new().search("pa").matches(&peru()));
    }

    #[test]
    fn test_individual_criteria() {
        assert!(CountryFilter::new().region("Americas").matches(&peru()));
        assert!(!CountryFilter::new().region("americas").matches(&peru()));

        assert!(CountryFilter::new().language("Quechua").matches(&peru()));
        assert!(!CountryFilter::new().language("Quechua").matches(&spain()));

        assert!(CountryFilter::new().currency("Euro").matches(&spain()));
        assert!(!CountryFilter::new().currency("EUR").matches(&spain()));

        assert!(CountryFilter::new().capital("Lima").matches(&peru()));
        assert!(!CountryFilter::new().capital("Li").matches(&peru()));

        assert!(CountryFilter::new().country("Spain").matches(&spain()));
        assert!(!CountryFilter::new().country("Spai").matches(&spain()));
    }

    #[test]
    fn test_criteria_combine_with_and() {
        let filter = CountryFilter::new().language("Spanish").region("Europe");
        assert!(filter.matches(&spain()));
        assert!(!filter.matches(&peru()));
        assert_eq!(filter.active_count(), 2);
    }

    #[test]
    fn test_empty_criterion_is_ignored() {
        let filter = CountryFilter::new().region("").language("Spanish");
        assert!(filter.matches(&peru()));
        assert_eq!(filter.active_count(), 1);
    }

    #[test]
    fn test_facets_sorted_and_deduplicated() {
        let countries = [peru(), spain()];
        let facets = Facets::collect(&countries);

        assert_eq!(facets.regions, vec!["Americas", "Europe"]);
        assert_eq!(facets.languages, vec!["Quechua", "Spanish"]);
        assert_eq!(facets.currencies, vec!["Euro", "Peruvian sol"]);
        assert_eq!(facets.capitals, vec!["Lima", "Madrid"]);
        assert_eq!(facets.countries, vec!["Peru", "Spain"]);
    }

    #[test]
    fn test_facets_skip_blank_values() {
        let countries = [
            Country::new("Nowhere", "XXX")
                .with_capital("")
                .with_language("xxx", "")
                .with_currency("XXX", ""),
            spain(),
        ];
        let facets = Facets::collect(&countries);
        assert_eq!(facets.regions, vec!["Europe"]);
        assert_eq!(facets.languages, vec!["Spanish"]);
        assert_eq!(facets.currencies, vec!["Euro"]);
        assert_eq!(facets.capitals, vec!["Madrid"]);
        assert_eq!(facets.countries, vec!["Nowhere", "Spain"]);
    }
}
