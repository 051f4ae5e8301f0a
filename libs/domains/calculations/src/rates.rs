//! Wage and fence capacity tables used by the pricing engine.

use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::Path;
use thiserror::Error;

/// Hourly minimum wage per country, in the quoting currency.
const DEFAULT_WAGES: [(&str, f64); 30] = [
    ("United Kingdom", 12.21),
    ("Ireland", 13.50),
    ("France", 11.88),
    ("Germany", 12.82),
    ("Netherlands", 13.68),
    ("Belgium", 12.01),
    ("Spain", 8.51),
    ("Italy", 9.80),
    ("Portugal", 5.23),
    ("Poland", 4.95),
    ("Czech Republic", 4.95),
    ("Austria", 12.85),
    ("Switzerland", 25.00),
    ("Sweden", 0.00),
    ("Norway", 0.00),
    ("Denmark", 0.00),
    ("United Arab Emirates", 2.72),
    ("Saudi Arabia", 2.67),
    ("Qatar", 2.00),
    ("Kuwait", 2.72),
    ("Oman", 1.68),
    ("Bahrain", 2.13),
    ("Turkey", 3.29),
    ("Egypt", 1.36),
    ("Jordan", 2.27),
    ("Lebanon", 1.00),
    ("United States", 7.25),
    ("Canada", 11.00),
    ("Australia", 23.23),
    ("New Zealand", 22.70),
];

/// Metres of fence one crew installs per day, by fence type code.
const DEFAULT_FENCE_CAPACITIES: [(&str, u32); 3] = [("OR", 136), ("PR1", 136), ("PR2", 128)];

#[derive(Debug, Error)]
pub enum RatesError {
    #[error("Failed to read rate tables from {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse rate tables: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid rate tables: {0}")]
    Invalid(String),
}

/// Immutable lookup tables injected into [`crate::pricing::PricingEngine`].
///
/// Both maps are ordered, so country and fence type listings come out sorted.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RateTables {
    wages: BTreeMap<String, f64>,
    fence_capacities: BTreeMap<String, u32>,
}

impl RateTables {
    /// Builds tables from arbitrary maps.
    ///
    /// Both maps must be non-empty, capacities positive and wages finite and
    /// non-negative.
    pub fn new(
        wages: BTreeMap<String, f64>,
        fence_capacities: BTreeMap<String, u32>,
    ) -> Result<Self, RatesError> {
        let tables = Self {
            wages,
            fence_capacities,
        };
        tables.validate()?;
        Ok(tables)
    }

    /// Parses `{"wages": {...}, "fence_capacities": {...}}`.
    pub fn from_json_str(raw: &str) -> Result<Self, RatesError> {
        let tables: Self = serde_json::from_str(raw)?;
        tables.validate()?;
        Ok(tables)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, RatesError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|source| RatesError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&raw)
    }

    fn validate(&self) -> Result<(), RatesError> {
        if self.wages.is_empty() {
            return Err(RatesError::Invalid("wage table is empty".to_string()));
        }
        if self.fence_capacities.is_empty() {
            return Err(RatesError::Invalid(
                "fence capacity table is empty".to_string(),
            ));
        }
        if let Some((country, wage)) = self
            .wages
            .iter()
            .find(|(_, wage)| !wage.is_finite() || **wage < 0.0)
        {
            return Err(RatesError::Invalid(format!(
                "wage for {country} must be a non-negative number, got {wage}"
            )));
        }
        if let Some((code, _)) = self.fence_capacities.iter().find(|(_, c)| **c == 0) {
            return Err(RatesError::Invalid(format!(
                "daily capacity for fence type {code} must be positive"
            )));
        }
        Ok(())
    }

    pub fn wage(&self, country: &str) -> Option<f64> {
        self.wages.get(country).copied()
    }

    pub fn daily_capacity(&self, fence_type: &str) -> Option<u32> {
        self.fence_capacities.get(fence_type).copied()
    }

    /// Recognised countries, sorted and unique.
    pub fn countries(&self) -> Vec<String> {
        self.wages.keys().cloned().collect()
    }

    /// `(code, daily_capacity)` pairs sorted by code.
    pub fn fence_types(&self) -> Vec<(String, u32)> {
        self.fence_capacities
            .iter()
            .map(|(code, capacity)| (code.clone(), *capacity))
            .collect()
    }
}

impl Default for RateTables {
    fn default() -> Self {
        Self {
            wages: DEFAULT_WAGES
                .iter()
                .map(|(country, wage)| (country.to_string(), *wage))
                .collect(),
            fence_capacities: DEFAULT_FENCE_CAPACITIES
                .iter()
                .map(|(code, capacity)| (code.to_string(), *capacity))
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_countries_sorted_and_complete() {
        let countries = RateTables::default().countries();

        assert_eq!(countries.len(), 30);
        assert_eq!(countries.len(), DEFAULT_WAGES.len());
        assert!(countries.windows(2).all(|w| w[0] < w[1]));
        for required in ["United Kingdom", "Germany", "United States", "Australia"] {
            assert!(countries.iter().any(|c| c == required), "missing {required}");
        }
    }

    #[test]
    fn test_default_fence_capacities() {
        let tables = RateTables::default();
        assert_eq!(tables.daily_capacity("OR"), Some(136));
        assert_eq!(tables.daily_capacity("PR1"), Some(136));
        assert_eq!(tables.daily_capacity("PR2"), Some(128));
        assert_eq!(tables.daily_capacity("PR"), None);
    }

    #[test]
    fn test_zero_wage_countries_present() {
        let tables = RateTables::default();
        for country in ["Sweden", "Norway", "Denmark"] {
            assert_eq!(tables.wage(country), Some(0.0));
        }
    }

    #[test]
    fn test_from_json_str() {
        let tables = RateTables::from_json_str(
            r#"{"wages": {"Atlantis": 10.0}, "fence_capacities": {"OR": 100, "XR": 90}}"#,
        )
        .unwrap();

        assert_eq!(tables.countries(), vec!["Atlantis".to_string()]);
        assert_eq!(
            tables.fence_types(),
            vec![("OR".to_string(), 100), ("XR".to_string(), 90)]
        );
    }

    #[test]
    fn test_rejects_empty_wages() {
        let err = RateTables::from_json_str(r#"{"wages": {}, "fence_capacities": {"OR": 136}}"#)
            .unwrap_err();
        assert!(matches!(err, RatesError::Invalid(_)));
    }

    #[test]
    fn test_rejects_zero_capacity() {
        let err = RateTables::from_json_str(
            r#"{"wages": {"Spain": 8.51}, "fence_capacities": {"OR": 0}}"#,
        )
        .unwrap_err();
        assert!(matches!(err, RatesError::Invalid(_)));
    }

    #[test]
    fn test_rejects_negative_wage() {
        let wages = BTreeMap::from([("Spain".to_string(), -1.0)]);
        let capacities = BTreeMap::from([("OR".to_string(), 136)]);
        assert!(RateTables::new(wages, capacities).is_err());
    }

    #[test]
    fn test_from_missing_file() {
        let err = RateTables::from_file("/nonexistent/rates.json").unwrap_err();
        assert!(matches!(err, RatesError::Io { .. }));
    }
}
