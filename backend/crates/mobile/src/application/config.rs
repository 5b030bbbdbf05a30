//! Application Configuration
//!
//! Configuration for the Mobile application layer.

use crate::domain::repository::PageRequest;
use crate::domain::value_objects::{Currency, CurrencyError};

/// Mobile application configuration
#[derive(Debug, Clone)]
pub struct MobileConfig {
    /// Currency applied to expenses submitted without one
    pub default_currency: Currency,
    /// Page size when the client sends no `limit`
    pub default_page_size: i64,
    /// Upper bound for `limit`
    pub max_page_size: i64,
}

impl Default for MobileConfig {
    fn default() -> Self {
        Self {
            default_currency: Currency::from_db("USD".to_string()),
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

impl MobileConfig {
    /// Read `DEFAULT_CURRENCY` from the environment
    pub fn from_env() -> Result<Self, CurrencyError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, CurrencyError> {
        let mut config = Self::default();
        if let Some(code) = lookup("DEFAULT_CURRENCY").filter(|c| !c.trim().is_empty()) {
            config.default_currency = Currency::new(code.trim())?;
        }
        Ok(config)
    }

    /// Clamp client-supplied pagination
    ///
    /// `limit` defaults to `default_page_size` and is kept within
    /// `1..=max_page_size`; `offset` defaults to 0 and is never negative.
    pub fn page(&self, limit: Option<i64>, offset: Option<i64>) -> PageRequest {
        PageRequest {
            limit: limit
                .unwrap_or(self.default_page_size)
                .clamp(1, self.max_page_size),
            offset: offset.unwrap_or(0).max(0),
        }
    }
}
