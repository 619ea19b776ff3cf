//! Runtime configuration for the market client

use crate::{
    constants::{
        COINGECKO_API_URL, DEFAULT_PER_PAGE, DEFAULT_VS_CURRENCY, ENV_API_URL, ENV_PER_PAGE,
        ENV_VS_CURRENCY,
    },
    error::ConfigError,
};

/// Endpoint settings for the markets request
///
/// Defaults come from `constants`. Use `from_env` to pick up overrides, e.g.
/// to point the client at a local mirror.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarketConfig {
    /// API base URL, without trailing slash
    pub base_url: String,
    /// Quote currency
    pub vs_currency: String,
    /// Coins per request
    pub per_page: u32,
}

impl Default for MarketConfig {
    fn default() -> Self {
        Self {
            base_url: COINGECKO_API_URL.to_string(),
            vs_currency: DEFAULT_VS_CURRENCY.to_string(),
            per_page: DEFAULT_PER_PAGE,
        }
    }
}

impl MarketConfig {
    /// Config with a different base URL, used by tests and mirrors
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            ..Self::default()
        }
    }

    /// Defaults overridden by `COIN_MARKET_API_URL`, `COIN_MARKET_VS_CURRENCY`
    /// and `COIN_MARKET_PER_PAGE`
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();

        if let Some(url) = lookup(ENV_API_URL) {
            let url = url.trim().trim_end_matches('/');
            if url.is_empty() {
                return Err(ConfigError::invalid_value(ENV_API_URL, url));
            }
            config.base_url = url.to_string();
        }

        if let Some(currency) = lookup(ENV_VS_CURRENCY) {
            let currency = currency.trim().to_lowercase();
            if currency.is_empty() || !currency.chars().all(|c| c.is_ascii_alphanumeric()) {
                return Err(ConfigError::invalid_value(ENV_VS_CURRENCY, currency));
            }
            config.vs_currency = currency;
        }

        if let Some(per_page) = lookup(ENV_PER_PAGE) {
            config.per_page = match per_page.trim().parse::<u32>() {
                Ok(n) if (1..=250).contains(&n) => n,
                _ => return Err(ConfigError::invalid_value(ENV_PER_PAGE, per_page)),
            };
        }

        tracing::debug!(
            base_url = %config.base_url,
            vs_currency = %config.vs_currency,
            per_page = config.per_page,
            "Loaded market config"
        );

        Ok(config)
    }
}
