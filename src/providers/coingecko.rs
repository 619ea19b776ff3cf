//! CoinGecko markets provider implementation

use crate::{
    config::MarketConfig,
    constants::{COINGECKO_MARKETS_ENDPOINT, MARKETS_ORDER, USER_AGENT},
    error::FetchError,
    provider::MarketDataProvider,
    types::{CoinRecord, TimeRange},
};
use async_trait::async_trait;
use reqwest::{Client, StatusCode, Url};

/// CoinGecko `/coins/markets` provider
///
/// Relies on the HTTP client's default timeout; there is no retry.
pub struct CoinGeckoProvider {
    client: Client,
    config: MarketConfig,
}

impl CoinGeckoProvider {
    /// Creates a provider against the public CoinGecko API
    pub fn new() -> Result<Self, FetchError> {
        Self::with_config(MarketConfig::default())
    }

    /// Creates a provider with custom endpoint settings
    pub fn with_config(config: MarketConfig) -> Result<Self, FetchError> {
        let client = Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .map_err(FetchError::Network)?;

        Ok(Self { client, config })
    }

    /// Endpoint settings in use
    pub fn config(&self) -> &MarketConfig {
        &self.config
    }

    /// Builds the markets URL for `range`
    pub fn build_url(&self, range: TimeRange) -> Result<Url, FetchError> {
        let per_page = self.config.per_page.to_string();
        let endpoint = format!("{}{}", self.config.base_url, COINGECKO_MARKETS_ENDPOINT);

        Url::parse_with_params(
            &endpoint,
            &[
                ("vs_currency", self.config.vs_currency.as_str()),
                ("order", MARKETS_ORDER),
                ("per_page", per_page.as_str()),
                ("sparkline", "true"),
                ("price_change_percentage", range.api_param()),
            ],
        )
        .map_err(|e| FetchError::invalid_request(format!("{}: {}", endpoint, e)))
    }

    /// Decodes a markets response body
    pub fn parse_response(body: &str) -> Result<Vec<CoinRecord>, FetchError> {
        Ok(serde_json::from_str(body)?)
    }
}

#[async_trait]
impl MarketDataProvider for CoinGeckoProvider {
    async fn fetch_markets(&self, range: TimeRange) -> Result<Vec<CoinRecord>, FetchError> {
        let url = self.build_url(range)?;
        tracing::debug!(%url, range = %range, "Fetching markets from CoinGecko");

        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(FetchError::Network)?;

        let status = response.status();
        if status != StatusCode::OK {
            tracing::debug!(status = status.as_u16(), "CoinGecko returned non-200 status");
            return Err(FetchError::http(status.as_u16()));
        }

        let body = response.text().await.map_err(FetchError::Network)?;
        let coins = Self::parse_response(&body)?;

        tracing::debug!(count = coins.len(), "Decoded markets from CoinGecko");

        Ok(coins)
    }

    fn provider_name(&self) -> &'static str {
        "coingecko"
    }
}
