//! Market data fetch controller
//!
//! Turns a time range into one provider request and classifies the result.
//! `refresh` additionally tags the request with a sequence number and hands
//! the outcome to the shared `MarketStore`.

use crate::{
    config::MarketConfig,
    error::FetchError,
    provider::MarketDataProvider,
    providers::CoinGeckoProvider,
    store::{MarketState, MarketStore},
    types::{FetchOutcome, MarketEvent, TimeRange},
};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::broadcast;

/// Market fetch controller
///
/// # Example
/// ```no_run
/// use coin_market_sdk::{MarketController, TimeRange};
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let controller = MarketController::new()?;
/// let mut events = controller.subscribe();
///
/// controller.refresh(TimeRange::Week).await;
/// let state = controller.snapshot().await;
/// if let Some(coin) = state.selected_coin() {
///     println!("{}: ${:.2}", coin.display_symbol(), coin.current_price);
/// }
/// # let _ = events.try_recv();
/// # Ok(())
/// # }
/// ```
pub struct MarketController {
    provider: Arc<dyn MarketDataProvider>,
    store: Arc<MarketStore>,
}

impl MarketController {
    /// Creates a controller backed by CoinGecko
    ///
    /// Endpoint settings come from the environment (see
    /// `MarketConfig::from_env`); invalid overrides are logged and the
    /// defaults are used instead.
    pub fn new() -> Result<Self, FetchError> {
        let config = MarketConfig::from_env().unwrap_or_else(|e| {
            tracing::warn!(error = %e, "Ignoring invalid market config override");
            MarketConfig::default()
        });

        let provider = CoinGeckoProvider::with_config(config)?;
        Ok(Self::with_provider(Arc::new(provider)))
    }

    /// Creates a controller with a custom provider
    ///
    /// This is primarily for testing with mock providers.
    pub fn with_provider(provider: Arc<dyn MarketDataProvider>) -> Self {
        Self {
            provider,
            store: Arc::new(MarketStore::new()),
        }
    }

    /// Fetches the market list for `range` without touching shared state
    pub async fn fetch(&self, range: TimeRange) -> FetchOutcome {
        let start = Instant::now();
        let outcome = FetchOutcome::from(self.provider.fetch_markets(range).await);

        match &outcome {
            FetchOutcome::Success(coins) => tracing::debug!(
                provider = self.provider.provider_name(),
                range = %range,
                count = coins.len(),
                latency_ms = start.elapsed().as_millis() as u64,
                "Fetched markets"
            ),
            FetchOutcome::Empty => tracing::debug!(
                provider = self.provider.provider_name(),
                range = %range,
                "Markets response was empty"
            ),
            FetchOutcome::Failure(e) => tracing::debug!(
                provider = self.provider.provider_name(),
                range = %range,
                error = %e,
                latency_ms = start.elapsed().as_millis() as u64,
                "Markets fetch failed"
            ),
        }

        outcome
    }

    /// Fetches `range` and applies the result to the shared state
    ///
    /// A newer `refresh` started while this one is in flight wins; this
    /// call's result is then dropped.
    ///
    /// # Returns
    /// True if the result was applied
    pub async fn refresh(&self, range: TimeRange) -> bool {
        let request_id = self.store.issue(range).await;
        let outcome = self.fetch(range).await;
        self.store.apply(request_id, outcome).await
    }

    /// Refreshes using a range picker label such as `"24H"`
    pub async fn refresh_label(&self, label: &str) -> bool {
        self.refresh(TimeRange::from_label(label)).await
    }

    /// Shared state container
    pub fn store(&self) -> Arc<MarketStore> {
        self.store.clone()
    }

    /// Clones the current state
    pub async fn snapshot(&self) -> MarketState {
        self.store.snapshot().await
    }

    /// Subscribes to state change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.store.subscribe()
    }

    /// Selects a coin by symbol, ignoring case
    pub async fn select_symbol(&self, symbol: &str) -> bool {
        self.store.select_symbol(symbol).await
    }

    /// Returns the name of the current provider
    pub fn provider_name(&self) -> &str {
        self.provider.provider_name()
    }
}
