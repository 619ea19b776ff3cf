//! Provider abstraction for fetching the coin market list

use crate::{
    error::FetchError,
    types::{CoinRecord, TimeRange},
};
use async_trait::async_trait;

/// Trait for market list providers
///
/// Implementations issue exactly one request per call: no retries, no
/// caching. Classifying the result into success/empty/failure is left to
/// the controller.
#[async_trait]
pub trait MarketDataProvider: Send + Sync {
    /// Fetches the market list with percent changes over `range`
    ///
    /// # Arguments
    /// * `range` - Window for the price change figures
    ///
    /// # Returns
    /// Decoded coins in API order (possibly empty) or the failure cause
    async fn fetch_markets(&self, range: TimeRange) -> Result<Vec<CoinRecord>, FetchError>;

    /// Returns the name of this provider
    fn provider_name(&self) -> &'static str;
}
