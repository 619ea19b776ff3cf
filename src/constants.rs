//! Constants for the coin market client
//!
//! Defaults for the market request live here. `MarketConfig::from_env` can
//! override the endpoint-related ones at runtime.

/// CoinGecko API base URL
pub const COINGECKO_API_URL: &str = "https://api.coingecko.com/api/v3";

/// CoinGecko endpoint listing coins with market data
pub const COINGECKO_MARKETS_ENDPOINT: &str = "/coins/markets";

/// Quote currency for prices
pub const DEFAULT_VS_CURRENCY: &str = "usd";

/// Ordering requested from the markets endpoint
pub const MARKETS_ORDER: &str = "market_cap_desc";

/// Number of coins requested per fetch
pub const DEFAULT_PER_PAGE: u32 = 10;

/// User agent for HTTP requests
pub const USER_AGENT: &str = "coin-market-sdk/0.1.0";

/// Preference key holding the favorite symbols
pub const FAVORITES_KEY: &str = "favorites";

/// Capacity of the market event broadcast channel
pub const EVENT_CHANNEL_CAPACITY: usize = 64;

/// Environment variable overriding the API base URL
pub const ENV_API_URL: &str = "COIN_MARKET_API_URL";

/// Environment variable overriding the quote currency
pub const ENV_VS_CURRENCY: &str = "COIN_MARKET_VS_CURRENCY";

/// Environment variable overriding the page size
pub const ENV_PER_PAGE: &str = "COIN_MARKET_PER_PAGE";
