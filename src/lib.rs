//! # Coin Market SDK
//!
//! Client-side core of a cryptocurrency market viewer: fetches the top coins
//! with price, percent change and a 7-day sparkline from CoinGecko, keeps the
//! result in an observable state container, computes line graph geometry for
//! the sparkline, and persists a list of favorite symbols locally.
//!
//! Nothing here depends on a UI framework. A presentation layer calls
//! [`MarketController::refresh`], listens on [`MarketController::subscribe`],
//! and renders from [`MarketController::snapshot`].
//!
//! ## Usage
//!
//! ```no_run
//! use coin_market_sdk::{graph, FavoritesStore, MarketController, TimeRange};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let controller = MarketController::new()?;
//! controller.refresh(TimeRange::Week).await;
//!
//! let state = controller.snapshot().await;
//! match state.selected_coin() {
//!     Some(coin) => {
//!         let points = graph::normalize(&coin.sparkline, 320.0, 180.0);
//!         let nearest = graph::nearest_by_horizontal_distance(100.0, &points)?;
//!         println!("{} near x=100: {:?}", coin.display_symbol(), nearest);
//!     }
//!     None => println!("{}", state.error_message().unwrap_or_default()),
//! }
//!
//! let favorites = FavoritesStore::with_file("prefs.json");
//! let set = favorites.toggle_and_persist(&favorites.load(), "btc");
//! println!("favorites: {:?}", set.symbols());
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! MarketController::refresh(range)
//!     ↓ issue(range) -> RequestId
//! MarketDataProvider (CoinGecko)
//!     ↓ FetchOutcome
//! MarketStore::apply(RequestId, outcome)   (stale ids dropped)
//!     ↓ MarketEvent (broadcast)
//! Presentation layer
//! ```

pub mod config;
pub mod constants;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod format;
pub mod graph;
pub mod provider;
pub mod providers;
pub mod store;
pub mod types;

// Re-export commonly used types
pub use config::MarketConfig;
pub use controller::MarketController;
pub use error::{ConfigError, FavoritesError, FetchError, GraphError};
pub use favorites::{FavoriteSet, FavoritesStore, JsonFilePreferences, MemoryPreferences, PreferenceStore};
pub use graph::{DragOverlay, DragPhase, GraphPoint, Highlight, Trend};
pub use provider::MarketDataProvider;
pub use providers::CoinGeckoProvider;
pub use store::{LoadStatus, MarketState, MarketStore};
pub use types::{CoinRecord, FetchOutcome, MarketEvent, RequestId, TimeRange};
