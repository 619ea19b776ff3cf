//! Market state container with ordered updates and broadcast notifications

use crate::{
    constants::EVENT_CHANNEL_CAPACITY,
    types::{CoinRecord, FetchOutcome, MarketEvent, RequestId, TimeRange},
};
use chrono::Utc;
use tokio::sync::{broadcast, RwLock};
use uuid::Uuid;

/// Load status of the market list
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum LoadStatus {
    /// A fetch is in flight; previous coins stay visible
    #[default]
    Loading,
    /// Coins from the latest fetch are shown
    Loaded,
    /// The latest fetch returned no coins
    Empty,
    /// The latest fetch failed with a user-visible message
    Failed(String),
}

/// Snapshot of everything the presentation layer renders
#[derive(Debug, Clone, Default)]
pub struct MarketState {
    /// Coins from the last applied fetch
    pub coins: Vec<CoinRecord>,
    pub status: LoadStatus,
    /// Range of the latest issued fetch
    pub time_range: TimeRange,
    /// Id of the selected coin
    pub selected: Option<String>,
    /// Newest issued request; only its result is applied
    pub latest_issued: RequestId,
    /// Request whose result is currently shown
    pub last_applied: Option<RequestId>,
}

impl MarketState {
    /// The selected coin, if it is in the current list
    pub fn selected_coin(&self) -> Option<&CoinRecord> {
        let id = self.selected.as_deref()?;
        self.coins.iter().find(|c| c.id == id)
    }

    /// Message to show instead of the list
    pub fn error_message(&self) -> Option<String> {
        match &self.status {
            LoadStatus::Empty => Some("No available coin data.".to_string()),
            LoadStatus::Failed(message) => Some(message.clone()),
            LoadStatus::Loading | LoadStatus::Loaded => None,
        }
    }

    pub fn is_loading(&self) -> bool {
        self.status == LoadStatus::Loading
    }
}

/// Shared market state
///
/// `apply` is the single write path for fetch results. Each fetch must first
/// take a `RequestId` from `issue`; results carrying anything but the latest
/// id are dropped, so a slow superseded request never overwrites a newer one.
pub struct MarketStore {
    state: RwLock<MarketState>,
    events: broadcast::Sender<MarketEvent>,
}

impl MarketStore {
    /// Creates an empty store in the loading state
    pub fn new() -> Self {
        let (events, _) = broadcast::channel(EVENT_CHANNEL_CAPACITY);
        Self {
            state: RwLock::new(MarketState::default()),
            events,
        }
    }

    /// Subscribes to state change notifications
    pub fn subscribe(&self) -> broadcast::Receiver<MarketEvent> {
        self.events.subscribe()
    }

    /// Clones the current state
    pub async fn snapshot(&self) -> MarketState {
        self.state.read().await.clone()
    }

    /// Registers a new fetch for `range` and returns its id
    ///
    /// Any earlier in-flight request becomes stale.
    pub async fn issue(&self, range: TimeRange) -> RequestId {
        let request_id = {
            let mut state = self.state.write().await;
            state.latest_issued = state.latest_issued.next();
            state.time_range = range;
            state.status = LoadStatus::Loading;
            state.latest_issued
        };

        self.publish(MarketEvent::FetchStarted {
            id: Uuid::new_v4(),
            request_id,
            time_range: range,
            timestamp: Utc::now(),
        });

        request_id
    }

    /// Applies a fetch result if `request_id` is still the latest
    ///
    /// # Returns
    /// True if the state changed, false if the result was stale
    pub async fn apply(&self, request_id: RequestId, outcome: FetchOutcome) -> bool {
        let mut state = self.state.write().await;

        let is_current = request_id.is_issued()
            && request_id == state.latest_issued
            && state.last_applied != Some(request_id);

        if !is_current {
            let latest_request_id = state.latest_issued;
            drop(state);

            tracing::debug!(
                request_id = request_id.value(),
                latest_request_id = latest_request_id.value(),
                "Discarding superseded or duplicate fetch result"
            );
            self.publish(MarketEvent::StaleResultDiscarded {
                id: Uuid::new_v4(),
                request_id,
                latest_request_id,
                timestamp: Utc::now(),
            });
            return false;
        }

        let time_range = state.time_range;
        state.last_applied = Some(request_id);

        let event = match outcome {
            FetchOutcome::Success(coins) => {
                let keep_selection = state
                    .selected
                    .as_deref()
                    .is_some_and(|id| coins.iter().any(|c| c.id == id));
                if !keep_selection {
                    state.selected = coins.first().map(|c| c.id.clone());
                }

                let coin_count = coins.len();
                state.coins = coins;
                state.status = LoadStatus::Loaded;

                MarketEvent::StateUpdated {
                    id: Uuid::new_v4(),
                    request_id,
                    time_range,
                    coin_count,
                    timestamp: Utc::now(),
                }
            }
            FetchOutcome::Empty => {
                state.coins.clear();
                state.selected = None;
                state.status = LoadStatus::Empty;

                MarketEvent::FetchFailed {
                    id: Uuid::new_v4(),
                    request_id,
                    time_range,
                    error_message: "No available coin data.".to_string(),
                    timestamp: Utc::now(),
                }
            }
            FetchOutcome::Failure(e) => {
                let error_message = e.to_string();
                tracing::warn!(
                    request_id = request_id.value(),
                    range = %time_range,
                    error = %e,
                    "Failed to fetch markets"
                );

                state.coins.clear();
                state.selected = None;
                state.status = LoadStatus::Failed(error_message.clone());

                MarketEvent::FetchFailed {
                    id: Uuid::new_v4(),
                    request_id,
                    time_range,
                    error_message,
                    timestamp: Utc::now(),
                }
            }
        };
        drop(state);

        self.publish(event);
        true
    }

    /// Selects a coin by id
    ///
    /// # Returns
    /// False if no coin with that id is loaded
    pub async fn select(&self, coin_id: &str) -> bool {
        let mut state = self.state.write().await;
        if !state.coins.iter().any(|c| c.id == coin_id) {
            return false;
        }
        state.selected = Some(coin_id.to_string());
        drop(state);

        self.publish(MarketEvent::SelectionChanged {
            id: Uuid::new_v4(),
            coin_id: Some(coin_id.to_string()),
            timestamp: Utc::now(),
        });
        true
    }

    /// Selects a coin by symbol, ignoring case
    pub async fn select_symbol(&self, symbol: &str) -> bool {
        let coin_id = {
            let state = self.state.read().await;
            state
                .coins
                .iter()
                .find(|c| c.symbol.eq_ignore_ascii_case(symbol))
                .map(|c| c.id.clone())
        };

        match coin_id {
            Some(coin_id) => self.select(&coin_id).await,
            None => false,
        }
    }

    fn publish(&self, event: MarketEvent) {
        tracing::trace!(event = %event, "Publishing market event");
        // No subscribers is fine
        let _ = self.events.send(event);
    }
}

impl Default for MarketStore {
    fn default() -> Self {
        Self::new()
    }
}
