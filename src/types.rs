//! Types for the coin market client

use crate::error::FetchError;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use uuid::Uuid;

/// Historical window used for the percent-change figures
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TimeRange {
    /// Last 24 hours
    Day,
    /// Last 7 days
    #[default]
    Week,
    /// Last 30 days
    Month,
}

impl TimeRange {
    /// Value of the `price_change_percentage` query parameter
    pub fn api_param(&self) -> &'static str {
        match self {
            TimeRange::Day => "1",
            TimeRange::Week => "7",
            TimeRange::Month => "30",
        }
    }

    /// Short label for range pickers
    pub fn label(&self) -> &'static str {
        match self {
            TimeRange::Day => "24H",
            TimeRange::Week => "7D",
            TimeRange::Month => "1M",
        }
    }

    /// Parses a picker label or range name; anything unrecognized is `Week`
    pub fn from_label(label: &str) -> Self {
        match label.trim().to_ascii_lowercase().as_str() {
            "24h" | "1d" | "day" | "1" => TimeRange::Day,
            "1m" | "30d" | "month" | "30" => TimeRange::Month,
            _ => TimeRange::Week,
        }
    }

    /// Get all ranges in picker order
    pub fn all() -> &'static [TimeRange] {
        &[TimeRange::Day, TimeRange::Week, TimeRange::Month]
    }
}

impl fmt::Display for TimeRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A coin with market data, as returned by the markets endpoint
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoinRecord {
    /// Unique API id (e.g. "bitcoin")
    pub id: String,

    /// Ticker symbol as sent by the API, usually lowercase
    pub symbol: String,

    /// Full name
    pub name: String,

    /// Logo URL
    #[serde(rename = "image")]
    pub image_url: String,

    /// Price in the quote currency
    pub current_price: f64,

    /// Last update time as sent by the API
    pub last_updated: String,

    /// Price change percentage; `null` decodes as zero
    #[serde(
        rename = "price_change_percentage_24h",
        default,
        deserialize_with = "null_as_zero"
    )]
    pub price_change_percent: f64,

    /// Chronological price samples
    #[serde(rename = "sparkline_in_7d", with = "sparkline_in_7d")]
    pub sparkline: Vec<f64>,
}

impl CoinRecord {
    /// Uppercased symbol for display and favorites
    pub fn display_symbol(&self) -> String {
        self.symbol.to_uppercase()
    }

    /// Parsed `last_updated`, if it is RFC 3339
    pub fn last_updated_at(&self) -> Option<DateTime<Utc>> {
        DateTime::parse_from_rfc3339(&self.last_updated)
            .ok()
            .map(|dt| dt.with_timezone(&Utc))
    }

    /// True if the price went up over the selected range
    pub fn is_profit(&self) -> bool {
        self.price_change_percent > 0.0
    }
}

fn null_as_zero<'de, D>(deserializer: D) -> Result<f64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<f64>::deserialize(deserializer)?.unwrap_or_default())
}

/// `sparkline_in_7d: { "price": [...] }` <-> `Vec<f64>`
mod sparkline_in_7d {
    use serde::{Deserialize, Deserializer, Serialize, Serializer};

    #[derive(Serialize, Deserialize)]
    struct Sparkline<T> {
        price: T,
    }

    pub fn serialize<S>(prices: &[f64], serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        Sparkline { price: prices }.serialize(serializer)
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Vec<f64>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Sparkline::<Vec<f64>>::deserialize(deserializer)?.price)
    }
}

/// Result of a single market fetch
///
/// The three cases are mutually exclusive.
#[derive(Debug)]
pub enum FetchOutcome {
    /// Non-empty coin list
    Success(Vec<CoinRecord>),
    /// Well-formed response with no coins
    Empty,
    /// Request, transport, status or decode failure
    Failure(FetchError),
}

impl FetchOutcome {
    /// Message for the user, `None` on success
    pub fn user_message(&self) -> Option<String> {
        match self {
            FetchOutcome::Success(_) => None,
            FetchOutcome::Empty => Some("No available coin data.".to_string()),
            FetchOutcome::Failure(e) => Some(e.to_string()),
        }
    }

    /// Returns true for `Success`
    pub fn is_success(&self) -> bool {
        matches!(self, FetchOutcome::Success(_))
    }
}

impl From<Result<Vec<CoinRecord>, FetchError>> for FetchOutcome {
    fn from(result: Result<Vec<CoinRecord>, FetchError>) -> Self {
        match result {
            Ok(coins) if coins.is_empty() => FetchOutcome::Empty,
            Ok(coins) => FetchOutcome::Success(coins),
            Err(e) => FetchOutcome::Failure(e),
        }
    }
}

/// Identifies one issued fetch; higher ids are newer
///
/// Only `MarketStore::issue` hands out ids. The default id `#0` stands for
/// "nothing issued yet" and is never accepted by `apply`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct RequestId(u64);

impl RequestId {
    /// Sequence number
    pub fn value(&self) -> u64 {
        self.0
    }

    /// True for an id that came from `issue`
    pub fn is_issued(&self) -> bool {
        self.0 > 0
    }

    pub(crate) fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Notifications published by the market state container
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum MarketEvent {
    /// A fetch was issued and the state went back to loading
    FetchStarted {
        id: Uuid,
        request_id: RequestId,
        time_range: TimeRange,
        timestamp: DateTime<Utc>,
    },

    /// A fetch result was applied to the state
    StateUpdated {
        id: Uuid,
        request_id: RequestId,
        time_range: TimeRange,
        coin_count: usize,
        timestamp: DateTime<Utc>,
    },

    /// A fetch finished empty or failed and the message was applied
    FetchFailed {
        id: Uuid,
        request_id: RequestId,
        time_range: TimeRange,
        error_message: String,
        timestamp: DateTime<Utc>,
    },

    /// A superseded fetch completed and its result was dropped
    StaleResultDiscarded {
        id: Uuid,
        request_id: RequestId,
        latest_request_id: RequestId,
        timestamp: DateTime<Utc>,
    },

    /// The selected coin changed
    SelectionChanged {
        id: Uuid,
        coin_id: Option<String>,
        timestamp: DateTime<Utc>,
    },
}

impl MarketEvent {
    /// Get the event ID
    pub fn id(&self) -> Uuid {
        match self {
            MarketEvent::FetchStarted { id, .. } => *id,
            MarketEvent::StateUpdated { id, .. } => *id,
            MarketEvent::FetchFailed { id, .. } => *id,
            MarketEvent::StaleResultDiscarded { id, .. } => *id,
            MarketEvent::SelectionChanged { id, .. } => *id,
        }
    }

    /// Get the event type as string
    pub fn event_type(&self) -> &'static str {
        match self {
            MarketEvent::FetchStarted { .. } => "FETCH_STARTED",
            MarketEvent::StateUpdated { .. } => "STATE_UPDATED",
            MarketEvent::FetchFailed { .. } => "FETCH_FAILED",
            MarketEvent::StaleResultDiscarded { .. } => "STALE_RESULT_DISCARDED",
            MarketEvent::SelectionChanged { .. } => "SELECTION_CHANGED",
        }
    }
}

impl fmt::Display for MarketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MarketEvent::FetchStarted {
                request_id,
                time_range,
                ..
            } => write!(f, "Fetch {} started for {}", request_id, time_range),
            MarketEvent::StateUpdated {
                request_id,
                coin_count,
                ..
            } => write!(f, "Fetch {} applied: {} coins", request_id, coin_count),
            MarketEvent::FetchFailed {
                request_id,
                error_message,
                ..
            } => write!(f, "Fetch {} failed: {}", request_id, error_message),
            MarketEvent::StaleResultDiscarded {
                request_id,
                latest_request_id,
                ..
            } => write!(
                f,
                "Fetch {} discarded, superseded by {}",
                request_id, latest_request_id
            ),
            MarketEvent::SelectionChanged { coin_id, .. } => match coin_id {
                Some(coin_id) => write!(f, "Selected {}", coin_id),
                None => f.write_str("Selection cleared"),
            },
        }
    }
}
