/// Error types shared across every component of the adapter.
///
/// `AdapterError` is the crate-wide error enum. `MarketNotFound`,
/// `TickerNotFound`, `PositionNotFound` and `ScaleInfeasible` are produced by
/// the order formatter and are fatal to the single placement call that
/// produced them. `VenueError` wraps a decoded Binance error response
/// (`code`/`msg`). Everything else is a transparent wrapper around a
/// lower-level library error.
use serde::Deserialize;
use std::fmt;
use thiserror::Error;

/// The `{"code": ..., "msg": ...}` shape Binance returns on a non-2xx
/// response body.
#[derive(Debug, Clone, Deserialize)]
pub struct VenueErrorBody {
    pub code: i64,
    pub msg: String,
}

impl fmt::Display for VenueErrorBody {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.msg)
    }
}

#[derive(Debug, Error)]
pub enum AdapterError {
    #[error("market not found: {0}")]
    MarketNotFound(String),

    #[error("ticker not found: {0}")]
    TickerNotFound(String),

    #[error("position not found for {symbol} on the opposite side")]
    PositionNotFound { symbol: String },

    #[error("scale too extreme: {0}")]
    ScaleInfeasible(String),

    #[error("venue error: {0}")]
    VenueError(VenueErrorBody),

    #[error("network error: {0}")]
    Network(String),

    #[error("failed to emit event, underlying: {underlying}")]
    ChannelSendError { underlying: String },

    #[error(transparent)]
    ReqError(#[from] reqwest::Error),

    #[error(transparent)]
    InvalidHeaderError(#[from] reqwest::header::InvalidHeaderValue),

    #[error(transparent)]
    IoError(#[from] std::io::Error),

    #[error(transparent)]
    ParseFloatError(#[from] std::num::ParseFloatError),

    #[error(transparent)]
    UrlParserError(#[from] url::ParseError),

    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Tungstenite(#[from] tokio_tungstenite::tungstenite::Error),

    #[error(transparent)]
    TimestampError(#[from] std::time::SystemTimeError),

    #[error("{0}")]
    Base(String),
}

impl From<String> for AdapterError {
    fn from(err: String) -> Self {
        AdapterError::Base(err)
    }
}

impl From<&str> for AdapterError {
    fn from(err: &str) -> Self {
        AdapterError::Base(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, AdapterError>;
