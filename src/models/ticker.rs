/// Current market snapshot for one symbol. Populated at bootstrap and kept
/// current by the public stream, which lives outside this crate.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Ticker {
    pub bid: f64,
    pub ask: f64,
    pub last: f64,
    pub mark: f64,
    pub index: f64,
    pub percentage: f64,
    pub funding_rate: f64,
    pub volume: f64,
    pub quote_volume: f64,
    /// `0.0` when the venue omits open interest from the feed.
    pub open_interest: f64,
    /// Epoch millis of the last update; used for staleness logging only.
    pub timestamp: u64,
}

use serde::Deserialize;

/// One row of `GET /fapi/v1/ticker/24hr`.
#[derive(Clone, Debug, Deserialize)]
pub struct Ticker24hEntry {
    pub symbol: String,
    #[serde(rename = "lastPrice", with = "crate::serde_helpers::string_to_float")]
    pub last_price: f64,
    #[serde(rename = "priceChangePercent", with = "crate::serde_helpers::string_to_float")]
    pub price_change_percent: f64,
    #[serde(with = "crate::serde_helpers::string_to_float")]
    pub volume: f64,
    #[serde(rename = "quoteVolume", with = "crate::serde_helpers::string_to_float")]
    pub quote_volume: f64,
}

/// One row of `GET /fapi/v1/ticker/bookTicker`.
#[derive(Clone, Debug, Deserialize)]
pub struct BookTickerEntry {
    pub symbol: String,
    #[serde(rename = "bidPrice", with = "crate::serde_helpers::string_to_float")]
    pub bid_price: f64,
    #[serde(rename = "askPrice", with = "crate::serde_helpers::string_to_float")]
    pub ask_price: f64,
}

/// One row of `GET /fapi/v1/premiumIndex`: mark price, index price, and the
/// last funding rate, refreshed alongside the other tickers at bootstrap.
#[derive(Clone, Debug, Deserialize)]
pub struct PremiumIndexEntry {
    pub symbol: String,
    #[serde(rename = "markPrice", with = "crate::serde_helpers::string_to_float")]
    pub mark_price: f64,
    #[serde(rename = "indexPrice", with = "crate::serde_helpers::string_to_float")]
    pub index_price: f64,
    #[serde(rename = "lastFundingRate", with = "crate::serde_helpers::string_to_float")]
    pub last_funding_rate: f64,
}
