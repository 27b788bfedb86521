use std::collections::HashMap;

/// Step sizes, not decimal-place counts: `amount` and `price` are the
/// smallest increment the venue accepts for quantity and price respectively.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Precision {
    pub amount: f64,
    pub price: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct AmountLimits {
    pub min: f64,
    pub max: f64,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct LeverageLimits {
    pub min: u32,
    pub max: u32,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Limits {
    pub amount: AmountLimits,
    pub min_notional: f64,
    pub leverage: LeverageLimits,
}

/// Immutable per-symbol contract metadata, loaded once at bootstrap and
/// never mutated in place; a re-catalog builds a fresh `Market` and swaps
/// the whole entry.
#[derive(Clone, Debug, PartialEq)]
pub struct Market {
    /// Composite "base/quote:margin" identifier, e.g. `"BTC/USDT:USDT"`.
    pub id: String,
    pub symbol: String,
    pub base: String,
    pub quote: String,
    pub active: bool,
    pub precision: Precision,
    pub limits: Limits,
    /// Always `1.0` for USDⓈ-M perpetuals; kept for forward compatibility
    /// with COIN-M contracts, unused by any operation in this crate.
    pub contract_size: f64,
}

impl Market {
    pub fn composite_id(base: &str, quote: &str, margin: &str) -> String {
        format!("{base}/{quote}:{margin}")
    }
}

/// Keyed by `Market.id`. Built once by `Catalog::from_exchange_info` and
/// held behind an `Arc` by the Store.
pub type MarketTable = HashMap<String, Market>;
