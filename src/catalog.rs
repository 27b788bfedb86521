use std::collections::HashMap;

use crate::errors::Result;
use crate::models::{
    AmountLimits, ExchangeInfoResponse, LeverageBracketEntry, LeverageLimits, Limits, Market,
    MarketTable, Precision, SymbolFilter,
};

/// Symbols the venue has delisted; bootstrap must never admit these into
/// the catalog even if `exchangeInfo` still lists them as trading.
pub const DELISTED_SYMBOLS: &[&str] = &[
    "BTSUSDT",
    "TOMOUSDT",
    "SCUSDT",
    "HNTUSDT",
    "SRMUSDT",
    "FTTUSDT",
    "RAYUSDT",
    "CVCUSDT",
    "COCOSUSDT",
    "STRAXUSDT",
    "DGBUSDT",
    "CTKUSDT",
    "ANTUSDT",
];

/// Immutable per-symbol contract metadata. Built once at bootstrap and
/// swapped wholesale on re-catalog; never mutated in place.
#[derive(Clone, Debug, Default)]
pub struct Catalog {
    markets: MarketTable,
}

impl Catalog {
    pub fn from_exchange_info(raw: &ExchangeInfoResponse) -> Result<Catalog> {
        let mut markets = HashMap::with_capacity(raw.symbols.len());
        for info in &raw.symbols {
            if info.contract_type != "PERPETUAL" || info.margin_asset != "USDT" {
                continue;
            }
            if DELISTED_SYMBOLS.contains(&info.symbol.as_str()) {
                continue;
            }

            let mut amount_step = 0.0;
            let mut amount_min = 0.0;
            let mut amount_max = 0.0;
            let mut price_step = 0.0;
            let mut min_notional = 0.0;
            for filter in &info.filters {
                match filter {
                    SymbolFilter::PriceFilter { tick_size } => price_step = *tick_size,
                    SymbolFilter::LotSize {
                        min_qty,
                        max_qty,
                        step_size,
                    } => {
                        amount_min = *min_qty;
                        amount_max = *max_qty;
                        amount_step = *step_size;
                    }
                    SymbolFilter::MinNotional { notional } => min_notional = *notional,
                    SymbolFilter::Unknown => {}
                }
            }

            let id = Market::composite_id(&info.base_asset, &info.quote_asset, &info.margin_asset);
            let market = Market {
                id: id.clone(),
                symbol: info.symbol.clone(),
                base: info.base_asset.clone(),
                quote: info.quote_asset.clone(),
                active: info.status == "TRADING",
                precision: Precision {
                    amount: amount_step,
                    price: price_step,
                },
                limits: Limits {
                    amount: AmountLimits {
                        min: amount_min,
                        max: amount_max,
                    },
                    min_notional,
                    leverage: LeverageLimits { min: 1, max: 1 },
                },
                contract_size: 1.0,
            };
            markets.insert(id, market);
        }
        Ok(Catalog { markets })
    }

    /// Refines `limits.leverage` for every already-loaded market using the
    /// highest bracket's `initialLeverage` as the ceiling.
    pub fn apply_leverage_brackets(&mut self, brackets: &[LeverageBracketEntry]) {
        for entry in brackets {
            let Some(market) = self
                .markets
                .values_mut()
                .find(|m| m.symbol == entry.symbol)
            else {
                continue;
            };
            let max_leverage = entry
                .brackets
                .iter()
                .map(|b| b.initial_leverage)
                .max()
                .unwrap_or(market.limits.leverage.max);
            market.limits.leverage.max = max_leverage;
        }
    }

    pub fn get(&self, symbol_or_id: &str) -> Option<&Market> {
        self.markets
            .get(symbol_or_id)
            .or_else(|| self.markets.values().find(|m| m.symbol == symbol_or_id))
    }

    pub fn len(&self) -> usize {
        self.markets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.markets.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Market> {
        self.markets.values()
    }

    #[cfg(test)]
    pub fn from_markets(markets: MarketTable) -> Catalog {
        Catalog { markets }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::SymbolInfo;

    fn sample_info() -> ExchangeInfoResponse {
        ExchangeInfoResponse {
            symbols: vec![
                SymbolInfo {
                    symbol: "BTCUSDT".into(),
                    base_asset: "BTC".into(),
                    quote_asset: "USDT".into(),
                    margin_asset: "USDT".into(),
                    contract_type: "PERPETUAL".into(),
                    status: "TRADING".into(),
                    filters: vec![
                        SymbolFilter::PriceFilter { tick_size: 0.1 },
                        SymbolFilter::LotSize {
                            min_qty: 0.001,
                            max_qty: 1000.0,
                            step_size: 0.001,
                        },
                        SymbolFilter::MinNotional { notional: 5.0 },
                    ],
                },
                SymbolInfo {
                    symbol: "BTSUSDT".into(),
                    base_asset: "BTS".into(),
                    quote_asset: "USDT".into(),
                    margin_asset: "USDT".into(),
                    contract_type: "PERPETUAL".into(),
                    status: "TRADING".into(),
                    filters: vec![],
                },
            ],
        }
    }

    #[test]
    fn filters_delisted_and_non_perpetual_symbols() {
        let catalog = Catalog::from_exchange_info(&sample_info()).unwrap();
        assert_eq!(catalog.len(), 1);
        assert!(catalog.get("BTCUSDT").is_some());
        assert!(catalog.get("BTSUSDT").is_none());
    }
}
