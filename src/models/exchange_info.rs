use serde::Deserialize;

/// `GET /fapi/v1/exchangeInfo` response, trimmed to the fields the Market
/// Catalog consumes.
#[derive(Clone, Debug, Deserialize)]
pub struct ExchangeInfoResponse {
    pub symbols: Vec<SymbolInfo>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct SymbolInfo {
    pub symbol: String,
    #[serde(rename = "baseAsset")]
    pub base_asset: String,
    #[serde(rename = "quoteAsset")]
    pub quote_asset: String,
    #[serde(rename = "marginAsset")]
    pub margin_asset: String,
    #[serde(rename = "contractType")]
    pub contract_type: String,
    pub status: String,
    pub filters: Vec<SymbolFilter>,
}

#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "filterType")]
pub enum SymbolFilter {
    #[serde(rename = "PRICE_FILTER")]
    PriceFilter {
        #[serde(rename = "tickSize", with = "crate::serde_helpers::string_to_float")]
        tick_size: f64,
    },
    #[serde(rename = "LOT_SIZE")]
    LotSize {
        #[serde(rename = "minQty", with = "crate::serde_helpers::string_to_float")]
        min_qty: f64,
        #[serde(rename = "maxQty", with = "crate::serde_helpers::string_to_float")]
        max_qty: f64,
        #[serde(rename = "stepSize", with = "crate::serde_helpers::string_to_float")]
        step_size: f64,
    },
    #[serde(rename = "MIN_NOTIONAL")]
    MinNotional {
        #[serde(with = "crate::serde_helpers::string_to_float")]
        notional: f64,
    },
    #[serde(other)]
    Unknown,
}

/// One row of `GET /fapi/v1/leverageBracket`.
#[derive(Clone, Debug, Deserialize)]
pub struct LeverageBracketEntry {
    pub symbol: String,
    pub brackets: Vec<LeverageBracket>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct LeverageBracket {
    #[serde(rename = "initialLeverage")]
    pub initial_leverage: u32,
}
