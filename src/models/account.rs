use serde::Deserialize;

/// `GET /fapi/v2/account` response, trimmed to what the tick loop needs:
/// wallet assets and live positions in one call.
#[derive(Clone, Debug, Deserialize)]
pub struct AccountInfoResponse {
    pub assets: Vec<AccountAssetEntry>,
    pub positions: Vec<AccountPositionEntry>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccountAssetEntry {
    pub asset: String,
    #[serde(rename = "walletBalance", with = "crate::serde_helpers::string_to_float")]
    pub wallet_balance: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccountPositionEntry {
    pub symbol: String,
    #[serde(rename = "positionAmt", with = "crate::serde_helpers::string_to_float")]
    pub position_amt: f64,
    #[serde(rename = "entryPrice", with = "crate::serde_helpers::string_to_float")]
    pub entry_price: f64,
    #[serde(rename = "unrealizedProfit", with = "crate::serde_helpers::string_to_float")]
    pub unrealized_profit: f64,
    #[serde(with = "crate::serde_helpers::string_to_u64")]
    pub leverage: u64,
    #[serde(rename = "liquidationPrice", with = "crate::serde_helpers::string_to_float")]
    pub liquidation_price: f64,
    #[serde(rename = "positionSide")]
    pub position_side: String,
}

/// `GET /fapi/v1/positionSide/dual` response.
#[derive(Clone, Debug, Deserialize)]
pub struct PositionModeResponse {
    #[serde(rename = "dualSidePosition")]
    pub dual_side_position: bool,
}

/// One row of `GET /fapi/v1/openOrders`.
#[derive(Clone, Debug, Deserialize)]
pub struct OpenOrderEntry {
    pub symbol: String,
    #[serde(rename = "clientOrderId")]
    pub client_order_id: String,
    #[serde(with = "crate::serde_helpers::string_to_float")]
    pub price: f64,
    #[serde(rename = "stopPrice", with = "crate::serde_helpers::string_to_float")]
    pub stop_price: f64,
    #[serde(rename = "origQty", with = "crate::serde_helpers::string_to_float")]
    pub orig_qty: f64,
    #[serde(rename = "executedQty", with = "crate::serde_helpers::string_to_float")]
    pub executed_qty: f64,
    pub status: String,
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(rename = "reduceOnly")]
    pub reduce_only: bool,
}
