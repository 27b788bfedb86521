use serde::Deserialize;

/// `POST /fapi/v1/listenKey` response.
#[derive(Clone, Debug, Deserialize)]
pub struct ListenKeyResponse {
    #[serde(rename = "listenKey")]
    pub listen_key: String,
}

/// Every inbound user-data-stream message this crate understands. Anything
/// else deserializes into `Unknown` and is dropped without ceremony —
/// decode failures are never propagated per the stream's robustness
/// requirement.
#[derive(Clone, Debug, Deserialize)]
#[serde(tag = "e")]
pub enum UserStreamEvent {
    #[serde(rename = "ACCOUNT_UPDATE")]
    AccountUpdate(AccountUpdateEvent),
    #[serde(rename = "ORDER_TRADE_UPDATE")]
    OrderTradeUpdate(OrderTradeUpdateEvent),
    #[serde(other)]
    Unknown,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccountUpdateEvent {
    #[serde(rename = "a")]
    pub update: AccountUpdateData,
}

#[derive(Clone, Debug, Deserialize)]
pub struct AccountUpdateData {
    #[serde(rename = "B")]
    pub balances: Vec<VenueBalance>,
    #[serde(rename = "P")]
    pub positions: Vec<VenuePosition>,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VenueBalance {
    #[serde(rename = "a")]
    pub asset: String,
    #[serde(rename = "wb", with = "crate::serde_helpers::string_to_float")]
    pub wallet_balance: f64,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VenuePosition {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "pa", with = "crate::serde_helpers::string_to_float")]
    pub position_amount: f64,
    #[serde(rename = "ep", with = "crate::serde_helpers::string_to_float")]
    pub entry_price: f64,
    #[serde(rename = "up", with = "crate::serde_helpers::string_to_float")]
    pub unrealized_pnl: f64,
    #[serde(rename = "ps")]
    pub position_side: String,
}

#[derive(Clone, Debug, Deserialize)]
pub struct OrderTradeUpdateEvent {
    #[serde(rename = "o")]
    pub order: VenueOrderTradeUpdate,
}

#[derive(Clone, Debug, Deserialize)]
pub struct VenueOrderTradeUpdate {
    #[serde(rename = "s")]
    pub symbol: String,
    #[serde(rename = "c")]
    pub client_order_id: String,
    #[serde(rename = "S")]
    pub side: String,
    #[serde(rename = "X")]
    pub order_status: String,
    #[serde(rename = "o")]
    pub order_type: String,
    #[serde(rename = "p", with = "crate::serde_helpers::string_to_float")]
    pub price: f64,
    #[serde(rename = "sp", with = "crate::serde_helpers::string_to_float")]
    pub stop_price: f64,
    #[serde(rename = "q", with = "crate::serde_helpers::string_to_float")]
    pub orig_qty: f64,
    #[serde(rename = "ap", with = "crate::serde_helpers::string_to_float")]
    pub average_price: f64,
    #[serde(rename = "l", with = "crate::serde_helpers::string_to_float")]
    pub last_filled_qty: f64,
    #[serde(rename = "rp", with = "crate::serde_helpers::string_to_float")]
    pub realized_pnl: f64,
    #[serde(rename = "R")]
    pub reduce_only: bool,
    #[serde(rename = "m")]
    pub is_maker: bool,
    #[serde(
        rename = "n",
        default,
        with = "crate::serde_helpers::string_to_float_optional"
    )]
    pub commission: Option<f64>,
}
