use crate::models::order::Side;

/// Derived fields emitted on the `fill` event whenever an
/// `ORDER_TRADE_UPDATE` reports `PARTIALLY_FILLED` or `FILLED`.
#[derive(Clone, Debug, PartialEq)]
pub struct FillRecord {
    pub symbol: String,
    pub client_order_id: String,
    pub side: Side,
    pub price: f64,
    pub realized_pnl: f64,
    pub amount: f64,
    pub reduce_only: bool,
    pub maker: bool,
    pub notional: f64,
    pub commission: Option<f64>,
}
