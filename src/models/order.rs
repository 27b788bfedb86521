/// Lifecycle state of a stored order, derived from `ORDER_TRADE_UPDATE`'s
/// `X` field. Closed/Canceled orders are removed from the store rather than
/// retained in a terminal state — see the stream's event handling.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderStatus {
    Open,
    Closed,
    Canceled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OrderType {
    Market,
    Limit,
    StopLoss,
    TakeProfit,
    TrailingStopLoss,
}

impl OrderType {
    /// Decodes the venue's `o`/`type` order-type string. Unrecognized values
    /// fall back to `Limit`, the venue's own default order type.
    pub fn from_venue_str(kind: &str) -> OrderType {
        match kind {
            "MARKET" => OrderType::Market,
            "STOP" | "STOP_MARKET" => OrderType::StopLoss,
            "TAKE_PROFIT" | "TAKE_PROFIT_MARKET" => OrderType::TakeProfit,
            "TRAILING_STOP_MARKET" => OrderType::TrailingStopLoss,
            _ => OrderType::Limit,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Side {
        match self {
            Side::Buy => Side::Sell,
            Side::Sell => Side::Buy,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimeInForce {
    GoodTillCancel,
    ImmediateOrCancel,
    FillOrKill,
    GoodTillCrossing,
}

/// Hedge-mode position side a payload is assigned to. `"BOTH"` when the
/// account is not hedged.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PositionSide {
    Both,
    Long,
    Short,
}

impl PositionSide {
    pub fn as_venue_str(self) -> &'static str {
        match self {
            PositionSide::Both => "BOTH",
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
        }
    }

    pub fn flip(self) -> PositionSide {
        match self {
            PositionSide::Both => PositionSide::Both,
            PositionSide::Long => PositionSide::Short,
            PositionSide::Short => PositionSide::Long,
        }
    }
}

/// A single tracked order, keyed in the Store by its client-assigned `id`.
#[derive(Clone, Debug, PartialEq)]
pub struct Order {
    pub id: String,
    pub order_id: u64,
    pub status: OrderStatus,
    pub symbol: String,
    pub kind: OrderType,
    pub side: Side,
    pub price: f64,
    pub amount: f64,
    pub filled: f64,
    pub remaining: f64,
    pub reduce_only: bool,
}
