use crate::models::order::{OrderType, Side, TimeInForce};

/// A single, already-placed order's mutable fields, as addressed by an
/// `UpdateIntent`.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderUpdate {
    pub price: Option<f64>,
    pub amount: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SimpleIntent {
    pub symbol: String,
    pub kind: OrderType,
    pub side: Side,
    pub price: Option<f64>,
    pub amount: f64,
    pub time_in_force: Option<TimeInForce>,
    pub reduce_only: bool,
    pub stop_loss: Option<f64>,
    pub take_profit: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct SplitIntent {
    pub symbol: String,
    pub side: Side,
    pub kind: OrderType,
    pub amount: f64,
    pub orders: u32,
    pub from_price: f64,
    pub to_price: f64,
    pub from_scale: f64,
    pub to_scale: f64,
    pub auto_re_adjust: bool,
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdateIntent {
    pub order: String,
    pub update: OrderUpdate,
}

/// Input to the Order Formatter: any of the three intent shapes a caller
/// may submit.
#[derive(Clone, Debug, PartialEq)]
pub enum PlacementIntent {
    Simple(SimpleIntent),
    Split(SplitIntent),
    Update(UpdateIntent),
}
