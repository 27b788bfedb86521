use crate::models::order::PositionSide as HedgeSide;

/// One side of one symbol's position. `contracts` is always non-negative;
/// direction lives entirely in `side`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Position {
    pub side: PositionDirection,
    pub entry_price: f64,
    pub contracts: f64,
    pub notional: f64,
    pub leverage: u32,
    pub unrealized_pnl: f64,
    pub liquidation_price: f64,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PositionDirection {
    Long,
    Short,
}

impl PositionDirection {
    /// Decodes the venue's hedge-mode `ps` field (`LONG`/`SHORT`). Returns
    /// `None` for `"BOTH"`, one-way mode's value, since that case carries
    /// no direction of its own — use `from_account_update` when the slot's
    /// position amount is also available.
    pub fn from_venue_str(ps: &str) -> Option<PositionDirection> {
        match ps {
            "LONG" => Some(PositionDirection::Long),
            "SHORT" => Some(PositionDirection::Short),
            _ => None,
        }
    }

    /// Decodes an `ACCOUNT_UPDATE` position slot's direction: hedge mode
    /// carries it directly in `ps`; one-way mode sends `ps: "BOTH"` and
    /// encodes direction in the sign of the position amount instead.
    pub fn from_account_update(ps: &str, position_amount: f64) -> PositionDirection {
        Self::from_venue_str(ps).unwrap_or(if position_amount >= 0.0 {
            PositionDirection::Long
        } else {
            PositionDirection::Short
        })
    }
}

impl From<PositionDirection> for HedgeSide {
    fn from(side: PositionDirection) -> Self {
        match side {
            PositionDirection::Long => HedgeSide::Long,
            PositionDirection::Short => HedgeSide::Short,
        }
    }
}

impl Position {
    pub fn recompute_notional(&mut self) {
        self.notional = (self.contracts * self.entry_price + self.unrealized_pnl).abs();
    }
}
