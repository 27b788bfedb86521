use crate::errors::AdapterError;
use crate::models::{
    Market, OrderType, PayloadOrder, PositionDirection, PositionSide, Side, SimpleIntent,
    SplitIntent, TimeInForce,
};
use crate::store::Store;
use crate::util::{decimal_places, generate_random_uid, round_dp, snap_to_step};

/// Pure transform from a placement intent into one or more venue-shaped
/// payloads. Holds no state of its own; every lookup goes through the
/// `Store` passed to `format`.
pub struct Formatter;

impl Formatter {
    pub fn format(
        store: &Store,
        intent: &SimpleIntent,
        hedge_mode: bool,
    ) -> Result<Vec<PayloadOrder>, AdapterError> {
        if intent.kind == OrderType::TrailingStopLoss {
            return Self::format_trailing(store, intent, hedge_mode);
        }

        let market = store
            .catalog()
            .get(&intent.symbol)
            .ok_or_else(|| AdapterError::MarketNotFound(intent.symbol.clone()))?;

        let position_side = get_order_position_side(
            hedge_mode,
            intent.side,
            intent.kind,
            intent.reduce_only,
        );

        let amount = snap_to_step(intent.amount, market.precision.amount);
        let price = if matches!(
            intent.kind,
            OrderType::Limit | OrderType::StopLoss | OrderType::TakeProfit
        ) {
            intent.price.map(|p| snap_to_step(p, market.precision.price))
        } else {
            None
        };

        let mut payloads = Vec::new();
        let lots = split_into_lots(amount, market.limits.amount.max, market.precision.amount);
        for lot in lots {
            payloads.push(build_primary_payload(
                market,
                intent,
                position_side,
                lot,
                price,
            ));
        }

        if let Some(stop_loss) = intent.stop_loss {
            payloads.push(build_attached_stop(
                market,
                intent,
                position_side,
                OrderType::StopLoss,
                stop_loss,
            ));
        }
        if let Some(take_profit) = intent.take_profit {
            payloads.push(build_attached_stop(
                market,
                intent,
                position_side,
                OrderType::TakeProfit,
                take_profit,
            ));
        }

        for payload in &mut payloads {
            payload.client_order_id = new_client_order_id();
            payload.set("newClientOrderId", payload.client_order_id.clone());
        }

        Ok(payloads)
    }

    fn format_trailing(
        store: &Store,
        intent: &SimpleIntent,
        hedge_mode: bool,
    ) -> Result<Vec<PayloadOrder>, AdapterError> {
        let market = store
            .catalog()
            .get(&intent.symbol)
            .ok_or_else(|| AdapterError::MarketNotFound(intent.symbol.clone()))?;
        let ticker = store
            .ticker(&intent.symbol)
            .ok_or_else(|| AdapterError::TickerNotFound(intent.symbol.clone()))?;

        let position_side =
            get_order_position_side(hedge_mode, intent.side, intent.kind, intent.reduce_only);
        let opposite_direction = match position_side.flip() {
            PositionSide::Long => PositionDirection::Long,
            PositionSide::Short => PositionDirection::Short,
            PositionSide::Both => {
                return Err(AdapterError::PositionNotFound {
                    symbol: intent.symbol.clone(),
                })
            }
        };
        let position = store
            .position(&intent.symbol, opposite_direction)
            .ok_or_else(|| AdapterError::PositionNotFound {
                symbol: intent.symbol.clone(),
            })?;

        let target_price = intent
            .price
            .ok_or_else(|| AdapterError::TickerNotFound(intent.symbol.clone()))?;
        let price_distance = snap_to_step((ticker.last - target_price).abs(), market.precision.price);
        let callback_rate = round_dp(price_distance * 100.0 / ticker.last, 1);

        let mut payload = PayloadOrder::new(String::new());
        payload
            .set("symbol", &market.symbol)
            .set("side", venue_side(intent.side))
            .set("type", "TRAILING_STOP_MARKET")
            .set("quantity", position.contracts)
            .set("callbackRate", callback_rate)
            .set("priceProtect", true)
            .set("positionSide", position_side.as_venue_str());

        payload.client_order_id = new_client_order_id();
        payload.set("newClientOrderId", payload.client_order_id.clone());

        Ok(vec![payload])
    }

    pub fn format_split(
        store: &Store,
        intent: &SplitIntent,
    ) -> Result<Vec<PayloadOrder>, AdapterError> {
        let market = store
            .catalog()
            .get(&intent.symbol)
            .ok_or_else(|| AdapterError::MarketNotFound(intent.symbol.clone()))?;

        let avg_price = (intent.from_price + intent.to_price) / 2.0;
        let total_qty = intent.amount / avg_price;

        let feasible_n = find_feasible_order_count(intent, market, total_qty)?;

        let price_step = if feasible_n > 1 {
            (intent.to_price - intent.from_price) / (feasible_n as f64 - 1.0)
        } else {
            0.0
        };
        let weight_sum = weight_sum(intent.from_scale, intent.to_scale, feasible_n);

        let mut payloads = Vec::with_capacity(feasible_n as usize);
        for i in 0..feasible_n {
            let weight = rung_weight(intent.from_scale, intent.to_scale, feasible_n, i);
            let mut size = total_qty * weight / weight_sum;
            let price = intent.from_price + price_step * i as f64;

            if size * price < 1.05 * market.limits.min_notional {
                size = 1.1 * market.limits.min_notional / price;
            }

            let size = snap_to_step(size, market.precision.amount);
            let price = snap_to_step(price, market.precision.price);

            let mut payload = PayloadOrder::new(String::new());
            payload
                .set("symbol", &market.symbol)
                .set("side", venue_side(intent.side))
                .set("type", venue_order_type(intent.kind))
                .set("quantity", size)
                .set("price", price)
                .set("timeInForce", "GTC")
                .set("reduceOnly", false);
            payload.client_order_id = new_client_order_id();
            payload.set("newClientOrderId", payload.client_order_id.clone());
            payloads.push(payload);
        }

        Ok(payloads)
    }
}

/// Searches for the largest `N' <= N` whose smallest rung clears both the
/// minimum size and minimum notional, per the split intent's auto-readjust
/// rule. Returns the original `N` untouched when already feasible.
fn find_feasible_order_count(
    intent: &SplitIntent,
    market: &Market,
    total_qty: f64,
) -> Result<u32, AdapterError> {
    let mut n = intent.orders;
    loop {
        let w = weight_sum(intent.from_scale, intent.to_scale, n);
        let lowest_size = (intent.from_scale / w) * total_qty;
        let feasible = lowest_size >= market.limits.amount.min
            && lowest_size * intent.from_price >= market.limits.min_notional;

        if feasible {
            return Ok(n);
        }
        if !intent.auto_re_adjust {
            return Err(AdapterError::ScaleInfeasible("scale too extreme".into()));
        }
        if n <= 3 {
            return Err(AdapterError::ScaleInfeasible("cannot split".into()));
        }
        n -= 1;
    }
}

fn weight_sum(from_scale: f64, to_scale: f64, n: u32) -> f64 {
    if (from_scale - to_scale).abs() < f64::EPSILON {
        return from_scale * n as f64;
    }
    (0..n)
        .map(|i| rung_weight(from_scale, to_scale, n, i))
        .sum()
}

fn rung_weight(from_scale: f64, to_scale: f64, n: u32, i: u32) -> f64 {
    if n <= 1 {
        return from_scale;
    }
    from_scale + (to_scale - from_scale) * (i as f64) / (n as f64 - 1.0)
}

/// `getOrderPositionSide`: `"BOTH"` outside hedge mode; inside hedge mode,
/// `Buy` maps to `LONG` and `Sell` to `SHORT`, then flips for any
/// reduce-only intent or any stop/take-profit/trailing order.
pub fn get_order_position_side(
    hedge_mode: bool,
    side: Side,
    kind: OrderType,
    reduce_only: bool,
) -> PositionSide {
    if !hedge_mode {
        return PositionSide::Both;
    }
    let base = match side {
        Side::Buy => PositionSide::Long,
        Side::Sell => PositionSide::Short,
    };
    let closing = reduce_only
        || matches!(
            kind,
            OrderType::StopLoss | OrderType::TakeProfit | OrderType::TrailingStopLoss
        );
    if closing {
        base.flip()
    } else {
        base
    }
}

/// Splits `amount` into `ceil(amount/max)` equal lots snapped to the step
/// size, plus one remainder lot carrying whatever is left over. Returns a
/// single-element vec when `amount` already fits under `max`.
fn split_into_lots(amount: f64, max: f64, step: f64) -> Vec<f64> {
    if amount <= max {
        return vec![amount];
    }
    let n = (amount / max).ceil() as u32;
    let lot = snap_to_step(amount / n as f64, step);
    let mut lots = vec![lot; n as usize];
    let remainder = round_dp(amount - lot * n as f64, decimal_places(step));
    if remainder > 0.0 {
        lots.push(remainder);
    }
    lots
}

fn build_primary_payload(
    market: &Market,
    intent: &SimpleIntent,
    position_side: PositionSide,
    amount: f64,
    price: Option<f64>,
) -> PayloadOrder {
    let mut payload = PayloadOrder::new(String::new());
    payload
        .set("symbol", &market.symbol)
        .set("side", venue_side(intent.side))
        .set("type", venue_order_type(intent.kind))
        .set("quantity", amount)
        .set("positionSide", position_side.as_venue_str());

    match intent.kind {
        OrderType::StopLoss | OrderType::TakeProfit => {
            if let Some(price) = price {
                payload.set("stopPrice", price);
            }
            payload.set("closePosition", true);
        }
        _ => {
            if let Some(price) = price {
                payload.set("price", price);
            }
            if intent.kind == OrderType::Limit {
                let tif = intent.time_in_force.unwrap_or(TimeInForce::GoodTillCancel);
                payload.set("timeInForce", venue_time_in_force(tif));
            }
            payload.set("reduceOnly", intent.reduce_only);
        }
    }
    payload
}

fn build_attached_stop(
    market: &Market,
    intent: &SimpleIntent,
    position_side: PositionSide,
    kind: OrderType,
    stop_price: f64,
) -> PayloadOrder {
    let stop_price = snap_to_step(stop_price, market.precision.price);
    let mut payload = PayloadOrder::new(String::new());
    payload
        .set("symbol", &market.symbol)
        .set("side", venue_side(intent.side.opposite()))
        .set("type", venue_order_type(kind))
        .set("stopPrice", stop_price)
        .set("closePosition", true)
        .set("positionSide", position_side.flip().as_venue_str());
    payload
}

fn new_client_order_id() -> String {
    format!("adapter-{}", generate_random_uid(20))
}

fn venue_side(side: Side) -> &'static str {
    match side {
        Side::Buy => "BUY",
        Side::Sell => "SELL",
    }
}

fn venue_order_type(kind: OrderType) -> &'static str {
    match kind {
        OrderType::Market => "MARKET",
        OrderType::Limit => "LIMIT",
        OrderType::StopLoss => "STOP_MARKET",
        OrderType::TakeProfit => "TAKE_PROFIT_MARKET",
        OrderType::TrailingStopLoss => "TRAILING_STOP_MARKET",
    }
}

fn venue_time_in_force(tif: TimeInForce) -> &'static str {
    match tif {
        TimeInForce::GoodTillCancel => "GTC",
        TimeInForce::ImmediateOrCancel => "IOC",
        TimeInForce::FillOrKill => "FOK",
        TimeInForce::GoodTillCrossing => "GTX",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;
    use crate::models::{AmountLimits, LeverageLimits, Limits, Precision};
    use std::sync::Arc;

    fn market(symbol: &str, max: f64, step: f64, min_notional: f64) -> Market {
        Market {
            id: format!("{symbol}:USDT"),
            symbol: symbol.into(),
            base: symbol.trim_end_matches("USDT").into(),
            quote: "USDT".into(),
            active: true,
            precision: Precision {
                amount: step,
                price: 0.1,
            },
            limits: Limits {
                amount: AmountLimits { min: 0.001, max },
                min_notional,
                leverage: LeverageLimits { min: 1, max: 20 },
            },
            contract_size: 1.0,
        }
    }

    fn store_with(market: Market) -> Store {
        let mut map = std::collections::HashMap::new();
        map.insert(market.id.clone(), market);
        Store::new(Arc::new(Catalog::from_markets(map)))
    }

    #[test]
    fn lot_splitting_matches_boundary_scenario() {
        let lots = split_into_lots(250.35, 100.0, 0.1);
        assert_eq!(lots.len(), 4);
        assert_eq!(&lots[0..3], &[83.4, 83.4, 83.4]);
        assert!((lots[3] - 0.15).abs() < 1e-9);
    }

    #[test]
    fn position_side_flips_for_reduce_only_in_hedge_mode() {
        let side = get_order_position_side(true, Side::Buy, OrderType::Limit, true);
        assert_eq!(side, PositionSide::Short);
    }

    #[test]
    fn position_side_is_both_outside_hedge_mode() {
        let side = get_order_position_side(false, Side::Sell, OrderType::Market, false);
        assert_eq!(side, PositionSide::Both);
    }

    #[test]
    fn split_order_trivial_feasible_matches_boundary_scenario() {
        let intent = SplitIntent {
            symbol: "BTCUSDT".into(),
            side: Side::Buy,
            kind: OrderType::Limit,
            amount: 100.0,
            orders: 5,
            from_price: 100.0,
            to_price: 110.0,
            from_scale: 1.0,
            to_scale: 1.0,
            auto_re_adjust: false,
        };
        let market = market("BTCUSDT", 1000.0, 0.001, 5.0);
        let store = store_with(market);
        let payloads = Formatter::format_split(&store, &intent).unwrap();
        assert_eq!(payloads.len(), 5);
        let prices: Vec<&str> = payloads
            .iter()
            .map(|p| p.fields.get("price").unwrap().as_str())
            .collect();
        assert_eq!(prices, vec!["100", "102.5", "105", "107.5", "110"]);
    }

    #[test]
    fn hedge_mode_limit_with_attached_stop_flips_the_stops_position_side() {
        let intent = SimpleIntent {
            symbol: "BTCUSDT".into(),
            side: Side::Buy,
            kind: OrderType::Limit,
            amount: 0.12345,
            price: Some(50000.07),
            reduce_only: false,
            time_in_force: None,
            stop_loss: Some(49000.03),
            take_profit: None,
        };
        let market = market("BTCUSDT", 1000.0, 0.001, 5.0);
        let store = store_with(market);
        let payloads = Formatter::format(&store, &intent, true).unwrap();

        assert_eq!(payloads.len(), 2);
        let entry = &payloads[0];
        assert_eq!(entry.fields.get("positionSide").unwrap(), "LONG");
        assert_eq!(entry.fields.get("side").unwrap(), "BUY");
        assert_eq!(entry.fields.get("quantity").unwrap(), "0.123");
        assert_eq!(entry.fields.get("price").unwrap(), "50000");

        let stop = &payloads[1];
        assert_eq!(stop.fields.get("positionSide").unwrap(), "SHORT");
        assert_eq!(stop.fields.get("side").unwrap(), "SELL");
        assert_eq!(stop.fields.get("type").unwrap(), "STOP_MARKET");
        assert_eq!(stop.fields.get("closePosition").unwrap(), "true");
        assert_eq!(stop.fields.get("stopPrice").unwrap(), "49000");

        assert_ne!(entry.client_order_id, stop.client_order_id);
    }

    #[test]
    fn split_auto_readjust_fails_below_three_rungs() {
        let intent = SplitIntent {
            symbol: "BTCUSDT".into(),
            side: Side::Buy,
            kind: OrderType::Limit,
            amount: 12.0,
            orders: 10,
            from_price: 100.0,
            to_price: 110.0,
            from_scale: 1.0,
            to_scale: 20.0,
            auto_re_adjust: true,
        };
        let market = market("BTCUSDT", 1000.0, 0.001, 5.0);
        let store = store_with(market);
        let result = Formatter::format_split(&store, &intent);
        assert!(matches!(result, Err(AdapterError::ScaleInfeasible(_))));
    }
}
