use std::collections::HashMap;
use std::sync::Arc;

use crate::catalog::Catalog;
use crate::models::{Balance, Order, Position, PositionDirection, Ticker};

/// Process-local mutable projection of the account: markets, tickers,
/// positions, balance, and open orders. Single-writer convention — only
/// the adapter's bootstrap/tick loop and the private stream hold `&mut`
/// access; every other consumer reads through a shared reference.
pub struct Store {
    markets: Arc<Catalog>,
    tickers: HashMap<String, Ticker>,
    positions: HashMap<(String, PositionDirection), Position>,
    balance: Balance,
    orders: HashMap<String, Order>,

    pub markets_loaded: bool,
    pub tickers_loaded: bool,
    pub orders_loaded: bool,
    pub hedge_mode: bool,
    pub latency_ms: Option<u64>,
}

impl Store {
    pub fn new(markets: Arc<Catalog>) -> Self {
        Store {
            markets,
            tickers: HashMap::new(),
            positions: HashMap::new(),
            balance: Balance::default(),
            orders: HashMap::new(),
            markets_loaded: false,
            tickers_loaded: false,
            orders_loaded: false,
            hedge_mode: false,
            latency_ms: None,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.markets
    }

    pub fn catalog_arc(&self) -> Arc<Catalog> {
        Arc::clone(&self.markets)
    }

    pub fn replace_catalog(&mut self, markets: Arc<Catalog>) {
        self.markets = markets;
    }

    pub fn ticker(&self, symbol: &str) -> Option<&Ticker> {
        self.tickers.get(symbol)
    }

    pub fn set_ticker(&mut self, symbol: String, ticker: Ticker) {
        self.tickers.insert(symbol, ticker);
    }

    pub fn position(&self, symbol: &str, side: PositionDirection) -> Option<&Position> {
        self.positions.get(&(symbol.to_string(), side))
    }

    pub fn set_position(&mut self, symbol: String, side: PositionDirection, position: Position) {
        self.positions.insert((symbol, side), position);
    }

    pub fn positions(&self) -> impl Iterator<Item = (&(String, PositionDirection), &Position)> {
        self.positions.iter()
    }

    /// Drops positions for symbols that no longer exist in the catalog,
    /// per the tick loop's position-filtering rule.
    pub fn prune_unknown_positions(&mut self) {
        let markets = &self.markets;
        self.positions
            .retain(|(symbol, _), _| markets.get(symbol).is_some());
    }

    pub fn balance(&self) -> &Balance {
        &self.balance
    }

    pub fn balance_mut(&mut self) -> &mut Balance {
        &mut self.balance
    }

    pub fn replace_balance(&mut self, balance: Balance) {
        self.balance = balance;
    }

    pub fn order(&self, client_id: &str) -> Option<&Order> {
        self.orders.get(client_id)
    }

    pub fn upsert_order(&mut self, order: Order) {
        self.orders.insert(order.id.clone(), order);
    }

    pub fn remove_order(&mut self, client_id: &str) -> Option<Order> {
        self.orders.remove(client_id)
    }

    /// Drops every tracked order for `symbol`, used after a symbol-wide
    /// cancel. Returns the removed orders' client-assigned ids.
    pub fn remove_orders_for_symbol(&mut self, symbol: &str) -> Vec<String> {
        let ids: Vec<String> = self
            .orders
            .values()
            .filter(|o| o.symbol == symbol)
            .map(|o| o.id.clone())
            .collect();
        for id in &ids {
            self.orders.remove(id);
        }
        ids
    }

    pub fn open_order_count(&self) -> usize {
        self.orders.len()
    }
}
