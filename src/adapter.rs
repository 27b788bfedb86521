use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use log::{info, warn};
use parking_lot::Mutex as SyncMutex;

use crate::api::{AccountRoute, MarketRoute, TradeRoute, API};
use crate::catalog::Catalog;
use crate::client::{Client, RateLimitedClient};
use crate::config::Config;
use crate::errors::Result;
use crate::events::{AdapterEvent, EventEmitter};
use crate::models::{
    AccountInfoResponse, AssetBalance, Balance, BookTickerEntry, ExchangeInfoResponse,
    LeverageBracketEntry, OpenOrderEntry, Order, OrderStatus, OrderType, Position,
    PositionDirection, PositionModeResponse, PremiumIndexEntry, Side, Ticker, Ticker24hEntry,
};
use crate::store::Store;
use crate::stream::PrivateStream;
use crate::util::get_timestamp;

const NON_CONVERTIBLE_ASSETS: &[&str] = &["USDC", "USDT", "FDUSD"];

/// Owns the Store, drives startup sequencing, and runs the periodic
/// balance/position refresh. The private stream is handed its own `Store`
/// and `EventEmitter` handles rather than a back-reference to this struct.
pub struct Adapter {
    store: Arc<SyncMutex<Store>>,
    events: EventEmitter,
    rate_limited: Arc<RateLimitedClient>,
    unlimited: Client,
    stream: Arc<PrivateStream>,
    config: Config,
    is_disposed: Arc<AtomicBool>,
}

impl Adapter {
    pub fn new(api_key: Option<String>, secret_key: Option<String>, config: Config) -> Arc<Self> {
        let rest_client = Client::new(
            api_key.clone(),
            secret_key.clone(),
            config.rest_api_endpoint.to_string(),
        );
        let rate_limited = Arc::new(RateLimitedClient::new(rest_client.clone(), 3));
        let stream = Arc::new(PrivateStream::new(
            Client::new(api_key, secret_key, config.rest_api_endpoint.to_string()),
            config.ws_endpoint,
        ));
        Arc::new(Adapter {
            store: Arc::new(SyncMutex::new(Store::new(Arc::new(Catalog::default())))),
            events: EventEmitter::default(),
            rate_limited,
            unlimited: rest_client,
            stream,
            config,
            is_disposed: Arc::new(AtomicBool::new(false)),
        })
    }

    pub fn store(&self) -> Arc<SyncMutex<Store>> {
        Arc::clone(&self.store)
    }

    pub fn events(&self) -> EventEmitter {
        self.events.clone()
    }

    pub fn unlimited_client(&self) -> &Client {
        &self.unlimited
    }

    pub fn dispose(&self) {
        self.is_disposed.store(true, Ordering::SeqCst);
        self.stream.dispose();
    }

    fn is_disposed(&self) -> bool {
        self.is_disposed.load(Ordering::SeqCst)
    }

    /// Startup sequencing: load markets, load tickers, connect the private
    /// stream, query position mode, enter the tick loop, then load open
    /// orders. Aborts cleanly the moment disposal is observed between steps.
    pub async fn bootstrap(self: &Arc<Self>) -> Result<()> {
        self.load_markets().await?;
        if self.is_disposed() {
            return Ok(());
        }

        self.load_tickers().await?;
        if self.is_disposed() {
            return Ok(());
        }

        let stream_store = Arc::clone(&self.store);
        let stream_events = self.events.clone();
        let stream = Arc::clone(&self.stream);
        tokio::spawn(async move {
            if let Err(e) = stream.run(stream_store, stream_events.clone()).await {
                stream_events.emit(AdapterEvent::Error(e.to_string()));
            }
        });
        if self.is_disposed() {
            return Ok(());
        }

        self.query_position_mode().await?;
        if self.is_disposed() {
            return Ok(());
        }

        let tick_adapter = Arc::clone(self);
        tokio::spawn(async move { tick_adapter.tick_loop().await });

        self.load_open_orders().await?;
        Ok(())
    }

    async fn load_markets(&self) -> Result<()> {
        let info: ExchangeInfoResponse = self
            .rate_limited
            .get(API::Market(MarketRoute::ExchangeInfo), None)
            .await?;
        let mut catalog = Catalog::from_exchange_info(&info)?;

        let brackets: std::result::Result<Vec<LeverageBracketEntry>, _> = self
            .rate_limited
            .get_signed(
                API::Market(MarketRoute::LeverageBracket),
                self.config.recv_window,
                None,
            )
            .await;
        if let Ok(brackets) = brackets {
            catalog.apply_leverage_brackets(&brackets);
        }

        self.store.lock().replace_catalog(Arc::new(catalog));
        self.store.lock().markets_loaded = true;
        Ok(())
    }

    async fn load_tickers(&self) -> Result<()> {
        let stats: Vec<Ticker24hEntry> = self
            .rate_limited
            .get(API::Market(MarketRoute::Ticker24h), None)
            .await?;
        let books: Vec<BookTickerEntry> = self
            .rate_limited
            .get(API::Market(MarketRoute::TickerBook), None)
            .await?;
        let premium_index: Vec<PremiumIndexEntry> = self
            .rate_limited
            .get(API::Market(MarketRoute::PremiumIndex), None)
            .await?;

        let now = get_timestamp();
        let mut store = self.store.lock();
        for stat in stats {
            let mut ticker = store.ticker(&stat.symbol).copied().unwrap_or(Ticker {
                bid: 0.0,
                ask: 0.0,
                last: 0.0,
                mark: 0.0,
                index: 0.0,
                percentage: 0.0,
                funding_rate: 0.0,
                volume: 0.0,
                quote_volume: 0.0,
                open_interest: 0.0,
                timestamp: now,
            });
            ticker.last = stat.last_price;
            ticker.percentage = stat.price_change_percent;
            ticker.volume = stat.volume;
            ticker.quote_volume = stat.quote_volume;
            ticker.timestamp = now;
            store.set_ticker(stat.symbol, ticker);
        }
        for book in books {
            if let Some(mut ticker) = store.ticker(&book.symbol).copied() {
                ticker.bid = book.bid_price;
                ticker.ask = book.ask_price;
                store.set_ticker(book.symbol, ticker);
            }
        }
        for entry in premium_index {
            if let Some(mut ticker) = store.ticker(&entry.symbol).copied() {
                ticker.mark = entry.mark_price;
                ticker.index = entry.index_price;
                ticker.funding_rate = entry.last_funding_rate;
                store.set_ticker(entry.symbol, ticker);
            }
        }
        store.tickers_loaded = true;
        Ok(())
    }

    async fn query_position_mode(&self) -> Result<()> {
        let mode: PositionModeResponse = self
            .rate_limited
            .get_signed(
                API::Account(AccountRoute::PositionSideDual),
                self.config.recv_window,
                None,
            )
            .await?;
        self.store.lock().hedge_mode = mode.dual_side_position;
        Ok(())
    }

    async fn load_open_orders(&self) -> Result<()> {
        let orders: Vec<OpenOrderEntry> = self
            .rate_limited
            .get_signed(
                API::Trade(TradeRoute::OpenOrders),
                self.config.recv_window,
                None,
            )
            .await?;
        let mut store = self.store.lock();
        for entry in orders {
            let side = if entry.side == "BUY" { Side::Buy } else { Side::Sell };
            let price = if entry.price != 0.0 { entry.price } else { entry.stop_price };
            store.upsert_order(Order {
                id: entry.client_order_id,
                order_id: 0,
                status: OrderStatus::Open,
                symbol: entry.symbol,
                kind: OrderType::from_venue_str(&entry.order_type),
                side,
                price,
                amount: entry.orig_qty,
                filled: entry.executed_qty,
                remaining: entry.orig_qty - entry.executed_qty,
                reduce_only: entry.reduce_only,
            });
        }
        store.orders_loaded = true;
        Ok(())
    }

    async fn tick_loop(self: Arc<Self>) {
        loop {
            if self.is_disposed() {
                return;
            }
            if let Err(e) = self.tick_once().await {
                warn!("tick refresh failed: {e}");
                self.events.emit(AdapterEvent::Error(e.to_string()));
            }
            tokio::time::sleep(self.config.tick_interval).await;
        }
    }

    async fn tick_once(&self) -> Result<()> {
        let account: AccountInfoResponse = self
            .rate_limited
            .get_signed(API::Account(AccountRoute::Info), self.config.recv_window, None)
            .await?;

        let mut store = self.store.lock();

        for position in &account.positions {
            if position.position_amt == 0.0 {
                continue;
            }
            let direction =
                PositionDirection::from_account_update(&position.position_side, position.position_amt);
            let mut entry = Position {
                side: direction,
                entry_price: position.entry_price,
                contracts: position.position_amt.abs(),
                notional: 0.0,
                leverage: position.leverage as u32,
                unrealized_pnl: position.unrealized_profit,
                liquidation_price: position.liquidation_price,
            };
            entry.recompute_notional();
            store.set_position(position.symbol.clone(), direction, entry);
        }

        let mut assets = Vec::with_capacity(account.assets.len());
        for asset in &account.assets {
            let usd_value = if NON_CONVERTIBLE_ASSETS.contains(&asset.asset.as_str()) {
                asset.wallet_balance
            } else {
                let pair = format!("{}USDT", asset.asset);
                let last = store
                    .ticker(&pair)
                    .map(|t| t.last)
                    .ok_or_else(|| crate::errors::AdapterError::TickerNotFound(pair.clone()))?;
                last * asset.wallet_balance
            };
            assets.push(AssetBalance {
                symbol: asset.asset.clone(),
                wallet_balance: asset.wallet_balance,
                usd_value,
            });
        }
        let upnl: f64 = account.positions.iter().map(|p| p.unrealized_profit).sum();
        let mut balance = Balance {
            total: 0.0,
            free: 0.0,
            used: 0.0,
            upnl,
            assets,
        };
        balance.recompute_total();
        balance.free = balance.total - balance.used;
        store.replace_balance(balance);

        store.prune_unknown_positions();
        info!("tick refresh complete");
        Ok(())
    }
}
