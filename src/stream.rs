use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use futures::{SinkExt, StreamExt};
use log::{trace, warn};
use parking_lot::Mutex as SyncMutex;
use serde_json::{json, Value};
use tokio::net::TcpStream;
use tokio::time::sleep;
use tokio_tungstenite::{connect_async, tungstenite::Message as WsMessage, MaybeTlsStream, WebSocketStream};

use crate::client::Client;
use crate::errors::{AdapterError, Result};
use crate::events::{AdapterEvent, EventEmitter};
use crate::models::{
    FillRecord, ListenKeyResponse, Order, OrderStatus, OrderType, PositionDirection, Side,
    UserStreamEvent,
};
use crate::store::Store;

const LISTEN_KEY_RENEW_INTERVAL: Duration = Duration::from_secs(30 * 60);
const PING_REARM_INTERVAL: Duration = Duration::from_secs(10);

/// User-data websocket: keep-alive listen key, ping-pong latency probing,
/// and reconciliation of `ACCOUNT_UPDATE`/`ORDER_TRADE_UPDATE` events into
/// the Store. Parameterized over a `Store` writer and an `EventEmitter`
/// handle rather than holding a back-reference to the rest of the
/// adapter, so there is no pointer cycle between this component and its
/// owner.
pub struct PrivateStream {
    client: Client,
    ws_endpoint: &'static str,
    is_disposed: Arc<AtomicBool>,
}

impl PrivateStream {
    pub fn new(client: Client, ws_endpoint: &'static str) -> Self {
        PrivateStream {
            client,
            ws_endpoint,
            is_disposed: Arc::new(AtomicBool::new(false)),
        }
    }

    pub fn disposal_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.is_disposed)
    }

    pub fn dispose(&self) {
        self.is_disposed.store(true, Ordering::SeqCst);
    }

    fn is_disposed(&self) -> bool {
        self.is_disposed.load(Ordering::SeqCst)
    }

    pub async fn run(&self, store: Arc<SyncMutex<Store>>, events: EventEmitter) -> Result<()> {
        let listen_key = self.acquire_listen_key().await?;
        self.spawn_renewal(listen_key.clone());

        if self.is_disposed() {
            return Ok(());
        }

        let url = format!("{}/ws/{}", self.ws_endpoint, listen_key);
        let (ws_stream, _) = connect_async(url).await?;
        self.event_loop(ws_stream, store, events).await
    }

    async fn acquire_listen_key(&self) -> Result<String> {
        let response: ListenKeyResponse = self
            .client
            .post_unsigned(crate::api::API::UserStream(crate::api::UserStreamRoute::ListenKey), None)
            .await?;
        Ok(response.listen_key)
    }

    fn spawn_renewal(&self, _listen_key: String) {
        let client = self.client.clone();
        let is_disposed = Arc::clone(&self.is_disposed);
        tokio::spawn(async move {
            loop {
                sleep(LISTEN_KEY_RENEW_INTERVAL).await;
                if is_disposed.load(Ordering::SeqCst) {
                    return;
                }
                let result: Result<Value> = client
                    .put_signed(
                        crate::api::API::UserStream(crate::api::UserStreamRoute::ListenKey),
                        5000,
                        None,
                    )
                    .await;
                if let Err(e) = result {
                    warn!("listen key renewal failed: {e}");
                }
            }
        });
    }

    async fn event_loop(
        &self,
        mut ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
        store: Arc<SyncMutex<Store>>,
        events: EventEmitter,
    ) -> Result<()> {
        let ping_request = json!({"id": 42, "method": "LIST_SUBSCRIPTIONS"}).to_string();
        ws.send(WsMessage::Text(ping_request.clone())).await?;
        let mut ping_sent_at = Some(Instant::now());
        let mut rearm = Box::pin(sleep(PING_REARM_INTERVAL));

        loop {
            if self.is_disposed() {
                return Ok(());
            }
            tokio::select! {
                msg = ws.next() => {
                    match msg {
                        Some(Ok(WsMessage::Text(text))) => {
                            self.handle_message(&text, &store, &events, &mut ping_sent_at);
                        }
                        Some(Ok(_)) => {}
                        Some(Err(e)) => return Err(AdapterError::Tungstenite(e)),
                        None => return Err(AdapterError::Network("stream closed".into())),
                    }
                }
                _ = &mut rearm => {
                    if self.is_disposed() {
                        return Ok(());
                    }
                    ws.send(WsMessage::Text(ping_request.clone())).await?;
                    ping_sent_at = Some(Instant::now());
                    rearm = Box::pin(sleep(PING_REARM_INTERVAL));
                }
            }
        }
    }

    fn handle_message(
        &self,
        text: &str,
        store: &Arc<SyncMutex<Store>>,
        events: &EventEmitter,
        ping_sent_at: &mut Option<Instant>,
    ) {
        if self.is_disposed() {
            return;
        }

        let Ok(value) = serde_json::from_str::<Value>(text) else {
            trace!("dropping malformed stream message");
            return;
        };

        if value.get("id").and_then(Value::as_i64) == Some(42) {
            if let Some(sent_at) = ping_sent_at.take() {
                let latency = sent_at.elapsed().as_millis() as u64 / 2;
                store.lock().latency_ms = Some(latency);
            }
            return;
        }

        let Ok(event) = serde_json::from_value::<UserStreamEvent>(value) else {
            trace!("dropping undecodable stream event");
            return;
        };

        match event {
            UserStreamEvent::AccountUpdate(update) => {
                events.emit(AdapterEvent::PositionUpdate(format!("{:?}", update.update)));
                let mut store = store.lock();
                for slot in &update.update.positions {
                    let direction = PositionDirection::from_account_update(
                        &slot.position_side,
                        slot.position_amount,
                    );
                    if let Some(position) = store.position(&slot.symbol, direction).cloned() {
                        let mut position = position;
                        position.entry_price = slot.entry_price;
                        position.contracts = slot.position_amount.abs();
                        position.unrealized_pnl = slot.unrealized_pnl;
                        position.recompute_notional();
                        store.set_position(slot.symbol.clone(), direction, position);
                    }
                }
                for slot in &update.update.balances {
                    let mut balance = store.balance().clone();
                    if let Some(asset) = balance.assets.iter_mut().find(|a| a.symbol == slot.asset)
                    {
                        asset.wallet_balance = slot.wallet_balance;
                    }
                    balance.recompute_total();
                    store.replace_balance(balance);
                }
            }
            UserStreamEvent::OrderTradeUpdate(update) => {
                let order = update.order;
                let side = if order.side == "BUY" { Side::Buy } else { Side::Sell };
                match order.order_status.as_str() {
                    "PARTIALLY_FILLED" | "FILLED" => {
                        events.emit(AdapterEvent::Fill(FillRecord {
                            symbol: order.symbol.clone(),
                            client_order_id: order.client_order_id.clone(),
                            side,
                            price: order.average_price,
                            realized_pnl: order.realized_pnl,
                            amount: order.last_filled_qty,
                            reduce_only: order.reduce_only,
                            maker: order.is_maker,
                            notional: order.last_filled_qty * order.average_price,
                            commission: order.commission,
                        }));
                    }
                    _ => {}
                }
                match order.order_status.as_str() {
                    "NEW" => {
                        let price = if order.price != 0.0 {
                            order.price
                        } else {
                            order.stop_price
                        };
                        let mut store = store.lock();
                        store.upsert_order(Order {
                            id: order.client_order_id.clone(),
                            order_id: 0,
                            status: OrderStatus::Open,
                            symbol: order.symbol.clone(),
                            kind: OrderType::from_venue_str(&order.order_type),
                            side,
                            price,
                            amount: order.orig_qty,
                            filled: 0.0,
                            remaining: order.orig_qty,
                            reduce_only: order.reduce_only,
                        });
                    }
                    "CANCELED" | "FILLED" | "EXPIRED" => {
                        store.lock().remove_order(&order.client_order_id);
                    }
                    _ => {}
                }
            }
            UserStreamEvent::Unknown => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::Catalog;

    fn harness() -> (PrivateStream, Arc<SyncMutex<Store>>, EventEmitter) {
        let client = Client::new(None, None, "https://fapi.binance.com".into());
        let stream = PrivateStream::new(client, "wss://fstream.binance.com");
        let store = Arc::new(SyncMutex::new(Store::new(Arc::new(Catalog::default()))));
        (stream, store, EventEmitter::new(16))
    }

    #[test]
    fn malformed_json_is_dropped_without_panic() {
        let (stream, store, events) = harness();
        let mut ping_sent_at = None;
        stream.handle_message("not json", &store, &events, &mut ping_sent_at);
        stream.handle_message("{\"e\": \"SOMETHING_UNKNOWN\"}", &store, &events, &mut ping_sent_at);
    }

    #[test]
    fn pong_reply_computes_half_round_trip_latency() {
        let (stream, store, events) = harness();
        let mut ping_sent_at = Some(Instant::now() - Duration::from_millis(80));
        stream.handle_message("{\"id\": 42}", &store, &events, &mut ping_sent_at);
        assert!(ping_sent_at.is_none());
        let latency = store.lock().latency_ms.expect("latency recorded");
        assert!(latency >= 30 && latency <= 50, "latency was {latency}");
    }

    #[test]
    fn new_order_event_upserts_open_order_with_full_quantity() {
        let (stream, store, events) = harness();
        let mut ping_sent_at = None;
        let text = r#"{
            "e": "ORDER_TRADE_UPDATE",
            "o": {
                "s": "BTCUSDT",
                "c": "client-1",
                "S": "BUY",
                "X": "NEW",
                "o": "LIMIT",
                "p": "50000",
                "sp": "0",
                "q": "0.01",
                "ap": "0",
                "l": "0",
                "rp": "0",
                "R": false,
                "m": false
            }
        }"#;
        stream.handle_message(text, &store, &events, &mut ping_sent_at);
        let order = store.lock().order("client-1").cloned().expect("order recorded");
        assert_eq!(order.amount, 0.01);
        assert_eq!(order.remaining, 0.01);
        assert_eq!(order.filled, 0.0);
        assert_eq!(order.status, OrderStatus::Open);
    }

    #[test]
    fn new_stop_market_order_event_records_its_venue_order_type() {
        let (stream, store, events) = harness();
        let mut ping_sent_at = None;
        let text = r#"{
            "e": "ORDER_TRADE_UPDATE",
            "o": {
                "s": "BTCUSDT",
                "c": "client-3",
                "S": "SELL",
                "X": "NEW",
                "o": "STOP_MARKET",
                "p": "0",
                "sp": "49000",
                "q": "0.01",
                "ap": "0",
                "l": "0",
                "rp": "0",
                "R": true,
                "m": false
            }
        }"#;
        stream.handle_message(text, &store, &events, &mut ping_sent_at);
        let order = store.lock().order("client-3").cloned().expect("order recorded");
        assert_eq!(order.kind, OrderType::StopLoss);
    }

    #[test]
    fn filled_order_event_removes_it_from_the_store() {
        let (stream, store, events) = harness();
        store.lock().upsert_order(Order {
            id: "client-2".into(),
            order_id: 0,
            status: OrderStatus::Open,
            symbol: "BTCUSDT".into(),
            kind: OrderType::Limit,
            side: Side::Buy,
            price: 50000.0,
            amount: 0.01,
            filled: 0.0,
            remaining: 0.01,
            reduce_only: false,
        });
        let mut ping_sent_at = None;
        let text = r#"{
            "e": "ORDER_TRADE_UPDATE",
            "o": {
                "s": "BTCUSDT",
                "c": "client-2",
                "S": "BUY",
                "X": "FILLED",
                "o": "LIMIT",
                "p": "50000",
                "sp": "0",
                "q": "0.01",
                "ap": "50000",
                "l": "0.01",
                "rp": "0",
                "R": false,
                "m": true
            }
        }"#;
        stream.handle_message(text, &store, &events, &mut ping_sent_at);
        assert!(store.lock().order("client-2").is_none());
    }
}
