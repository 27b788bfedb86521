use std::sync::Arc;

use futures::future::BoxFuture;
use parking_lot::Mutex as SyncMutex;
use serde_json::Value;

use crate::api::{AccountRoute, TradeRoute, API};
use crate::client::Client;
use crate::errors::{AdapterError, Result};
use crate::events::EventEmitter;
use crate::formatter::Formatter;
use crate::models::{PayloadOrder, PlacementIntent};
use crate::queue::{DispatchOutcome, DispatchQueue, Submitter};
use crate::store::Store;
use crate::util::{round_dp, snap_to_step};

/// Ties the Order Formatter to the Dispatch Queue and the unlimited-rate
/// client that actually places orders, the collaborator spec §4.F assumes
/// the core calls through. Non-placement account calls (leverage,
/// position-mode) go straight through the same client since they aren't
/// subject to the order rate windows.
pub struct Rest {
    store: Arc<SyncMutex<Store>>,
    queue: Arc<DispatchQueue>,
    client: Client,
    recv_window: u64,
}

impl Rest {
    pub fn new(
        store: Arc<SyncMutex<Store>>,
        client: Client,
        recv_window: u64,
        events: EventEmitter,
    ) -> Arc<Self> {
        let submit = build_submitter(client.clone(), recv_window);
        let queue = DispatchQueue::new(submit, events);
        Arc::new(Rest {
            store,
            queue,
            client,
            recv_window,
        })
    }

    pub fn queue(&self) -> Arc<DispatchQueue> {
        Arc::clone(&self.queue)
    }

    /// Formats `intent` against the current store snapshot and hands the
    /// resulting payloads to the Dispatch Queue. Formatting errors bubble
    /// to the caller per the propagation policy; dispatch outcomes surface
    /// later via `batchResolved`/`drainResults`.
    pub async fn place(&self, intent: &PlacementIntent) -> Result<()> {
        let payloads = {
            let store = self.store.lock();
            match intent {
                PlacementIntent::Simple(simple) => {
                    Formatter::format(&store, simple, store.hedge_mode)?
                }
                PlacementIntent::Split(split) => Formatter::format_split(&store, split)?,
                PlacementIntent::Update(update) => {
                    vec![self.format_update(&store, update)?]
                }
            }
        };
        self.queue.enqueue(payloads).await;
        Ok(())
    }

    fn format_update(
        &self,
        store: &Store,
        update: &crate::models::UpdateIntent,
    ) -> Result<PayloadOrder> {
        let existing = store
            .order(&update.order)
            .ok_or_else(|| AdapterError::Base(format!("order not found: {}", update.order)))?;
        let market = store
            .catalog()
            .get(&existing.symbol)
            .ok_or_else(|| AdapterError::MarketNotFound(existing.symbol.clone()))?;

        let mut payload = PayloadOrder::new(existing.id.clone());
        payload
            .set("symbol", &market.symbol)
            .set("orderId", existing.order_id);

        if let Some(price) = update.update.price {
            payload.set("price", round_dp(snap_to_step(price, market.precision.price), 8));
        }
        if let Some(amount) = update.update.amount {
            payload.set(
                "quantity",
                round_dp(snap_to_step(amount, market.precision.amount), 8),
            );
        }
        Ok(payload)
    }

    /// `DELETE /fapi/v1/order`. Removes the order from the store once the
    /// venue confirms the cancel.
    pub async fn cancel_order(&self, symbol: &str, client_order_id: &str) -> Result<()> {
        let mut query = indexmap::IndexMap::new();
        query.insert("symbol", symbol.to_string());
        query.insert("origClientOrderId", client_order_id.to_string());
        let _: Value = self
            .client
            .delete_signed(
                API::Trade(TradeRoute::Order),
                self.recv_window,
                Some(crate::util::build_request(&query)),
            )
            .await?;
        self.store.lock().remove_order(client_order_id);
        Ok(())
    }

    /// `DELETE /fapi/v1/batchOrders`. Binance resolves each id independently;
    /// a batch-level HTTP failure means none were canceled, so the store is
    /// only pruned on success.
    pub async fn cancel_batch(&self, symbol: &str, client_order_ids: &[String]) -> Result<()> {
        let ids = serde_json::to_string(client_order_ids).unwrap_or_default();
        let mut query = indexmap::IndexMap::new();
        query.insert("symbol", symbol.to_string());
        query.insert("origClientOrderIdList", ids);
        let _: Vec<Value> = self
            .client
            .delete_signed(
                API::Trade(TradeRoute::BatchOrders),
                self.recv_window,
                Some(crate::util::build_request(&query)),
            )
            .await?;
        let mut store = self.store.lock();
        for id in client_order_ids {
            store.remove_order(id);
        }
        Ok(())
    }

    /// `DELETE /fapi/v1/allOpenOrders`. Cancels every open order on `symbol`
    /// and prunes them all from the store on success.
    pub async fn cancel_all(&self, symbol: &str) -> Result<()> {
        let mut query = indexmap::IndexMap::new();
        query.insert("symbol", symbol.to_string());
        let _: Value = self
            .client
            .delete_signed(
                API::Trade(TradeRoute::AllOpenOrders),
                self.recv_window,
                Some(crate::util::build_request(&query)),
            )
            .await?;
        self.store.lock().remove_orders_for_symbol(symbol);
        Ok(())
    }

    pub async fn set_leverage(&self, symbol: &str, leverage: u32) -> Result<()> {
        let mut query = indexmap::IndexMap::new();
        query.insert("symbol", symbol.to_string());
        query.insert("leverage", leverage.to_string());
        let _: Value = self
            .client
            .post_signed(
                API::Account(AccountRoute::Leverage),
                self.recv_window,
                Some(crate::util::build_request(&query)),
            )
            .await?;
        Ok(())
    }

    /// No-ops with an `AdapterError` the caller is expected to route to the
    /// `error` event when any position is currently open, per the position-
    /// mode change policy.
    pub async fn set_position_mode(&self, hedge_mode: bool) -> Result<()> {
        if self.store.lock().positions().next().is_some() {
            return Err(AdapterError::Base(
                "cannot change position mode with open positions".into(),
            ));
        }
        let mut query = indexmap::IndexMap::new();
        query.insert("dualSidePosition", hedge_mode.to_string());
        let _: Value = self
            .client
            .post_signed(
                API::Account(AccountRoute::PositionSideDual),
                self.recv_window,
                Some(crate::util::build_request(&query)),
            )
            .await?;
        self.store.lock().hedge_mode = hedge_mode;
        Ok(())
    }
}

/// Builds the closure the Dispatch Queue calls once per lot: single-order
/// endpoint when the lot holds exactly one payload, the batch endpoint
/// otherwise. A batch-endpoint HTTP failure maps every payload in the lot
/// to the same error, per the queue's failure semantics.
fn build_submitter(client: Client, recv_window: u64) -> Submitter {
    Arc::new(move |batch: Vec<PayloadOrder>| -> BoxFuture<'static, Vec<DispatchOutcome>> {
        let client = client.clone();
        Box::pin(async move {
            if batch.len() == 1 {
                let payload = batch.into_iter().next().expect("checked len == 1 above");
                let client_order_id = payload.client_order_id.clone();
                let query = payload.into_query_string();
                let result: Result<Value> = client
                    .post_signed(API::Trade(TradeRoute::Order), recv_window, Some(query))
                    .await;
                vec![outcome(client_order_id, result)]
            } else {
                let client_order_ids: Vec<String> =
                    batch.iter().map(|p| p.client_order_id.clone()).collect();
                let array: Vec<Value> = batch
                    .iter()
                    .map(|p| {
                        Value::Object(
                            p.fields
                                .iter()
                                .map(|(k, v)| (k.to_string(), Value::String(v.clone())))
                                .collect(),
                        )
                    })
                    .collect();
                let encoded_orders = serde_json::to_string(&Value::Array(array))
                    .unwrap_or_default();
                let percent_encoded: String =
                    url::form_urlencoded::byte_serialize(encoded_orders.as_bytes()).collect();
                let query = format!("batchOrders={percent_encoded}");
                let result: Result<Vec<Value>> = client
                    .post_signed(API::Trade(TradeRoute::BatchOrders), recv_window, Some(query))
                    .await;
                match result {
                    // Binance's batch endpoint returns one element per order,
                    // each either the placed order or an error object with a
                    // `code`/`msg` pair — per-payload outcome, not all-or-nothing.
                    Ok(responses) => client_order_ids
                        .into_iter()
                        .zip(responses.into_iter().map(Some).chain(std::iter::repeat(None)))
                        .map(|(id, response)| {
                            let error = response.and_then(|r| {
                                r.get("code").map(|_| {
                                    r.get("msg")
                                        .and_then(Value::as_str)
                                        .unwrap_or("batch order failed")
                                        .to_string()
                                })
                            });
                            DispatchOutcome {
                                client_order_id: id,
                                error,
                            }
                        })
                        .collect(),
                    Err(e) => {
                        let message = e.to_string();
                        client_order_ids
                            .into_iter()
                            .map(|id| DispatchOutcome {
                                client_order_id: id,
                                error: Some(message.clone()),
                            })
                            .collect()
                    }
                }
            }
        })
    })
}

fn outcome(client_order_id: String, result: Result<Value>) -> DispatchOutcome {
    match result {
        Ok(_) => DispatchOutcome {
            client_order_id,
            error: None,
        },
        Err(e) => DispatchOutcome {
            client_order_id,
            error: Some(e.to_string()),
        },
    }
}
