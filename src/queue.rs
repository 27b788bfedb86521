use std::collections::VecDeque;
use std::sync::Arc;
use std::time::Duration;

use log::trace;
use tokio::sync::{Mutex, Notify};
use tokio::time::{sleep, Instant};

use crate::events::{AdapterEvent, EventEmitter};
use crate::models::PayloadOrder;

const WINDOW_10S_CAP: usize = 300;
const WINDOW_60S_CAP: usize = 1200;
const MAX_LOT_SIZE: usize = 5;

/// Outcome of one submitted payload, as surfaced on `batchResolved`.
#[derive(Clone, Debug)]
pub struct DispatchOutcome {
    pub client_order_id: String,
    pub error: Option<String>,
}

/// A submission function the queue drives; an external REST surface is
/// expected to provide this (single order vs. batch order endpoint).
pub type Submitter = Arc<
    dyn Fn(Vec<PayloadOrder>) -> futures::future::BoxFuture<'static, Vec<DispatchOutcome>>
        + Send
        + Sync,
>;

struct RollingWindows {
    w10: VecDeque<Instant>,
    w60: VecDeque<Instant>,
}

impl RollingWindows {
    fn new() -> Self {
        RollingWindows {
            w10: VecDeque::new(),
            w60: VecDeque::new(),
        }
    }

    fn prune(&mut self, now: Instant) {
        while self
            .w10
            .front()
            .is_some_and(|t| now.duration_since(*t) >= Duration::from_secs(10))
        {
            self.w10.pop_front();
        }
        while self
            .w60
            .front()
            .is_some_and(|t| now.duration_since(*t) >= Duration::from_secs(60))
        {
            self.w60.pop_front();
        }
    }

    fn admit(&mut self, n: usize, now: Instant) {
        for _ in 0..n {
            self.w10.push_back(now);
            self.w60.push_back(now);
        }
    }
}

struct QueueState {
    pending: VecDeque<PayloadOrder>,
    windows: RollingWindows,
    processing: bool,
    results: Vec<String>,
}

/// Concurrent, rate-window-governed batch submitter. Exactly one
/// processing task runs at a time per instance; `enqueue` hands work
/// across the guarded deque and the processing loop drains it in lots of
/// at most five, charging both rolling windows at admission time.
pub struct DispatchQueue {
    state: Mutex<QueueState>,
    completion: Arc<Notify>,
    submit: Submitter,
    events: EventEmitter,
}

impl DispatchQueue {
    pub fn new(submit: Submitter, events: EventEmitter) -> Arc<Self> {
        Arc::new(DispatchQueue {
            state: Mutex::new(QueueState {
                pending: VecDeque::new(),
                windows: RollingWindows::new(),
                processing: false,
                results: Vec::new(),
            }),
            completion: Arc::new(Notify::new()),
            submit,
            events,
        })
    }

    /// Pushes `payloads` (FIFO within this call) and ensures a processing
    /// task is running.
    pub async fn enqueue(self: &Arc<Self>, payloads: Vec<PayloadOrder>) {
        let should_spawn = {
            let mut state = self.state.lock().await;
            state.pending.extend(payloads);
            self.events
                .emit(AdapterEvent::OrderManager(state.pending.len()));
            if state.processing {
                false
            } else {
                state.processing = true;
                true
            }
        };
        if should_spawn {
            let queue = Arc::clone(self);
            tokio::spawn(async move { queue.run().await });
        }
    }

    pub async fn is_processing(&self) -> bool {
        self.state.lock().await.processing
    }

    /// Atomic snapshot-and-clear of the successful client IDs accumulated
    /// since the last call.
    pub async fn drain_results(&self) -> Vec<String> {
        let mut state = self.state.lock().await;
        std::mem::take(&mut state.results)
    }

    /// Awaits the next time the processing loop finishes a scheduling
    /// iteration, replacing a busy-poll on `is_processing()`.
    pub async fn completion(&self) {
        self.completion.notified().await;
    }

    async fn run(self: Arc<Self>) {
        loop {
            let now = Instant::now();
            let batch = {
                let mut state = self.state.lock().await;
                state.windows.prune(now);

                if state.windows.w10.len() >= WINDOW_10S_CAP
                    || state.windows.w60.len() >= WINDOW_60S_CAP
                {
                    let wait10 = state
                        .windows
                        .w10
                        .front()
                        .map(|t| Duration::from_secs(10).saturating_sub(now.duration_since(*t)));
                    let wait60 = state
                        .windows
                        .w60
                        .front()
                        .map(|t| Duration::from_secs(60).saturating_sub(now.duration_since(*t)));
                    let wait = match (wait10, wait60) {
                        (Some(a), Some(b)) => a.min(b),
                        (Some(a), None) => a,
                        (None, Some(b)) => b,
                        (None, None) => Duration::from_millis(100),
                    };
                    drop(state);
                    sleep(wait).await;
                    continue;
                }

                let capacity = [
                    WINDOW_10S_CAP - state.windows.w10.len(),
                    WINDOW_60S_CAP - state.windows.w60.len(),
                    state.pending.len(),
                    MAX_LOT_SIZE,
                ]
                .into_iter()
                .min()
                .unwrap_or(0);

                if capacity == 0 {
                    state.processing = false;
                    self.completion.notify_waiters();
                    return;
                }

                let batch: Vec<PayloadOrder> = state.pending.drain(..capacity).collect();
                state.windows.admit(batch.len(), now);
                batch
            };

            let remaining_lots10;
            let remaining_time10;
            let remaining_lots60;
            let remaining_time60;
            {
                let state = self.state.lock().await;
                remaining_lots10 =
                    (WINDOW_10S_CAP - state.windows.w10.len()) / MAX_LOT_SIZE.max(1);
                remaining_time10 = state
                    .windows
                    .w10
                    .front()
                    .map(|t| Duration::from_secs(10).saturating_sub(now.duration_since(*t)))
                    .unwrap_or(Duration::from_secs(10));
                remaining_lots60 =
                    (WINDOW_60S_CAP - state.windows.w60.len()) / MAX_LOT_SIZE.max(1);
                remaining_time60 = state
                    .windows
                    .w60
                    .front()
                    .map(|t| Duration::from_secs(60).saturating_sub(now.duration_since(*t)))
                    .unwrap_or(Duration::from_secs(60));
            }

            let submit = Arc::clone(&self.submit);
            let queue = Arc::clone(&self);
            let client_ids: Vec<String> =
                batch.iter().map(|p| p.client_order_id.clone()).collect();
            tokio::spawn(async move {
                let outcomes = submit(batch).await;
                let mut state = queue.state.lock().await;
                let mut resolved = Vec::with_capacity(outcomes.len());
                for outcome in outcomes {
                    if outcome.error.is_none() {
                        state.results.push(outcome.client_order_id.clone());
                    }
                    resolved.push(outcome);
                }
                drop(state);
                queue.events.emit(AdapterEvent::BatchResolved(resolved));
            });
            trace!("dispatched lot of {} payloads", client_ids.len());

            let sleep10 = pace(remaining_time10, remaining_lots10);
            let sleep60 = pace(remaining_time60, remaining_lots60);
            let pause = sleep10.min(sleep60);

            self.completion.notify_waiters();

            let still_pending = {
                let state = self.state.lock().await;
                !state.pending.is_empty()
            };
            if !still_pending {
                let mut state = self.state.lock().await;
                state.processing = false;
                self.completion.notify_waiters();
                return;
            }

            sleep(pause).await;
        }
    }
}

fn pace(remaining_time: Duration, remaining_lots: usize) -> Duration {
    if remaining_lots == 0 {
        return Duration::from_millis(1000);
    }
    remaining_time / remaining_lots as u32
}

#[cfg(test)]
mod tests {
    use super::*;
    use futures::FutureExt;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn payload(id: &str) -> PayloadOrder {
        let mut p = PayloadOrder::new(id.to_string());
        p.set("symbol", "BTCUSDT");
        p
    }

    #[tokio::test(start_paused = true)]
    async fn lots_cap_at_five_and_all_payloads_resolve() {
        let max_batch = Arc::new(AtomicUsize::new(0));
        let max_batch_clone = Arc::clone(&max_batch);
        let submit: Submitter = Arc::new(move |batch: Vec<PayloadOrder>| {
            let max_batch = Arc::clone(&max_batch_clone);
            async move {
                max_batch.fetch_max(batch.len(), Ordering::SeqCst);
                batch
                    .into_iter()
                    .map(|p| DispatchOutcome {
                        client_order_id: p.client_order_id,
                        error: None,
                    })
                    .collect()
            }
            .boxed()
        });
        let queue = DispatchQueue::new(submit, EventEmitter::new(16));

        let payloads: Vec<PayloadOrder> = (0..7).map(|i| payload(&format!("order-{i}"))).collect();
        queue.enqueue(payloads).await;

        let mut seen = Vec::new();
        for _ in 0..20 {
            queue.completion().await;
            seen.extend(queue.drain_results().await);
            if seen.len() >= 7 {
                break;
            }
        }

        assert_eq!(seen.len(), 7);
        assert!(max_batch.load(Ordering::SeqCst) <= 5);
    }

    #[tokio::test(start_paused = true)]
    async fn enqueue_while_processing_does_not_spawn_a_second_runner() {
        let submit: Submitter = Arc::new(|batch: Vec<PayloadOrder>| {
            async move {
                batch
                    .into_iter()
                    .map(|p| DispatchOutcome {
                        client_order_id: p.client_order_id,
                        error: None,
                    })
                    .collect()
            }
            .boxed()
        });
        let queue = DispatchQueue::new(submit, EventEmitter::new(16));

        queue.enqueue(vec![payload("a")]).await;
        assert!(queue.is_processing().await);
        queue.enqueue(vec![payload("b")]).await;

        let mut seen = Vec::new();
        for _ in 0..20 {
            queue.completion().await;
            seen.extend(queue.drain_results().await);
            if seen.len() >= 2 {
                break;
            }
        }
        assert_eq!(seen.len(), 2);
        assert!(!queue.is_processing().await);
    }

    #[tokio::test(start_paused = true)]
    async fn dispatch_saturates_the_ten_second_window_and_drains_once_it_reopens() {
        let submit: Submitter = Arc::new(|batch: Vec<PayloadOrder>| {
            async move {
                batch
                    .into_iter()
                    .map(|p| DispatchOutcome {
                        client_order_id: p.client_order_id,
                        error: None,
                    })
                    .collect()
            }
            .boxed()
        });
        let queue = DispatchQueue::new(submit, EventEmitter::new(16));

        let total = WINDOW_10S_CAP + 5;
        let payloads: Vec<PayloadOrder> =
            (0..total).map(|i| payload(&format!("order-{i}"))).collect();
        queue.enqueue(payloads).await;

        while queue.is_processing().await {
            sleep(Duration::from_millis(1)).await;
        }

        let seen = queue.drain_results().await;
        assert_eq!(seen.len(), total);
    }
}

