use tokio::sync::broadcast;

use crate::models::FillRecord;
use crate::queue::DispatchOutcome;

/// Everything the adapter fans out to interested listeners: fills,
/// decoded errors, informational notices, queue depth, batch outcomes,
/// and raw position updates.
#[derive(Clone, Debug)]
pub enum AdapterEvent {
    Fill(FillRecord),
    Error(String),
    Info(String),
    OrderManager(usize),
    BatchResolved(Vec<DispatchOutcome>),
    PositionUpdate(String),
}

/// Broadcast-backed fan-out bus. New subscribers only see events emitted
/// after they subscribe, the natural fit for listeners that attach at
/// arbitrary points after bootstrap.
#[derive(Clone)]
pub struct EventEmitter {
    sender: broadcast::Sender<AdapterEvent>,
}

impl EventEmitter {
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        EventEmitter { sender }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<AdapterEvent> {
        self.sender.subscribe()
    }

    /// Silently drops the event when there are no subscribers; a bus with
    /// nobody listening is not an error.
    pub fn emit(&self, event: AdapterEvent) {
        let _ = self.sender.send(event);
    }
}

impl Default for EventEmitter {
    fn default() -> Self {
        Self::new(1024)
    }
}
