use std::fmt::Debug;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Mutex, PoisonError};

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;

/// A barcode read by the scanner head.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScanNotification {
    pub barcode: String,
}

/// The sorter has finished physically handling a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortingCompleted {
    pub unit_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SubscriptionId(u64);

/// Receiving end of one subscription. Dropping the receiver, or
/// unsubscribing by id, ends delivery.
#[derive(Debug)]
pub struct Subscription<T> {
    id: SubscriptionId,
    receiver: mpsc::UnboundedReceiver<T>,
}

impl<T> Subscription<T> {
    pub fn new(id: SubscriptionId, receiver: mpsc::UnboundedReceiver<T>) -> Self {
        Self { id, receiver }
    }

    pub fn id(&self) -> SubscriptionId {
        self.id
    }

    pub fn into_parts(self) -> (SubscriptionId, mpsc::UnboundedReceiver<T>) {
        (self.id, self.receiver)
    }
}

/// Scanner and sorter hardware as seen by the intake. Notifications are
/// pushed to subscribers over channels; publishing never waits on a
/// subscriber.
pub trait HardwareEventSource: Debug + Send + Sync {
    fn subscribe_scans(&self) -> Subscription<ScanNotification>;
    fn subscribe_sorting_completed(&self) -> Subscription<SortingCompleted>;
    /// Returns false when `id` was not subscribed to either stream.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}

#[derive(Debug)]
struct Topic<T> {
    subscribers: Mutex<Vec<(SubscriptionId, mpsc::UnboundedSender<T>)>>,
}

impl<T> Default for Topic<T> {
    fn default() -> Self {
        Self {
            subscribers: Mutex::new(Vec::new()),
        }
    }
}

impl<T: Clone> Topic<T> {
    fn subscribe(&self, id: SubscriptionId) -> Subscription<T> {
        let (sender, receiver) = mpsc::unbounded_channel();
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push((id, sender));
        Subscription::new(id, receiver)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let before = subscribers.len();
        subscribers.retain(|(existing, _)| *existing != id);
        subscribers.len() != before
    }

    /// Fan out to every live subscriber, pruning closed ones. Returns the
    /// number of subscribers reached.
    fn publish(&self, event: T) -> usize {
        let mut subscribers = self
            .subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        subscribers.retain(|(_, sender)| sender.send(event.clone()).is_ok());
        subscribers.len()
    }

    fn len(&self) -> usize {
        self.subscribers
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

/// In-process event source. Hardware drivers (or tests) call the `emit_*`
/// methods; every subscriber gets its own unbounded channel.
#[derive(Debug, Default)]
pub struct ChannelEventSource {
    next_id: AtomicU64,
    scans: Topic<ScanNotification>,
    completions: Topic<SortingCompleted>,
}

impl ChannelEventSource {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn emit_scan(&self, barcode: impl Into<String>) -> usize {
        self.scans.publish(ScanNotification {
            barcode: barcode.into(),
        })
    }

    pub fn emit_sorting_completed(&self, unit_id: impl Into<String>) -> usize {
        self.completions.publish(SortingCompleted {
            unit_id: unit_id.into(),
        })
    }

    pub fn scan_subscribers(&self) -> usize {
        self.scans.len()
    }

    pub fn completion_subscribers(&self) -> usize {
        self.completions.len()
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed) + 1)
    }
}

impl HardwareEventSource for ChannelEventSource {
    fn subscribe_scans(&self) -> Subscription<ScanNotification> {
        self.scans.subscribe(self.next_id())
    }

    fn subscribe_sorting_completed(&self) -> Subscription<SortingCompleted> {
        self.completions.subscribe(self.next_id())
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.scans.unsubscribe(id) || self.completions.unsubscribe(id)
    }
}
