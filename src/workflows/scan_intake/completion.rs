use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, trace, warn};

use super::hardware::{HardwareEventSource, SortingCompleted, SubscriptionId};

/// Subscriber for the sorter's "sorting completed" notifications.
///
/// The subscription is kept for the listener's lifetime even though nothing
/// is done with the notifications yet; see [`on_sorting_completed`].
/// Dropping the listener unsubscribes it.
#[derive(Debug)]
pub struct SortingCompletionListener {
    source: Arc<dyn HardwareEventSource>,
    subscription: SubscriptionId,
    task: Option<JoinHandle<()>>,
}

impl SortingCompletionListener {
    /// Must be called from within a Tokio runtime.
    pub fn attach(source: Arc<dyn HardwareEventSource>) -> Self {
        let (subscription, receiver) = source.subscribe_sorting_completed().into_parts();
        let task = tokio::spawn(listen(receiver));
        debug!(?subscription, "sorting completion listener attached");

        Self {
            source,
            subscription,
            task: Some(task),
        }
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    pub async fn detach(mut self) {
        self.source.unsubscribe(self.subscription);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "sorting completion task ended abnormally");
            }
        }
    }
}

impl Drop for SortingCompletionListener {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
    }
}

async fn listen(mut receiver: mpsc::UnboundedReceiver<SortingCompleted>) {
    while let Some(event) = receiver.recv().await {
        on_sorting_completed(&event);
    }
}

/// Intentionally a no-op: the sorter's completion acknowledgement has no
/// handling in the intake yet. Downstream wiring relies on the subscription
/// existing, so the listener stays attached.
pub fn on_sorting_completed(event: &SortingCompleted) {
    trace!(unit = event.unit_id.as_str(), "sorting completed");
}
