use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{debug, warn};

use super::hardware::{HardwareEventSource, ScanNotification, SubscriptionId};
use super::session::ScanSession;

/// When buffered scans get classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DrainPolicy {
    /// The run driver calls [`ScanSession::drain`] before completing.
    #[default]
    Manual,
    /// A background worker drains whenever scans arrive. Notifications keep
    /// flowing into the buffer while it classifies.
    OnReceive,
}

/// Feeds scan notifications from the hardware into a session for as long as
/// it is attached.
///
/// Dropping the intake unsubscribes it; notifications already delivered are
/// still forwarded by the background task. Use [`ScanIntake::detach`] to wait
/// for that to finish.
#[derive(Debug)]
pub struct ScanIntake {
    source: Arc<dyn HardwareEventSource>,
    subscription: SubscriptionId,
    task: Option<JoinHandle<()>>,
}

impl ScanIntake {
    /// Subscribe `session` to the source's scan stream. Must be called from
    /// within a Tokio runtime.
    pub fn attach(
        session: Arc<ScanSession>,
        source: Arc<dyn HardwareEventSource>,
        policy: DrainPolicy,
    ) -> Self {
        let (subscription, receiver) = source.subscribe_scans().into_parts();
        debug!(?subscription, ?policy, "scan intake attached");
        let task = tokio::spawn(forward_scans(session, receiver, policy));

        Self {
            source,
            subscription,
            task: Some(task),
        }
    }

    pub fn subscription(&self) -> SubscriptionId {
        self.subscription
    }

    /// Unsubscribe and wait until every notification already delivered has
    /// reached the session (and, under [`DrainPolicy::OnReceive`], has been
    /// classified).
    pub async fn detach(mut self) {
        self.source.unsubscribe(self.subscription);
        if let Some(task) = self.task.take() {
            if let Err(err) = task.await {
                warn!(error = %err, "scan intake task ended abnormally");
            }
        }
        debug!(subscription = ?self.subscription, "scan intake detached");
    }
}

impl Drop for ScanIntake {
    fn drop(&mut self) {
        self.source.unsubscribe(self.subscription);
    }
}

async fn forward_scans(
    session: Arc<ScanSession>,
    mut receiver: mpsc::UnboundedReceiver<ScanNotification>,
    policy: DrainPolicy,
) {
    let drainer = match policy {
        DrainPolicy::Manual => None,
        DrainPolicy::OnReceive => Some(DrainWorker::spawn(Arc::clone(&session))),
    };

    while let Some(notification) = receiver.recv().await {
        session.add_barcode(notification.barcode);
        if let Some(drainer) = &drainer {
            drainer.wake();
        }
    }
    debug!("scan notification stream closed");

    if let Some(drainer) = drainer {
        drainer.finish().await;
    }
}

/// Runs drains on the blocking pool, off the notification path. Wake-ups
/// that arrive mid-drain collapse into one follow-up drain.
struct DrainWorker {
    wake: mpsc::UnboundedSender<()>,
    task: JoinHandle<()>,
}

impl DrainWorker {
    fn spawn(session: Arc<ScanSession>) -> Self {
        let (wake, signals) = mpsc::unbounded_channel();
        let task = tokio::spawn(run_drains(session, signals));
        Self { wake, task }
    }

    fn wake(&self) {
        let _ = self.wake.send(());
    }

    /// Closing the wake channel lets the worker run its last drain and exit.
    async fn finish(self) {
        let Self { wake, task } = self;
        drop(wake);
        if let Err(err) = task.await {
            warn!(error = %err, "drain worker ended abnormally");
        }
    }
}

async fn run_drains(session: Arc<ScanSession>, mut signals: mpsc::UnboundedReceiver<()>) {
    while signals.recv().await.is_some() {
        while signals.try_recv().is_ok() {}

        let session = Arc::clone(&session);
        if let Err(err) = tokio::task::spawn_blocking(move || session.drain()).await {
            warn!(error = %err, "drain worker failed");
        }
    }
}
