use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use tracing::{debug, error, info, warn};

use super::buffer::ScanBuffer;
use super::classifier::Classifier;
use super::domain::{ProcessingUnit, RunSummary, ScannedItem, SessionState};

/// Scan session bracketing one sorting run per processing unit.
///
/// Scans may be added from any thread at any time. Buffer, classified
/// results and run binding share one lock; classification happens with that
/// lock released so slow lookups never hold up incoming scans.
#[derive(Debug)]
pub struct ScanSession {
    classifier: Classifier,
    inner: Mutex<SessionInner>,
    drain_lock: Mutex<()>,
}

#[derive(Debug, Default)]
struct SessionInner {
    run: Option<ActiveRun>,
    buffer: ScanBuffer,
    classified: Vec<ScannedItem>,
    in_flight: usize,
}

#[derive(Debug)]
struct ActiveRun {
    unit: Arc<ProcessingUnit>,
    started_at: DateTime<Utc>,
}

impl SessionInner {
    fn state(&self) -> SessionState {
        match self.run {
            Some(_) => SessionState::Active,
            None => SessionState::Idle,
        }
    }

    fn pending(&self) -> usize {
        self.buffer.len() + self.in_flight
    }
}

impl ScanSession {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            inner: Mutex::new(SessionInner::default()),
            drain_lock: Mutex::new(()),
        }
    }

    /// Begin a run bound to `unit`. Anything still buffered from before the
    /// run is discarded.
    pub fn start(&self, unit: Arc<ProcessingUnit>) -> Result<(), SessionError> {
        let mut inner = self.lock();

        if let Some(run) = &inner.run {
            error!(
                active_unit = run.unit.unit_id(),
                requested_unit = unit.unit_id(),
                "start requested before the previous run was completed"
            );
            return Err(SessionError::AlreadyActive {
                unit_id: run.unit.unit_id().to_string(),
            });
        }

        let discarded = inner.buffer.clear();
        if discarded > 0 {
            warn!(
                unit = unit.unit_id(),
                discarded, "discarding scans received before the run started"
            );
        }
        inner.classified.clear();

        info!(unit = unit.unit_id(), "scan run started");
        inner.run = Some(ActiveRun {
            unit,
            started_at: Utc::now(),
        });
        Ok(())
    }

    /// Queue a raw scan. Accepted in any state and never blocks on lookups.
    pub fn add_barcode(&self, barcode: impl Into<String>) {
        let barcode = barcode.into();
        let mut inner = self.lock();
        debug!(
            barcode = barcode.as_str(),
            state = inner.state().label(),
            "scan queued"
        );
        inner.buffer.push(barcode);
    }

    /// Classify every buffered scan in arrival order, returning how many were
    /// classified. Does nothing while idle.
    pub fn drain(&self) -> usize {
        let _drain = self
            .drain_lock
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let mut classified = 0;

        loop {
            let barcode = {
                let mut inner = self.lock();
                if inner.run.is_none() {
                    break;
                }
                match inner.buffer.pop() {
                    Some(barcode) => {
                        inner.in_flight += 1;
                        barcode
                    }
                    None => break,
                }
            };

            let item = self.classifier.classify(&barcode);

            let mut inner = self.lock();
            inner.in_flight -= 1;
            inner.classified.push(item);
            classified += 1;
        }

        if classified > 0 {
            debug!(classified, "drained scan buffer");
        }
        classified
    }

    /// Commit the run's classified scans to the bound unit and return to
    /// idle. Unclassified scans are reported first, even on an idle session
    /// holding scans from before a run; otherwise an idle session fails with
    /// [`SessionError::NotActive`].
    pub fn complete(&self) -> Result<RunSummary, SessionError> {
        let mut inner = self.lock();
        let pending = inner.pending();

        if pending > 0 {
            error!(
                unit = ?inner.run.as_ref().map(|run| run.unit.unit_id()),
                pending, "complete requested with unclassified scans"
            );
            return Err(SessionError::PendingUnclassifiedScans { pending });
        }

        let Some(run) = inner.run.take() else {
            error!("complete requested with no active run");
            return Err(SessionError::NotActive);
        };

        let items = std::mem::take(&mut inner.classified);
        let items_committed = items.len();
        run.unit.append_scans(items);

        let summary = RunSummary {
            unit_id: run.unit.unit_id().to_string(),
            items_committed,
            started_at: run.started_at,
            completed_at: Utc::now(),
        };
        info!(
            unit = summary.unit_id.as_str(),
            items = items_committed,
            "scan run committed"
        );
        Ok(summary)
    }

    pub fn state(&self) -> SessionState {
        self.lock().state()
    }

    /// Scans buffered or mid-classification.
    pub fn pending_count(&self) -> usize {
        self.lock().pending()
    }

    pub fn classified_count(&self) -> usize {
        self.lock().classified.len()
    }

    /// Identifier of the unit bound to the current run, if any.
    pub fn bound_unit(&self) -> Option<String> {
        self.lock()
            .run
            .as_ref()
            .map(|run| run.unit.unit_id().to_string())
    }

    fn lock(&self) -> MutexGuard<'_, SessionInner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Sequencing violations between the session and its driver. None of these
/// are retryable.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SessionError {
    #[error(
        "scan session is already running for unit {unit_id}; the previous run was never completed"
    )]
    AlreadyActive { unit_id: String },
    #[error("{pending} scanned barcode(s) have not been classified")]
    PendingUnclassifiedScans { pending: usize },
    #[error("scan session was not started")]
    NotActive,
}
