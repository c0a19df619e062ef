use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use crate::config::LocationCodeConfig;
use crate::workflows::scan_intake::domain::{LocationRecord, ProductRecord};
use crate::workflows::scan_intake::repository::{
    InMemoryLocationRepository, InMemoryProductRepository, LocationRepository, ProductRepository,
};
use crate::workflows::scan_intake::{Classifier, ScanSession};

pub(super) const WIDGET_GTIN: &str = "0123456789012";
pub(super) const CEREAL_UPC: &str = "036000291452";
pub(super) const UNLISTED_GTIN: &str = "96385074";
pub(super) const AISLE_SHELF: &str = "SLP00420117";
pub(super) const UNLISTED_SHELF: &str = "SLP99999999";

pub(super) fn widget() -> ProductRecord {
    ProductRecord {
        gtin: WIDGET_GTIN.to_string(),
        description: "Widget, blue, 12 pack".to_string(),
        brand: Some("Acme".to_string()),
    }
}

pub(super) fn cereal() -> ProductRecord {
    ProductRecord {
        gtin: CEREAL_UPC.to_string(),
        description: "Oat cereal 510g".to_string(),
        brand: None,
    }
}

pub(super) fn aisle_shelf() -> LocationRecord {
    LocationRecord {
        code: AISLE_SHELF.to_string(),
        zone: "ambient".to_string(),
        aisle: 42,
        shelf: 117,
    }
}

pub(super) fn products() -> InMemoryProductRepository {
    InMemoryProductRepository::new([widget(), cereal()])
}

pub(super) fn locations() -> InMemoryLocationRepository {
    InMemoryLocationRepository::new([aisle_shelf()])
}

pub(super) fn classifier() -> Classifier {
    Classifier::standard(
        Arc::new(products()),
        Arc::new(locations()),
        &LocationCodeConfig::default(),
    )
}

pub(super) fn session() -> Arc<ScanSession> {
    Arc::new(ScanSession::new(classifier()))
}

/// Product repository that remembers every barcode it was asked about.
#[derive(Debug, Default)]
pub(super) struct RecordingProducts {
    inner: InMemoryProductRepository,
    lookups: Mutex<Vec<String>>,
}

impl RecordingProducts {
    pub(super) fn new(inner: InMemoryProductRepository) -> Self {
        Self {
            inner,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookup mutex poisoned").clone()
    }
}

impl ProductRepository for RecordingProducts {
    fn find(&self, barcode: &str) -> Option<ProductRecord> {
        self.lookups
            .lock()
            .expect("lookup mutex poisoned")
            .push(barcode.to_string());
        self.inner.find(barcode)
    }
}

/// Location repository that remembers every barcode it was asked about.
#[derive(Debug, Default)]
pub(super) struct RecordingLocations {
    inner: InMemoryLocationRepository,
    lookups: Mutex<Vec<String>>,
}

impl RecordingLocations {
    pub(super) fn new(inner: InMemoryLocationRepository) -> Self {
        Self {
            inner,
            lookups: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn lookups(&self) -> Vec<String> {
        self.lookups.lock().expect("lookup mutex poisoned").clone()
    }
}

impl LocationRepository for RecordingLocations {
    fn find(&self, barcode: &str) -> Option<LocationRecord> {
        self.lookups
            .lock()
            .expect("lookup mutex poisoned")
            .push(barcode.to_string());
        self.inner.find(barcode)
    }
}

/// Product repository whose lookups block until the test releases them (or
/// drops the release sender), simulating a slow catalog backend.
#[derive(Debug)]
pub(super) struct GatedProducts {
    inner: InMemoryProductRepository,
    entered: Mutex<mpsc::Sender<()>>,
    release: Mutex<mpsc::Receiver<()>>,
}

pub(super) struct Gate {
    pub(super) entered: mpsc::Receiver<()>,
    pub(super) release: mpsc::Sender<()>,
}

impl GatedProducts {
    pub(super) fn new(inner: InMemoryProductRepository) -> (Self, Gate) {
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let repository = Self {
            inner,
            entered: Mutex::new(entered_tx),
            release: Mutex::new(release_rx),
        };
        let gate = Gate {
            entered: entered_rx,
            release: release_tx,
        };
        (repository, gate)
    }
}

impl ProductRepository for GatedProducts {
    fn find(&self, barcode: &str) -> Option<ProductRecord> {
        let _ = self.entered.lock().expect("gate mutex poisoned").send(());
        let _ = self.release.lock().expect("gate mutex poisoned").recv();
        self.inner.find(barcode)
    }
}

/// Yield to the runtime until the session reports `expected` pending scans.
pub(super) async fn wait_for_pending(session: &ScanSession, expected: usize) {
    for _ in 0..10_000 {
        if session.pending_count() == expected {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!(
        "expected {expected} pending scans, found {}",
        session.pending_count()
    );
}

/// Block on a lookup having started without stalling the runtime.
pub(super) async fn wait_for_lookup(entered: mpsc::Receiver<()>) -> mpsc::Receiver<()> {
    tokio::task::spawn_blocking(move || {
        entered.recv().expect("lookup started");
        entered
    })
    .await
    .expect("lookup wait task")
}
