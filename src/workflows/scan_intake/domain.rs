use std::sync::{Mutex, PoisonError};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Catalog entry for a retail product code (GTIN / UPC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProductRecord {
    pub gtin: String,
    pub description: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brand: Option<String>,
}

/// Directory entry for a shelf-location code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationRecord {
    pub code: String,
    pub zone: String,
    pub aisle: u16,
    pub shelf: u16,
}

/// One classified scan. Produced fully formed by the classifier and never
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScannedItem {
    pub barcode: String,
    pub is_valid_product_code: bool,
    pub product: Option<ProductRecord>,
    pub is_valid_location_code: bool,
    pub location: Option<LocationRecord>,
}

impl ScannedItem {
    /// True when the barcode matched neither code scheme.
    pub fn is_unrecognized(&self) -> bool {
        !self.is_valid_product_code && !self.is_valid_location_code
    }
}

/// Lifecycle of a scan session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionState {
    Idle,
    Active,
}

impl SessionState {
    pub fn label(&self) -> &'static str {
        match self {
            SessionState::Idle => "idle",
            SessionState::Active => "active",
        }
    }
}

/// Physical batch on the sorter; accumulates the classified scans of the runs
/// it was bound to.
#[derive(Debug)]
pub struct ProcessingUnit {
    unit_id: String,
    scans: Mutex<Vec<ScannedItem>>,
}

impl ProcessingUnit {
    pub fn new(unit_id: impl Into<String>) -> Self {
        Self {
            unit_id: unit_id.into(),
            scans: Mutex::new(Vec::new()),
        }
    }

    pub fn unit_id(&self) -> &str {
        &self.unit_id
    }

    /// Snapshot of every scan committed to this unit, in commit order.
    pub fn scans(&self) -> Vec<ScannedItem> {
        self.scans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn scan_count(&self) -> usize {
        self.scans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub(crate) fn append_scans(&self, items: Vec<ScannedItem>) {
        self.scans
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend(items);
    }
}

/// Outcome of a successful commit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub unit_id: String,
    pub items_committed: usize,
    pub started_at: DateTime<Utc>,
    pub completed_at: DateTime<Utc>,
}
