use std::collections::HashMap;
use std::fmt::Debug;

use super::domain::{LocationRecord, ProductRecord};

/// Product catalog keyed by barcode. Implementations may block on I/O; the
/// session never calls them while holding its state lock.
pub trait ProductRepository: Debug + Send + Sync {
    fn find(&self, barcode: &str) -> Option<ProductRecord>;
}

/// Shelf-location directory keyed by barcode.
pub trait LocationRepository: Debug + Send + Sync {
    fn find(&self, barcode: &str) -> Option<LocationRecord>;
}

/// Fixed product catalog, keyed by the record's GTIN.
#[derive(Debug, Default, Clone)]
pub struct InMemoryProductRepository {
    records: HashMap<String, ProductRecord>,
}

impl InMemoryProductRepository {
    pub fn new(records: impl IntoIterator<Item = ProductRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.gtin.clone(), record))
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl ProductRepository for InMemoryProductRepository {
    fn find(&self, barcode: &str) -> Option<ProductRecord> {
        self.records.get(barcode).cloned()
    }
}

/// Fixed location directory, keyed by the record's code.
#[derive(Debug, Default, Clone)]
pub struct InMemoryLocationRepository {
    records: HashMap<String, LocationRecord>,
}

impl InMemoryLocationRepository {
    pub fn new(records: impl IntoIterator<Item = LocationRecord>) -> Self {
        let records = records
            .into_iter()
            .map(|record| (record.code.clone(), record))
            .collect();
        Self { records }
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl LocationRepository for InMemoryLocationRepository {
    fn find(&self, barcode: &str) -> Option<LocationRecord> {
        self.records.get(barcode).cloned()
    }
}
