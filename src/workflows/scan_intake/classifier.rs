use std::sync::Arc;

use tracing::debug;

use super::codes::{CodeValidator, GtinValidator, ShelfLocationValidator};
use super::domain::ScannedItem;
use super::repository::{LocationRepository, ProductRepository};
use crate::config::LocationCodeConfig;

/// Validates a raw barcode against both code schemes and enriches it with
/// the matching catalog entries. Never fails: a barcode nobody recognises is
/// still a scanned item, just with both flags cleared.
#[derive(Debug, Clone)]
pub struct Classifier {
    product_codes: Arc<dyn CodeValidator>,
    products: Arc<dyn ProductRepository>,
    location_codes: Arc<dyn CodeValidator>,
    locations: Arc<dyn LocationRepository>,
}

impl Classifier {
    pub fn new(
        product_codes: Arc<dyn CodeValidator>,
        products: Arc<dyn ProductRepository>,
        location_codes: Arc<dyn CodeValidator>,
        locations: Arc<dyn LocationRepository>,
    ) -> Self {
        Self {
            product_codes,
            products,
            location_codes,
            locations,
        }
    }

    /// GTIN product codes plus shelf-location codes shaped by `config`.
    pub fn standard(
        products: Arc<dyn ProductRepository>,
        locations: Arc<dyn LocationRepository>,
        config: &LocationCodeConfig,
    ) -> Self {
        Self::new(
            Arc::new(GtinValidator),
            products,
            Arc::new(ShelfLocationValidator::from_config(config)),
            locations,
        )
    }

    pub fn classify(&self, barcode: &str) -> ScannedItem {
        let is_valid_product_code = self.product_codes.is_valid(barcode);
        let product = if is_valid_product_code {
            self.products.find(barcode)
        } else {
            None
        };

        let is_valid_location_code = self.location_codes.is_valid(barcode);
        let location = if is_valid_location_code {
            self.locations.find(barcode)
        } else {
            None
        };

        debug!(
            barcode,
            product_code = is_valid_product_code,
            product_found = product.is_some(),
            location_code = is_valid_location_code,
            location_found = location.is_some(),
            "classified scan"
        );

        ScannedItem {
            barcode: barcode.to_string(),
            is_valid_product_code,
            product,
            is_valid_location_code,
            location,
        }
    }
}
