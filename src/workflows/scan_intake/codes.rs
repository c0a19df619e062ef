use std::fmt::Debug;

use crate::config::LocationCodeConfig;

/// Syntactic check for one barcode scheme. Must not perform lookups.
pub trait CodeValidator: Debug + Send + Sync {
    fn is_valid(&self, barcode: &str) -> bool;
}

/// GS1 trade item numbers: GTIN-8, GTIN-12 (UPC-A), GTIN-13 and GTIN-14.
#[derive(Debug, Clone, Copy, Default)]
pub struct GtinValidator;

const GTIN_LENGTHS: [usize; 4] = [8, 12, 13, 14];

impl CodeValidator for GtinValidator {
    fn is_valid(&self, barcode: &str) -> bool {
        if !GTIN_LENGTHS.contains(&barcode.len()) {
            return false;
        }

        let digits: Option<Vec<u32>> = barcode.chars().map(|c| c.to_digit(10)).collect();
        match digits {
            Some(digits) => has_valid_check_digit(&digits),
            None => false,
        }
    }
}

/// GS1 mod-10: weights alternate 3,1,3,... starting from the digit left of
/// the check digit.
fn has_valid_check_digit(digits: &[u32]) -> bool {
    let Some((check, body)) = digits.split_last() else {
        return false;
    };

    let sum: u32 = body
        .iter()
        .rev()
        .enumerate()
        .map(|(index, digit)| if index % 2 == 0 { digit * 3 } else { *digit })
        .sum();

    (10 - sum % 10) % 10 == *check
}

/// Shelf-location codes: a fixed ASCII prefix followed by a fixed number of
/// digits, e.g. `SLP00420117`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShelfLocationValidator {
    prefix: String,
    digits: usize,
}

impl ShelfLocationValidator {
    pub fn new(prefix: impl Into<String>, digits: u8) -> Self {
        Self {
            prefix: prefix.into(),
            digits: usize::from(digits),
        }
    }

    pub fn from_config(config: &LocationCodeConfig) -> Self {
        Self::new(config.prefix.clone(), config.digits)
    }
}

impl Default for ShelfLocationValidator {
    fn default() -> Self {
        Self::from_config(&LocationCodeConfig::default())
    }
}

impl CodeValidator for ShelfLocationValidator {
    fn is_valid(&self, barcode: &str) -> bool {
        match barcode.strip_prefix(self.prefix.as_str()) {
            Some(rest) => rest.len() == self.digits && rest.bytes().all(|b| b.is_ascii_digit()),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn gtin_accepts_all_supported_lengths() {
        let validator = GtinValidator;
        assert!(validator.is_valid("96385074"), "GTIN-8");
        assert!(validator.is_valid("036000291452"), "UPC-A");
        assert!(validator.is_valid("0123456789012"), "GTIN-13");
        assert!(validator.is_valid("10012345678902"), "GTIN-14");
    }

    #[test]
    fn gtin_rejects_bad_check_digit_length_and_characters() {
        let validator = GtinValidator;
        assert!(!validator.is_valid("0123456789013"));
        assert!(!validator.is_valid("01234567890"));
        assert!(!validator.is_valid("01234567890A2"));
        assert!(!validator.is_valid(""));
        assert!(!validator.is_valid("SLP00000001"));
    }

    #[test]
    fn shelf_location_requires_prefix_and_exact_digit_count() {
        let validator = ShelfLocationValidator::default();
        assert!(validator.is_valid("SLP00420117"));
        assert!(!validator.is_valid("SLP0042011"));
        assert!(!validator.is_valid("SLP004201170"));
        assert!(!validator.is_valid("slp00420117"));
        assert!(!validator.is_valid("SLP0042011X"));
        assert!(!validator.is_valid("0123456789012"));
    }

    #[test]
    fn shelf_location_honours_configured_shape() {
        let validator = ShelfLocationValidator::from_config(&LocationCodeConfig {
            prefix: "LOC".to_string(),
            digits: 4,
        });
        assert!(validator.is_valid("LOC0042"));
        assert!(!validator.is_valid("SLP00420117"));
    }
}
