//! Conveyor scan intake: buffers barcode scans from the scanning hardware,
//! classifies them against the product and shelf-location schemes, and
//! commits each sorting run's results to its processing unit.

pub mod config;
pub mod error;
pub mod telemetry;
pub mod workflows;
