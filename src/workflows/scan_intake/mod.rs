//! Conveyor scan intake: hardware notifications are buffered by a
//! [`ScanSession`], classified against the product and shelf-location
//! schemes, and committed to a [`ProcessingUnit`] when the run completes.

pub mod buffer;
pub mod classifier;
pub mod codes;
pub mod completion;
pub mod domain;
pub mod hardware;
pub mod intake;
pub mod repository;
pub mod session;

#[cfg(test)]
mod tests;

pub use buffer::ScanBuffer;
pub use classifier::Classifier;
pub use codes::{CodeValidator, GtinValidator, ShelfLocationValidator};
pub use completion::{on_sorting_completed, SortingCompletionListener};
pub use domain::{
    LocationRecord, ProcessingUnit, ProductRecord, RunSummary, ScannedItem, SessionState,
};
pub use hardware::{
    ChannelEventSource, HardwareEventSource, ScanNotification, SortingCompleted, Subscription,
    SubscriptionId,
};
pub use intake::{DrainPolicy, ScanIntake};
pub use repository::{
    InMemoryLocationRepository, InMemoryProductRepository, LocationRepository, ProductRepository,
};
pub use session::{ScanSession, SessionError};
