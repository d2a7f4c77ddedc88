//! Cooperative cancellation for search runs.

mod token;

pub use token::{CancelReason, CancellationToken};
