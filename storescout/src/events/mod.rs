//! Event sinks for progress and lifecycle notifications.
//!
//! The search controller and verification runner report what they are doing
//! through an [`EventSink`]. Presentation layers subscribe by supplying their
//! own sink; the default discards everything.

mod sink;

pub use sink::{CollectingEventSink, EventSink, LoggingEventSink, NoOpEventSink};

/// A search run started.
pub const SEARCH_STARTED: &str = "search.started";
/// A page request is about to be sent.
pub const SEARCH_PAGE_REQUESTED: &str = "search.page_requested";
/// A page was merged into the accumulator.
pub const SEARCH_PROGRESS: &str = "search.progress";
/// A run finished because the service had no more pages or the page limit hit.
pub const SEARCH_COMPLETED: &str = "search.completed";
/// A run was cancelled by the consumer.
pub const SEARCH_CANCELLED: &str = "search.cancelled";
/// A run stopped on a service or network failure.
pub const SEARCH_FAILED: &str = "search.failed";
/// A page response arrived for a stale run and was dropped.
pub const SEARCH_DISCARDED: &str = "search.discarded";
/// A verification batch started.
pub const VERIFY_STARTED: &str = "verify.started";
/// One row was verified.
pub const VERIFY_RECORD: &str = "verify.record";
/// A verification batch finished.
pub const VERIFY_COMPLETED: &str = "verify.completed";
