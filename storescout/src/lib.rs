//! # Storescout
//!
//! Paginated store search and website newsletter verification.
//!
//! Storescout drives two external services:
//!
//! - **Search**: fetches stores for a country, city and category page by
//!   page, merging pages into one deduplicated list that can be stopped,
//!   resumed and restarted at any time
//! - **Verification**: checks each site from an uploaded CSV for an active
//!   newsletter and RSS feed, one row at a time
//!
//! Results of either can be exported back to CSV.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use storescout::prelude::*;
//!
//! let config = ScoutConfig::from_env()?;
//! let client = HttpServiceClient::new(config.clone())?;
//! let controller = SearchController::from_config(client, &config);
//!
//! let outcome = controller.start("Germany", "Berlin", "coffee").await?;
//! let csv = search_results_csv(&controller.snapshot())?;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod accumulator;
pub mod cancellation;
pub mod client;
pub mod config;
pub mod errors;
pub mod events;
pub mod export;
pub mod input;
pub mod models;
pub mod search;
pub mod testing;
pub mod utils;
pub mod verify;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::accumulator::ResultAccumulator;
    pub use crate::cancellation::{CancelReason, CancellationToken};
    #[cfg(feature = "http")]
    pub use crate::client::HttpServiceClient;
    pub use crate::client::ServiceClient;
    pub use crate::config::ScoutConfig;
    pub use crate::errors::{Result, ScoutError, ValidationError};
    pub use crate::events::{EventSink, LoggingEventSink, NoOpEventSink};
    pub use crate::export::{
        search_results_csv, to_csv, verification_csv, write_csv_file, SEARCH_RESULTS_FILE,
        VERIFICATION_RESULTS_FILE,
    };
    pub use crate::input::{read_rows, read_rows_from_path};
    pub use crate::models::{
        NewsletterFlag, RawRow, SearchPage, SearchQuery, SearchResult, VerificationRecord,
        VerificationReport, VerifyOutcome,
    };
    pub use crate::search::{
        SearchController, SearchOutcome, SearchProgress, SearchSession, SearchState,
    };
    pub use crate::utils::{generate_search_id, SearchId, Timestamp};
    pub use crate::verify::{resolve_url, VerificationRunner};
}
