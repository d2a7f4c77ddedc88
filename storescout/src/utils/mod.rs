//! Identifier and timestamp helpers.

mod ids;
pub mod timestamps;

pub use ids::{generate_search_id, SearchId};
pub use timestamps::{format_timestamp, now_utc, Timestamp};
