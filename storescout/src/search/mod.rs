//! Paginated store search.
//!
//! A [`SearchController`] owns one search session at a time. It requests
//! pages strictly one after another, merges them into a
//! [`ResultAccumulator`](crate::accumulator::ResultAccumulator), and moves
//! through the [`SearchState`] machine:
//!
//! ```text
//! Idle -> Running -> Completed { more_available } | Cancelled | Failed
//!            ^                 |                      |
//!            +---- load_more --+----------------------+
//! ```

mod controller;
mod session;
mod state;

pub use controller::{SearchController, SearchOutcome, SearchProgress};
pub use session::SearchSession;
pub use state::SearchState;
