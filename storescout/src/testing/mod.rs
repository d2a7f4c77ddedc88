//! Testing utilities for code built on storescout.
//!
//! This module provides:
//! - A scripted in-memory [`ServiceClient`](crate::client::ServiceClient)
//! - Gates that hold a page request in flight until released
//! - Builders for search pages and rows

mod fixtures;
mod scripted;

pub use fixtures::{result, row, scripted_page};
pub use scripted::{PageGate, ScriptedServiceClient, SearchCall};
