//! Batch website verification.

mod aliases;
mod runner;

pub use aliases::{resolve_url, URL_ALIASES};
pub use runner::{VerificationRunner, VERIFY_FAILED_MESSAGE};
