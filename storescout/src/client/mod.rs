//! Clients for the external search and verification services.
//!
//! This module provides:
//! - The [`ServiceClient`] trait the controller and runner are written against
//! - An HTTP implementation backed by reqwest
//! - Wire types and decoding for the services' JSON bodies

#[cfg(feature = "http")]
mod http;
mod protocols;
mod wire;

#[cfg(feature = "http")]
pub use http::HttpServiceClient;
#[cfg(test)]
pub use protocols::MockServiceClient;
pub use protocols::ServiceClient;
pub use wire::{
    decode_search_page, decode_verify_outcome, service_error_message, SearchRequest,
    VerifyRequest, VERIFY_FEATURES,
};
