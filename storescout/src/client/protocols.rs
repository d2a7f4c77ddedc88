//! The interface to the external services.

use async_trait::async_trait;
use std::sync::Arc;

use crate::errors::Result;
use crate::models::{SearchPage, SearchQuery, VerifyOutcome};
use crate::utils::SearchId;

/// Request/response access to the search and verification services.
///
/// Implementations hold no per-session state. Every failure is returned to
/// the caller, which decides whether it ends a search run or only marks one
/// verification row.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ServiceClient: Send + Sync {
    /// Fetches one page of stores for `query`. Pages start at 1.
    async fn search(&self, query: &SearchQuery, page: u32, search_id: SearchId)
        -> Result<SearchPage>;

    /// Checks a single website for liveness, newsletter and RSS presence.
    async fn verify(&self, url: &str) -> Result<VerifyOutcome>;
}

#[async_trait]
impl<T: ServiceClient + ?Sized> ServiceClient for Arc<T> {
    async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
        search_id: SearchId,
    ) -> Result<SearchPage> {
        (**self).search(query, page, search_id).await
    }

    async fn verify(&self, url: &str) -> Result<VerifyOutcome> {
        (**self).verify(url).await
    }
}
