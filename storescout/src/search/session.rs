//! Search session bookkeeping.

use serde::Serialize;

use crate::models::SearchQuery;
use crate::utils::{now_utc, SearchId, Timestamp};

/// One logical search, possibly spanning many page requests.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchSession {
    /// Token identifying the session to the service.
    pub search_id: SearchId,
    /// The filters being searched.
    pub query: SearchQuery,
    /// The next page to request. Starts at 1.
    pub current_page: u32,
    /// Whether a run is currently requesting pages for this session.
    pub active: bool,
    /// When the session was created.
    pub started_at: Timestamp,
}

impl SearchSession {
    pub(crate) fn new(search_id: SearchId, query: SearchQuery) -> Self {
        Self {
            search_id,
            query,
            current_page: 1,
            active: true,
            started_at: now_utc(),
        }
    }

    pub(crate) fn advance(&mut self) {
        self.current_page = self.current_page.saturating_add(1);
    }
}
