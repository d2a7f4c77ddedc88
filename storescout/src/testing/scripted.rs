//! A scripted service client.

use async_trait::async_trait;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;
use tokio::sync::Notify;

use crate::client::ServiceClient;
use crate::errors::{Result, ScoutError};
use crate::models::{SearchPage, SearchQuery, VerifyOutcome};
use crate::utils::SearchId;

/// Holds one page request in flight until released.
#[derive(Debug, Clone, Default)]
pub struct PageGate {
    entered: Arc<Notify>,
    release: Arc<Notify>,
}

impl PageGate {
    /// Waits until the gated request has been issued.
    pub async fn wait_entered(&self) {
        self.entered.notified().await;
    }

    /// Lets the gated request return its scripted response.
    pub fn release(&self) {
        self.release.notify_one();
    }
}

/// A recorded search call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchCall {
    /// The query searched.
    pub query: SearchQuery,
    /// The page requested.
    pub page: u32,
    /// The session token sent.
    pub search_id: SearchId,
}

/// An in-memory [`ServiceClient`] that replays scripted responses.
///
/// Search responses are queued per page number and verify responses per
/// url. A call with nothing queued fails with a 404 service error.
#[derive(Debug, Default)]
pub struct ScriptedServiceClient {
    pages: Mutex<HashMap<u32, VecDeque<Result<SearchPage>>>>,
    outcomes: Mutex<HashMap<String, VecDeque<Result<VerifyOutcome>>>>,
    gates: Mutex<HashMap<u32, PageGate>>,
    search_calls: Mutex<Vec<SearchCall>>,
    verify_calls: Mutex<Vec<String>>,
}

impl ScriptedServiceClient {
    /// Creates a client with nothing scripted.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a successful response for `page`.
    #[must_use]
    pub fn with_page(self, page: u32, response: SearchPage) -> Self {
        self.push_page(page, Ok(response));
        self
    }

    /// Queues a failure for `page`.
    #[must_use]
    pub fn with_page_error(self, page: u32, error: ScoutError) -> Self {
        self.push_page(page, Err(error));
        self
    }

    /// Queues a response for `page`.
    pub fn push_page(&self, page: u32, response: Result<SearchPage>) {
        self.pages.lock().entry(page).or_default().push_back(response);
    }

    /// Queues a successful verify response for `url`.
    #[must_use]
    pub fn with_outcome(self, url: &str, outcome: VerifyOutcome) -> Self {
        self.push_outcome(url, Ok(outcome));
        self
    }

    /// Queues a verify failure for `url`.
    #[must_use]
    pub fn with_verify_error(self, url: &str, error: ScoutError) -> Self {
        self.push_outcome(url, Err(error));
        self
    }

    /// Queues a verify response for `url`.
    pub fn push_outcome(&self, url: &str, response: Result<VerifyOutcome>) {
        self.outcomes
            .lock()
            .entry(url.to_string())
            .or_default()
            .push_back(response);
    }

    /// Holds the next request for `page` until the returned gate is released.
    pub fn hold_page(&self, page: u32) -> PageGate {
        let gate = PageGate::default();
        self.gates.lock().insert(page, gate.clone());
        gate
    }

    /// Every search call made so far.
    #[must_use]
    pub fn search_calls(&self) -> Vec<SearchCall> {
        self.search_calls.lock().clone()
    }

    /// Page numbers requested so far, in order.
    #[must_use]
    pub fn requested_pages(&self) -> Vec<u32> {
        self.search_calls.lock().iter().map(|c| c.page).collect()
    }

    /// Urls verified so far, in order.
    #[must_use]
    pub fn verify_calls(&self) -> Vec<String> {
        self.verify_calls.lock().clone()
    }
}

#[async_trait]
impl ServiceClient for ScriptedServiceClient {
    async fn search(
        &self,
        query: &SearchQuery,
        page: u32,
        search_id: SearchId,
    ) -> Result<SearchPage> {
        self.search_calls.lock().push(SearchCall {
            query: query.clone(),
            page,
            search_id,
        });

        let gate = self.gates.lock().remove(&page);
        if let Some(gate) = gate {
            gate.entered.notify_one();
            gate.release.notified().await;
        }

        let next = self.pages.lock().get_mut(&page).and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| Err(ScoutError::service(404, format!("no page {page} scripted"))))
    }

    async fn verify(&self, url: &str) -> Result<VerifyOutcome> {
        self.verify_calls.lock().push(url.to_string());
        let next = self.outcomes.lock().get_mut(url).and_then(VecDeque::pop_front);
        next.unwrap_or_else(|| Err(ScoutError::Network(format!("no outcome scripted for {url}"))))
    }
}
