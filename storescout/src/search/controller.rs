//! The pagination controller.

use parking_lot::Mutex;
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::{debug, info, warn};

use super::session::SearchSession;
use super::state::SearchState;
use crate::accumulator::ResultAccumulator;
use crate::cancellation::{CancelReason, CancellationToken};
use crate::client::ServiceClient;
use crate::config::ScoutConfig;
use crate::errors::{Result, ScoutError, ValidationError};
use crate::events::{
    EventSink, NoOpEventSink, SEARCH_CANCELLED, SEARCH_COMPLETED, SEARCH_DISCARDED,
    SEARCH_FAILED, SEARCH_PAGE_REQUESTED, SEARCH_PROGRESS, SEARCH_STARTED,
};
use crate::models::{SearchPage, SearchQuery, SearchResult};
use crate::utils::{generate_search_id, SearchId};

/// Progress after a page has been merged.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchProgress {
    /// Session the page belongs to.
    pub search_id: SearchId,
    /// The page that was merged.
    pub page: u32,
    /// Distinct results accumulated so far.
    pub shown: usize,
    /// Total reported by the service.
    pub total_results: u64,
    /// Whether the service reported more pages.
    pub has_more: bool,
    /// `shown` as a percentage of `total_results`, capped at 100.
    pub percent: f64,
    /// The service's own progress estimate, if it sent one.
    pub service_progress: Option<u8>,
}

impl SearchProgress {
    #[allow(clippy::cast_precision_loss)]
    fn percent_of(shown: usize, total: u64) -> f64 {
        if total == 0 {
            0.0
        } else {
            ((shown as f64 / total as f64) * 100.0).min(100.0)
        }
    }
}

/// How a single `start` or `load_more` run ended.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchOutcome {
    /// Session the run belonged to.
    pub search_id: SearchId,
    /// State the run left the controller in.
    pub state: SearchState,
    /// A newer search replaced this run before it finished.
    pub superseded: bool,
    /// Pages merged by this run.
    pub pages_fetched: u32,
    /// Distinct results accumulated when the run ended.
    pub shown: usize,
    /// Last total reported by the service.
    pub total_results: u64,
    /// User-facing failure message when the run failed.
    pub error: Option<String>,
}

/// Everything a run needs to recognise whether it is still current.
struct RunTicket {
    search_id: SearchId,
    query: SearchQuery,
    token: Arc<CancellationToken>,
}

#[derive(Default)]
struct Inner {
    state: SearchState,
    session: Option<SearchSession>,
    accumulator: ResultAccumulator,
    total_results: u64,
    last_error: Option<String>,
    run_token: Option<Arc<CancellationToken>>,
    pending_requests: usize,
}

impl Inner {
    fn is_current(&self, ticket: &RunTicket) -> bool {
        !ticket.token.is_cancelled()
            && self.state == SearchState::Running
            && self
                .session
                .as_ref()
                .is_some_and(|s| s.search_id == ticket.search_id)
    }

    fn finish(&mut self, state: SearchState) {
        self.state = state;
        self.run_token = None;
        if let Some(session) = self.session.as_mut() {
            session.active = false;
        }
    }
}

enum Step {
    Continue,
    Stop,
}

/// Marks one page request as in flight until dropped.
struct InFlight<'a> {
    inner: &'a Mutex<Inner>,
    request_done: &'a Notify,
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        {
            let mut inner = self.inner.lock();
            inner.pending_requests = inner.pending_requests.saturating_sub(1);
        }
        self.request_done.notify_waiters();
    }
}

type PendingEvents = Vec<(&'static str, serde_json::Value)>;

/// Drives a paginated search session.
///
/// `start` and `load_more` run until the session completes, fails, is
/// cancelled, or is replaced. `cancel` takes `&self`, so another task holding
/// the controller behind an `Arc` can stop a run while a page is in flight.
/// The response to that page is then discarded instead of merged.
pub struct SearchController<C> {
    client: C,
    inner: Mutex<Inner>,
    request_done: Notify,
    sink: Arc<dyn EventSink>,
    max_pages_per_run: Option<u32>,
}

impl<C: ServiceClient> SearchController<C> {
    /// Creates a controller with no page limit and no event sink.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            inner: Mutex::new(Inner::default()),
            request_done: Notify::new(),
            sink: Arc::new(NoOpEventSink),
            max_pages_per_run: None,
        }
    }

    /// Creates a controller using the page limit from `config`.
    #[must_use]
    pub fn from_config(client: C, config: &ScoutConfig) -> Self {
        Self::new(client).with_max_pages_per_run(config.max_pages_per_run)
    }

    /// Sets the sink that receives progress and lifecycle events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Stops each run after this many pages if the service still has more.
    #[must_use]
    pub fn with_max_pages_per_run(mut self, pages: Option<u32>) -> Self {
        self.max_pages_per_run = pages.filter(|p| *p > 0);
        self
    }

    /// Starts a new search session and runs it.
    ///
    /// Any session already in progress is superseded: its run stops at its
    /// next check and whatever page it has in flight is dropped. Returns
    /// [`ScoutError::Validation`] without touching state when a field is
    /// blank.
    pub async fn start(
        &self,
        country: impl Into<String>,
        city: impl Into<String>,
        category: impl Into<String>,
    ) -> Result<SearchOutcome> {
        let query = SearchQuery::new(country, city, category);
        let missing = query.missing_fields();
        if !missing.is_empty() {
            return Err(ValidationError::missing(missing).into());
        }

        let ticket = {
            let mut inner = self.inner.lock();
            if let Some(previous) = inner.run_token.take() {
                previous.cancel(CancelReason::Superseded);
            }

            let search_id = generate_search_id();
            let token = Arc::new(CancellationToken::new());
            inner.session = Some(SearchSession::new(search_id, query.clone()));
            inner.accumulator.clear();
            inner.total_results = 0;
            inner.last_error = None;
            inner.state = SearchState::Running;
            inner.run_token = Some(Arc::clone(&token));

            RunTicket {
                search_id,
                query,
                token,
            }
        };

        info!(
            search_id = %ticket.search_id,
            country = %ticket.query.country,
            city = %ticket.query.city,
            category = %ticket.query.category,
            "Search started"
        );
        self.sink
            .emit(
                SEARCH_STARTED,
                Some(serde_json::json!({
                    "search_id": ticket.search_id,
                    "query": ticket.query,
                    "page": 1,
                    "resumed": false,
                })),
            )
            .await;

        Ok(self.drive(ticket).await)
    }

    /// Resumes the current session from its current page.
    ///
    /// Only valid after a run stopped at its page limit with more available,
    /// or after a cancel. Returns [`ScoutError::InvalidState`] otherwise. If
    /// a cancelled run still has a page request in flight, waits for that
    /// request to return before sending the next one.
    pub async fn load_more(&self) -> Result<SearchOutcome> {
        let (ticket, page) = loop {
            let request_done = self.request_done.notified();
            if let Some(resumed) = self.try_resume()? {
                break resumed;
            }
            debug!("Waiting for the previous page request to return");
            request_done.await;
        };

        info!(search_id = %ticket.search_id, page, "Search resumed");
        self.sink
            .emit(
                SEARCH_STARTED,
                Some(serde_json::json!({
                    "search_id": ticket.search_id,
                    "query": ticket.query,
                    "page": page,
                    "resumed": true,
                })),
            )
            .await;

        Ok(self.drive(ticket).await)
    }

    fn try_resume(&self) -> Result<Option<(RunTicket, u32)>> {
        let mut inner = self.inner.lock();
        if !inner.state.can_load_more() {
            return Err(ScoutError::InvalidState(format!(
                "cannot load more while {}",
                inner.state
            )));
        }
        if inner.pending_requests > 0 {
            return Ok(None);
        }
        let token = Arc::new(CancellationToken::new());
        let Some(session) = inner.session.as_mut() else {
            return Err(ScoutError::InvalidState(
                "no search session to resume".to_string(),
            ));
        };
        session.active = true;
        let ticket = RunTicket {
            search_id: session.search_id,
            query: session.query.clone(),
            token: Arc::clone(&token),
        };
        let page = session.current_page;
        inner.state = SearchState::Running;
        inner.last_error = None;
        inner.run_token = Some(token);
        Ok(Some((ticket, page)))
    }

    /// Stops the running session.
    ///
    /// Returns `false` if nothing was running. The run notices before its
    /// next request; a page already in flight is discarded when it arrives.
    pub fn cancel(&self) -> bool {
        let payload = {
            let mut inner = self.inner.lock();
            if inner.state != SearchState::Running {
                return false;
            }
            if let Some(token) = inner.run_token.as_ref() {
                token.cancel(CancelReason::User);
            }
            inner.finish(SearchState::Cancelled);

            let (search_id, page) = inner
                .session
                .as_ref()
                .map(|s| (Some(s.search_id), s.current_page))
                .unwrap_or((None, 0));
            serde_json::json!({
                "search_id": search_id,
                "page": page,
                "shown": inner.accumulator.len(),
                "reason": CancelReason::User.to_string(),
            })
        };

        info!(event_data = %payload, "Search stopped by user");
        self.sink.try_emit(SEARCH_CANCELLED, Some(payload));
        true
    }

    /// The current state.
    #[must_use]
    pub fn state(&self) -> SearchState {
        self.inner.lock().state
    }

    /// A copy of the current session, if one was started.
    #[must_use]
    pub fn session(&self) -> Option<SearchSession> {
        self.inner.lock().session.clone()
    }

    /// The accumulated results in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SearchResult> {
        self.inner.lock().accumulator.snapshot()
    }

    /// Number of accumulated results.
    #[must_use]
    pub fn shown(&self) -> usize {
        self.inner.lock().accumulator.len()
    }

    /// The last total reported by the service.
    #[must_use]
    pub fn total_results(&self) -> u64 {
        self.inner.lock().total_results
    }

    /// The user-facing message of the last failure, if the session failed.
    #[must_use]
    pub fn last_error(&self) -> Option<String> {
        self.inner.lock().last_error.clone()
    }

    async fn drive(&self, ticket: RunTicket) -> SearchOutcome {
        let mut pages_fetched = 0_u32;

        loop {
            let page = {
                let mut inner = self.inner.lock();
                if !inner.is_current(&ticket) {
                    break;
                }
                let Some(page) = inner.session.as_ref().map(|s| s.current_page) else {
                    break;
                };
                inner.pending_requests += 1;
                page
            };

            let response = {
                let _in_flight = InFlight {
                    inner: &self.inner,
                    request_done: &self.request_done,
                };
                debug!(search_id = %ticket.search_id, page, "Requesting page");
                self.sink
                    .emit(
                        SEARCH_PAGE_REQUESTED,
                        Some(serde_json::json!({"search_id": ticket.search_id, "page": page})),
                    )
                    .await;
                self.client
                    .search(&ticket.query, page, ticket.search_id)
                    .await
            };

            let (step, events) = self.apply_response(&ticket, page, response, &mut pages_fetched);
            for (event_type, data) in events {
                self.sink.emit(event_type, Some(data)).await;
            }
            if matches!(step, Step::Stop) {
                break;
            }
        }

        self.outcome(&ticket, pages_fetched)
    }

    fn apply_response(
        &self,
        ticket: &RunTicket,
        page: u32,
        response: Result<SearchPage>,
        pages_fetched: &mut u32,
    ) -> (Step, PendingEvents) {
        let mut events = PendingEvents::new();
        let mut inner = self.inner.lock();

        if !inner.is_current(ticket) {
            let reason = ticket
                .token
                .reason()
                .map_or_else(|| "stale session".to_string(), |r| r.to_string());
            debug!(search_id = %ticket.search_id, page, %reason, "Discarding page response");
            events.push((
                SEARCH_DISCARDED,
                serde_json::json!({
                    "search_id": ticket.search_id,
                    "page": page,
                    "reason": reason,
                }),
            ));
            return (Step::Stop, events);
        }

        let page_data = match response {
            Ok(page_data) => page_data,
            Err(err) => {
                let message = err.user_message();
                warn!(search_id = %ticket.search_id, page, error = %err, "Search page failed");
                inner.last_error = Some(message.clone());
                inner.finish(SearchState::Failed);
                events.push((
                    SEARCH_FAILED,
                    serde_json::json!({
                        "search_id": ticket.search_id,
                        "page": page,
                        "error": message,
                    }),
                ));
                return (Step::Stop, events);
            }
        };

        *pages_fetched += 1;
        let added = inner.accumulator.add(page_data.results);
        inner.total_results = page_data.total_results;

        let progress = SearchProgress {
            search_id: ticket.search_id,
            page,
            shown: inner.accumulator.len(),
            total_results: page_data.total_results,
            has_more: page_data.has_more,
            percent: SearchProgress::percent_of(
                inner.accumulator.len(),
                page_data.total_results,
            ),
            service_progress: page_data.progress,
        };
        debug!(
            search_id = %ticket.search_id,
            page,
            added,
            shown = progress.shown,
            total = progress.total_results,
            "Merged page"
        );
        if let Ok(data) = serde_json::to_value(&progress) {
            events.push((SEARCH_PROGRESS, data));
        }

        let paused = page_data.has_more
            && self
                .max_pages_per_run
                .is_some_and(|limit| *pages_fetched >= limit);

        if page_data.has_more {
            if let Some(session) = inner.session.as_mut() {
                session.advance();
            }
            if !paused {
                return (Step::Continue, events);
            }
        }

        inner.finish(SearchState::Completed {
            more_available: page_data.has_more,
        });
        info!(
            search_id = %ticket.search_id,
            shown = progress.shown,
            total = progress.total_results,
            more_available = page_data.has_more,
            "Search complete"
        );
        events.push((
            SEARCH_COMPLETED,
            serde_json::json!({
                "search_id": ticket.search_id,
                "total_results": progress.total_results,
                "shown": progress.shown,
                "has_more": page_data.has_more,
            }),
        ));

        (Step::Stop, events)
    }

    fn outcome(&self, ticket: &RunTicket, pages_fetched: u32) -> SearchOutcome {
        let inner = self.inner.lock();
        let owns_session = inner
            .session
            .as_ref()
            .is_some_and(|s| s.search_id == ticket.search_id);

        if owns_session {
            SearchOutcome {
                search_id: ticket.search_id,
                state: inner.state,
                superseded: false,
                pages_fetched,
                shown: inner.accumulator.len(),
                total_results: inner.total_results,
                error: inner.last_error.clone(),
            }
        } else {
            SearchOutcome {
                search_id: ticket.search_id,
                state: SearchState::Cancelled,
                superseded: true,
                pages_fetched,
                shown: 0,
                total_results: 0,
                error: None,
            }
        }
    }
}

impl<C> std::fmt::Debug for SearchController<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.inner.lock();
        f.debug_struct("SearchController")
            .field("state", &inner.state)
            .field("session", &inner.session)
            .field("shown", &inner.accumulator.len())
            .field("max_pages_per_run", &self.max_pages_per_run)
            .finish_non_exhaustive()
    }
}
