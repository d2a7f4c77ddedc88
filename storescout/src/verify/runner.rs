//! Sequential verification of uploaded websites.

use std::sync::Arc;
use tracing::{debug, info, warn};

use super::aliases::resolve_url;
use crate::client::ServiceClient;
use crate::events::{EventSink, NoOpEventSink, VERIFY_COMPLETED, VERIFY_RECORD, VERIFY_STARTED};
use crate::models::{RawRow, VerificationRecord, VerificationReport};
use crate::utils::now_utc;

/// Error text stored on a record whose verify call failed.
pub const VERIFY_FAILED_MESSAGE: &str = "Failed to verify";

/// Verifies a batch of rows one url at a time.
///
/// Rows are processed strictly in input order and never concurrently. A
/// failed call produces a record with every flag false and
/// [`VERIFY_FAILED_MESSAGE`] as its error; the batch always runs to the end.
pub struct VerificationRunner<C> {
    client: C,
    sink: Arc<dyn EventSink>,
}

impl<C: ServiceClient> VerificationRunner<C> {
    /// Creates a runner with no event sink.
    #[must_use]
    pub fn new(client: C) -> Self {
        Self {
            client,
            sink: Arc::new(NoOpEventSink),
        }
    }

    /// Sets the sink that receives per-row events.
    #[must_use]
    pub fn with_event_sink(mut self, sink: Arc<dyn EventSink>) -> Self {
        self.sink = sink;
        self
    }

    /// Verifies every row that has a url and returns the records in order.
    pub async fn run(&self, rows: &[RawRow]) -> VerificationReport {
        let mut report = VerificationReport::new();
        info!(rows = rows.len(), "Verification started");
        self.sink
            .emit(VERIFY_STARTED, Some(serde_json::json!({"rows": rows.len()})))
            .await;

        for (index, row) in rows.iter().enumerate() {
            let Some(url) = resolve_url(row) else {
                debug!(row = index, "Skipping row without a url column");
                continue;
            };

            let checked_at = now_utc();
            let record = match self.client.verify(url).await {
                Ok(outcome) => VerificationRecord::verified(url, outcome, checked_at),
                Err(err) => {
                    warn!(row = index, %url, error = %err, "Verification failed");
                    VerificationRecord::failed(url, VERIFY_FAILED_MESSAGE, checked_at)
                }
            };

            self.sink
                .emit(
                    VERIFY_RECORD,
                    Some(serde_json::json!({
                        "row": index,
                        "position": report.len() + 1,
                        "url": record.url,
                        "is_active": record.is_active,
                        "error": record.error,
                    })),
                )
                .await;
            report.push(record);
        }

        let skipped = rows.len() - report.len();
        info!(
            verified = report.len(),
            failed = report.failed_count(),
            skipped,
            "Verification complete"
        );
        self.sink
            .emit(
                VERIFY_COMPLETED,
                Some(serde_json::json!({
                    "verified": report.len(),
                    "failed": report.failed_count(),
                    "active": report.active_count(),
                    "skipped": skipped,
                })),
            )
            .await;
        report
    }
}

impl<C> std::fmt::Debug for VerificationRunner<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("VerificationRunner").finish_non_exhaustive()
    }
}
