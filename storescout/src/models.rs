//! Data models for search results and verification records.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

use crate::utils::Timestamp;

/// Title used when the search service omits one.
pub const DEFAULT_TITLE: &str = "Shop name not available";

/// Whether a store offers a newsletter signup.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NewsletterFlag {
    /// A signup was found.
    Yes,
    /// No signup was found.
    No,
}

impl From<bool> for NewsletterFlag {
    fn from(value: bool) -> Self {
        if value {
            Self::Yes
        } else {
            Self::No
        }
    }
}

impl fmt::Display for NewsletterFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yes => write!(f, "Yes"),
            Self::No => write!(f, "No"),
        }
    }
}

/// A store returned by the search service. Identity is the url.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    url: String,
    title: String,
    logo_url: String,
    has_newsletter: NewsletterFlag,
}

impl SearchResult {
    /// Creates a search result.
    ///
    /// Returns `None` when the url is blank, since the url is the identity
    /// key. A blank title falls back to [`DEFAULT_TITLE`] and a missing logo
    /// falls back to `logo_placeholder`.
    #[must_use]
    pub fn new(
        url: impl Into<String>,
        title: Option<String>,
        logo_url: Option<String>,
        has_newsletter: NewsletterFlag,
        logo_placeholder: &str,
    ) -> Option<Self> {
        let url = url.into().trim().to_string();
        if url.is_empty() {
            return None;
        }
        let title = title
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TITLE.to_string());
        let logo_url = logo_url
            .filter(|l| !l.trim().is_empty())
            .unwrap_or_else(|| logo_placeholder.to_string());
        Some(Self {
            url,
            title,
            logo_url,
            has_newsletter,
        })
    }

    /// The store url.
    #[must_use]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The store name.
    #[must_use]
    pub fn title(&self) -> &str {
        &self.title
    }

    /// The logo url or placeholder.
    #[must_use]
    pub fn logo_url(&self) -> &str {
        &self.logo_url
    }

    /// Newsletter availability.
    #[must_use]
    pub fn has_newsletter(&self) -> NewsletterFlag {
        self.has_newsletter
    }
}

/// The search parameters for one session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchQuery {
    /// Country to search in.
    pub country: String,
    /// City to search in.
    pub city: String,
    /// Product category.
    pub category: String,
}

impl SearchQuery {
    /// Creates a query, trimming each field.
    #[must_use]
    pub fn new(
        country: impl Into<String>,
        city: impl Into<String>,
        category: impl Into<String>,
    ) -> Self {
        Self {
            country: country.into().trim().to_string(),
            city: city.into().trim().to_string(),
            category: category.into().trim().to_string(),
        }
    }

    /// Names of the fields that are empty.
    #[must_use]
    pub fn missing_fields(&self) -> Vec<&'static str> {
        [
            ("country", &self.country),
            ("city", &self.city),
            ("category", &self.category),
        ]
        .into_iter()
        .filter(|(_, value)| value.is_empty())
        .map(|(name, _)| name)
        .collect()
    }
}

/// One page of search results as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SearchPage {
    /// Results on this page, in service order.
    pub results: Vec<SearchResult>,
    /// Whether the service has further pages.
    pub has_more: bool,
    /// The service's estimate of the total result count.
    pub total_results: u64,
    /// Optional 0-100 progress estimate.
    pub progress: Option<u8>,
}

/// Outcome of verifying a single url.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyOutcome {
    /// Whether the site responded.
    #[serde(default)]
    pub is_active: bool,
    /// Whether a newsletter signup was found.
    #[serde(default)]
    pub has_newsletter: bool,
    /// Whether an RSS feed was found.
    #[serde(default, rename = "hasRSS", alias = "hasRss")]
    pub has_rss: bool,
}

/// The verification result for one input row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// The verified url.
    pub url: String,
    /// Whether the site responded.
    pub is_active: bool,
    /// Whether a newsletter signup was found.
    pub has_newsletter: bool,
    /// Whether an RSS feed was found.
    pub has_rss: bool,
    /// When the verify call was made.
    pub checked_at: Timestamp,
    /// Set when the verify call failed.
    pub error: Option<String>,
}

impl VerificationRecord {
    /// Builds a record from a successful verify call.
    #[must_use]
    pub fn verified(url: impl Into<String>, outcome: VerifyOutcome, checked_at: Timestamp) -> Self {
        Self {
            url: url.into(),
            is_active: outcome.is_active,
            has_newsletter: outcome.has_newsletter,
            has_rss: outcome.has_rss,
            checked_at,
            error: None,
        }
    }

    /// Builds a record for a failed verify call. All flags are false.
    #[must_use]
    pub fn failed(url: impl Into<String>, error: impl Into<String>, checked_at: Timestamp) -> Self {
        Self {
            url: url.into(),
            is_active: false,
            has_newsletter: false,
            has_rss: false,
            checked_at,
            error: Some(error.into()),
        }
    }

    /// Whether the verify call failed.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

/// Verification records in input order.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VerificationReport {
    records: Vec<VerificationRecord>,
}

impl VerificationReport {
    /// Creates an empty report.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a record.
    pub fn push(&mut self, record: VerificationRecord) {
        self.records.push(record);
    }

    /// The records in input order.
    #[must_use]
    pub fn records(&self) -> &[VerificationRecord] {
        &self.records
    }

    /// Number of records.
    #[must_use]
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the report is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Number of records whose verify call failed.
    #[must_use]
    pub fn failed_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_error()).count()
    }

    /// Number of records reported active.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.records.iter().filter(|r| r.is_active).count()
    }

    /// Iterates over the records.
    pub fn iter(&self) -> std::slice::Iter<'_, VerificationRecord> {
        self.records.iter()
    }
}

impl IntoIterator for VerificationReport {
    type Item = VerificationRecord;
    type IntoIter = std::vec::IntoIter<VerificationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.into_iter()
    }
}

impl<'a> IntoIterator for &'a VerificationReport {
    type Item = &'a VerificationRecord;
    type IntoIter = std::slice::Iter<'a, VerificationRecord>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}

/// One uploaded CSV row keyed by header name.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRow {
    cells: HashMap<String, String>,
}

impl RawRow {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets a cell value.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<String>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a cell value in place.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<String>) {
        self.cells.insert(column.into(), value.into());
    }

    /// Gets a cell value by exact column name.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&str> {
        self.cells.get(column).map(String::as_str)
    }

    /// Whether every cell is blank.
    #[must_use]
    pub fn is_blank(&self) -> bool {
        self.cells.values().all(|v| v.trim().is_empty())
    }
}

impl<K, V> FromIterator<(K, V)> for RawRow
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self {
            cells: iter
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        }
    }
}
