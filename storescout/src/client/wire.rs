//! JSON wire formats for the search and verification services.

use serde::{Deserialize, Serialize};

use crate::errors::Result;
use crate::models::{NewsletterFlag, SearchPage, SearchQuery, SearchResult, VerifyOutcome};
use crate::utils::SearchId;

/// Features the verify service is asked to check.
pub const VERIFY_FEATURES: [&str; 2] = ["newsletter", "rss"];

/// Body of a search page request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchRequest<'a> {
    /// Country filter.
    pub country: &'a str,
    /// City filter.
    pub city: &'a str,
    /// Category filter.
    pub category: &'a str,
    /// 1-based page number.
    pub page: u32,
    /// Session token.
    pub search_id: String,
}

impl<'a> SearchRequest<'a> {
    /// Builds the request for one page of `query`.
    #[must_use]
    pub fn new(query: &'a SearchQuery, page: u32, search_id: SearchId) -> Self {
        Self {
            country: &query.country,
            city: &query.city,
            category: &query.category,
            page,
            search_id: search_id.to_string(),
        }
    }
}

/// Body of a verify request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest<'a> {
    /// The site to check.
    pub url: &'a str,
    /// Features to look for.
    pub check_features: [&'static str; 2],
}

impl<'a> VerifyRequest<'a> {
    /// Builds the request for `url`.
    #[must_use]
    pub fn new(url: &'a str) -> Self {
        Self {
            url,
            check_features: VERIFY_FEATURES,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireSearchResponse {
    #[serde(default)]
    results: Option<Vec<WireSearchItem>>,
    #[serde(default, alias = "hasMore")]
    has_more: Option<bool>,
    #[serde(default, alias = "totalResults")]
    total_results: Option<f64>,
    #[serde(default)]
    progress: Option<f64>,
}

#[derive(Debug, Deserialize)]
struct WireSearchItem {
    #[serde(default)]
    url: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default, alias = "logoUrl")]
    logo: Option<String>,
    #[serde(default, rename = "hasNewsletter", alias = "has_newsletter")]
    has_newsletter: Option<WireFlag>,
}

/// The newsletter flag arrives as a boolean, a number or as "Yes"/"No".
/// Any other shape reads as no newsletter.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum WireFlag {
    Bool(bool),
    Number(f64),
    Text(String),
    Other(serde::de::IgnoredAny),
}

impl WireFlag {
    fn into_flag(self) -> NewsletterFlag {
        match self {
            Self::Bool(b) => NewsletterFlag::from(b),
            Self::Number(n) => NewsletterFlag::from(n != 0.0 && !n.is_nan()),
            Self::Text(s) => NewsletterFlag::from(matches!(
                s.trim().to_ascii_lowercase().as_str(),
                "yes" | "true" | "1"
            )),
            Self::Other(_) => NewsletterFlag::No,
        }
    }
}

#[derive(Debug, Deserialize)]
struct WireError {
    error: Option<String>,
    message: Option<String>,
}

/// Decodes a search response body into a [`SearchPage`].
///
/// Items without a url are dropped. Totals and progress are clamped into
/// range rather than rejected, and a null total reads as zero.
pub fn decode_search_page(body: &str, logo_placeholder: &str) -> Result<SearchPage> {
    let wire: WireSearchResponse = serde_json::from_str(body)?;

    let results = wire
        .results
        .unwrap_or_default()
        .into_iter()
        .filter_map(|item| {
            let flag = item
                .has_newsletter
                .map_or(NewsletterFlag::No, WireFlag::into_flag);
            SearchResult::new(item.url?, item.title, item.logo, flag, logo_placeholder)
        })
        .collect();

    Ok(SearchPage {
        results,
        has_more: wire.has_more.unwrap_or(false),
        total_results: wire.total_results.map_or(0, clamp_count),
        progress: wire.progress.map(clamp_percent),
    })
}

/// Decodes a verify response body.
pub fn decode_verify_outcome(body: &str) -> Result<VerifyOutcome> {
    Ok(serde_json::from_str(body)?)
}

/// Extracts a human-readable message from an error response body.
///
/// Falls back to `fallback` when the body has no `error` or `message` field.
#[must_use]
pub fn service_error_message(body: &str, fallback: &str) -> String {
    serde_json::from_str::<WireError>(body)
        .ok()
        .and_then(|e| e.error.or(e.message))
        .filter(|m| !m.trim().is_empty())
        .unwrap_or_else(|| fallback.to_string())
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_count(value: f64) -> u64 {
    if value.is_finite() && value > 0.0 {
        value.round() as u64
    } else {
        0
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn clamp_percent(value: f64) -> u8 {
    if value.is_finite() {
        value.clamp(0.0, 100.0).round() as u8
    } else {
        0
    }
}
