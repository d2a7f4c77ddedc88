//! Builders for test data.

use crate::models::{NewsletterFlag, RawRow, SearchPage, SearchResult};

/// Builds a search result titled after its url.
///
/// # Panics
///
/// Panics if `url` is blank.
#[must_use]
#[allow(clippy::expect_used)]
pub fn result(url: &str) -> SearchResult {
    SearchResult::new(
        url,
        Some(format!("Shop {url}")),
        None,
        NewsletterFlag::Yes,
        "logo_plugilo_black.svg",
    )
    .expect("fixture urls are never blank")
}

/// Builds a page holding one result per url.
#[must_use]
pub fn scripted_page(urls: &[&str], has_more: bool, total_results: u64) -> SearchPage {
    SearchPage {
        results: urls.iter().map(|u| result(u)).collect(),
        has_more,
        total_results,
        progress: None,
    }
}

/// Builds a raw CSV row from column/value pairs.
#[must_use]
pub fn row(cells: &[(&str, &str)]) -> RawRow {
    cells.iter().copied().collect()
}
