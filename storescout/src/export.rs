//! CSV export of search results and verification reports.

use serde::Serialize;
use std::path::Path;

use crate::errors::{Result, ScoutError};
use crate::models::{SearchResult, VerificationRecord};
use crate::utils::format_timestamp;

/// Default file name for exported search results.
pub const SEARCH_RESULTS_FILE: &str = "newsletter_search_results.csv";

/// Default file name for exported verification results.
pub const VERIFICATION_RESULTS_FILE: &str = "website_verification_results.csv";

/// One exported search result. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResultRow<'a> {
    url: &'a str,
    logo: &'a str,
    title: &'a str,
    #[serde(rename = "hasNewsletter")]
    has_newsletter: String,
}

impl<'a> From<&'a SearchResult> for SearchResultRow<'a> {
    fn from(result: &'a SearchResult) -> Self {
        Self {
            url: result.url(),
            logo: result.logo_url(),
            title: result.title(),
            has_newsletter: result.has_newsletter().to_string(),
        }
    }
}

/// One exported verification record. Field order is column order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationRow<'a> {
    url: &'a str,
    is_active: bool,
    has_newsletter: bool,
    #[serde(rename = "hasRSS")]
    has_rss: bool,
    last_checked: String,
    error: Option<&'a str>,
}

impl<'a> From<&'a VerificationRecord> for VerificationRow<'a> {
    fn from(record: &'a VerificationRecord) -> Self {
        Self {
            url: &record.url,
            is_active: record.is_active,
            has_newsletter: record.has_newsletter,
            has_rss: record.has_rss,
            last_checked: format_timestamp(&record.checked_at),
            error: record.error.as_deref(),
        }
    }
}

/// Serializes rows to CSV text with a header row.
///
/// The header comes from the row type's field names in declaration order.
/// An empty slice produces an empty string, since there is no row to take
/// the header from.
pub fn to_csv<T: Serialize>(rows: &[T]) -> Result<String> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.serialize(row)?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|e| ScoutError::Io(e.into_error()))?;
    String::from_utf8(bytes).map_err(|e| ScoutError::Decode(e.to_string()))
}

/// Exports search results with columns `url, logo, title, hasNewsletter`.
pub fn search_results_csv(results: &[SearchResult]) -> Result<String> {
    if results.is_empty() {
        return Ok("url,logo,title,hasNewsletter\n".to_string());
    }
    let rows: Vec<SearchResultRow<'_>> = results.iter().map(SearchResultRow::from).collect();
    to_csv(&rows)
}

/// Exports verification records with columns
/// `url, isActive, hasNewsletter, hasRSS, lastChecked, error`.
pub fn verification_csv<'a, I>(records: I) -> Result<String>
where
    I: IntoIterator<Item = &'a VerificationRecord>,
{
    let rows: Vec<VerificationRow<'_>> = records.into_iter().map(VerificationRow::from).collect();
    if rows.is_empty() {
        return Ok("url,isActive,hasNewsletter,hasRSS,lastChecked,error\n".to_string());
    }
    to_csv(&rows)
}

/// Writes CSV text to `path`, replacing any existing file.
pub fn write_csv_file(path: impl AsRef<Path>, csv_text: &str) -> Result<()> {
    std::fs::write(path, csv_text)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{NewsletterFlag, VerificationReport, VerifyOutcome};
    use crate::testing::result;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_search_results_csv() {
        let results = vec![
            result("https://a.shop"),
            SearchResult::new(
                "https://b.shop",
                Some("B, \"the\" shop".to_string()),
                Some("b.png".to_string()),
                NewsletterFlag::No,
                "unused",
            )
            .unwrap(),
        ];

        let csv_text = search_results_csv(&results).unwrap();

        assert_eq!(
            csv_text,
            "url,logo,title,hasNewsletter\n\
             https://a.shop,logo_plugilo_black.svg,Shop https://a.shop,Yes\n\
             https://b.shop,b.png,\"B, \"\"the\"\" shop\",No\n"
        );
    }

    #[test]
    fn test_empty_exports_keep_header() {
        assert_eq!(
            search_results_csv(&[]).unwrap(),
            "url,logo,title,hasNewsletter\n"
        );
        assert_eq!(
            verification_csv(&VerificationReport::new()).unwrap(),
            "url,isActive,hasNewsletter,hasRSS,lastChecked,error\n"
        );
    }

    #[test]
    fn test_verification_csv() {
        let at = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let records = vec![
            VerificationRecord::verified(
                "https://a.io",
                VerifyOutcome {
                    is_active: true,
                    has_newsletter: false,
                    has_rss: true,
                },
                at,
            ),
            VerificationRecord::failed("https://b.io", "Failed to verify", at),
        ];

        let csv_text = verification_csv(&records).unwrap();

        assert_eq!(
            csv_text,
            "url,isActive,hasNewsletter,hasRSS,lastChecked,error\n\
             https://a.io,true,false,true,2024-03-01T09:00:00.000Z,\n\
             https://b.io,false,false,false,2024-03-01T09:00:00.000Z,Failed to verify\n"
        );
    }

    #[test]
    fn test_to_csv_generic_rows() {
        #[derive(Serialize)]
        struct Row {
            name: &'static str,
            count: u32,
        }

        let text = to_csv(&[Row { name: "a", count: 1 }, Row { name: "b", count: 2 }]).unwrap();
        assert_eq!(text, "name,count\na,1\nb,2\n");
    }

    #[test]
    fn test_write_csv_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(SEARCH_RESULTS_FILE);

        write_csv_file(&path, "url\nhttps://a.io\n").unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "url\nhttps://a.io\n");
    }
}
