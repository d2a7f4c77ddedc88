//! Url column resolution for uploaded rows.

use crate::models::RawRow;

/// Column names that may carry a website url, in priority order.
pub const URL_ALIASES: [&str; 4] = ["url", "URL", "Website", "website"];

/// Returns the first populated url column of `row`, trimmed.
///
/// Matching is exact, so `Url` or `WEBSITE` are not recognised. A cell that
/// is empty or only whitespace counts as unpopulated.
#[must_use]
pub fn resolve_url(row: &RawRow) -> Option<&str> {
    URL_ALIASES
        .iter()
        .filter_map(|alias| row.get(alias))
        .map(str::trim)
        .find(|value| !value.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::row;

    #[test]
    fn test_url_beats_upper_case_alias() {
        let r = row(&[("URL", "https://upper.io"), ("url", "https://lower.io")]);
        assert_eq!(resolve_url(&r), Some("https://lower.io"));
    }

    #[test]
    fn test_falls_through_blank_aliases() {
        let r = row(&[("url", ""), ("URL", "  "), ("website", "https://site.io")]);
        assert_eq!(resolve_url(&r), Some("https://site.io"));
    }

    #[test]
    fn test_website_priority() {
        let r = row(&[("website", "https://lower.io"), ("Website", "https://title.io")]);
        assert_eq!(resolve_url(&r), Some("https://title.io"));
    }

    #[test]
    fn test_unrecognised_columns() {
        let r = row(&[("Url", "https://x.io"), ("WEBSITE", "https://y.io")]);
        assert_eq!(resolve_url(&r), None);
    }

    #[test]
    fn test_value_is_trimmed() {
        let r = row(&[("url", "  https://x.io \n")]);
        assert_eq!(resolve_url(&r), Some("https://x.io"));
    }
}
