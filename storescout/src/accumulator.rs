//! Ordered, url-deduplicated collection of search results.

use std::collections::HashSet;

use crate::models::SearchResult;

/// Running total of search results across pages.
///
/// Elements keep their first-seen order and no two share a url. When a url
/// arrives again the earlier element is kept unchanged.
#[derive(Debug, Clone, Default)]
pub struct ResultAccumulator {
    results: Vec<SearchResult>,
    seen: HashSet<String>,
}

impl ResultAccumulator {
    /// Creates an empty accumulator.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Merges `new_results`, returning how many were genuinely new.
    ///
    /// Duplicates within `new_results` itself are also dropped, so adding the
    /// same batch twice leaves the same contents as adding it once.
    pub fn add<I>(&mut self, new_results: I) -> usize
    where
        I: IntoIterator<Item = SearchResult>,
    {
        let before = self.results.len();
        for result in new_results {
            if self.seen.insert(result.url().to_string()) {
                self.results.push(result);
            }
        }
        self.results.len() - before
    }

    /// A copy of the results in order.
    #[must_use]
    pub fn snapshot(&self) -> Vec<SearchResult> {
        self.results.clone()
    }

    /// Borrowed view of the results in order.
    #[must_use]
    pub fn as_slice(&self) -> &[SearchResult] {
        &self.results
    }

    /// Whether a result with `url` is present.
    #[must_use]
    pub fn contains(&self, url: &str) -> bool {
        self.seen.contains(url)
    }

    /// Number of distinct results.
    #[must_use]
    pub fn len(&self) -> usize {
        self.results.len()
    }

    /// Whether no results have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.results.is_empty()
    }

    /// Removes every result.
    pub fn clear(&mut self) {
        self.results.clear();
        self.seen.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewsletterFlag;
    use pretty_assertions::assert_eq;

    fn result(url: &str, title: &str) -> SearchResult {
        SearchResult::new(url, Some(title.to_string()), None, NewsletterFlag::Yes, "logo.svg")
            .unwrap()
    }

    fn urls(acc: &ResultAccumulator) -> Vec<String> {
        acc.snapshot().iter().map(|r| r.url().to_string()).collect()
    }

    #[test]
    fn test_dedup_across_pages() {
        let mut acc = ResultAccumulator::new();
        assert_eq!(acc.add(vec![result("a", "A"), result("b", "B")]), 2);
        assert_eq!(acc.add(vec![result("b", "B"), result("c", "C")]), 1);

        assert_eq!(urls(&acc), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_add_is_idempotent() {
        let batch = vec![result("a", "A"), result("b", "B")];

        let mut once = ResultAccumulator::new();
        once.add(batch.clone());

        let mut twice = ResultAccumulator::new();
        twice.add(batch.clone());
        assert_eq!(twice.add(batch), 0);

        assert_eq!(once.snapshot(), twice.snapshot());
    }

    #[test]
    fn test_first_occurrence_wins() {
        let mut acc = ResultAccumulator::new();
        acc.add(vec![result("a", "Original")]);
        acc.add(vec![result("a", "Renamed")]);

        assert_eq!(acc.len(), 1);
        assert_eq!(acc.snapshot()[0].title(), "Original");
    }

    #[test]
    fn test_duplicates_within_one_batch() {
        let mut acc = ResultAccumulator::new();
        assert_eq!(acc.add(vec![result("a", "1"), result("a", "2"), result("b", "3")]), 2);
        assert_eq!(urls(&acc), vec!["a", "b"]);
    }

    #[test]
    fn test_clear() {
        let mut acc = ResultAccumulator::new();
        acc.add(vec![result("a", "A")]);
        assert!(acc.contains("a"));

        acc.clear();
        assert!(acc.is_empty());
        assert!(!acc.contains("a"));

        acc.add(vec![result("a", "A")]);
        assert_eq!(acc.len(), 1);
    }
}
