// src/crawl/outcome.rs
// =============================================================================
// What happened to each URL we were asked to process.
//
// Failures are never returned as errors from a crawl, so without these
// reports "this sitemap listed nothing" and "this sitemap failed to load"
// would look exactly the same to the caller.
// =============================================================================

use serde::{Deserialize, Serialize};

/// The result of processing one URL.
///
/// #[serde(tag = "outcome")] writes the variant name into an "outcome" field,
/// so JSON looks like {"url": "...", "outcome": "failed", "reason": "..."}
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum Outcome {
    /// A page was fetched and a record produced
    Scraped,
    /// A sitemap was fetched and its <loc> entries classified
    Resolved { pages: usize, sitemaps: usize },
    /// Deliberately not processed (blank URL, sitemap already visited)
    Skipped { reason: String },
    /// Fetch or parse failed
    Failed { reason: String },
    /// The crawl was cancelled before this URL was fetched
    Cancelled,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UrlReport {
    pub url: String,
    #[serde(flatten)]
    pub outcome: Outcome,
}

impl UrlReport {
    pub fn new(url: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            url: url.into(),
            outcome,
        }
    }

    pub fn skipped(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::new(
            url,
            Outcome::Skipped {
                reason: reason.into(),
            },
        )
    }

    pub fn failed(url: impl Into<String>, reason: impl ToString) -> Self {
        Self::new(
            url,
            Outcome::Failed {
                reason: reason.to_string(),
            },
        )
    }

    pub fn cancelled(url: impl Into<String>) -> Self {
        Self::new(url, Outcome::Cancelled)
    }

    pub fn is_failure(&self) -> bool {
        matches!(self.outcome, Outcome::Failed { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_failed_report_json_shape() {
        let report = UrlReport::failed("https://example.com", "request timed out");
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["url"], "https://example.com");
        assert_eq!(json["outcome"], "failed");
        assert_eq!(json["reason"], "request timed out");
        assert!(report.is_failure());
    }

    #[test]
    fn test_non_failures() {
        assert!(!UrlReport::new("u", Outcome::Scraped).is_failure());
        assert!(!UrlReport::skipped("u", "blank URL").is_failure());
        assert!(!UrlReport::cancelled("u").is_failure());
    }
}
