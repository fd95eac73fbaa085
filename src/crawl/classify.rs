// src/crawl/classify.rs
// =============================================================================
// Decides whether a discovered URL is another sitemap or a page.
//
// The rule is deliberately dumb: if the URL contains "xml" anywhere, it is a
// sitemap. No request is made and the root element is never inspected. That
// works for the usual sitemap-index layouts (post-sitemap.xml,
// sitemap_index.xml, ...) but a page like /docs/xml-guide will be fetched as
// a sitemap and yield no pages.
// =============================================================================

use tracing::debug;

/// The two halves of a classified batch, each in input order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Classified {
    pub sitemaps: Vec<String>,
    pub pages: Vec<String>,
}

pub fn is_sitemap_url(url: &str) -> bool {
    url.contains("xml")
}

/// Partitions `urls` into sub-sitemaps and pages.
pub fn classify<I>(urls: I) -> Classified
where
    I: IntoIterator<Item = String>,
{
    let (sitemaps, pages): (Vec<String>, Vec<String>) =
        urls.into_iter().partition(|url| is_sitemap_url(url));

    if !sitemaps.is_empty() {
        debug!(count = sitemaps.len(), "found nested sitemaps");
    }

    Classified { sitemaps, pages }
}
