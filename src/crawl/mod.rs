// src/crawl/mod.rs
// =============================================================================
// This module is the crawl engine.
//
// Submodules:
// - classify: sitemap-or-page decision for a discovered URL
// - resolver: root sitemap -> flat list of page URLs (stage one)
// - scrape: page URLs -> PageRecords under a concurrency cap (stage two)
// - pipeline: both stages behind one type, plus scrape_sitemap()
// - outcome: per-URL reports
// - worklist: task set + outstanding counter shared by both stages
// =============================================================================

mod classify;
mod outcome;
mod pipeline;
mod resolver;
mod scrape;
mod worklist;

#[cfg(test)]
mod fake;

pub use classify::{classify, is_sitemap_url, Classified};
pub use outcome::{Outcome, UrlReport};
pub use pipeline::{scrape_sitemap, CrawlReport, SitemapScraper};
pub use resolver::{ResolvedSitemap, SitemapResolver};
pub use scrape::{BoundedScraper, ScrapeReport};
