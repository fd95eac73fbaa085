// src/lib.rs
// =============================================================================
// sitemap-seo: resolve a sitemap index into page URLs, then scrape the title,
// first h1 and meta description of every page.
//
// Modules:
// - config: settings shared by the whole crawl
// - error: TransportError / ParseError / CrawlError
// - fetch: the HTTP transport (and the Fetch trait it implements)
// - parse: the Parser trait and its HTML/sitemap implementation
// - crawl: the two-stage crawl engine
// =============================================================================

pub mod config;
pub mod crawl;
pub mod error;
pub mod fetch;
pub mod parse;

pub use config::CrawlConfig;
pub use crawl::{scrape_sitemap, CrawlReport, Outcome, SitemapScraper, UrlReport};
pub use error::{CrawlError, ParseError, TransportError};
pub use fetch::{Document, Fetch, HttpTransport};
pub use parse::{DefaultParser, PageRecord, Parser};
