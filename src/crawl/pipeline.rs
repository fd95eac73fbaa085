// src/crawl/pipeline.rs
// =============================================================================
// Wires the two stages together:
//
//   root sitemap --SitemapResolver--> page URLs --BoundedScraper--> records
//
// SitemapScraper owns the pieces both stages share: the config, the
// transport, the parser and the cancellation token.
// =============================================================================

use super::outcome::UrlReport;
use super::resolver::{ResolvedSitemap, SitemapResolver};
use super::scrape::{BoundedScraper, ScrapeReport};
use crate::config::CrawlConfig;
use crate::error::CrawlError;
use crate::fetch::{Fetch, HttpTransport};
use crate::parse::{DefaultParser, PageRecord, Parser};
use serde::Serialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

/// The result of a full crawl.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CrawlReport {
    /// Page URLs the resolver found (duplicates counted)
    pub pages_discovered: usize,
    pub records: Vec<PageRecord>,
    pub sitemap_reports: Vec<UrlReport>,
    pub page_reports: Vec<UrlReport>,
}

impl CrawlReport {
    /// Every failed sitemap or page, sitemaps first
    pub fn failures(&self) -> impl Iterator<Item = &UrlReport> {
        self.sitemap_reports
            .iter()
            .chain(self.page_reports.iter())
            .filter(|report| report.is_failure())
    }

    pub fn has_failures(&self) -> bool {
        self.failures().next().is_some()
    }
}

pub struct SitemapScraper {
    config: CrawlConfig,
    transport: Arc<dyn Fetch>,
    parser: Arc<dyn Parser>,
    cancel: CancellationToken,
}

impl SitemapScraper {
    /// Validates `config` and sets up the HTTP transport and default parser.
    pub fn new(config: CrawlConfig) -> Result<Self, CrawlError> {
        config.validate()?;
        let transport = HttpTransport::new(&config)?;

        Ok(Self {
            config,
            transport: Arc::new(transport),
            parser: Arc::new(DefaultParser),
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_transport(mut self, transport: Arc<dyn Fetch>) -> Self {
        self.transport = transport;
        self
    }

    pub fn with_parser(mut self, parser: Arc<dyn Parser>) -> Self {
        self.parser = parser;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// A handle that stops the crawl when cancelled.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.cancel.clone()
    }

    pub fn config(&self) -> &CrawlConfig {
        &self.config
    }

    /// Stage one: root sitemap to page URLs
    pub async fn resolve(&self, root: &str) -> ResolvedSitemap {
        SitemapResolver::new(Arc::clone(&self.transport), Arc::clone(&self.parser))
            .with_concurrency(self.config.sitemap_concurrency)
            .with_dedupe(self.config.dedupe_sitemaps)
            .with_cancellation(self.cancel.clone())
            .resolve(root)
            .await
    }

    /// Stage two: page URLs to records
    pub async fn scrape(&self, urls: Vec<String>) -> Result<ScrapeReport, CrawlError> {
        let scraper = BoundedScraper::new(
            Arc::clone(&self.transport),
            Arc::clone(&self.parser),
            self.config.concurrency,
        )?
        .with_cancellation(self.cancel.clone());

        Ok(scraper.scrape(urls).await)
    }

    /// Both stages, back to back.
    pub async fn run(&self, root: &str) -> Result<CrawlReport, CrawlError> {
        let resolved = self.resolve(root).await;
        let pages_discovered = resolved.pages.len();

        if self.cancel.is_cancelled() {
            info!("crawl cancelled after sitemap resolution");
        }

        let scraped = self.scrape(resolved.pages).await?;

        Ok(CrawlReport {
            pages_discovered,
            records: scraped.records,
            sitemap_reports: resolved.reports,
            page_reports: scraped.reports,
        })
    }
}

/// Resolves `root_url` and scrapes every page it lists with the HTTP
/// transport, `parser`, and at most `concurrency` page fetches at once.
///
/// Only invalid settings are errors. Pages that fail are left out of the
/// result; use [`SitemapScraper::run`] to see why.
pub async fn scrape_sitemap<P>(
    root_url: &str,
    parser: P,
    concurrency: usize,
) -> Result<Vec<PageRecord>, CrawlError>
where
    P: Parser + 'static,
{
    let report = SitemapScraper::new(CrawlConfig::with_concurrency(concurrency))?
        .with_parser(Arc::new(parser))
        .run(root_url)
        .await?;
    Ok(report.records)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawl::fake::FakeTransport;
    use crate::crawl::outcome::Outcome;

    fn site() -> FakeTransport {
        FakeTransport::new()
            .sitemap(
                "https://x.com/sitemap_index.xml",
                &["https://x.com/post-sitemap.xml", "https://x.com/page-sitemap.xml"],
            )
            .sitemap(
                "https://x.com/post-sitemap.xml",
                &["https://x.com/hello", "https://x.com/world"],
            )
            .sitemap("https://x.com/page-sitemap.xml", &["https://x.com/about", "https://x.com/dead"])
            .page("https://x.com/hello", "Hello")
            .page("https://x.com/world", "World")
            .page("https://x.com/about", "About")
            .timeout("https://x.com/dead")
    }

    fn pipeline(transport: FakeTransport, config: CrawlConfig) -> SitemapScraper {
        SitemapScraper::new(config)
            .unwrap()
            .with_transport(Arc::new(transport))
    }

    #[tokio::test]
    async fn test_full_run() {
        let report = pipeline(site(), CrawlConfig::with_concurrency(2))
            .run("https://x.com/sitemap_index.xml")
            .await
            .unwrap();

        assert_eq!(report.pages_discovered, 4);
        assert_eq!(report.records.len(), 3);
        assert_eq!(report.sitemap_reports.len(), 3);
        assert_eq!(report.page_reports.len(), 4);

        let mut titles: Vec<&str> = report.records.iter().map(|r| r.title.as_str()).collect();
        titles.sort();
        assert_eq!(titles, vec!["About", "Hello", "World"]);

        let failures: Vec<&str> = report.failures().map(|r| r.url.as_str()).collect();
        assert_eq!(failures, vec!["https://x.com/dead"]);
        assert!(report.has_failures());
    }

    #[tokio::test]
    async fn test_zero_concurrency_rejected_up_front() {
        let result = SitemapScraper::new(CrawlConfig::with_concurrency(0));
        assert!(matches!(result, Err(CrawlError::ZeroConcurrency)));
    }

    #[tokio::test]
    async fn test_cancelled_run_reports_everything_cancelled() {
        let scraper = pipeline(site(), CrawlConfig::default());
        scraper.cancellation_token().cancel();

        let report = scraper.run("https://x.com/sitemap_index.xml").await.unwrap();
        assert_eq!(report.pages_discovered, 0);
        assert!(report.records.is_empty());
        assert_eq!(report.sitemap_reports[0].outcome, Outcome::Cancelled);
        assert!(!report.has_failures());
    }

    #[tokio::test]
    async fn test_report_json_uses_camel_case() {
        let report = pipeline(site(), CrawlConfig::default())
            .run("https://x.com/sitemap_index.xml")
            .await
            .unwrap();

        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["pagesDiscovered"], 4);
        assert!(json["sitemapReports"].is_array());
        assert!(json["records"][0]["metaDescription"].is_string());
    }
}
