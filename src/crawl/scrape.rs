// src/crawl/scrape.rs
// =============================================================================
// Fetches every page in a list and extracts a PageRecord from each, with at
// most N fetches in flight.
//
// Every URL becomes its own task right away, but a task has to take one of
// N permits from a Semaphore (the admission gate) before it may call the
// transport. The permit lives in a local variable around the fetch, so it is
// handed back when the fetch returns, whatever the result.
//
// Parsing happens after the permit is released: it is CPU-only work and does
// not count against the network limit.
//
// One attempt per URL. A failed URL is logged, reported and skipped, it never
// stops its siblings.
// =============================================================================

use super::outcome::{Outcome, UrlReport};
use super::worklist::{admit, Worklist};
use crate::error::CrawlError;
use crate::fetch::Fetch;
use crate::parse::{PageRecord, Parser};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Everything the scraper produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ScrapeReport {
    /// One record per successfully scraped URL, in completion order
    pub records: Vec<PageRecord>,
    /// One report per input URL
    pub reports: Vec<UrlReport>,
}

pub struct BoundedScraper {
    transport: Arc<dyn Fetch>,
    parser: Arc<dyn Parser>,
    gate: Arc<Semaphore>,
    concurrency: usize,
    cancel: CancellationToken,
}

// What a single page task sends back
struct PageVisit {
    report: UrlReport,
    record: Option<PageRecord>,
}

impl PageVisit {
    fn without_record(report: UrlReport) -> Self {
        Self {
            report,
            record: None,
        }
    }
}

impl BoundedScraper {
    /// `concurrency` is the maximum number of fetches in flight, at least 1.
    pub fn new(
        transport: Arc<dyn Fetch>,
        parser: Arc<dyn Parser>,
        concurrency: usize,
    ) -> Result<Self, CrawlError> {
        if concurrency == 0 {
            return Err(CrawlError::ZeroConcurrency);
        }

        Ok(Self {
            transport,
            parser,
            gate: Arc::new(Semaphore::new(concurrency)),
            concurrency,
            cancel: CancellationToken::new(),
        })
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Scrapes every URL in `urls`. Blank entries are skipped.
    pub async fn scrape(&self, urls: Vec<String>) -> ScrapeReport {
        info!(
            urls = urls.len(),
            concurrency = self.concurrency,
            "scraping pages"
        );

        let mut worklist = Worklist::new();
        let mut report = ScrapeReport::default();

        for url in urls {
            if url.trim().is_empty() {
                report.reports.push(UrlReport::skipped(url, "empty URL"));
                continue;
            }
            if self.cancel.is_cancelled() {
                report.reports.push(UrlReport::cancelled(url));
                continue;
            }

            let panic_url = url.clone();
            worklist.dispatch(
                scrape_page(
                    Arc::clone(&self.transport),
                    Arc::clone(&self.parser),
                    Arc::clone(&self.gate),
                    self.cancel.clone(),
                    url,
                ),
                move || PageVisit::without_record(UrlReport::failed(panic_url, "task panicked")),
            );
        }

        while let Some(visit) = worklist.next().await {
            if let Some(record) = visit.record {
                report.records.push(record);
            }
            report.reports.push(visit.report);
        }

        info!(records = report.records.len(), "scraping complete");
        report
    }
}

// Fetch one page under the admission gate, then extract its record
async fn scrape_page(
    transport: Arc<dyn Fetch>,
    parser: Arc<dyn Parser>,
    gate: Arc<Semaphore>,
    cancel: CancellationToken,
    url: String,
) -> PageVisit {
    let fetched = {
        let _permit = match admit(&gate, &cancel).await {
            Some(permit) => permit,
            None => return PageVisit::without_record(UrlReport::cancelled(url)),
        };
        debug!(%url, "requesting page");
        transport.fetch(&url).await
    };

    let document = match fetched {
        Ok(document) => document,
        Err(e) => {
            warn!(%url, error = %e, "failed to fetch page");
            return PageVisit::without_record(UrlReport::failed(url, e));
        }
    };

    match parser.extract_record(&document) {
        Ok(record) => PageVisit {
            report: UrlReport::new(url, Outcome::Scraped),
            record: Some(record),
        },
        Err(e) => {
            warn!(%url, error = %e, "failed to parse page");
            PageVisit::without_record(UrlReport::failed(url, e))
        }
    }
}
