// src/crawl/resolver.rs
// =============================================================================
// Turns a root sitemap (usually a sitemap index) into a flat list of pages.
//
// How it works:
// 1. Dispatch the root URL as a sitemap task (outstanding = 1)
// 2. Each task fetches its sitemap, pulls out the <loc> values and splits
//    them into nested sitemaps and pages
// 3. The task hands both lists back to the resolve() loop, which dispatches
//    every nested sitemap (outstanding += 1 each) and appends the pages
// 4. When the last outstanding task has reported, we are done
//
// A sitemap that fails to load is logged and simply contributes no pages.
// Page URLs are never deduplicated. Sitemap URLs are, unless turned off,
// because a sitemap that lists itself would otherwise keep us busy forever.
// =============================================================================

use super::classify::{classify, Classified};
use super::outcome::{Outcome, UrlReport};
use super::worklist::{admit, Worklist};
use crate::fetch::Fetch;
use crate::parse::Parser;
use serde::Serialize;
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;

/// Everything the resolver found.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ResolvedSitemap {
    /// Page URLs in arrival order, duplicates included
    pub pages: Vec<String>,
    /// One report per sitemap URL that was encountered
    pub reports: Vec<UrlReport>,
}

pub struct SitemapResolver {
    transport: Arc<dyn Fetch>,
    parser: Arc<dyn Parser>,
    gate: Option<Arc<Semaphore>>,
    dedupe: bool,
    cancel: CancellationToken,
}

// What a single sitemap task sends back
struct SitemapVisit {
    report: UrlReport,
    classified: Classified,
}

impl SitemapVisit {
    fn empty(report: UrlReport) -> Self {
        Self {
            report,
            classified: Classified::default(),
        }
    }
}

impl SitemapResolver {
    pub fn new(transport: Arc<dyn Fetch>, parser: Arc<dyn Parser>) -> Self {
        Self {
            transport,
            parser,
            gate: None,
            dedupe: true,
            cancel: CancellationToken::new(),
        }
    }

    /// Limits how many sitemaps are fetched at once. None means no limit.
    /// A limit of 0 is treated as 1.
    pub fn with_concurrency(mut self, limit: Option<usize>) -> Self {
        self.gate = limit.map(|n| Arc::new(Semaphore::new(n.max(1))));
        self
    }

    /// Whether a sitemap URL seen before is skipped instead of fetched again.
    pub fn with_dedupe(mut self, dedupe: bool) -> Self {
        self.dedupe = dedupe;
        self
    }

    pub fn with_cancellation(mut self, cancel: CancellationToken) -> Self {
        self.cancel = cancel;
        self
    }

    /// Resolves `root` into every page URL it (transitively) lists.
    ///
    /// Never fails: sitemaps that cannot be fetched or parsed show up as
    /// Failed in the returned reports.
    pub async fn resolve(&self, root: &str) -> ResolvedSitemap {
        info!(root, "resolving sitemap");

        let mut worklist = Worklist::new();
        let mut visited = HashSet::new();
        let mut resolved = ResolvedSitemap::default();

        self.dispatch(&mut worklist, &mut visited, &mut resolved, root.trim().to_string());

        while let Some(visit) = worklist.next().await {
            let SitemapVisit { report, classified } = visit;
            resolved.reports.push(report);

            for sitemap in classified.sitemaps {
                self.dispatch(&mut worklist, &mut visited, &mut resolved, sitemap);
            }
            resolved.pages.extend(classified.pages);

            debug!(
                outstanding = worklist.outstanding(),
                pages = resolved.pages.len(),
                "sitemap finished"
            );
        }

        info!(
            pages = resolved.pages.len(),
            sitemaps = resolved.reports.len(),
            "sitemap resolution complete"
        );
        resolved
    }

    // Starts a task for one sitemap URL, or records why it was not started
    fn dispatch(
        &self,
        worklist: &mut Worklist<SitemapVisit>,
        visited: &mut HashSet<String>,
        resolved: &mut ResolvedSitemap,
        url: String,
    ) {
        if self.dedupe && !visited.insert(visit_key(&url)) {
            debug!(%url, "sitemap already visited");
            resolved
                .reports
                .push(UrlReport::skipped(url, "already visited"));
            return;
        }

        if self.cancel.is_cancelled() {
            resolved.reports.push(UrlReport::cancelled(url));
            return;
        }

        let panic_url = url.clone();
        worklist.dispatch(
            visit_sitemap(
                Arc::clone(&self.transport),
                Arc::clone(&self.parser),
                self.gate.clone(),
                self.cancel.clone(),
                url,
            ),
            move || SitemapVisit::empty(UrlReport::failed(panic_url, "task panicked")),
        );
    }
}

// Key for the visited set. Parsing lowercases scheme and host and drops a
// default port, so spellings of the same sitemap collapse to one entry.
// Anything that does not parse is keyed by its trimmed text.
fn visit_key(url: &str) -> String {
    let url = url.trim();
    Url::parse(url)
        .map(String::from)
        .unwrap_or_else(|_| url.to_string())
}

// Fetch one sitemap, extract its <loc> entries and classify them
async fn visit_sitemap(
    transport: Arc<dyn Fetch>,
    parser: Arc<dyn Parser>,
    gate: Option<Arc<Semaphore>>,
    cancel: CancellationToken,
    url: String,
) -> SitemapVisit {
    let fetched = {
        let _permit = match &gate {
            Some(gate) => match admit(gate, &cancel).await {
                Some(permit) => Some(permit),
                None => return SitemapVisit::empty(UrlReport::cancelled(url)),
            },
            None => None,
        };
        if cancel.is_cancelled() {
            return SitemapVisit::empty(UrlReport::cancelled(url));
        }
        transport.fetch(&url).await
    };

    let document = match fetched {
        Ok(document) => document,
        Err(e) => {
            warn!(%url, error = %e, "failed to fetch sitemap");
            return SitemapVisit::empty(UrlReport::failed(url, e));
        }
    };

    let locations = match parser.extract_locations(&document) {
        Ok(locations) => locations,
        Err(e) => {
            warn!(%url, error = %e, "failed to parse sitemap");
            return SitemapVisit::empty(UrlReport::failed(url, e));
        }
    };

    let classified = classify(locations);
    debug!(
        %url,
        pages = classified.pages.len(),
        sitemaps = classified.sitemaps.len(),
        "sitemap parsed"
    );

    SitemapVisit {
        report: UrlReport::new(
            url,
            Outcome::Resolved {
                pages: classified.pages.len(),
                sitemaps: classified.sitemaps.len(),
            },
        ),
        classified,
    }
}
