// src/config.rs
// =============================================================================
// Settings shared by every stage of a crawl.
//
// The CLI builds one of these from its flags, library users build one by hand
// (or start from Default and change a field or two).
// =============================================================================

use crate::error::CrawlError;
use std::time::Duration;

/// The user agents we rotate through, one picked at random per request.
pub const DEFAULT_USER_AGENTS: [&str; 3] = [
    "Mozilla/5.0 (compatible; Googlebot/2.1; +http://www.google.com/bot.html)",
    "Googlebot/2.1 (+http://www.googlebot.com/bot.html)",
    "Googlebot/2.1 (+http://www.google.com/bot.html)",
];

/// Per-request timeout used when nothing else is configured
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// How many page fetches may be in flight at once by default
pub const DEFAULT_CONCURRENCY: usize = 10;

#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Maximum number of page fetches in flight at the same time
    pub concurrency: usize,

    /// Maximum number of sitemap fetches in flight, None = unbounded
    pub sitemap_concurrency: Option<usize>,

    /// Timeout applied to every single HTTP request
    pub timeout: Duration,

    /// Skip sitemap URLs that were already dispatched once.
    /// Turning this off means a sitemap that links back to itself never ends.
    pub dedupe_sitemaps: bool,

    /// Pool of User-Agent header values
    pub user_agents: Vec<String>,
}

impl Default for CrawlConfig {
    fn default() -> Self {
        Self {
            concurrency: DEFAULT_CONCURRENCY,
            sitemap_concurrency: None,
            timeout: DEFAULT_TIMEOUT,
            dedupe_sitemaps: true,
            user_agents: DEFAULT_USER_AGENTS.iter().map(|ua| ua.to_string()).collect(),
        }
    }
}

impl CrawlConfig {
    /// Default settings with a different page concurrency
    pub fn with_concurrency(concurrency: usize) -> Self {
        Self {
            concurrency,
            ..Self::default()
        }
    }

    /// Rejects settings that would make the crawl hang or fail every request
    pub fn validate(&self) -> Result<(), CrawlError> {
        if self.concurrency == 0 {
            return Err(CrawlError::ZeroConcurrency);
        }
        if self.sitemap_concurrency == Some(0) {
            return Err(CrawlError::ZeroSitemapConcurrency);
        }
        if self.user_agents.is_empty() {
            return Err(CrawlError::NoUserAgents);
        }
        Ok(())
    }
}
