// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate code for our types
// =============================================================================

use clap::Parser;
use sitemap_seo::CrawlConfig;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(
    name = "sitemap-seo",
    version,
    about = "Scrape title, h1 and meta description from every page in a sitemap",
    long_about = "sitemap-seo follows a sitemap index down to every page it lists, then fetches \
                  each page (a few at a time) and reports its title, first h1, meta description \
                  and HTTP status."
)]
pub struct Cli {
    /// Root sitemap or sitemap index URL (e.g., https://example.com/sitemap.xml)
    pub sitemap_url: String,

    /// Maximum number of pages fetched at the same time
    #[arg(long, short = 'c', env = "SITEMAP_SEO_CONCURRENCY", default_value_t = 10)]
    pub concurrency: usize,

    /// Per-request timeout in seconds
    #[arg(long, env = "SITEMAP_SEO_TIMEOUT_SECS", default_value_t = 10)]
    pub timeout_secs: u64,

    /// Maximum number of sitemaps fetched at the same time (default: no limit)
    #[arg(long)]
    pub sitemap_concurrency: Option<usize>,

    /// Fetch a sitemap again every time it is listed.
    ///
    /// Only safe for sitemap graphs without cycles.
    #[arg(long)]
    pub allow_revisits: bool,

    /// Output results in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Log every request, not just warnings and progress
    #[arg(long, short = 'v')]
    pub verbose: bool,
}

impl Cli {
    /// Turns the flags into the library's config
    pub fn crawl_config(&self) -> CrawlConfig {
        CrawlConfig {
            concurrency: self.concurrency,
            sitemap_concurrency: self.sitemap_concurrency,
            timeout: Duration::from_secs(self.timeout_secs),
            dedupe_sitemaps: !self.allow_revisits,
            ..CrawlConfig::default()
        }
    }
}


// -----------------------------------------------------------------------------
// BEGINNER NOTES:
//
// 1. What does env = "..." do?
//    - If the flag is not given, clap looks at that environment variable
//    - Handy in CI: SITEMAP_SEO_CONCURRENCY=4 sitemap-seo https://...
//    - Needs the "env" feature of clap (see Cargo.toml)
//
// 2. Why Option<usize> for sitemap_concurrency?
//    - None means "flag not given" which we treat as "no limit"
//    - A plain usize would force us to invent a magic "unlimited" number
//
// 3. What is ..CrawlConfig::default()?
//    - Struct update syntax: fill every field we did not list from another
//      value of the same type
// -----------------------------------------------------------------------------
