// src/parse/mod.rs
// =============================================================================
// Turning fetched documents into data.
//
// Submodules:
// - html: reads title / h1 / meta description out of an HTML page
// - sitemap: reads every <loc> out of a sitemap or sitemap index
//
// The crawl engine only knows about the Parser trait below. DefaultParser is
// the one implementation we ship; swap it out to extract different fields.
// =============================================================================

mod html;
mod sitemap;

use crate::error::ParseError;
use crate::fetch::Document;
use serde::{Deserialize, Serialize};

pub use html::extract_page_record;
pub use sitemap::extract_loc_values;

/// The SEO fields scraped from one page.
///
/// Missing elements are empty strings, never errors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    /// Final URL of the page (after redirects)
    pub url: String,
    /// Text of the first <title>
    pub title: String,
    /// Text of the first <h1>
    pub h1: String,
    /// content attribute of the first <meta name="description">
    pub meta_description: String,
    /// HTTP status code the page was served with
    pub status_code: u16,
}

/// What the crawl engine needs from a document parser.
pub trait Parser: Send + Sync {
    /// Reads the SEO fields of an HTML page.
    fn extract_record(&self, document: &Document) -> Result<PageRecord, ParseError>;

    /// Reads every <loc> value of a sitemap, in document order, duplicates kept.
    fn extract_locations(&self, document: &Document) -> Result<Vec<String>, ParseError>;
}

/// scraper for HTML pages, quick-xml for sitemaps.
#[derive(Debug, Clone, Copy, Default)]
pub struct DefaultParser;

impl Parser for DefaultParser {
    fn extract_record(&self, document: &Document) -> Result<PageRecord, ParseError> {
        let html = document.text();
        Ok(extract_page_record(&html, &document.url, document.status_code))
    }

    fn extract_locations(&self, document: &Document) -> Result<Vec<String>, ParseError> {
        extract_loc_values(&document.text())
    }
}
