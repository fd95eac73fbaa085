// src/fetch/mod.rs
// =============================================================================
// This module is the network edge of the crawler.
//
// Submodules:
// - http: the real transport, built on reqwest
// - charset: figures out how a body is encoded and decodes it
//
// Everything else in the crate talks to the network through the Fetch trait,
// so the crawl engine can be driven by anything that hands back documents
// (the tests use an in-memory map of URL -> response).
// =============================================================================

mod charset;
mod http;

use crate::error::TransportError;
use async_trait::async_trait;
use std::borrow::Cow;

pub use charset::charset_from_content_type;
pub use http::HttpTransport;

/// A fetched response: where we ended up, what the server said, and the body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    /// Final URL after redirects
    pub url: String,
    /// HTTP status code of the final response
    pub status_code: u16,
    /// Raw body bytes
    pub body: Vec<u8>,
    /// charset from the Content-Type header, if the server sent one
    pub charset: Option<String>,
}

impl Document {
    pub fn new(url: impl Into<String>, status_code: u16, body: impl Into<Vec<u8>>) -> Self {
        Self {
            url: url.into(),
            status_code,
            body: body.into(),
            charset: None,
        }
    }

    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = Some(charset.into());
        self
    }

    /// The body decoded as text.
    ///
    /// Legacy encodings (ISO-8859-1, windows-1252, Shift_JIS...) are decoded
    /// too, see the charset module for how the encoding is chosen.
    pub fn text(&self) -> Cow<'_, str> {
        charset::decode(&self.body, self.charset.as_deref())
    }
}

/// One HTTP GET, no retries.
///
/// Implementations must be shareable across tasks, the engine holds them in
/// an Arc and calls fetch from many tasks at once.
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<Document, TransportError>;
}
