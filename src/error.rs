// src/error.rs
// =============================================================================
// Error types for the crawl pipeline.
//
// There are three kinds of failure:
// - TransportError: the HTTP request itself failed (DNS, connect, timeout...)
// - ParseError: we got a document back but could not read it
// - CrawlError: the crawl could not even start (bad configuration)
//
// Transport and parse errors never escape a crawl. They are caught where a
// single URL is processed and written into that URL's report instead.
//
// Rust concepts:
// - thiserror: derive macro that implements std::error::Error + Display
// - #[from]: lets the ? operator convert one error type into another
// =============================================================================

use thiserror::Error;

/// Why a single HTTP fetch failed.
#[derive(Debug, Error)]
pub enum TransportError {
    /// The URL could not be parsed, so no request was sent
    #[error("invalid URL '{url}': {reason}")]
    InvalidUrl { url: String, reason: String },

    /// The request did not finish before the configured timeout
    #[error("request timed out")]
    Timeout,

    /// The hostname could not be resolved
    #[error("could not resolve hostname: {0}")]
    Dns(String),

    /// The TCP/TLS connection could not be established
    #[error("connection failed: {0}")]
    Connect(String),

    /// The response body could not be read to the end
    #[error("failed to read response body: {0}")]
    Body(String),

    /// Anything else reqwest reports (bad redirect, protocol error, ...)
    #[error("request failed: {0}")]
    Request(String),
}

impl TransportError {
    /// Sorts a reqwest error into one of our variants.
    ///
    /// reqwest does not expose a "dns" flag, so like most crawlers we look
    /// at the message of connect errors.
    pub fn from_reqwest(error: reqwest::Error) -> Self {
        let message = error.to_string();

        if error.is_timeout() {
            TransportError::Timeout
        } else if error.is_connect() {
            let lowered = format!("{:?}", error).to_lowercase();
            if lowered.contains("dns") || lowered.contains("resolve") {
                TransportError::Dns(message)
            } else {
                TransportError::Connect(message)
            }
        } else if error.is_body() || error.is_decode() {
            TransportError::Body(message)
        } else {
            TransportError::Request(message)
        }
    }
}

/// Why a fetched document could not be parsed.
#[derive(Debug, Error)]
pub enum ParseError {
    /// The sitemap XML is malformed
    #[error("malformed XML at byte {position}: {reason}")]
    Xml { position: u64, reason: String },
}

/// Errors that stop a crawl before it starts.
#[derive(Debug, Error)]
pub enum CrawlError {
    /// The admission gate needs at least one slot or nothing would ever run
    #[error("concurrency must be at least 1")]
    ZeroConcurrency,

    /// Same rule for the optional sitemap gate
    #[error("sitemap concurrency must be at least 1 when set")]
    ZeroSitemapConcurrency,

    /// Rotation needs something to rotate
    #[error("at least one user agent is required")]
    NoUserAgents,

    /// The HTTP client could not be built (TLS backend, bad header value...)
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_messages() {
        assert_eq!(TransportError::Timeout.to_string(), "request timed out");

        let err = TransportError::InvalidUrl {
            url: "nope".to_string(),
            reason: "relative URL without a base".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "invalid URL 'nope': relative URL without a base"
        );
    }

    #[test]
    fn test_parse_error_message() {
        let err = ParseError::Xml {
            position: 42,
            reason: "mismatched end tag".to_string(),
        };
        assert_eq!(err.to_string(), "malformed XML at byte 42: mismatched end tag");
    }
}
