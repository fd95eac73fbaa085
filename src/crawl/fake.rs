// src/crawl/fake.rs
// =============================================================================
// In-memory transport for exercising the crawl engine without a network.
//
// Key functionality:
// - Canned replies per URL: a page, a sitemap, raw bytes or a timeout
// - Unknown URLs fail like a refused connection
// - An optional delay per fetch, so tests can overlap requests
// - Records every URL fetched and the peak number of fetches in flight
//
// Only compiled for tests.
// =============================================================================

use crate::error::TransportError;
use crate::fetch::{Document, Fetch};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

enum Reply {
    Body(u16, String),
    Timeout,
}

#[derive(Default)]
pub(crate) struct FakeTransport {
    replies: HashMap<String, Reply>,
    delay: Duration,
    in_flight: AtomicUsize,
    peak: AtomicUsize,
    calls: Mutex<Vec<String>>,
}

impl FakeTransport {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Every fetch sleeps this long, so concurrent fetches overlap
    pub(crate) fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    pub(crate) fn page(self, url: &str, title: &str) -> Self {
        let html = format!("<html><head><title>{title}</title></head><body><h1>{title}</h1></body></html>");
        self.raw(url, 200, &html)
    }

    pub(crate) fn sitemap(self, url: &str, locations: &[&str]) -> Self {
        let entries: String = locations
            .iter()
            .map(|loc| format!("<url><loc>{loc}</loc></url>"))
            .collect();
        self.raw(url, 200, &format!("<urlset>{entries}</urlset>"))
    }

    pub(crate) fn raw(mut self, url: &str, status: u16, body: &str) -> Self {
        self.replies
            .insert(url.to_string(), Reply::Body(status, body.to_string()));
        self
    }

    pub(crate) fn timeout(mut self, url: &str) -> Self {
        self.replies.insert(url.to_string(), Reply::Timeout);
        self
    }

    /// Highest number of fetches that were running at the same moment
    pub(crate) fn peak_in_flight(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }

    pub(crate) fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl Fetch for FakeTransport {
    async fn fetch(&self, url: &str) -> Result<Document, TransportError> {
        self.calls.lock().unwrap().push(url.to_string());

        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
        if !self.delay.is_zero() {
            tokio::time::sleep(self.delay).await;
        }
        self.in_flight.fetch_sub(1, Ordering::SeqCst);

        match self.replies.get(url) {
            Some(Reply::Body(status, body)) => Ok(Document::new(url, *status, body.as_str())),
            Some(Reply::Timeout) => Err(TransportError::Timeout),
            None => Err(TransportError::Connect(format!("no route to {url}"))),
        }
    }
}
