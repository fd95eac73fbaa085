// src/fetch/http.rs
// =============================================================================
// The reqwest-backed transport.
//
// Key functionality:
// - One shared Client for every request (connection pooling)
// - A fixed per-request timeout
// - A User-Agent picked at random from a small pool on every request
// - reqwest errors sorted into TransportError variants
//
// The body is kept as bytes together with the header charset, decoding
// happens in Document::text so <meta charset> can be honoured as well.
//
// Non-2xx responses are NOT errors here. A 404 page still has a title (or
// not), and its status code ends up in the page record.
// =============================================================================

use super::{charset_from_content_type, Document, Fetch};
use crate::config::CrawlConfig;
use crate::error::{CrawlError, TransportError};
use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::Client;
use std::sync::{Mutex, PoisonError};
use tracing::debug;
use url::Url;

/// Maximum redirects followed before giving up on a URL
const MAX_REDIRECTS: usize = 10;

pub struct HttpTransport {
    client: Client,
    user_agents: Vec<String>,
    // Seeded once when the transport is built and shared by every request
    rng: Mutex<StdRng>,
}

impl HttpTransport {
    pub fn new(config: &CrawlConfig) -> Result<Self, CrawlError> {
        if config.user_agents.is_empty() {
            return Err(CrawlError::NoUserAgents);
        }

        let client = Client::builder()
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()?;

        Ok(Self {
            client,
            user_agents: config.user_agents.clone(),
            rng: Mutex::new(StdRng::from_entropy()),
        })
    }

    /// Picks one of the configured user agents uniformly at random.
    pub fn pick_user_agent(&self) -> &str {
        // A poisoned lock only means another thread panicked mid-pick,
        // the RNG state is still usable.
        let mut rng = self.rng.lock().unwrap_or_else(PoisonError::into_inner);
        let index = rng.gen_range(0..self.user_agents.len());
        &self.user_agents[index]
    }
}

#[async_trait]
impl Fetch for HttpTransport {
    async fn fetch(&self, url: &str) -> Result<Document, TransportError> {
        let parsed = Url::parse(url).map_err(|e| TransportError::InvalidUrl {
            url: url.to_string(),
            reason: e.to_string(),
        })?;

        let user_agent = self.pick_user_agent().to_string();
        debug!(%url, %user_agent, "GET");

        let response = self
            .client
            .get(parsed)
            .header(USER_AGENT, user_agent)
            .send()
            .await
            .map_err(TransportError::from_reqwest)?;

        let final_url = response.url().to_string();
        let status_code = response.status().as_u16();
        let charset = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .and_then(charset_from_content_type);

        // Reading the body is part of the fetch, the timeout covers it too
        let body = response
            .bytes()
            .await
            .map_err(TransportError::from_reqwest)?;

        Ok(Document {
            url: final_url,
            status_code,
            body: body.to_vec(),
            charset,
        })
    }
}
