// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Screen HTTP Client
 * Bounded GET transport shared by all artifact fetches
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::{Context, Result};
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT};
use reqwest::Client;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Fixed identifying User-Agent sent with every request.
pub const USER_AGENT: &str = "LuotainScreen/1.0 (+https://bountyy.fi/luotain)";

/// Accept header covering every artifact type the screen fetches.
const ACCEPT_HEADER: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,text/plain;q=0.8,*/*;q=0.5";

/// Redirect chain cap per request.
const MAX_REDIRECTS: usize = 5;

/// Transport-level body cap. Artifact-level truncation to the character
/// budget happens in the fetcher; this only prevents unbounded reads.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Pooled GET-only client. Shared across scans; carries no per-scan state.
#[derive(Clone)]
pub struct HttpClient {
    client: Arc<Client>,
}

/// Raw response as stored: lower-cased header names, final URL after
/// redirects, body capped at the transport limit.
#[derive(Debug, Clone)]
pub struct FetchedResponse {
    pub status: u16,
    pub final_url: String,
    pub headers: HashMap<String, String>,
    pub body: String,
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .user_agent(USER_AGENT)
            .default_headers(default_headers())
            .tcp_nodelay(true)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client: Arc::new(client),
        })
    }

    /// Single GET with the per-request deadline. No retries: a scan must be
    /// deterministic and bounded, so failures degrade instead of looping.
    pub async fn get(&self, url: &str) -> Result<FetchedResponse> {
        debug!("[HttpClient] GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .await
            .with_context(|| format!("Request failed for {}", url))?;

        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        let mut headers = HashMap::with_capacity(response.headers().len());
        for (name, value) in response.headers().iter() {
            if let Ok(value_str) = value.to_str() {
                headers.insert(name.as_str().to_lowercase(), value_str.to_string());
            }
        }

        let body_bytes = response
            .bytes()
            .await
            .with_context(|| format!("Failed to read body from {}", url))?;
        let capped = &body_bytes[..body_bytes.len().min(MAX_BODY_BYTES)];
        let body = String::from_utf8_lossy(capped).to_string();

        Ok(FetchedResponse {
            status,
            final_url,
            headers,
            body,
        })
    }
}

fn default_headers() -> HeaderMap {
    let mut headers = HeaderMap::new();
    headers.insert(ACCEPT, HeaderValue::from_static(ACCEPT_HEADER));
    headers
}
