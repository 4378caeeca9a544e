// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Artifact Fetcher
 * Turns bounded GETs into HTML/text artifacts with sanitation and truncation
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;

use crate::artifacts::{Constraint, ConstraintSet, HtmlArtifact, TextArtifact};
use crate::http_client::HttpClient;

/// Character budget for any artifact body retained in memory.
pub const MAX_ARTIFACT_CHARS: usize = 120_000;

static HTML_COMMENT_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?s)<!--.*?-->").unwrap());
static SCRIPT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)<script\b[^>]*>.*?</script>").unwrap());
static STYLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<style\b[^>]*>.*?</style>").unwrap());

pub struct ArtifactFetcher {
    client: HttpClient,
}

impl ArtifactFetcher {
    pub fn new(client: HttpClient) -> Self {
        Self { client }
    }

    /// Fetch a page expected to be HTML. Network failure, non-2xx/3xx status
    /// and non-HTML content all yield an artifact without `html`; the scan
    /// decides whether that is fatal.
    pub async fn fetch_html(&self, url: &str, constraints: &mut ConstraintSet) -> HtmlArtifact {
        let response = match self.client.get(url).await {
            Ok(r) => r,
            Err(e) => {
                debug!("[Fetcher] {} failed: {:#}", url, e);
                constraints.push(Constraint::FetchFailed);
                return HtmlArtifact {
                    requested_url: url.to_string(),
                    final_url: url.to_string(),
                    status: 0,
                    headers: HashMap::new(),
                    html: None,
                };
            }
        };

        let mut artifact = HtmlArtifact {
            requested_url: url.to_string(),
            final_url: response.final_url,
            status: response.status,
            headers: response.headers,
            html: None,
        };

        if !content_available(artifact.status) {
            return artifact;
        }

        if !is_html_content_type(&artifact.headers) {
            constraints.push(Constraint::NonHtmlHomepageOrPage);
            return artifact;
        }

        let sanitized = sanitize_html(&response.body);
        let (bounded, truncated) = truncate_chars(&sanitized, MAX_ARTIFACT_CHARS);
        if truncated {
            constraints.push(Constraint::TruncatedDueToLimits);
        }
        artifact.html = Some(bounded);
        artifact
    }

    /// Fetch a plain-text artifact (robots.txt, sitemap.xml). Any successful
    /// body is accepted.
    pub async fn fetch_text(&self, url: &str, constraints: &mut ConstraintSet) -> TextArtifact {
        let response = match self.client.get(url).await {
            Ok(r) => r,
            Err(e) => {
                debug!("[Fetcher] {} failed: {:#}", url, e);
                constraints.push(Constraint::FetchFailed);
                return TextArtifact {
                    requested_url: url.to_string(),
                    final_url: url.to_string(),
                    status: 0,
                    headers: HashMap::new(),
                    text: None,
                };
            }
        };

        let mut artifact = TextArtifact {
            requested_url: url.to_string(),
            final_url: response.final_url,
            status: response.status,
            headers: response.headers,
            text: None,
        };

        if content_available(artifact.status) {
            let (bounded, truncated) = truncate_chars(&response.body, MAX_ARTIFACT_CHARS);
            if truncated {
                constraints.push(Constraint::TruncatedDueToLimits);
            }
            artifact.text = Some(bounded);
        }
        artifact
    }
}

/// 200-399 means the body is usable; redirects are already followed, so a
/// 3xx here is a redirect the client refused to chase further.
fn content_available(status: u16) -> bool {
    (200..400).contains(&status)
}

fn is_html_content_type(headers: &HashMap<String, String>) -> bool {
    headers
        .get("content-type")
        .map(|ct| {
            let ct = ct.to_lowercase();
            ct.contains("text/html") || ct.contains("application/xhtml+xml")
        })
        .unwrap_or(false)
}

/// Strip comments, script blocks and style blocks at regex level. The rules
/// engine only needs markup-level signals, not executable content.
pub fn sanitize_html(html: &str) -> String {
    let without_comments = HTML_COMMENT_RE.replace_all(html, "");
    let without_scripts = SCRIPT_RE.replace_all(&without_comments, "");
    STYLE_RE.replace_all(&without_scripts, "").to_string()
}

/// Cap `s` at `max` characters. Truncated content ends with `...` and stays
/// within the cap.
pub fn truncate_chars(s: &str, max: usize) -> (String, bool) {
    match s.char_indices().nth(max) {
        None => (s.to_string(), false),
        Some(_) => {
            let keep = max.saturating_sub(3);
            let cut = s
                .char_indices()
                .nth(keep)
                .map(|(i, _)| i)
                .unwrap_or(s.len());
            let mut out = s[..cut].to_string();
            out.push_str("...");
            (out, true)
        }
    }
}
