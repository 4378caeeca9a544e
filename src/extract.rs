// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Link Extraction
 * Same-origin anchor targets from HTML, <loc> entries from sitemap XML
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use regex::Regex;
use scraper::{Html, Selector};
use std::collections::HashSet;
use url::Url;

/// Schemes that never lead to crawlable pages.
const BLOCKED_PREFIXES: &[&str] = &["mailto:", "tel:", "javascript:"];

/// Binary asset extensions excluded from page selection.
const BLOCKED_EXTENSIONS: &[&str] = &[
    ".pdf", ".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg", ".zip",
];

static LOC_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<loc>\s*(.*?)\s*</loc>").unwrap());

/// Extract same-origin anchor targets from sanitized HTML, in document order,
/// de-duplicated by absolute URL with fragments cleared.
pub fn extract_links(html: &str, page_url: &Url, home_origin: &Url) -> Vec<Url> {
    let document = Html::parse_document(html);
    let anchor_selector = Selector::parse("a").unwrap();

    let mut seen: HashSet<String> = HashSet::new();
    let mut links = Vec::new();

    for anchor in document.select(&anchor_selector) {
        let Some(href) = anchor.value().attr("href") else {
            continue;
        };
        let href = href.trim();
        if href.is_empty() {
            continue;
        }

        let lowered = href.to_lowercase();
        if BLOCKED_PREFIXES.iter().any(|p| lowered.starts_with(p)) {
            continue;
        }

        let Ok(mut resolved) = page_url.join(href) else {
            continue;
        };
        resolved.set_fragment(None);

        if resolved.origin() != home_origin.origin() {
            continue;
        }

        let path = resolved.path().to_lowercase();
        if BLOCKED_EXTENSIONS.iter().any(|ext| path.ends_with(ext)) {
            continue;
        }

        if seen.insert(resolved.as_str().to_string()) {
            links.push(resolved);
        }
    }

    links
}

/// Extract every `<loc>` value from sitemap XML in document order. Works for
/// both `<urlset>` and `<sitemapindex>` documents; nested sitemap URLs are
/// treated as page candidates, never fetched recursively.
pub fn extract_sitemap_locs(xml: &str, sitemap_url: &Url, home_origin: &Url) -> Vec<Url> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut locs = Vec::new();

    for capture in LOC_RE.captures_iter(xml) {
        let raw = capture[1].trim();
        if raw.is_empty() {
            continue;
        }

        let Ok(mut resolved) = sitemap_url.join(raw) else {
            continue;
        };
        resolved.set_fragment(None);

        if resolved.origin() != home_origin.origin() {
            continue;
        }

        if seen.insert(resolved.as_str().to_string()) {
            locs.push(resolved);
        }
    }

    locs
}
