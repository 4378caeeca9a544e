// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Suppression Rules Engine
 * Classifies public artifacts into root-cause keyed findings
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashMap;
use tracing::debug;
use url::Url;

use crate::artifacts::{Finding, HtmlArtifact, ScanInput, Severity};

pub const CATEGORY_KILL_SWITCH: &str = "Indexation Kill Switch";
pub const CATEGORY_MODERATE_DRAG: &str = "Moderate Drag";

/// Caps applied to caller-facing finding copy.
const MAX_FINDING_TEXT: usize = 100;
const MAX_SNIPPET: usize = 200;
const MAX_RATIONALE: usize = 150;

static ROBOTS_UA_ALL_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?i)user-agent:\s*\*").unwrap());
static ROBOTS_DISALLOW_ROOT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?im)^\s*disallow:\s*/[ \t]*\r?$").unwrap());
static META_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<meta\b[^>]*>").unwrap());
static LINK_TAG_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<link\b[^>]*>").unwrap());
static NAME_ROBOTS_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)name\s*=\s*["']?robots["']?"#).unwrap());
static REL_CANONICAL_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?i)rel\s*=\s*["']?canonical["']?"#).unwrap());
static CONTENT_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)content\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap());
static HREF_ATTR_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r#"(?is)href\s*=\s*(?:"([^"]*)"|'([^']*)'|([^\s>]+))"#).unwrap());
static TITLE_RE: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?is)<title[^>]*>(.*?)</title>").unwrap());

/// Run every rule over the snapshot. Rules fire in a fixed order and each
/// root cause is reported at most once per scan; the first matching page
/// supplies the evidence.
pub fn analyze(input: &ScanInput) -> Vec<Finding> {
    let mut findings = Vec::new();
    let pages = analyzed_pages(input);

    check_robots_disallow_all(input, &mut findings);
    check_x_robots_noindex(&pages, &mut findings);
    check_meta_robots_noindex(&pages, &mut findings);
    check_canonical_offdomain(&pages, &mut findings);
    check_missing_title(&pages, &mut findings);
    check_duplicate_titles(&pages, &mut findings);

    debug!("[Analyzer] {} root causes for {}", findings.len(), input.domain);
    findings
}

/// Homepage first, then extra pages, HTML-bearing only.
fn analyzed_pages(input: &ScanInput) -> Vec<&HtmlArtifact> {
    std::iter::once(&input.homepage)
        .chain(input.extra_pages.iter())
        .filter(|p| p.html.is_some())
        .collect()
}

fn check_robots_disallow_all(input: &ScanInput, findings: &mut Vec<Finding>) {
    let Some(text) = input.robots_txt.text.as_deref() else {
        return;
    };

    let ua_match = ROBOTS_UA_ALL_RE.find(text);
    let disallow_match = ROBOTS_DISALLOW_ROOT_RE.find(text);
    if let (Some(ua), Some(disallow)) = (ua_match, disallow_match) {
        let snippet = format!("{}\n{}", ua.as_str(), disallow.as_str().trim());
        findings.push(make_finding(
            "ROBOTS_DISALLOW_ALL",
            Severity::P0,
            CATEGORY_KILL_SWITCH,
            "robots.txt disallows all crawling for every user agent",
            &input.robots_txt.final_url,
            &snippet,
            "Compliant crawlers stop fetching the entire site, which ends indexation.",
            "Open /robots.txt and look for Disallow: / under User-agent: *.",
        ));
    }
}

fn check_x_robots_noindex(pages: &[&HtmlArtifact], findings: &mut Vec<Finding>) {
    for page in pages {
        let Some(value) = page.header("x-robots-tag") else {
            continue;
        };
        if value.to_lowercase().contains("noindex") {
            findings.push(make_finding(
                "X_ROBOTS_NOINDEX",
                Severity::P0,
                CATEGORY_KILL_SWITCH,
                "X-Robots-Tag response header requests noindex",
                &page.final_url,
                &format!("x-robots-tag: {}", value),
                "A noindex response header removes the page from results even when the HTML looks clean.",
                "Fetch the page with curl -I and inspect the X-Robots-Tag header.",
            ));
            return;
        }
    }
}

fn check_meta_robots_noindex(pages: &[&HtmlArtifact], findings: &mut Vec<Finding>) {
    for page in pages {
        let html = page.html.as_deref().unwrap_or_default();
        for tag in META_TAG_RE.find_iter(html) {
            let tag_str = tag.as_str();
            if !NAME_ROBOTS_RE.is_match(tag_str) {
                continue;
            }
            let Some(content) = first_attr_value(&CONTENT_ATTR_RE, tag_str) else {
                continue;
            };
            if content.to_lowercase().contains("noindex") {
                findings.push(make_finding(
                    "META_ROBOTS_NOINDEX",
                    Severity::P0,
                    CATEGORY_KILL_SWITCH,
                    "Meta robots tag requests noindex",
                    &page.final_url,
                    tag_str,
                    "A meta robots noindex instructs crawlers to drop the page from the index.",
                    "View the page source and search the head for meta name=\"robots\".",
                ));
                return;
            }
        }
    }
}

fn check_canonical_offdomain(pages: &[&HtmlArtifact], findings: &mut Vec<Finding>) {
    for page in pages {
        let html = page.html.as_deref().unwrap_or_default();
        let Ok(page_url) = Url::parse(&page.final_url) else {
            continue;
        };

        for tag in LINK_TAG_RE.find_iter(html) {
            let tag_str = tag.as_str();
            if !REL_CANONICAL_RE.is_match(tag_str) {
                continue;
            }
            let Some(href) = first_attr_value(&HREF_ATTR_RE, tag_str) else {
                continue;
            };
            let Ok(canonical) = page_url.join(href.trim()) else {
                continue;
            };
            if canonical.host_str().is_some() && canonical.host_str() != page_url.host_str() {
                findings.push(make_finding(
                    "CANONICAL_OFFDOMAIN",
                    Severity::P0,
                    CATEGORY_KILL_SWITCH,
                    "Canonical URL points at a different domain",
                    &page.final_url,
                    tag_str,
                    "An off-domain canonical hands this page's ranking signals to another site.",
                    "Inspect link rel=\"canonical\" in the page head and compare hostnames.",
                ));
                return;
            }
        }
    }
}

fn check_missing_title(pages: &[&HtmlArtifact], findings: &mut Vec<Finding>) {
    for page in pages {
        let html = page.html.as_deref().unwrap_or_default();
        if !TITLE_RE.is_match(html) {
            findings.push(make_finding(
                "MISSING_TITLE",
                Severity::P2,
                CATEGORY_MODERATE_DRAG,
                "Page has no <title> element",
                &page.final_url,
                "No <title> element found in the document.",
                "Untitled pages rank poorly and render badly in result listings.",
                "View the page source and confirm the head contains a title tag.",
            ));
            return;
        }
    }
}

fn check_duplicate_titles(pages: &[&HtmlArtifact], findings: &mut Vec<Finding>) {
    let mut urls_by_title: HashMap<String, Vec<&str>> = HashMap::new();

    for page in pages {
        let html = page.html.as_deref().unwrap_or_default();
        let Some(capture) = TITLE_RE.captures(html) else {
            continue;
        };
        let title = capture[1].trim().to_string();
        if title.is_empty() {
            continue;
        }

        let urls = urls_by_title.entry(title.clone()).or_default();
        urls.push(page.final_url.as_str());
        if urls.len() == 2 {
            let snippet = format!("\"{}\" on {} and {}", title, urls[0], urls[1]);
            findings.push(make_finding(
                "DUP_TITLES",
                Severity::P2,
                CATEGORY_MODERATE_DRAG,
                "Identical <title> shared by multiple pages",
                urls[1],
                &snippet,
                "Pages with the same title compete with each other and dilute relevance.",
                "Compare the <title> elements of the listed pages.",
            ));
            return;
        }
    }
}

fn first_attr_value<'a>(re: &Regex, tag: &'a str) -> Option<&'a str> {
    re.captures(tag).and_then(|c| {
        c.get(1)
            .or_else(|| c.get(2))
            .or_else(|| c.get(3))
            .map(|m| m.as_str())
    })
}

#[allow(clippy::too_many_arguments)]
fn make_finding(
    key: &'static str,
    severity: Severity,
    category: &'static str,
    text: &str,
    evidence_url: &str,
    snippet: &str,
    why: &str,
    how: &str,
) -> Finding {
    Finding {
        root_cause_key: key,
        severity,
        category,
        finding_text: cap(text, MAX_FINDING_TEXT),
        evidence_url: evidence_url.to_string(),
        evidence_snippet: cap(snippet, MAX_SNIPPET),
        why_it_suppresses: cap(why, MAX_RATIONALE),
        how_to_verify: cap(how, MAX_RATIONALE),
    }
}

/// Cap to a character budget without a marker; finding copy is already terse.
fn cap(s: &str, max: usize) -> String {
    match s.char_indices().nth(max) {
        None => s.to_string(),
        Some((idx, _)) => s[..idx].to_string(),
    }
}
