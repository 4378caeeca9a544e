// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A fetched HTML page. `html` is present only for successful responses
/// with an HTML content type, after sanitation and truncation.
#[derive(Debug, Clone)]
pub struct HtmlArtifact {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    /// Header names are lower-cased on storage.
    pub headers: HashMap<String, String>,
    pub html: Option<String>,
}

/// A fetched text artifact (robots.txt, sitemap.xml).
#[derive(Debug, Clone)]
pub struct TextArtifact {
    pub requested_url: String,
    pub final_url: String,
    pub status: u16,
    pub headers: HashMap<String, String>,
    pub text: Option<String>,
}

impl HtmlArtifact {
    /// Lower-cased header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(&name.to_lowercase()).map(|s| s.as_str())
    }
}

/// Snapshot handed to the analyzer. Built once per scan, discarded with the
/// response.
#[derive(Debug, Clone)]
pub struct ScanInput {
    /// Normalized origin, e.g. `https://example.com/`.
    pub domain: String,
    /// YYYY-MM-DD, UTC.
    pub scan_date: String,
    pub baseline: Option<Baseline>,
    pub homepage: HtmlArtifact,
    pub robots_txt: TextArtifact,
    pub sitemap_xml: TextArtifact,
    /// Only pages that yielded HTML; failed or non-HTML picks are dropped
    /// and surface as constraints instead.
    pub extra_pages: Vec<HtmlArtifact>,
    pub constraints: ConstraintSet,
}

/// Caller-supplied prior scan summary. Only `risk_level` drives trajectory.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Baseline {
    pub risk_level: RiskLevel,
    pub scan_date: String,
    #[serde(default)]
    pub p0: u32,
    #[serde(default)]
    pub p1: u32,
    #[serde(default)]
    pub p2: u32,
    #[serde(default)]
    pub p3: u32,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    P0,
    P1,
    P2,
    P3,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::P0 => write!(f, "P0"),
            Severity::P1 => write!(f, "P1"),
            Severity::P2 => write!(f, "P2"),
            Severity::P3 => write!(f, "P3"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum RiskLevel {
    Red,
    Amber,
    Green,
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RiskLevel::Red => write!(f, "RED"),
            RiskLevel::Amber => write!(f, "AMBER"),
            RiskLevel::Green => write!(f, "GREEN"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "UPPERCASE")]
pub enum Trajectory {
    Up,
    Stable,
    Down,
}

/// One root cause surfaced by the rules engine. A scan carries at most one
/// finding per `root_cause_key`.
#[derive(Debug, Clone)]
pub struct Finding {
    pub root_cause_key: &'static str,
    pub severity: Severity,
    pub category: &'static str,
    pub finding_text: String,
    pub evidence_url: String,
    pub evidence_snippet: String,
    pub why_it_suppresses: String,
    pub how_to_verify: String,
}

/// Degradations observed while scanning. The vocabulary is closed; the set is
/// internal and informs `inputs_missing` and the confidence note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Constraint {
    NonHtmlHomepageOrPage,
    FetchFailed,
    RobotsUnavailable,
    SitemapUnavailable,
    TruncatedDueToLimits,
}

impl Constraint {
    pub fn as_str(&self) -> &'static str {
        match self {
            Constraint::NonHtmlHomepageOrPage => "non_html_homepage_or_page",
            Constraint::FetchFailed => "fetch_failed",
            Constraint::RobotsUnavailable => "robots_unavailable",
            Constraint::SitemapUnavailable => "sitemap_unavailable",
            Constraint::TruncatedDueToLimits => "truncated_due_to_limits",
        }
    }
}

/// Order-preserving, de-duplicated constraint collection.
#[derive(Debug, Clone, Default)]
pub struct ConstraintSet {
    items: Vec<Constraint>,
}

impl ConstraintSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, constraint: Constraint) {
        if !self.items.contains(&constraint) {
            self.items.push(constraint);
        }
    }

    pub fn contains(&self, constraint: Constraint) -> bool {
        self.items.contains(&constraint)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Constraint> {
        self.items.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn constraint_set_deduplicates_preserving_order() {
        let mut set = ConstraintSet::new();
        set.push(Constraint::FetchFailed);
        set.push(Constraint::RobotsUnavailable);
        set.push(Constraint::FetchFailed);

        let collected: Vec<_> = set.iter().copied().collect();
        assert_eq!(
            collected,
            vec![Constraint::FetchFailed, Constraint::RobotsUnavailable]
        );
    }

    #[test]
    fn severity_orders_p0_first() {
        assert!(Severity::P0 < Severity::P1);
        assert!(Severity::P2 < Severity::P3);
    }

    #[test]
    fn risk_level_serializes_uppercase() {
        assert_eq!(
            serde_json::to_string(&RiskLevel::Amber).unwrap(),
            "\"AMBER\""
        );
    }
}
