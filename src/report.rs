// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Report Assembly
 * Fixed-shape success reports and typed error documents
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;

use crate::artifacts::{Finding, RiskLevel, ScanInput, Severity, Trajectory};
use crate::errors::ScreenError;
use crate::rollup::{self, SeverityCounts};
use crate::security_flags::SecurityFlag;

pub const SCHEMA_VERSION: &str = "1.0";

const MODULE_READINESS_HINT: &str =
    "Screen complete. Deeper crawl, rendering, and backlink modules are available in the full audit.";
const CONFIDENCE_NOTE: &str =
    "Based on public signals only. JavaScript-rendered and authenticated content is not evaluated.";

const CTA_PRIMARY_LABEL: &str = "Book Growth Blocker Audit";
const CTA_PRIMARY_DESCRIPTION: &str =
    "A guided audit of what is suppressing this site, with a prioritized fix plan.";
const CTA_SECONDARY_LABEL: &str = "Learn About Core";
const CTA_SECONDARY_DESCRIPTION: &str =
    "How the screen reads public signals and decides RED, AMBER, or GREEN.";

/// Artifact slots accounted for in every report.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum InputSlot {
    Homepage,
    RobotsTxt,
    SitemapXml,
    ExtraPages,
}

#[derive(Debug, Clone, Serialize)]
pub struct Report {
    pub schema_version: &'static str,
    pub scan_metadata: ScanMetadata,
    pub result: RiskResult,
    pub proof: Proof,
    pub module_readiness_hint: &'static str,
    pub confidence_note: &'static str,
    pub security_flags: Vec<SecurityFlag>,
    pub cta: Cta,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScanMetadata {
    pub domain: String,
    pub scan_date: String,
    pub inputs_used: Vec<InputSlot>,
    pub inputs_missing: Vec<InputSlot>,
    pub pages_analyzed: u32,
}

#[derive(Debug, Clone, Serialize)]
pub struct RiskResult {
    pub risk_level: RiskLevel,
    /// `null` when the caller supplied no baseline.
    pub trajectory: Option<Trajectory>,
    pub counts: SeverityCounts,
    pub interpretation: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct Proof {
    pub severity: Severity,
    pub category: String,
    pub finding: String,
    pub evidence: Evidence,
    pub why_it_suppresses: String,
    pub how_to_verify: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Evidence {
    pub url: String,
    pub snippet: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Cta {
    pub primary: CtaEntry,
    pub secondary: CtaEntry,
}

#[derive(Debug, Clone, Serialize)]
pub struct CtaEntry {
    pub label: &'static str,
    pub description: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct ErrorDocument {
    pub schema_version: &'static str,
    pub error: bool,
    pub error_type: &'static str,
    pub error_message: String,
    /// Always null; no partial report leaks on error.
    pub partial_result: Option<serde_json::Value>,
}

/// Success and error documents share the `schema_version` tag but otherwise
/// disjoint shapes; the service serializes whichever arm applies.
#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ScreenResponse {
    Success(Box<Report>),
    Error(ErrorDocument),
}

impl ScreenResponse {
    pub fn http_status(&self) -> u16 {
        match self {
            ScreenResponse::Success(_) => 200,
            ScreenResponse::Error(_) => 400,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ScreenResponse::Error(_))
    }
}

/// Build the success document from the analyzed snapshot.
pub fn assemble_report(
    input: &ScanInput,
    findings: &[Finding],
    security_flags: Vec<SecurityFlag>,
) -> Report {
    let counts = rollup::count_by_severity(findings);
    let risk_level = rollup::risk_level(counts);
    let trajectory = rollup::trajectory(input.baseline.as_ref(), risk_level);
    let (inputs_used, inputs_missing) = account_inputs(input);

    Report {
        schema_version: SCHEMA_VERSION,
        scan_metadata: ScanMetadata {
            domain: input.domain.clone(),
            scan_date: input.scan_date.clone(),
            inputs_used,
            inputs_missing,
            pages_analyzed: 1 + input.extra_pages.len() as u32,
        },
        result: RiskResult {
            risk_level,
            trajectory,
            counts,
            interpretation: interpretation(risk_level),
        },
        proof: build_proof(input, findings),
        module_readiness_hint: MODULE_READINESS_HINT,
        confidence_note: CONFIDENCE_NOTE,
        security_flags,
        cta: Cta {
            primary: CtaEntry {
                label: CTA_PRIMARY_LABEL,
                description: CTA_PRIMARY_DESCRIPTION,
            },
            secondary: CtaEntry {
                label: CTA_SECONDARY_LABEL,
                description: CTA_SECONDARY_DESCRIPTION,
            },
        },
    }
}

pub fn error_document(err: &ScreenError) -> ErrorDocument {
    ErrorDocument {
        schema_version: SCHEMA_VERSION,
        error: true,
        error_type: err.error_type(),
        error_message: err.to_string(),
        partial_result: None,
    }
}

/// Every slot lands in exactly one of the two lists, in a fixed order.
fn account_inputs(input: &ScanInput) -> (Vec<InputSlot>, Vec<InputSlot>) {
    let presence = [
        (InputSlot::Homepage, input.homepage.html.is_some()),
        (InputSlot::RobotsTxt, input.robots_txt.text.is_some()),
        (InputSlot::SitemapXml, input.sitemap_xml.text.is_some()),
        (InputSlot::ExtraPages, !input.extra_pages.is_empty()),
    ];

    let mut used = Vec::new();
    let mut missing = Vec::new();
    for (slot, present) in presence {
        if present {
            used.push(slot);
        } else {
            missing.push(slot);
        }
    }
    (used, missing)
}

fn interpretation(risk_level: RiskLevel) -> &'static str {
    match risk_level {
        RiskLevel::Red => {
            "At least one indexation kill switch or a cluster of strong suppressors is active."
        }
        RiskLevel::Amber => "No kill switch found, but suppression drag is present and worth fixing.",
        RiskLevel::Green => "No clear suppressors detected in the public signals analyzed.",
    }
}

fn build_proof(input: &ScanInput, findings: &[Finding]) -> Proof {
    match rollup::select_proof(findings) {
        Some(finding) => Proof {
            severity: rollup::clamp_proof_severity(finding.severity),
            category: finding.category.to_string(),
            finding: finding.finding_text.clone(),
            evidence: Evidence {
                url: finding.evidence_url.clone(),
                snippet: finding.evidence_snippet.clone(),
            },
            why_it_suppresses: finding.why_it_suppresses.clone(),
            how_to_verify: finding.how_to_verify.clone(),
        },
        None => Proof {
            severity: Severity::P2,
            category: "No Clear Suppressors".to_string(),
            finding: "No clear suppressors detected.".to_string(),
            evidence: Evidence {
                url: input.domain.clone(),
                snippet: "No suppression patterns matched in the analyzed artifacts.".to_string(),
            },
            why_it_suppresses: "Nothing in the public signals is actively blocking indexation."
                .to_string(),
            how_to_verify: "Re-run the screen after significant content or platform changes."
                .to_string(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::artifacts::{ConstraintSet, HtmlArtifact, TextArtifact};
    use std::collections::HashMap;

    fn html_artifact(url: &str, html: Option<&str>) -> HtmlArtifact {
        HtmlArtifact {
            requested_url: url.to_string(),
            final_url: url.to_string(),
            status: if html.is_some() { 200 } else { 404 },
            headers: HashMap::new(),
            html: html.map(|s| s.to_string()),
        }
    }

    fn text_artifact(url: &str, text: Option<&str>) -> TextArtifact {
        TextArtifact {
            requested_url: url.to_string(),
            final_url: url.to_string(),
            status: if text.is_some() { 200 } else { 404 },
            headers: HashMap::new(),
            text: text.map(|s| s.to_string()),
        }
    }

    fn sample_input(robots: Option<&str>, sitemap: Option<&str>, extras: usize) -> ScanInput {
        ScanInput {
            domain: "https://example.com/".to_string(),
            scan_date: "2026-01-15".to_string(),
            baseline: None,
            homepage: html_artifact("https://example.com/", Some("<title>Home</title>")),
            robots_txt: text_artifact("https://example.com/robots.txt", robots),
            sitemap_xml: text_artifact("https://example.com/sitemap.xml", sitemap),
            extra_pages: (0..extras)
                .map(|i| {
                    html_artifact(
                        &format!("https://example.com/p{}", i),
                        Some("<title>Page</title>"),
                    )
                })
                .collect(),
            constraints: ConstraintSet::new(),
        }
    }

    #[test]
    fn inputs_used_and_missing_partition_all_slots() {
        let input = sample_input(Some("User-agent: *"), None, 0);
        let report = assemble_report(&input, &[], vec![]);

        assert_eq!(
            report.scan_metadata.inputs_used,
            vec![InputSlot::Homepage, InputSlot::RobotsTxt]
        );
        assert_eq!(
            report.scan_metadata.inputs_missing,
            vec![InputSlot::SitemapXml, InputSlot::ExtraPages]
        );
    }

    #[test]
    fn pages_analyzed_counts_homepage_plus_extras() {
        let input = sample_input(None, None, 3);
        let report = assemble_report(&input, &[], vec![]);
        assert_eq!(report.scan_metadata.pages_analyzed, 4);
    }

    #[test]
    fn empty_findings_yield_green_with_canned_proof() {
        let input = sample_input(None, None, 0);
        let report = assemble_report(&input, &[], vec![]);

        assert_eq!(report.result.risk_level, RiskLevel::Green);
        assert_eq!(report.proof.severity, Severity::P2);
        assert_eq!(report.proof.evidence.url, "https://example.com/");
        assert!(report.proof.finding.contains("No clear suppressors"));
    }

    #[test]
    fn trajectory_is_null_without_baseline() {
        let input = sample_input(None, None, 0);
        let report = assemble_report(&input, &[], vec![]);
        let json = serde_json::to_value(&report).unwrap();
        assert!(json["result"]["trajectory"].is_null());
    }

    #[test]
    fn success_document_contains_every_contract_key() {
        let input = sample_input(Some("ok"), Some("<urlset/>"), 1);
        let report = assemble_report(&input, &[], vec![]);
        let json = serde_json::to_value(&report).unwrap();

        for key in [
            "schema_version",
            "scan_metadata",
            "result",
            "proof",
            "module_readiness_hint",
            "confidence_note",
            "security_flags",
            "cta",
        ] {
            assert!(json.get(key).is_some(), "missing key {}", key);
        }
        assert_eq!(json["schema_version"], "1.0");
        assert_eq!(json["cta"]["primary"]["label"], "Book Growth Blocker Audit");
        assert_eq!(json["cta"]["secondary"]["label"], "Learn About Core");
        for key in ["p0", "p1", "p2", "p3"] {
            assert!(json["result"]["counts"].get(key).is_some());
        }
    }

    #[test]
    fn error_document_shape_is_stable() {
        let doc = error_document(&ScreenError::InvalidUrl("bad input".to_string()));
        let json = serde_json::to_value(&doc).unwrap();

        assert_eq!(json["schema_version"], "1.0");
        assert_eq!(json["error"], true);
        assert_eq!(json["error_type"], "INVALID_URL");
        assert_eq!(json["error_message"], "bad input");
        assert!(json["partial_result"].is_null());
    }

    #[test]
    fn response_arms_map_to_http_statuses() {
        let input = sample_input(None, None, 0);
        let ok = ScreenResponse::Success(Box::new(assemble_report(&input, &[], vec![])));
        let err = ScreenResponse::Error(error_document(&ScreenError::InsufficientData(
            "homepage unavailable".to_string(),
        )));

        assert_eq!(ok.http_status(), 200);
        assert_eq!(err.http_status(), 400);
        assert!(err.is_error());
    }

    #[test]
    fn interpretation_stays_within_budget() {
        for level in [RiskLevel::Red, RiskLevel::Amber, RiskLevel::Green] {
            assert!(interpretation(level).chars().count() <= 150);
        }
    }
}
