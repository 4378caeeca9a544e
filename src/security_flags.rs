// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Security Flag Detection
 * Flags fetched content that tries to talk to the analyzer instead of users
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;

use crate::artifacts::ScanInput;

#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SecurityFlag {
    PromptInjectionDetected,
    SchemaMimicryDetected,
    InstructionInHtmlDetected,
}

const PROMPT_INJECTION_PATTERNS: &[&str] = &[
    "ignore previous instructions",
    "you are now",
    "system:",
    "assistant:",
    "human:",
];

const SCHEMA_MIMICRY_PATTERNS: &[&str] = &[
    "\"schema_version\"",
    "output schema",
    "strict json",
    "error schema",
];

const EMBEDDED_INSTRUCTION_PATTERNS: &[&str] = &[
    "## system prompt",
    "critical security directive",
    "analysis rules",
];

/// Scan the joined, lower-cased corpus of every fetched body. Emission order
/// is fixed: injection, mimicry, embedded instructions.
pub fn detect(input: &ScanInput) -> Vec<SecurityFlag> {
    let corpus = joined_corpus(input);
    let mut flags = Vec::new();

    if matches_any(&corpus, PROMPT_INJECTION_PATTERNS) {
        flags.push(SecurityFlag::PromptInjectionDetected);
    }
    if matches_any(&corpus, SCHEMA_MIMICRY_PATTERNS) {
        flags.push(SecurityFlag::SchemaMimicryDetected);
    }
    if matches_any(&corpus, EMBEDDED_INSTRUCTION_PATTERNS) {
        flags.push(SecurityFlag::InstructionInHtmlDetected);
    }

    flags
}

fn matches_any(corpus: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| corpus.contains(p))
}

fn joined_corpus(input: &ScanInput) -> String {
    let mut parts: Vec<&str> = Vec::new();
    if let Some(html) = input.homepage.html.as_deref() {
        parts.push(html);
    }
    for page in &input.extra_pages {
        if let Some(html) = page.html.as_deref() {
            parts.push(html);
        }
    }
    if let Some(text) = input.robots_txt.text.as_deref() {
        parts.push(text);
    }
    if let Some(text) = input.sitemap_xml.text.as_deref() {
        parts.push(text);
    }
    parts.join("\n").to_lowercase()
}
