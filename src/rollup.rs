// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Risk Rollup & Proof Picker
 * Severity counting, risk-level computation, trajectory, proof selection
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use serde::Serialize;

use crate::artifacts::{Baseline, Finding, RiskLevel, Severity, Trajectory};

/// Distinct root causes per severity.
#[derive(Debug, Clone, Copy, Serialize, PartialEq, Eq)]
pub struct SeverityCounts {
    pub p0: u32,
    pub p1: u32,
    pub p2: u32,
    pub p3: u32,
}

pub fn count_by_severity(findings: &[Finding]) -> SeverityCounts {
    let mut counts = SeverityCounts {
        p0: 0,
        p1: 0,
        p2: 0,
        p3: 0,
    };
    for finding in findings {
        match finding.severity {
            Severity::P0 => counts.p0 += 1,
            Severity::P1 => counts.p1 += 1,
            Severity::P2 => counts.p2 += 1,
            Severity::P3 => counts.p3 += 1,
        }
    }
    counts
}

/// RED on any kill switch or a pile of strong suppressors; AMBER on limited
/// strong suppressors or heavy moderate drag; GREEN otherwise.
pub fn risk_level(counts: SeverityCounts) -> RiskLevel {
    if counts.p0 >= 1 || counts.p1 >= 3 {
        RiskLevel::Red
    } else if (1..=2).contains(&counts.p1) || counts.p2 >= 5 {
        RiskLevel::Amber
    } else {
        RiskLevel::Green
    }
}

/// Direction of change against the caller-supplied baseline. Transitions not
/// explicitly named count as STABLE.
pub fn trajectory(baseline: Option<&Baseline>, current: RiskLevel) -> Option<Trajectory> {
    let from = baseline?.risk_level;
    use RiskLevel::*;
    let direction = match (from, current) {
        (Red, Amber) | (Amber, Green) => Trajectory::Down,
        (Green, Amber) | (Amber, Red) | (Green, Red) => Trajectory::Up,
        _ => Trajectory::Stable,
    };
    Some(direction)
}

/// The single evidence-backed finding surfaced in the response: the first
/// finding at the most severe level present.
pub fn select_proof(findings: &[Finding]) -> Option<&Finding> {
    findings.iter().min_by_key(|f| f.severity)
}

/// The external contract never reports P3 as a proof severity.
pub fn clamp_proof_severity(severity: Severity) -> Severity {
    match severity {
        Severity::P3 => Severity::P2,
        other => other,
    }
}
