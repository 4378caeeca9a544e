// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Deterministic Page Selection
 * Ranks extracted links so identical inputs always pick identical pages
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::collections::HashSet;
use url::Url;

/// Priority nav pages taken from homepage links.
pub const MAX_NAV_PICKS: usize = 3;

/// Pages taken from sitemap locations, in document order.
pub const MAX_SITEMAP_PICKS: usize = 2;

/// Keyword priority for nav ranking. Earlier entries outrank later ones;
/// `services` sits before `service` so the plural form wins its own slot.
const NAV_KEYWORDS: &[&str] = &[
    "contact",
    "about",
    "services",
    "service",
    "pricing",
    "book",
    "audit",
    "diagnostic",
];

/// Score for links matching no keyword.
const UNRANKED_SCORE: usize = 999;

fn keyword_score(path: &str) -> usize {
    let lowered = path.to_lowercase();
    NAV_KEYWORDS
        .iter()
        .position(|kw| lowered.contains(kw))
        .unwrap_or(UNRANKED_SCORE)
}

/// Pick up to three nav pages by keyword score, then pathname length, then
/// pathname. The root path never qualifies as an extra page.
pub fn select_nav_pages(links: &[Url]) -> Vec<Url> {
    let mut candidates: Vec<&Url> = links.iter().filter(|u| u.path() != "/").collect();
    candidates.sort_by(|a, b| {
        keyword_score(a.path())
            .cmp(&keyword_score(b.path()))
            .then(a.path().len().cmp(&b.path().len()))
            .then(a.path().cmp(b.path()))
    });

    let mut seen = HashSet::new();
    candidates
        .into_iter()
        .filter(|u| seen.insert(u.as_str().to_string()))
        .take(MAX_NAV_PICKS)
        .cloned()
        .collect()
}

/// Pick up to two sitemap pages in document order, skipping the root.
pub fn select_sitemap_pages(locs: &[Url]) -> Vec<Url> {
    locs.iter()
        .filter(|u| u.path() != "/")
        .take(MAX_SITEMAP_PICKS)
        .cloned()
        .collect()
}

/// Final extra-page list: nav picks then sitemap picks, de-duplicated
/// preserving first-seen order.
pub fn select_extra_pages(links: &[Url], locs: &[Url]) -> Vec<Url> {
    let mut seen = HashSet::new();
    select_nav_pages(links)
        .into_iter()
        .chain(select_sitemap_pages(locs))
        .filter(|u| seen.insert(u.as_str().to_string()))
        .collect()
}
