// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Scan Pipeline
 * Normalize, guard, fetch, select, analyze, assemble - in that order
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use anyhow::Result;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};
use url::Url;

use crate::analyzer;
use crate::artifacts::{Baseline, Constraint, ConstraintSet, ScanInput};
use crate::config::ScreenConfig;
use crate::errors::ScreenError;
use crate::extract;
use crate::fetcher::ArtifactFetcher;
use crate::http_client::HttpClient;
use crate::report::{self, ScreenResponse};
use crate::security_flags;
use crate::selector;
use crate::url_guard;

/// One engine serves all requests. The HTTP client pool is shared; every
/// scan builds its own snapshot and discards it with the response.
pub struct ScreenEngine {
    fetcher: ArtifactFetcher,
    scan_deadline: Duration,
    allow_internal_targets: bool,
}

impl ScreenEngine {
    pub fn new(config: &ScreenConfig) -> Result<Self> {
        let client = HttpClient::new(config.fetch_timeout())?;
        Ok(Self {
            fetcher: ArtifactFetcher::new(client),
            scan_deadline: config.scan_deadline(),
            allow_internal_targets: config.allow_internal_targets,
        })
    }

    /// Run a scan dated today (UTC).
    pub async fn scan(&self, raw_url: &str, baseline: Option<Baseline>) -> ScreenResponse {
        let scan_date = chrono::Utc::now().format("%Y-%m-%d").to_string();
        self.scan_with_date(raw_url, baseline, &scan_date).await
    }

    /// Run a scan with a caller-chosen date. Given identical live artifacts,
    /// two runs with the same date produce byte-identical reports.
    pub async fn scan_with_date(
        &self,
        raw_url: &str,
        baseline: Option<Baseline>,
        scan_date: &str,
    ) -> ScreenResponse {
        let started = Instant::now();
        let outcome = tokio::time::timeout(
            self.scan_deadline,
            self.run_pipeline(raw_url, baseline, scan_date),
        )
        .await
        .unwrap_or_else(|_| {
            warn!("[Screen] Scan of {} hit the overall deadline", raw_url);
            Err(ScreenError::FetchFailed(format!(
                "Scan did not complete within {} seconds",
                self.scan_deadline.as_secs()
            )))
        });

        match outcome {
            Ok(report) => {
                info!(
                    "[Screen] {} -> {} in {:.1}s",
                    report.scan_metadata.domain,
                    report.result.risk_level,
                    started.elapsed().as_secs_f64()
                );
                ScreenResponse::Success(Box::new(report))
            }
            Err(err) => {
                info!(
                    "[Screen] {} -> {} in {:.1}s",
                    raw_url,
                    err.error_type(),
                    started.elapsed().as_secs_f64()
                );
                ScreenResponse::Error(report::error_document(&err))
            }
        }
    }

    async fn run_pipeline(
        &self,
        raw_url: &str,
        baseline: Option<Baseline>,
        scan_date: &str,
    ) -> Result<report::Report, ScreenError> {
        let origin = url_guard::normalize_origin(raw_url)?;
        if !self.allow_internal_targets {
            url_guard::check_ssrf(&origin)?;
        }
        debug!("[Screen] Normalized {} -> {}", raw_url, origin);

        let mut constraints = ConstraintSet::new();

        // Phase 1: homepage. Without its HTML there is nothing to analyze.
        let homepage = self
            .fetcher
            .fetch_html(origin.as_str(), &mut constraints)
            .await;
        if homepage.html.is_none() {
            return Err(ScreenError::InsufficientData(format!(
                "Homepage HTML unavailable for {} (status {})",
                origin, homepage.status
            )));
        }

        // Phase 2: robots and sitemap. Their slots are fixed, so fetching
        // them concurrently cannot reorder anything.
        let robots_url = join_path(&origin, "/robots.txt");
        let sitemap_url = join_path(&origin, "/sitemap.xml");
        let mut robots_constraints = ConstraintSet::new();
        let mut sitemap_constraints = ConstraintSet::new();
        let (robots_txt, sitemap_xml) = tokio::join!(
            self.fetcher
                .fetch_text(robots_url.as_str(), &mut robots_constraints),
            self.fetcher
                .fetch_text(sitemap_url.as_str(), &mut sitemap_constraints),
        );
        merge_constraints(&mut constraints, &robots_constraints);
        merge_constraints(&mut constraints, &sitemap_constraints);
        if robots_txt.text.is_none() {
            constraints.push(Constraint::RobotsUnavailable);
        }
        if sitemap_xml.text.is_none() {
            constraints.push(Constraint::SitemapUnavailable);
        }

        // Phase 3: deterministic page selection from the two link sources.
        let homepage_url = Url::parse(&homepage.final_url).unwrap_or_else(|_| origin.clone());
        let links = extract::extract_links(
            homepage.html.as_deref().unwrap_or_default(),
            &homepage_url,
            &origin,
        );
        let locs = sitemap_xml
            .text
            .as_deref()
            .map(|xml| extract::extract_sitemap_locs(xml, &sitemap_url, &origin))
            .unwrap_or_default();
        let picks = selector::select_extra_pages(&links, &locs);
        debug!(
            "[Screen] {} nav links, {} sitemap locs, {} picks",
            links.len(),
            locs.len(),
            picks.len()
        );

        // Phase 4: extra pages, in pick order. Failures degrade the report.
        let mut extra_pages = Vec::with_capacity(picks.len());
        for pick in &picks {
            let artifact = self
                .fetcher
                .fetch_html(pick.as_str(), &mut constraints)
                .await;
            if artifact.html.is_some() {
                extra_pages.push(artifact);
            }
        }

        let input = ScanInput {
            domain: origin.to_string(),
            scan_date: scan_date.to_string(),
            baseline,
            homepage,
            robots_txt,
            sitemap_xml,
            extra_pages,
            constraints,
        };

        let findings = analyzer::analyze(&input);
        let flags = security_flags::detect(&input);
        Ok(report::assemble_report(&input, &findings, flags))
    }
}

fn join_path(origin: &Url, path: &str) -> Url {
    // The origin always carries path "/", so join cannot fail.
    origin
        .join(path)
        .unwrap_or_else(|_| origin.clone())
}

fn merge_constraints(target: &mut ConstraintSet, source: &ConstraintSet) {
    for constraint in source.iter() {
        target.push(*constraint);
    }
}
