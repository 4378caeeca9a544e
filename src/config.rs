// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Screen Configuration
 * Environment-driven service settings
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use std::time::Duration;

#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub host: String,
    pub port: u16,
    /// Per-fetch deadline.
    pub fetch_timeout_secs: u64,
    /// Overall wall-clock budget for one scan.
    pub scan_deadline_secs: u64,
    /// Lets staging environments point the screen at loopback targets. The
    /// SSRF guard stays on in production.
    pub allow_internal_targets: bool,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            host: std::env::var("SCREEN_HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("SCREEN_PORT")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(8080),
            fetch_timeout_secs: std::env::var("SCREEN_FETCH_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(12),
            scan_deadline_secs: std::env::var("SCREEN_SCAN_DEADLINE_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(30),
            allow_internal_targets: std::env::var("SCREEN_ALLOW_INTERNAL_TARGETS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(false),
        }
    }
}

impl ScreenConfig {
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_secs)
    }

    pub fn scan_deadline(&self) -> Duration {
        Duration::from_secs(self.scan_deadline_secs)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}
