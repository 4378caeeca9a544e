// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

/**
 * Bountyy Oy - Screen Error Types
 * Stable error kinds surfaced in error documents
 *
 * @copyright 2026 Bountyy Oy
 * @license Proprietary
 */

use thiserror::Error;

/// Errors that terminate a scan. Sub-fetch failures are not errors; they are
/// recorded as constraints and degrade the report instead.
#[derive(Error, Debug)]
pub enum ScreenError {
    /// Malformed input URL or a blocked target (SSRF guard trip).
    #[error("{0}")]
    InvalidUrl(String),

    /// Homepage HTML unavailable; no report can be produced.
    #[error("{0}")]
    InsufficientData(String),

    /// Scan could not complete within its overall deadline.
    #[error("{0}")]
    FetchFailed(String),
}

impl ScreenError {
    /// Stable kind tag used as `error_type` in error documents.
    pub fn error_type(&self) -> &'static str {
        match self {
            ScreenError::InvalidUrl(_) => "INVALID_URL",
            ScreenError::InsufficientData(_) => "INSUFFICIENT_DATA",
            ScreenError::FetchFailed(_) => "FETCH_FAILED",
        }
    }
}
