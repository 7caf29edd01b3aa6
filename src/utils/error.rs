//! Error handling for rustgrab

use crate::extractor::platform::Platform;
use std::fmt;
use thiserror::Error;

/// Why a single backend attempt failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FailureKind {
    /// Platform demanded sign-in
    AuthenticationRequired,
    /// Generic bot-mitigation signal
    Blocked,
    Timeout,
    NotFound,
    MalformedResponse,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            FailureKind::AuthenticationRequired => "authentication required",
            FailureKind::Blocked => "blocked",
            FailureKind::Timeout => "timeout",
            FailureKind::NotFound => "not found",
            FailureKind::MalformedResponse => "malformed response",
        };
        f.write_str(s)
    }
}

/// Failure reported by a backend adapter for one attempt.
///
/// Always retryable with a different profile; the orchestrator absorbs it.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {detail}")]
pub struct ExtractionFailure {
    pub kind: FailureKind,
    pub detail: String,
}

impl ExtractionFailure {
    pub fn new(kind: FailureKind, detail: impl Into<String>) -> Self {
        Self {
            kind,
            detail: detail.into(),
        }
    }

    pub fn timeout(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::Timeout, detail)
    }

    pub fn malformed(detail: impl Into<String>) -> Self {
        Self::new(FailureKind::MalformedResponse, detail)
    }

    /// Map backend diagnostics (e.g. yt-dlp stderr) onto a failure kind
    pub fn diagnose(message: &str) -> Self {
        let lower = message.to_lowercase();

        let kind = if lower.contains("sign in")
            || lower.contains("login required")
            || lower.contains("log in")
            || lower.contains("cookies")
            || lower.contains("private video")
            || lower.contains("age-restricted")
        {
            FailureKind::AuthenticationRequired
        } else if lower.contains("timed out") || lower.contains("timeout") {
            FailureKind::Timeout
        } else if lower.contains("404")
            || lower.contains("not found")
            || lower.contains("unavailable")
            || lower.contains("does not exist")
            || lower.contains("unsupported url")
        {
            FailureKind::NotFound
        } else if lower.contains("json") || lower.contains("parse") {
            FailureKind::MalformedResponse
        } else {
            // 403, 429, bot checks and anything unrecognized
            FailureKind::Blocked
        };

        Self::new(kind, message.trim())
    }
}

/// Errors that reach the caller of the orchestrator
#[derive(Debug, Error)]
pub enum ResolveError {
    /// Empty or missing URL, rejected before any adapter runs
    #[error("Malformed input: {0}")]
    MalformedInput(String),

    /// Every strategy and fallback failed
    #[error("Extraction exhausted for {platform}: {reason}")]
    Exhausted {
        platform: Platform,
        reason: ExtractionFailure,
    },

    /// The caller abandoned the request
    #[error("Extraction cancelled")]
    Cancelled,
}
