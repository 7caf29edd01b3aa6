//! Response contract shared by the HTTP layer and the CLI

use crate::catalog::MediaCatalog;
use crate::extractor::platform::Platform;
use crate::utils::error::ResolveError;
use serde::{Deserialize, Serialize};

/// Longest raw failure reason shown to users
pub const MAX_REASON_CHARS: usize = 200;

pub const YOUTUBE_BLOCKED: &str =
    "YouTube blocked this request. Please update cookies.txt or try a different link.";
pub const YOUTUBE_SUGGESTION: &str =
    "YouTube is limiting automated access right now. Links from Instagram, TikTok, Twitter/X or Facebook usually work.";

/// Either a full catalog or an error record, never both
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum AnalyzeResponse {
    Catalog(MediaCatalog),
    Error(ErrorBody),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub suggestion: Option<String>,
}

impl ErrorBody {
    pub fn new(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            suggestion: None,
        }
    }
}

impl From<&ResolveError> for ErrorBody {
    fn from(err: &ResolveError) -> Self {
        match err {
            ResolveError::MalformedInput(msg) => ErrorBody::new(msg.clone()),
            ResolveError::Exhausted {
                platform: Platform::YouTube,
                ..
            } => ErrorBody {
                error: YOUTUBE_BLOCKED.to_string(),
                suggestion: Some(YOUTUBE_SUGGESTION.to_string()),
            },
            ResolveError::Exhausted {
                platform: Platform::Other,
                reason,
            } => ErrorBody::new(format!(
                "Extraction failed: {}",
                truncate(&reason.detail, MAX_REASON_CHARS)
            )),
            ResolveError::Exhausted { platform, reason } => ErrorBody::new(format!(
                "{} extraction failed: {}",
                platform,
                truncate(&reason.detail, MAX_REASON_CHARS)
            )),
            ResolveError::Cancelled => ErrorBody::new("Request timed out"),
        }
    }
}

impl From<Result<MediaCatalog, ResolveError>> for AnalyzeResponse {
    fn from(result: Result<MediaCatalog, ResolveError>) -> Self {
        match result {
            Ok(catalog) => AnalyzeResponse::Catalog(catalog),
            Err(err) => AnalyzeResponse::Error(ErrorBody::from(&err)),
        }
    }
}

fn truncate(s: &str, max_chars: usize) -> String {
    let s = s.trim();
    match s.char_indices().nth(max_chars) {
        Some((idx, _)) => format!("{}...", &s[..idx]),
        None => s.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::error::{ExtractionFailure, FailureKind};

    #[test]
    fn test_youtube_exhaustion_has_suggestion() {
        let err = ResolveError::Exhausted {
            platform: Platform::YouTube,
            reason: ExtractionFailure::new(FailureKind::Blocked, "HTTP Error 403"),
        };
        let body = ErrorBody::from(&err);
        assert_eq!(body.error, YOUTUBE_BLOCKED);
        assert!(body.suggestion.unwrap().contains("TikTok"));
    }

    #[test]
    fn test_other_platform_reason_truncated() {
        let err = ResolveError::Exhausted {
            platform: Platform::Other,
            reason: ExtractionFailure::new(FailureKind::NotFound, "x".repeat(500)),
        };
        let body = ErrorBody::from(&err);
        assert!(body.error.starts_with("Extraction failed: xxx"));
        assert!(body.error.ends_with("..."));
        assert!(body.error.len() < 260);

        let json = serde_json::to_value(&body).unwrap();
        assert!(json.get("suggestion").is_none());
    }

    #[test]
    fn test_named_platform_in_message() {
        let err = ResolveError::Exhausted {
            platform: Platform::Instagram,
            reason: ExtractionFailure::new(FailureKind::AuthenticationRequired, "login required"),
        };
        assert_eq!(
            ErrorBody::from(&err).error,
            "Instagram extraction failed: login required"
        );
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate("ééé", 2), "éé...");
        assert_eq!(truncate("short", 10), "short");
    }
}
