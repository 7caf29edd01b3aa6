use crate::extractor::models::RawMetadataRecord;
use crate::extractor::strategy::StrategyProfile;
use crate::utils::error::ExtractionFailure;
use async_trait::async_trait;
use serde::Serialize;
use std::fmt;

/// Which family of backend handled an attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum BackendKind {
    /// Fast metadata extraction, may be blocked
    Direct,
    /// Simulated browser page load, last resort
    BrowserAutomation,
}

impl fmt::Display for BackendKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BackendKind::Direct => write!(f, "direct"),
            BackendKind::BrowserAutomation => write!(f, "browser-automation"),
        }
    }
}

/// Core trait for all extraction backends
///
/// The orchestrator sees exactly one result per call; any internal retries
/// are the adapter's own business.
#[async_trait]
pub trait BackendAdapter: Send + Sync {
    /// Returns a unique identifier for this adapter (e.g., "yt-dlp", "browser")
    fn id(&self) -> &'static str;

    fn kind(&self) -> BackendKind;

    /// Extract raw metadata for `url` using the given profile
    async fn extract(
        &self,
        url: &str,
        profile: &StrategyProfile,
    ) -> Result<RawMetadataRecord, ExtractionFailure>;
}
