//! Browser-automation fallback adapter
//!
//! Loads the page the way a desktop browser would, waits for it to settle,
//! then collects every resource reference that looks like a media stream.
//! Metadata comes from OpenGraph tags and is lower confidence than what the
//! direct adapter reports.

use crate::extractor::models::{RawMetadataRecord, RawStreamDescriptor};
use crate::extractor::strategy::StrategyProfile;
use crate::extractor::traits::{BackendAdapter, BackendKind};
use crate::utils::error::{ExtractionFailure, FailureKind};
use async_trait::async_trait;
use regex::Regex;
use reqwest::header::{ACCEPT, ACCEPT_LANGUAGE, USER_AGENT};
use reqwest::StatusCode;
use std::collections::HashSet;
use std::sync::OnceLock;
use std::time::Duration;
use tracing::{debug, info};

/// Timing bounds for one simulated page load
#[derive(Debug, Clone, Copy)]
pub struct BrowserTiming {
    pub page_load_timeout: Duration,
    pub settle_delay: Duration,
}

impl Default for BrowserTiming {
    fn default() -> Self {
        Self {
            page_load_timeout: Duration::from_secs(30),
            settle_delay: Duration::from_millis(1500),
        }
    }
}

impl BrowserTiming {
    pub fn total(&self) -> Duration {
        self.page_load_timeout + self.settle_delay
    }
}

pub struct BrowserAdapter {
    client: reqwest::Client,
    timing: BrowserTiming,
}

impl BrowserAdapter {
    pub fn new(client: reqwest::Client, timing: BrowserTiming) -> Self {
        Self { client, timing }
    }

    pub fn timing(&self) -> BrowserTiming {
        self.timing
    }

    async fn load_page(
        &self,
        url: &str,
        profile: &StrategyProfile,
    ) -> Result<String, ExtractionFailure> {
        let mut request = self
            .client
            .get(url)
            .timeout(self.timing.page_load_timeout)
            .header(USER_AGENT, profile.user_agent)
            .header(
                ACCEPT,
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .header(ACCEPT_LANGUAGE, "en-US,en;q=0.9");
        for (name, value) in &profile.headers {
            request = request.header(*name, *value);
        }

        let response = request.send().await.map_err(|e| {
            if e.is_timeout() {
                ExtractionFailure::timeout(format!("page load timed out: {}", e))
            } else {
                ExtractionFailure::new(FailureKind::Blocked, format!("page load failed: {}", e))
            }
        })?;

        let status = response.status();
        if !status.is_success() {
            return Err(failure_for_status(status));
        }

        response
            .text()
            .await
            .map_err(|e| ExtractionFailure::malformed(format!("unreadable page body: {}", e)))
    }
}

#[async_trait]
impl BackendAdapter for BrowserAdapter {
    fn id(&self) -> &'static str {
        "browser"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::BrowserAutomation
    }

    async fn extract(
        &self,
        url: &str,
        profile: &StrategyProfile,
    ) -> Result<RawMetadataRecord, ExtractionFailure> {
        info!("Simulating page load for {}", url);
        let html = self.load_page(url, profile).await?;

        // Let late resources land, as a rendered page would.
        tokio::time::sleep(self.timing.settle_delay).await;

        let record = scan_page(url, &html);
        if record.formats.is_empty() {
            return Err(ExtractionFailure::new(
                FailureKind::NotFound,
                "no media resources observed on page",
            ));
        }

        debug!("Observed {} media resources", record.formats.len());
        Ok(record)
    }
}

fn failure_for_status(status: StatusCode) -> ExtractionFailure {
    let detail = format!("page returned HTTP {}", status.as_u16());
    match status {
        StatusCode::UNAUTHORIZED => {
            ExtractionFailure::new(FailureKind::AuthenticationRequired, detail)
        }
        StatusCode::NOT_FOUND | StatusCode::GONE => {
            ExtractionFailure::new(FailureKind::NotFound, detail)
        }
        StatusCode::REQUEST_TIMEOUT | StatusCode::GATEWAY_TIMEOUT => {
            ExtractionFailure::timeout(detail)
        }
        _ => ExtractionFailure::new(FailureKind::Blocked, detail),
    }
}

fn media_url_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(
            r#"https?:(?:\\?/){2}[^\s"'<>]+?(?:\.(?:mp4|webm|m4a|mp3|mov)(?:\?[^\s"'<>]*)?|/videoplayback\?[^\s"'<>]*)"#,
        )
        .ok()
    })
    .as_ref()
}

fn meta_regex() -> Option<&'static Regex> {
    static RE: OnceLock<Option<Regex>> = OnceLock::new();
    RE.get_or_init(|| {
        Regex::new(r#"<meta\s+(?:property|name)="([^"]+)"\s+content="([^"]*)""#).ok()
    })
    .as_ref()
}

/// Build a raw record from page markup
pub fn scan_page(page_url: &str, html: &str) -> RawMetadataRecord {
    let mut record = RawMetadataRecord {
        webpage_url: Some(page_url.to_string()),
        extractor: Some("browser".to_string()),
        ..Default::default()
    };

    for caps in meta_regex().into_iter().flat_map(|re| re.captures_iter(html)) {
        let value = unescape(&caps[2]);
        if value.is_empty() {
            continue;
        }
        match &caps[1] {
            "og:title" | "twitter:title" if record.title.is_none() => record.title = Some(value),
            "og:image" | "twitter:image" if record.thumbnail.is_none() => {
                record.thumbnail = Some(value)
            }
            "og:video:duration" | "video:duration" if record.duration.is_none() => {
                record.duration = value.parse().ok()
            }
            "author" | "og:site_name" if record.uploader.is_none() => {
                record.uploader = Some(value)
            }
            _ => {}
        }
    }

    let mut seen = HashSet::new();
    for m in media_url_regex().into_iter().flat_map(|re| re.find_iter(html)) {
        let resource = unescape(m.as_str());
        if !seen.insert(resource.clone()) {
            continue;
        }
        record.formats.push(descriptor_for(resource));
    }

    record
}

fn descriptor_for(resource: String) -> RawStreamDescriptor {
    let path = resource.split('?').next().unwrap_or(&resource).to_ascii_lowercase();
    let ext = ["mp4", "webm", "m4a", "mp3", "mov"]
        .into_iter()
        .find(|e| path.ends_with(&format!(".{}", e)))
        .unwrap_or("mp4");

    // Codec presence is only known for audio containers.
    let vcodec = match ext {
        "m4a" | "mp3" => Some("none".to_string()),
        _ => None,
    };

    RawStreamDescriptor {
        ext: Some(ext.to_string()),
        vcodec,
        url: Some(resource),
        ..Default::default()
    }
}

fn unescape(s: &str) -> String {
    s.replace("\\/", "/")
        .replace("\\u0026", "&")
        .replace("&amp;", "&")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
}
