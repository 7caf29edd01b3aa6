//! Source platform classification for input URLs

use serde::Serialize;
use std::fmt;
use url::Url;

/// Source platform inferred from a URL
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Platform {
    YouTube,
    TikTok,
    Twitter,
    Instagram,
    Facebook,
    Other,
}

impl Platform {
    /// Name used in user-facing messages
    pub fn display_name(&self) -> &'static str {
        match self {
            Platform::YouTube => "YouTube",
            Platform::TikTok => "TikTok",
            Platform::Twitter => "Twitter/X",
            Platform::Instagram => "Instagram",
            Platform::Facebook => "Facebook",
            Platform::Other => "this site",
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

const HOSTS: &[(&str, Platform)] = &[
    ("youtube.com", Platform::YouTube),
    ("youtu.be", Platform::YouTube),
    ("youtube-nocookie.com", Platform::YouTube),
    ("tiktok.com", Platform::TikTok),
    ("twitter.com", Platform::Twitter),
    ("x.com", Platform::Twitter),
    ("instagram.com", Platform::Instagram),
    ("facebook.com", Platform::Facebook),
    ("fb.watch", Platform::Facebook),
    ("fb.com", Platform::Facebook),
];

/// A URL together with its inferred platform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifiedUrl {
    pub raw: String,
    pub platform: Platform,
}

impl ClassifiedUrl {
    pub fn new(raw: &str) -> Self {
        Self {
            raw: raw.to_string(),
            platform: classify(raw),
        }
    }
}

/// Label a URL with its source platform. Unknown patterns map to `Other`.
pub fn classify(url: &str) -> Platform {
    let trimmed = url.trim();

    if let Some(host) = Url::parse(trimmed)
        .ok()
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    {
        return classify_host(&host);
    }

    // Scheme-less input like "youtu.be/abc"
    if let Some(host) = Some(trimmed)
        .filter(|t| !t.contains("://"))
        .and_then(|t| Url::parse(&format!("https://{}", t)).ok())
        .and_then(|u| u.host_str().map(str::to_ascii_lowercase))
    {
        return classify_host(&host);
    }

    classify_substring(&trimmed.to_ascii_lowercase())
}

fn classify_host(host: &str) -> Platform {
    let host = host.trim_end_matches('.');
    for (domain, platform) in HOSTS {
        if host == *domain || host.ends_with(&format!(".{}", domain)) {
            return *platform;
        }
    }
    Platform::Other
}

/// Last resort for input the URL parser rejects, such as a bad port.
/// A domain only counts when it is not embedded in a longer label.
fn classify_substring(lower: &str) -> Platform {
    let is_label_char = |c: char| c.is_ascii_alphanumeric() || c == '-';

    for (domain, platform) in HOSTS {
        for (pos, _) in lower.match_indices(domain) {
            let before = lower[..pos].chars().next_back();
            let after = lower[pos + domain.len()..].chars().next();
            if !before.is_some_and(is_label_char) && !after.is_some_and(is_label_char) {
                return *platform;
            }
        }
    }
    Platform::Other
}
