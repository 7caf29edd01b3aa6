//! Strategy catalog: ordered extraction profiles per platform

use crate::extractor::platform::Platform;
use std::path::PathBuf;
use std::time::Duration;

const DESKTOP_UA: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";
const ANDROID_UA: &str = "com.google.android.youtube/19.09.37 (Linux; U; Android 13) gzip";
const IOS_UA: &str = "com.google.ios.youtube/19.09.3 (iPhone14,3; U; CPU iOS 17_4 like Mac OS X)";
const TV_UA: &str = "Mozilla/5.0 (PlayStation; PlayStation 4/12.00) AppleWebKit/605.1.15 (KHTML, like Gecko) Version/15.4 Safari/605.1.15";
const MOBILE_UA: &str = "Mozilla/5.0 (Linux; Android 13; Pixel 7) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Mobile Safari/537.36";

/// Environment facts injected per request
#[derive(Debug, Clone)]
pub struct RuntimeContext {
    /// The process can reach a logged-in browser's cookie store
    pub trusted_environment: bool,
    /// Browser whose session cookies are borrowed
    pub browser: String,
    /// Netscape cookies.txt to attach when present on disk
    pub cookie_file: Option<PathBuf>,
}

impl Default for RuntimeContext {
    fn default() -> Self {
        Self {
            trusted_environment: false,
            browser: "chrome".to_string(),
            cookie_file: None,
        }
    }
}

/// Where an attempt gets its cookies from
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CookieSource {
    None,
    File(PathBuf),
    Browser(String),
}

/// Declared client identity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClientType {
    Android,
    Ios,
    Tv,
    Web,
    Mobile,
}

impl ClientType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientType::Android => "android",
            ClientType::Ios => "ios",
            ClientType::Tv => "tv_embedded",
            ClientType::Web => "web",
            ClientType::Mobile => "mweb",
        }
    }
}

/// One immutable extraction configuration
#[derive(Debug, Clone, PartialEq)]
pub struct StrategyProfile {
    pub name: &'static str,
    pub user_agent: &'static str,
    pub client: ClientType,
    /// Ask the backend to present as this player client (YouTube only)
    pub player_client: bool,
    pub headers: Vec<(&'static str, &'static str)>,
    pub geo_bypass: bool,
    pub cookies: CookieSource,
    pub check_certificate: bool,
    pub socket_timeout: Duration,
    pub retries: u32,
}

impl StrategyProfile {
    /// Upper bound on one attempt: every internal retry may hit the socket timeout
    pub fn attempt_budget(&self) -> Duration {
        self.socket_timeout * (self.retries + 1)
    }
}

/// Static profile definition, materialized per request
struct Template {
    name: &'static str,
    user_agent: &'static str,
    client: ClientType,
    player_client: bool,
    headers: &'static [(&'static str, &'static str)],
    geo_bypass: bool,
    check_certificate: bool,
    socket_timeout_secs: u64,
    retries: u32,
}

const ACCEPT_LANGUAGE: (&str, &str) = ("Accept-Language", "en-US,en;q=0.9");

const SESSION: Template = Template {
    name: "browser-session",
    user_agent: DESKTOP_UA,
    client: ClientType::Web,
    player_client: false,
    headers: &[ACCEPT_LANGUAGE],
    geo_bypass: true,
    check_certificate: true,
    socket_timeout_secs: 20,
    retries: 2,
};

// Embedded clients face weaker bot mitigation, so they go before web.
const YOUTUBE: &[Template] = &[
    Template {
        name: "android",
        user_agent: ANDROID_UA,
        client: ClientType::Android,
        player_client: true,
        headers: &[ACCEPT_LANGUAGE],
        geo_bypass: true,
        check_certificate: true,
        socket_timeout_secs: 15,
        retries: 2,
    },
    Template {
        name: "ios",
        user_agent: IOS_UA,
        client: ClientType::Ios,
        player_client: true,
        headers: &[ACCEPT_LANGUAGE],
        geo_bypass: true,
        check_certificate: true,
        socket_timeout_secs: 15,
        retries: 2,
    },
    Template {
        name: "tv-embedded",
        user_agent: TV_UA,
        client: ClientType::Tv,
        player_client: true,
        headers: &[ACCEPT_LANGUAGE, ("Referer", "https://www.youtube.com/")],
        geo_bypass: true,
        check_certificate: true,
        socket_timeout_secs: 15,
        retries: 1,
    },
    Template {
        name: "web",
        user_agent: DESKTOP_UA,
        client: ClientType::Web,
        player_client: true,
        headers: &[ACCEPT_LANGUAGE],
        geo_bypass: true,
        check_certificate: false,
        socket_timeout_secs: 20,
        retries: 1,
    },
];

const GENERIC: &[Template] = &[
    Template {
        name: "mobile",
        user_agent: MOBILE_UA,
        client: ClientType::Mobile,
        player_client: false,
        headers: &[ACCEPT_LANGUAGE],
        geo_bypass: true,
        check_certificate: true,
        socket_timeout_secs: 15,
        retries: 2,
    },
    Template {
        name: "desktop",
        user_agent: DESKTOP_UA,
        client: ClientType::Web,
        player_client: false,
        headers: &[ACCEPT_LANGUAGE],
        geo_bypass: false,
        check_certificate: false,
        socket_timeout_secs: 20,
        retries: 1,
    },
];

const AUTOMATION: Template = Template {
    name: "browser-automation",
    user_agent: DESKTOP_UA,
    client: ClientType::Web,
    player_client: false,
    headers: &[ACCEPT_LANGUAGE],
    geo_bypass: false,
    check_certificate: true,
    socket_timeout_secs: 30,
    retries: 0,
};

impl Template {
    fn materialize(&self, cookies: CookieSource) -> StrategyProfile {
        StrategyProfile {
            name: self.name,
            user_agent: self.user_agent,
            client: self.client,
            player_client: self.player_client,
            headers: self.headers.to_vec(),
            geo_bypass: self.geo_bypass,
            cookies,
            check_certificate: self.check_certificate,
            socket_timeout: Duration::from_secs(self.socket_timeout_secs),
            retries: self.retries,
        }
    }
}

/// Ordered profiles to try for a platform.
///
/// The borrowed-session profile is only eligible in a trusted environment and
/// always comes first when present.
pub fn profiles_for(platform: Platform, ctx: &RuntimeContext) -> Vec<StrategyProfile> {
    let file_cookies = ctx
        .cookie_file
        .as_ref()
        .filter(|p| p.is_file())
        .map(|p| CookieSource::File(p.clone()))
        .unwrap_or(CookieSource::None);

    let templates = match platform {
        Platform::YouTube => YOUTUBE,
        _ => GENERIC,
    };

    let mut profiles = Vec::with_capacity(templates.len() + 1);
    if ctx.trusted_environment {
        profiles.push(SESSION.materialize(CookieSource::Browser(ctx.browser.clone())));
    }
    profiles.extend(templates.iter().map(|t| t.materialize(file_cookies.clone())));
    profiles
}

/// Desktop identity used for the browser-automation last resort
pub fn automation_profile() -> StrategyProfile {
    AUTOMATION.materialize(CookieSource::None)
}
