//! Application configuration

use crate::extractor::browser::BrowserTiming;
use crate::extractor::orchestrator::OrchestratorConfig;
use crate::extractor::strategy::RuntimeContext;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::warn;

/// Application settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Interface the HTTP server binds to
    pub host: String,

    pub port: u16,

    /// Directory holding index.html
    pub static_dir: PathBuf,

    /// Process can reach a logged-in browser's cookie store
    pub trusted_environment: bool,

    /// Browser whose session cookies are borrowed in a trusted environment
    pub browser: String,

    /// Netscape cookies.txt attached to attempts when present
    pub cookie_file: Option<PathBuf>,

    /// Explicit yt-dlp binary; discovered when unset
    pub ytdlp_path: Option<PathBuf>,

    /// Outer bound on one analyze request
    pub request_timeout_secs: u64,

    /// Slack added to every attempt's budget
    pub attempt_grace_secs: u64,

    /// Pause between direct attempts
    pub attempt_backoff_ms: u64,

    pub page_load_timeout_secs: u64,

    pub settle_delay_ms: u64,

    pub log_level: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 10000,
            static_dir: PathBuf::from("."),
            trusted_environment: false,
            browser: "chrome".to_string(),
            cookie_file: Some(PathBuf::from("cookies.txt")),
            ytdlp_path: None,
            request_timeout_secs: 120,
            attempt_grace_secs: 5,
            attempt_backoff_ms: 0,
            page_load_timeout_secs: 30,
            settle_delay_ms: 1500,
            log_level: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then an optional JSON file, then environment overrides
    pub fn load(config_file: Option<&Path>) -> Result<Self> {
        let mut settings = match config_file {
            Some(path) => Self::from_file(path)?,
            None => Self::default(),
        };
        settings.apply_env(|key| std::env::var(key).ok());
        settings.validate();
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        serde_json::from_str(&json)
            .with_context(|| format!("Failed to parse config file {}", path.display()))
    }

    /// Apply `PORT` and `RUSTGRAB_*` overrides from the given lookup
    pub fn apply_env(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        if let Some(port) = lookup("PORT").and_then(|v| parse_or_warn::<u16>("PORT", &v)) {
            self.port = port;
        }
        if let Some(host) = lookup("RUSTGRAB_HOST") {
            self.host = host;
        }
        if let Some(dir) = lookup("RUSTGRAB_STATIC_DIR") {
            self.static_dir = PathBuf::from(dir);
        }
        if let Some(trusted) = lookup("RUSTGRAB_TRUSTED") {
            self.trusted_environment = matches!(
                trusted.trim().to_ascii_lowercase().as_str(),
                "1" | "true" | "yes" | "on"
            );
        }
        if let Some(browser) = lookup("RUSTGRAB_BROWSER") {
            self.browser = browser;
        }
        if let Some(cookies) = lookup("RUSTGRAB_COOKIES") {
            self.cookie_file = (!cookies.is_empty()).then(|| PathBuf::from(cookies));
        }
        if let Some(path) = lookup("RUSTGRAB_YTDLP") {
            self.ytdlp_path = Some(PathBuf::from(path));
        }
        if let Some(secs) = lookup("RUSTGRAB_REQUEST_TIMEOUT")
            .and_then(|v| parse_or_warn::<u64>("RUSTGRAB_REQUEST_TIMEOUT", &v))
        {
            self.request_timeout_secs = secs;
        }
        if let Some(level) = lookup("RUSTGRAB_LOG") {
            self.log_level = level;
        }
    }

    /// Enforce sane minimums
    pub fn validate(&mut self) {
        if self.port == 0 {
            warn!("Port 0 is not allowed, using 10000");
            self.port = 10000;
        }
        if self.request_timeout_secs == 0 {
            self.request_timeout_secs = 1;
        }
        if self.page_load_timeout_secs == 0 {
            self.page_load_timeout_secs = 1;
        }
        if self.browser.trim().is_empty() {
            self.browser = "chrome".to_string();
        }
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    pub fn browser_timing(&self) -> BrowserTiming {
        BrowserTiming {
            page_load_timeout: Duration::from_secs(self.page_load_timeout_secs),
            settle_delay: Duration::from_millis(self.settle_delay_ms),
        }
    }

    pub fn orchestrator_config(&self) -> OrchestratorConfig {
        OrchestratorConfig {
            attempt_grace: Duration::from_secs(self.attempt_grace_secs),
            attempt_backoff: Duration::from_millis(self.attempt_backoff_ms),
            automation_budget: self.browser_timing().total(),
        }
    }

    /// Per-request environment facts handed to the orchestrator
    pub fn runtime_context(&self) -> RuntimeContext {
        RuntimeContext {
            trusted_environment: self.trusted_environment,
            browser: self.browser.clone(),
            cookie_file: self.cookie_file.clone(),
        }
    }
}

fn parse_or_warn<T: std::str::FromStr>(key: &str, value: &str) -> Option<T> {
    match value.trim().parse() {
        Ok(v) => Some(v),
        Err(_) => {
            warn!("Ignoring invalid {}={:?}", key, value);
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::io::Write;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_default_config() {
        let config = Settings::default();
        assert_eq!(config.port, 10000);
        assert!(!config.trusted_environment);
        assert!(config.request_timeout_secs > 0);
    }

    #[test]
    fn test_env_overrides() {
        let mut config = Settings::default();
        config.apply_env(env(&[
            ("PORT", "8080"),
            ("RUSTGRAB_TRUSTED", "Yes"),
            ("RUSTGRAB_COOKIES", ""),
            ("RUSTGRAB_BROWSER", "firefox"),
        ]));

        assert_eq!(config.port, 8080);
        assert!(config.trusted_environment);
        assert_eq!(config.cookie_file, None);

        let ctx = config.runtime_context();
        assert!(ctx.trusted_environment);
        assert_eq!(ctx.browser, "firefox");
    }

    #[test]
    fn test_invalid_port_ignored() {
        let mut config = Settings::default();
        config.apply_env(env(&[("PORT", "eighty")]));
        assert_eq!(config.port, 10000);
    }

    #[test]
    fn test_validation_enforces_minimums() {
        let mut config = Settings {
            port: 0,
            request_timeout_secs: 0,
            browser: " ".to_string(),
            ..Default::default()
        };
        config.validate();

        assert_eq!(config.port, 10000);
        assert_eq!(config.request_timeout_secs, 1);
        assert_eq!(config.browser, "chrome");
    }

    #[test]
    fn test_partial_config_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{"port": 9000, "settle_delay_ms": 0}}"#).unwrap();

        let config = Settings::from_file(file.path()).unwrap();
        assert_eq!(config.port, 9000);
        assert_eq!(config.settle_delay_ms, 0);
        assert_eq!(config.host, "0.0.0.0");
    }

    #[test]
    fn test_orchestrator_budget_matches_browser_timing() {
        let config = Settings::default();
        assert_eq!(
            config.orchestrator_config().automation_budget,
            Duration::from_millis(31_500)
        );
    }
}
