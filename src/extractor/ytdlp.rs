//! yt-dlp wrapper for direct extraction
//!
//! Runs `yt-dlp --dump-json` with arguments derived from a strategy profile.
//! It supports both a configured binary path and a system-installed yt-dlp.

use crate::extractor::models::RawMetadataRecord;
use crate::extractor::strategy::{CookieSource, StrategyProfile};
use crate::extractor::traits::{BackendAdapter, BackendKind};
use crate::utils::error::ExtractionFailure;
use anyhow::{anyhow, Result};
use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use tokio::process::Command;
use tracing::{debug, info, warn};

/// Direct adapter backed by the yt-dlp binary
pub struct YtDlpAdapter {
    ytdlp_path: PathBuf,
}

impl YtDlpAdapter {
    /// Initialize the adapter, locating yt-dlp unless a path is given
    pub fn new(configured: Option<&Path>) -> Result<Self> {
        let ytdlp_path = match configured {
            Some(path) if path.exists() => path.to_path_buf(),
            Some(path) => {
                return Err(anyhow!("configured yt-dlp not found at {}", path.display()));
            }
            None => find_ytdlp().ok_or_else(|| {
                anyhow!("yt-dlp not found. Install it with `pip install yt-dlp`")
            })?,
        };

        info!("Using yt-dlp at: {}", ytdlp_path.display());
        Ok(Self { ytdlp_path })
    }
}

#[async_trait]
impl BackendAdapter for YtDlpAdapter {
    fn id(&self) -> &'static str {
        "yt-dlp"
    }

    fn kind(&self) -> BackendKind {
        BackendKind::Direct
    }

    async fn extract(
        &self,
        url: &str,
        profile: &StrategyProfile,
    ) -> Result<RawMetadataRecord, ExtractionFailure> {
        let args = build_args(url, profile);
        debug!("yt-dlp [{}] args: {:?}", profile.name, args);

        // Dropping the future (timeout or cancellation) kills the child.
        let output = Command::new(&self.ytdlp_path)
            .args(&args)
            .stdin(Stdio::null())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| ExtractionFailure::malformed(format!("failed to run yt-dlp: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            warn!("yt-dlp [{}] failed: {}", profile.name, stderr.trim());
            return Err(ExtractionFailure::diagnose(&stderr));
        }

        parse_dump(&String::from_utf8_lossy(&output.stdout))
    }
}

/// Translate a profile into yt-dlp command-line arguments
pub fn build_args(url: &str, profile: &StrategyProfile) -> Vec<String> {
    let mut args: Vec<String> = vec![
        "--dump-json".into(),
        "--no-download".into(),
        "--no-warnings".into(),
        "--no-playlist".into(),
        "--user-agent".into(),
        profile.user_agent.into(),
        "--socket-timeout".into(),
        profile.socket_timeout.as_secs().max(1).to_string(),
        "--retries".into(),
        profile.retries.to_string(),
    ];

    for (name, value) in &profile.headers {
        args.push("--add-header".into());
        args.push(format!("{}:{}", name, value));
    }

    if profile.player_client {
        args.push("--extractor-args".into());
        args.push(format!("youtube:player_client={}", profile.client.as_str()));
    }

    if profile.geo_bypass {
        args.push("--geo-bypass".into());
    }

    if !profile.check_certificate {
        args.push("--no-check-certificates".into());
    }

    match &profile.cookies {
        CookieSource::None => {}
        CookieSource::File(path) => {
            args.push("--cookies".into());
            args.push(path.to_string_lossy().into_owned());
        }
        CookieSource::Browser(browser) => {
            args.push("--cookies-from-browser".into());
            args.push(browser.clone());
        }
    }

    args.push("--".into());
    args.push(url.to_string());
    args
}

/// Parse `--dump-json` output; the first non-empty line is the record
fn parse_dump(stdout: &str) -> Result<RawMetadataRecord, ExtractionFailure> {
    let line = stdout
        .lines()
        .map(str::trim)
        .find(|l| !l.is_empty())
        .ok_or_else(|| ExtractionFailure::malformed("yt-dlp produced no output"))?;

    serde_json::from_str(line)
        .map_err(|e| ExtractionFailure::malformed(format!("invalid yt-dlp JSON: {}", e)))
}

const BINARY: &str = if cfg!(windows) { "yt-dlp.exe" } else { "yt-dlp" };

/// Locate yt-dlp: beside our own executable, on PATH, then well-known
/// install directories.
pub fn find_ytdlp() -> Option<PathBuf> {
    let adjacent = std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join(BINARY)));

    let found = adjacent
        .filter(|p| is_executable(p))
        .or_else(|| which::which(BINARY).ok())
        .or_else(|| install_dirs().map(|d| d.join(BINARY)).find(|p| is_executable(p)));

    match &found {
        Some(path) => debug!("yt-dlp candidate resolved to {}", path.display()),
        None => warn!("yt-dlp is not beside the executable, on PATH or in a known install dir"),
    }
    found
}

fn install_dirs() -> impl Iterator<Item = PathBuf> {
    ["/opt/homebrew/bin", "/usr/local/bin", "/usr/bin"]
        .into_iter()
        .map(PathBuf::from)
        .chain(dirs::home_dir().map(|home| home.join(".local").join("bin")))
}

fn is_executable(path: &Path) -> bool {
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;

        std::fs::metadata(path)
            .map(|m| m.is_file() && m.permissions().mode() & 0o111 != 0)
            .unwrap_or(false)
    }

    #[cfg(not(unix))]
    {
        path.is_file()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extractor::platform::Platform;
    use crate::extractor::strategy::{profiles_for, RuntimeContext};
    use crate::utils::error::FailureKind;

    fn profile(name: &str, platform: Platform, ctx: &RuntimeContext) -> StrategyProfile {
        profiles_for(platform, ctx)
            .into_iter()
            .find(|p| p.name == name)
            .unwrap()
    }

    #[test]
    fn test_android_profile_args() {
        let p = profile("android", Platform::YouTube, &RuntimeContext::default());
        let args = build_args("https://youtu.be/abc", &p);

        assert!(args.windows(2).any(|w| w[0] == "--extractor-args"
            && w[1] == "youtube:player_client=android"));
        assert!(args.contains(&"--geo-bypass".to_string()));
        assert!(!args.contains(&"--no-check-certificates".to_string()));
        assert_eq!(args.last().unwrap(), "https://youtu.be/abc");
    }

    #[test]
    fn test_session_profile_borrows_browser_cookies() {
        let ctx = RuntimeContext {
            trusted_environment: true,
            ..Default::default()
        };
        let p = profile("browser-session", Platform::YouTube, &ctx);
        let args = build_args("https://youtu.be/abc", &p);

        assert!(args
            .windows(2)
            .any(|w| w[0] == "--cookies-from-browser" && w[1] == "chrome"));
        assert!(!args.contains(&"--extractor-args".to_string()));
    }

    #[test]
    fn test_desktop_profile_skips_certificate_check() {
        let p = profile("desktop", Platform::Other, &RuntimeContext::default());
        let args = build_args("https://example.com/v", &p);
        assert!(args.contains(&"--no-check-certificates".to_string()));
        assert!(args
            .windows(2)
            .any(|w| w[0] == "--socket-timeout" && w[1] == "20"));
    }

    #[test]
    fn test_url_after_separator() {
        let p = profile("mobile", Platform::Other, &RuntimeContext::default());
        let args = build_args("-rf", &p);
        let n = args.len();
        assert_eq!(args[n - 2], "--");
        assert_eq!(args[n - 1], "-rf");
    }

    #[test]
    fn test_parse_dump() {
        let record = parse_dump("\n{\"title\": \"x\", \"formats\": []}\n").unwrap();
        assert_eq!(record.title.as_deref(), Some("x"));

        let err = parse_dump("").unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);

        let err = parse_dump("not json").unwrap_err();
        assert_eq!(err.kind, FailureKind::MalformedResponse);
    }

    #[test]
    fn test_parse_dump_tolerates_float_sizes() {
        let stdout = r#"{"title": "x", "formats": [{"filesize_approx": 1048576.5, "height": 720.0, "url": "https://c/b.mp4"}]}"#;
        let record = parse_dump(stdout).unwrap();
        assert_eq!(record.formats[0].filesize_approx, Some(1_048_576));
        assert_eq!(record.formats[0].height, Some(720));
    }

    #[cfg(unix)]
    #[test]
    fn test_is_executable_requires_exec_bit() {
        use std::os::unix::fs::PermissionsExt;

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(BINARY);
        std::fs::write(&path, "#!/bin/sh\n").unwrap();
        assert!(!is_executable(&path));

        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        assert!(is_executable(&path));
        assert!(!is_executable(dir.path()));
    }

    #[test]
    fn test_missing_configured_path_is_error() {
        let result = YtDlpAdapter::new(Some(Path::new("/no/such/yt-dlp")));
        assert!(result.is_err());
    }
}
