//! Application initialization

use crate::api::AnalyzeResponse;
use crate::extractor::{BackendAdapter, BrowserAdapter, Orchestrator, YtDlpAdapter};
use crate::server::{self, AppState};
use crate::utils::config::Settings;
use crate::utils::error::ResolveError;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::Level;

/// Initialize logging at the configured level
pub fn init_logging(level: &str) {
    let level = level.parse::<Level>().unwrap_or(Level::INFO);
    // Logs go to stderr so `analyze` output stays clean JSON.
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .try_init();
}

/// Wire the direct and browser-automation adapters into an orchestrator
pub fn build_orchestrator(settings: &Settings) -> Result<Orchestrator> {
    let direct = YtDlpAdapter::new(settings.ytdlp_path.as_deref())?;

    let client = reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .context("Failed to build HTTP client")?;
    let browser = BrowserAdapter::new(client, settings.browser_timing());

    Ok(Orchestrator::new(
        Arc::new(direct),
        Some(Arc::new(browser) as Arc<dyn BackendAdapter>),
        settings.orchestrator_config(),
    ))
}

/// Run the HTTP server
pub async fn run_server(settings: Settings) -> Result<()> {
    let orchestrator = build_orchestrator(&settings)?;
    server::serve(AppState::new(orchestrator, settings)).await
}

/// Resolve one URL and return the response record
pub async fn analyze_once(settings: &Settings, url: &str) -> Result<AnalyzeResponse> {
    if url.trim().is_empty() {
        let blank = ResolveError::MalformedInput("No URL provided".to_string());
        return Ok(AnalyzeResponse::from(Err(blank)));
    }

    let orchestrator = build_orchestrator(settings)?;
    let cancel = CancellationToken::new();
    let ctx = settings.runtime_context();

    let result = tokio::select! {
        r = orchestrator.resolve(url, &ctx, &cancel) => r,
        _ = tokio::signal::ctrl_c() => {
            cancel.cancel();
            Err(ResolveError::Cancelled)
        }
        _ = tokio::time::sleep(settings.request_timeout()) => {
            cancel.cancel();
            Err(ResolveError::Cancelled)
        }
    };

    Ok(AnalyzeResponse::from(result))
}
