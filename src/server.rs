//! HTTP front end
//!
//! Provides three endpoints:
//! - `/` - the bundled index.html, when present
//! - `/health` - liveness probe
//! - `/analyze` - resolve a URL into a stream catalog

use crate::api::{AnalyzeResponse, ErrorBody};
use crate::extractor::orchestrator::Orchestrator;
use crate::utils::config::Settings;
use crate::utils::error::ResolveError;
use anyhow::Context;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Deserialize;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tower_http::cors::CorsLayer;
use tracing::{info, info_span, warn, Instrument};
use uuid::Uuid;

#[derive(Clone)]
pub struct AppState {
    orchestrator: Arc<Orchestrator>,
    settings: Arc<Settings>,
}

impl AppState {
    pub fn new(orchestrator: Orchestrator, settings: Settings) -> Self {
        Self {
            orchestrator: Arc::new(orchestrator),
            settings: Arc::new(settings),
        }
    }
}

#[derive(Debug, Deserialize)]
struct AnalyzeRequest {
    #[serde(default)]
    url: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/analyze", post(analyze))
        .with_state(state)
        .layer(CorsLayer::permissive())
}

/// Bind and serve until Ctrl-C
pub async fn serve(state: AppState) -> anyhow::Result<()> {
    let addr = format!("{}:{}", state.settings.host, state.settings.port);
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind server to {}", addr))?;

    info!("Listening on http://{}/", addr);

    axum::serve(listener, router(state))
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("Shutting down");
        })
        .await
        .context("Server error")
}

async fn index(State(state): State<AppState>) -> Response {
    let path = state.settings.static_dir.join("index.html");
    match tokio::fs::read_to_string(&path).await {
        Ok(html) => Html(html).into_response(),
        Err(_) => (
            StatusCode::NOT_FOUND,
            Html("<h1>index.html not found!</h1>"),
        )
            .into_response(),
    }
}

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "healthy" }))
}

async fn analyze(State(state): State<AppState>, body: Bytes) -> Response {
    let url = serde_json::from_slice::<AnalyzeRequest>(&body)
        .ok()
        .and_then(|req| req.url)
        .filter(|u| !u.trim().is_empty());

    let Some(url) = url else {
        return (StatusCode::BAD_REQUEST, Json(ErrorBody::new("No URL provided"))).into_response();
    };

    let span = info_span!("analyze", request_id = %Uuid::new_v4());
    async move {
        // Cancels any in-flight attempt if the client goes away first
        let cancel = CancellationToken::new();
        let _guard = cancel.clone().drop_guard();

        let ctx = state.settings.runtime_context();
        let result = match tokio::time::timeout(
            state.settings.request_timeout(),
            state.orchestrator.resolve(&url, &ctx, &cancel),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => {
                cancel.cancel();
                Err(ResolveError::Cancelled)
            }
        };

        let status = match &result {
            Ok(_) | Err(ResolveError::Exhausted { .. }) => StatusCode::OK,
            Err(ResolveError::MalformedInput(_)) => StatusCode::BAD_REQUEST,
            Err(ResolveError::Cancelled) => StatusCode::GATEWAY_TIMEOUT,
        };
        if let Err(e) = &result {
            warn!("Analyze failed: {}", e);
        }

        (status, Json(AnalyzeResponse::from(result))).into_response()
    }
    .instrument(span)
    .await
}
