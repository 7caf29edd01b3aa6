//! Shared test doubles for backend adapters
#![allow(dead_code)]

use async_trait::async_trait;
use rustgrab::extractor::{BackendAdapter, BackendKind, RawMetadataRecord, StrategyProfile};
use rustgrab::utils::{ExtractionFailure, FailureKind};
use std::sync::{Arc, Mutex};
use std::time::Duration;

/// How a scripted adapter answers one profile
#[derive(Clone)]
pub enum Reply {
    Succeed(RawMetadataRecord),
    Fail(FailureKind),
    Hang,
}

/// Adapter that answers from a script and records every call
pub struct ScriptedAdapter {
    kind: BackendKind,
    script: Box<dyn Fn(&str) -> Reply + Send + Sync>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedAdapter {
    pub fn new(
        kind: BackendKind,
        script: impl Fn(&str) -> Reply + Send + Sync + 'static,
    ) -> Arc<Self> {
        Arc::new(Self {
            kind,
            script: Box::new(script),
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing(kind: BackendKind) -> Arc<Self> {
        Self::new(kind, |_| Reply::Fail(FailureKind::Blocked))
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl BackendAdapter for ScriptedAdapter {
    fn id(&self) -> &'static str {
        "scripted"
    }

    fn kind(&self) -> BackendKind {
        self.kind
    }

    async fn extract(
        &self,
        _url: &str,
        profile: &StrategyProfile,
    ) -> Result<RawMetadataRecord, ExtractionFailure> {
        self.calls.lock().unwrap().push(profile.name.to_string());
        let reply = (self.script)(profile.name);
        match reply {
            Reply::Succeed(record) => Ok(record),
            Reply::Fail(kind) => Err(ExtractionFailure::new(kind, format!("{} failed", profile.name))),
            Reply::Hang => {
                tokio::time::sleep(Duration::from_secs(24 * 60 * 60)).await;
                Err(ExtractionFailure::timeout("hung"))
            }
        }
    }
}

/// A record with one combined 720p stream
pub fn sample_record() -> RawMetadataRecord {
    serde_json::from_value(serde_json::json!({
        "title": "Sample",
        "uploader": "Uploader",
        "view_count": 1500,
        "duration": 61.2,
        "formats": [
            {"ext": "mp4", "height": 720, "vcodec": "avc1", "acodec": "mp4a",
             "filesize": 10485760, "url": "https://cdn.example/720.mp4"}
        ]
    }))
    .unwrap()
}
