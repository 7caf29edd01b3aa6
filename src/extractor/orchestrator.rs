use crate::catalog::{canonicalize, MediaCatalog};
use crate::extractor::models::RawMetadataRecord;
use crate::extractor::platform::{ClassifiedUrl, Platform};
use crate::extractor::strategy::{automation_profile, profiles_for, RuntimeContext, StrategyProfile};
use crate::extractor::traits::{BackendAdapter, BackendKind};
use crate::utils::error::{ExtractionFailure, FailureKind, ResolveError};
use chrono::{DateTime, Utc};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

/// Timing policy for the fallback sequence
#[derive(Debug, Clone, Copy)]
pub struct OrchestratorConfig {
    /// Slack added on top of each attempt's own budget
    pub attempt_grace: Duration,
    /// Pause between consecutive direct attempts
    pub attempt_backoff: Duration,
    /// Budget of the browser-automation attempt (page load + settle)
    pub automation_budget: Duration,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            attempt_grace: Duration::from_secs(5),
            attempt_backoff: Duration::ZERO,
            automation_budget: Duration::from_millis(31_500),
        }
    }
}

/// Fallback state machine position
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Idle,
    TryingProfile(usize),
    TryingAutomation,
    Succeeded,
    Exhausted,
}

/// Outcome of a single adapter call
#[derive(Debug)]
pub enum AttemptResult {
    Success(RawMetadataRecord),
    Failure(ExtractionFailure),
}

#[derive(Debug, Clone, PartialEq)]
pub enum AttemptOutcome {
    Success,
    Failure(ExtractionFailure),
    Timeout,
}

/// Diagnostic record of one orchestrator step
#[derive(Debug, Clone)]
pub struct ExtractionAttempt {
    pub profile: &'static str,
    pub adapter: &'static str,
    pub backend: BackendKind,
    pub outcome: AttemptOutcome,
    pub started_at: DateTime<Utc>,
    pub elapsed: Duration,
}

/// A successful extraction and the attempts it took
#[derive(Debug)]
pub struct Extraction {
    pub platform: Platform,
    pub record: RawMetadataRecord,
    pub attempts: Vec<ExtractionAttempt>,
}

/// Drives profiles through the direct adapter, with a browser-automation
/// last resort for YouTube.
pub struct Orchestrator {
    direct: Arc<dyn BackendAdapter>,
    automation: Option<Arc<dyn BackendAdapter>>,
    config: OrchestratorConfig,
}

impl Orchestrator {
    pub fn new(
        direct: Arc<dyn BackendAdapter>,
        automation: Option<Arc<dyn BackendAdapter>>,
        config: OrchestratorConfig,
    ) -> Self {
        Self {
            direct,
            automation,
            config,
        }
    }

    /// Resolve a URL all the way to a canonical catalog
    pub async fn resolve(
        &self,
        url: &str,
        ctx: &RuntimeContext,
        cancel: &CancellationToken,
    ) -> Result<MediaCatalog, ResolveError> {
        let extraction = self.extract(url, ctx, cancel).await?;
        Ok(canonicalize(&extraction.record))
    }

    /// Run the fallback sequence until one attempt yields a record
    pub async fn extract(
        &self,
        url: &str,
        ctx: &RuntimeContext,
        cancel: &CancellationToken,
    ) -> Result<Extraction, ResolveError> {
        let url = url.trim();
        if url.is_empty() {
            return Err(ResolveError::MalformedInput("No URL provided".to_string()));
        }

        let target = ClassifiedUrl::new(url);
        let profiles = profiles_for(target.platform, ctx);
        let mut attempts = Vec::with_capacity(profiles.len() + 1);
        let mut tried = HashSet::new();
        let mut last_failure = None;
        let mut state = State::Idle;

        info!(
            "Extracting {} ({}, {} profiles)",
            target.raw,
            target.platform,
            profiles.len()
        );

        for (i, profile) in profiles.iter().enumerate() {
            if !tried.insert(profile.name) {
                continue;
            }
            if state != State::Idle {
                self.backoff(cancel).await?;
            }

            state = State::TryingProfile(i);
            debug!("State: {:?} ({})", state, profile.name);

            let budget = profile.attempt_budget() + self.config.attempt_grace;
            match self
                .attempt(self.direct.as_ref(), &target.raw, profile, budget, cancel, &mut attempts)
                .await?
            {
                AttemptResult::Success(record) => {
                    return Ok(self.succeed(target.platform, record, attempts));
                }
                AttemptResult::Failure(failure) => last_failure = Some(failure),
            }
        }

        if target.platform == Platform::YouTube {
            match &self.automation {
                Some(automation) => {
                    state = State::TryingAutomation;
                    debug!("State: {:?}", state);

                    let profile = automation_profile();
                    let budget = self.config.automation_budget + self.config.attempt_grace;
                    match self
                        .attempt(automation.as_ref(), &target.raw, &profile, budget, cancel, &mut attempts)
                        .await?
                    {
                        AttemptResult::Success(record) => {
                            return Ok(self.succeed(target.platform, record, attempts));
                        }
                        AttemptResult::Failure(failure) => last_failure = Some(failure),
                    }
                }
                None => warn!("No browser-automation backend configured, skipping last resort"),
            }
        }

        state = State::Exhausted;
        let reason = last_failure.unwrap_or_else(|| {
            ExtractionFailure::new(FailureKind::Blocked, "no extraction strategy available")
        });
        warn!(
            "State: {:?} for {} after {} attempts: {}",
            state,
            target.platform,
            attempts.len(),
            reason
        );

        Err(ResolveError::Exhausted {
            platform: target.platform,
            reason,
        })
    }

    fn succeed(
        &self,
        platform: Platform,
        record: RawMetadataRecord,
        attempts: Vec<ExtractionAttempt>,
    ) -> Extraction {
        debug!("State: {:?} after {} attempts", State::Succeeded, attempts.len());
        Extraction {
            platform,
            record,
            attempts,
        }
    }

    async fn backoff(&self, cancel: &CancellationToken) -> Result<(), ResolveError> {
        if self.config.attempt_backoff.is_zero() {
            return Ok(());
        }
        tokio::select! {
            _ = cancel.cancelled() => Err(ResolveError::Cancelled),
            _ = tokio::time::sleep(self.config.attempt_backoff) => Ok(()),
        }
    }

    /// One bounded adapter call. Cancellation drops the in-flight future.
    async fn attempt(
        &self,
        adapter: &dyn BackendAdapter,
        url: &str,
        profile: &StrategyProfile,
        budget: Duration,
        cancel: &CancellationToken,
        attempts: &mut Vec<ExtractionAttempt>,
    ) -> Result<AttemptResult, ResolveError> {
        if cancel.is_cancelled() {
            return Err(ResolveError::Cancelled);
        }

        let started_at = Utc::now();
        let start = Instant::now();

        let bounded = tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                warn!("Cancelled during {} attempt [{}]", adapter.id(), profile.name);
                return Err(ResolveError::Cancelled);
            }
            res = tokio::time::timeout(budget, adapter.extract(url, profile)) => res,
        };

        let elapsed = start.elapsed();
        let (result, outcome) = match bounded {
            Ok(Ok(record)) => {
                info!(
                    "{} [{}] succeeded in {:.1}s",
                    adapter.id(),
                    profile.name,
                    elapsed.as_secs_f64()
                );
                (AttemptResult::Success(record), AttemptOutcome::Success)
            }
            Ok(Err(failure)) => {
                warn!("{} [{}] failed: {}", adapter.id(), profile.name, failure);
                let outcome = if failure.kind == FailureKind::Timeout {
                    AttemptOutcome::Timeout
                } else {
                    AttemptOutcome::Failure(failure.clone())
                };
                (AttemptResult::Failure(failure), outcome)
            }
            Err(_) => {
                warn!(
                    "{} [{}] gave no answer within {}s",
                    adapter.id(),
                    profile.name,
                    budget.as_secs()
                );
                let failure = ExtractionFailure::timeout(format!(
                    "{} gave no answer within {}s",
                    adapter.id(),
                    budget.as_secs()
                ));
                (AttemptResult::Failure(failure), AttemptOutcome::Timeout)
            }
        };

        attempts.push(ExtractionAttempt {
            profile: profile.name,
            adapter: adapter.id(),
            backend: adapter.kind(),
            outcome,
            started_at,
            elapsed,
        });

        Ok(result)
    }
}
