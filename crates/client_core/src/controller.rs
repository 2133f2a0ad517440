//! Analysis request lifecycle: input validation, in-flight tracking and settlement.

use std::{panic::AssertUnwindSafe, sync::Arc};

use futures::FutureExt;
use shared::{
    error::AnalysisError,
    protocol::{AnalysisRequest, AnalysisResult},
};
use tracing::{debug, error, info, info_span, warn, Instrument};
use uuid::Uuid;

use crate::{AnalysisService, Notice, Notifier};

#[derive(Debug, Clone, PartialEq, Default)]
pub enum LifecycleState {
    #[default]
    Idle,
    Analyzing,
    Succeeded(AnalysisResult),
    Failed {
        reason: String,
    },
}

/// Ticket for a submission that passed validation and is now in flight.
#[derive(Debug, Clone)]
pub struct PendingAnalysis {
    pub generation: u64,
    pub request_id: Uuid,
    pub request: AnalysisRequest,
}

pub struct AnalysisController {
    text: String,
    state: LifecycleState,
    generation: u64,
    service: Arc<dyn AnalysisService>,
    notifier: Arc<dyn Notifier>,
}

impl AnalysisController {
    pub fn new(service: Arc<dyn AnalysisService>, notifier: Arc<dyn Notifier>) -> Self {
        Self {
            text: String::new(),
            state: LifecycleState::Idle,
            generation: 0,
            service,
            notifier,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Replaces the current input. Allowed at any time, including while a request is in flight.
    pub fn set_text(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    pub fn state(&self) -> &LifecycleState {
        &self.state
    }

    pub fn is_analyzing(&self) -> bool {
        matches!(self.state, LifecycleState::Analyzing)
    }

    pub fn result(&self) -> Option<&AnalysisResult> {
        match &self.state {
            LifecycleState::Succeeded(result) => Some(result),
            _ => None,
        }
    }

    pub fn error_reason(&self) -> Option<&str> {
        match &self.state {
            LifecycleState::Failed { reason } => Some(reason),
            _ => None,
        }
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn service(&self) -> Arc<dyn AnalysisService> {
        Arc::clone(&self.service)
    }

    /// Validates `text` and moves into `Analyzing`.
    ///
    /// Whitespace-only input leaves the lifecycle state untouched and raises an
    /// "Input Required" notice. A call while already analyzing supersedes the
    /// in-flight request: its outcome will be discarded by [`Self::settle`].
    pub fn begin_submission(
        &mut self,
        text: impl Into<String>,
    ) -> Result<PendingAnalysis, AnalysisError> {
        self.text = text.into();
        if self.text.trim().is_empty() {
            debug!("rejected empty analysis input");
            self.notifier.notify(Notice::input_required());
            return Err(AnalysisError::Validation);
        }

        if self.is_analyzing() {
            warn!(
                superseded_generation = self.generation,
                "new analysis started while previous request is in flight"
            );
        }

        self.generation += 1;
        self.state = LifecycleState::Analyzing;

        let pending = PendingAnalysis {
            generation: self.generation,
            request_id: Uuid::new_v4(),
            request: AnalysisRequest::new(self.text.clone()),
        };
        info!(
            request_id = %pending.request_id,
            generation = pending.generation,
            chars = pending.request.text.chars().count(),
            "submitting content for analysis"
        );
        Ok(pending)
    }

    /// Applies the outcome of the request issued as `generation`.
    ///
    /// Returns `false` when the outcome belongs to a superseded or already
    /// settled request; such outcomes do not touch state and raise no notice.
    pub fn settle(
        &mut self,
        generation: u64,
        outcome: Result<AnalysisResult, AnalysisError>,
    ) -> bool {
        if generation != self.generation || !self.is_analyzing() {
            debug!(
                generation,
                current_generation = self.generation,
                "discarding outcome of superseded analysis"
            );
            return false;
        }

        match outcome {
            Ok(result) => {
                info!(
                    generation,
                    verdict = %result.verdict,
                    confidence = result.confidence,
                    indicators = result.key_indicators.len(),
                    "analysis succeeded"
                );
                self.state = LifecycleState::Succeeded(result);
            }
            Err(err) => {
                let reason = err.reason();
                warn!(generation, error = %err, "analysis failed");
                self.state = LifecycleState::Failed {
                    reason: reason.clone(),
                };
                self.notifier.notify(Notice::analysis_failed(reason));
            }
        }
        true
    }

    /// Runs one full submission against the injected service.
    pub async fn submit(
        &mut self,
        text: impl Into<String>,
    ) -> Result<AnalysisResult, AnalysisError> {
        let pending = self.begin_submission(text)?;
        let outcome = run_analysis(self.service(), &pending).await;
        self.settle(pending.generation, outcome.clone());
        outcome
    }
}

/// Calls the service for `pending`, converting a panic inside the call into a
/// transport failure so the caller can always settle.
pub async fn run_analysis(
    service: Arc<dyn AnalysisService>,
    pending: &PendingAnalysis,
) -> Result<AnalysisResult, AnalysisError> {
    let span = info_span!(
        "analysis",
        request_id = %pending.request_id,
        generation = pending.generation
    );
    // Build the service future inside the guarded block so panics raised before
    // the first poll are caught as well.
    let call = AssertUnwindSafe(async {
        service
            .analyze(pending.request_id, &pending.request)
            .await
    });
    match call.catch_unwind().instrument(span).await {
        Ok(outcome) => outcome,
        Err(_) => {
            error!(
                request_id = %pending.request_id,
                "analysis service panicked during request"
            );
            Err(AnalysisError::Transport { reason: None })
        }
    }
}
