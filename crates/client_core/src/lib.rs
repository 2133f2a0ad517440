use async_trait::async_trait;
use shared::{
    domain::Severity,
    error::AnalysisError,
    protocol::{AnalysisRequest, AnalysisResult},
};
use uuid::Uuid;

pub mod controller;
pub mod transport;

pub use controller::{run_analysis, AnalysisController, LifecycleState, PendingAnalysis};
pub use transport::{HttpAnalysisService, HttpServiceConfig, TransportSetupError};

pub const INPUT_REQUIRED_TITLE: &str = "Input Required";
pub const ANALYSIS_FAILED_TITLE: &str = "Analysis Failed";

#[async_trait]
pub trait AnalysisService: Send + Sync {
    async fn analyze(
        &self,
        request_id: Uuid,
        request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError>;
}

pub struct MissingAnalysisService;

#[async_trait]
impl AnalysisService for MissingAnalysisService {
    async fn analyze(
        &self,
        _request_id: Uuid,
        _request: &AnalysisRequest,
    ) -> Result<AnalysisResult, AnalysisError> {
        Err(AnalysisError::transport(
            "analysis service is not configured",
        ))
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub title: String,
    pub description: String,
    pub severity: Severity,
}

impl Notice {
    pub fn input_required() -> Self {
        Self {
            title: INPUT_REQUIRED_TITLE.to_string(),
            description: AnalysisError::Validation.reason(),
            severity: Severity::Destructive,
        }
    }

    pub fn analysis_failed(reason: impl Into<String>) -> Self {
        Self {
            title: ANALYSIS_FAILED_TITLE.to_string(),
            description: reason.into(),
            severity: Severity::Destructive,
        }
    }
}

/// Transient user-facing notices. Successful analyses are never reported here.
pub trait Notifier: Send + Sync {
    fn notify(&self, notice: Notice);
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
