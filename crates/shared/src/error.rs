use thiserror::Error;

pub const GENERIC_FAILURE_REASON: &str = "Unable to analyze the content. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Service,
    Transport,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AnalysisError {
    #[error("input must contain non-whitespace text")]
    Validation,
    #[error("analysis service reported a failure: {}", display_reason(.reason))]
    Service { reason: Option<String> },
    #[error("analysis request could not complete: {}", display_reason(.reason))]
    Transport { reason: Option<String> },
}

impl AnalysisError {
    pub fn service(reason: impl Into<String>) -> Self {
        Self::Service {
            reason: Some(reason.into()),
        }
    }

    pub fn transport(reason: impl Into<String>) -> Self {
        Self::Transport {
            reason: Some(reason.into()),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AnalysisError::Validation => ErrorKind::Validation,
            AnalysisError::Service { .. } => ErrorKind::Service,
            AnalysisError::Transport { .. } => ErrorKind::Transport,
        }
    }

    /// Human-readable reason to surface to the user.
    ///
    /// Blank reasons count as missing and yield [`GENERIC_FAILURE_REASON`].
    pub fn reason(&self) -> String {
        match self {
            AnalysisError::Validation => "Please enter some text to analyze.".to_string(),
            AnalysisError::Service { reason } | AnalysisError::Transport { reason } => {
                display_reason(reason).to_string()
            }
        }
    }
}

fn display_reason(reason: &Option<String>) -> &str {
    reason
        .as_deref()
        .map(str::trim)
        .filter(|reason| !reason.is_empty())
        .unwrap_or(GENERIC_FAILURE_REASON)
}
