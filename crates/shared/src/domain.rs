use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Verdict {
    Real,
    Fake,
    Unclear,
}

impl Verdict {
    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::Real => "real",
            Verdict::Fake => "fake",
            Verdict::Unclear => "unclear",
        }
    }
}

/// Verdict exactly as the analysis service reported it.
///
/// Values outside the known set, including non-string JSON, are kept verbatim
/// instead of failing the whole response, so the presentation layer can
/// degrade to a neutral rendering.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ReportedVerdict {
    Known(Verdict),
    Unrecognized(Value),
}

impl ReportedVerdict {
    /// Stand-in for a response that carries no `verdict` field at all.
    pub fn missing() -> Self {
        ReportedVerdict::Unrecognized(Value::Null)
    }

    pub fn unrecognized(raw: impl Into<String>) -> Self {
        ReportedVerdict::Unrecognized(Value::String(raw.into()))
    }

    pub fn known(&self) -> Option<Verdict> {
        match self {
            ReportedVerdict::Known(verdict) => Some(*verdict),
            ReportedVerdict::Unrecognized(_) => None,
        }
    }
}

impl From<Verdict> for ReportedVerdict {
    fn from(value: Verdict) -> Self {
        ReportedVerdict::Known(value)
    }
}

impl fmt::Display for ReportedVerdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReportedVerdict::Known(verdict) => f.write_str(verdict.as_str()),
            ReportedVerdict::Unrecognized(Value::String(raw)) => f.write_str(raw),
            ReportedVerdict::Unrecognized(other) => write!(f, "{other}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Severity {
    Success,
    Destructive,
    Warning,
    Secondary,
}

impl Severity {
    pub fn as_str(self) -> &'static str {
        match self {
            Severity::Success => "success",
            Severity::Destructive => "destructive",
            Severity::Warning => "warning",
            Severity::Secondary => "secondary",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerdictPresentation {
    pub label: &'static str,
    pub severity: Severity,
}

/// Maps a reported verdict to the label and severity shown to the user.
///
/// Total over every input: unrecognized verdicts get an empty label and the
/// neutral `Secondary` severity.
pub fn verdict_label(verdict: &ReportedVerdict) -> VerdictPresentation {
    match verdict.known() {
        Some(Verdict::Real) => VerdictPresentation {
            label: "Likely Real News",
            severity: Severity::Success,
        },
        Some(Verdict::Fake) => VerdictPresentation {
            label: "Likely Fake News",
            severity: Severity::Destructive,
        },
        Some(Verdict::Unclear) => VerdictPresentation {
            label: "Unclear / Needs Verification",
            severity: Severity::Warning,
        },
        None => VerdictPresentation {
            label: "",
            severity: Severity::Secondary,
        },
    }
}
