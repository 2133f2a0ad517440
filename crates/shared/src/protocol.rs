use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{domain::ReportedVerdict, error::AnalysisError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub text: String,
}

impl AnalysisRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisResult {
    #[serde(default = "ReportedVerdict::missing")]
    pub verdict: ReportedVerdict,
    pub confidence: f64,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub key_indicators: Vec<String>,
}

impl AnalysisResult {
    pub fn confidence_in_range(&self) -> bool {
        (0.0..=100.0).contains(&self.confidence)
    }
}

/// Normalizes a response body from the analysis service.
///
/// An `error` field that is a non-empty string, or any other truthy value, turns
/// the response into a service failure regardless of the HTTP status. A non-2xx
/// status without such a field, or a body that is not a valid result, is a
/// transport failure.
pub fn decode_analysis_response(
    status_ok: bool,
    status_label: &str,
    body: &str,
) -> Result<AnalysisResult, AnalysisError> {
    let value: Option<Value> = serde_json::from_str(body).ok();

    if let Some(reason) = value.as_ref().and_then(service_error) {
        return Err(AnalysisError::Service { reason });
    }

    if !status_ok {
        return Err(AnalysisError::transport(format!(
            "analysis service responded with {status_label}"
        )));
    }

    let Some(value) = value else {
        return Err(AnalysisError::transport(
            "analysis service returned a body that is not JSON",
        ));
    };

    serde_json::from_value(value).map_err(|err| {
        AnalysisError::transport(format!("malformed analysis response: {err}"))
    })
}

/// `Some(reason)` when the body flags a service-level failure.
fn service_error(value: &Value) -> Option<Option<String>> {
    match value.get("error")? {
        Value::Null | Value::Bool(false) => None,
        Value::String(reason) if reason.trim().is_empty() => None,
        Value::String(reason) => Some(Some(reason.clone())),
        Value::Object(inner) => Some(
            inner
                .get("message")
                .and_then(Value::as_str)
                .map(str::to_string),
        ),
        _ => Some(None),
    }
}
