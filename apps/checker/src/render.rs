//! Plain-text rendering of controller state.

use std::fmt::Write as _;

use client_core::LifecycleState;
use shared::{domain::verdict_label, protocol::AnalysisResult};

pub fn render_state(state: &LifecycleState) -> String {
    match state {
        LifecycleState::Idle => String::new(),
        LifecycleState::Analyzing => "Analyzing...\n".to_string(),
        LifecycleState::Succeeded(result) => render_result(result),
        LifecycleState::Failed { reason } => format!("Analysis failed: {reason}\n"),
    }
}

pub fn render_result(result: &AnalysisResult) -> String {
    let presentation = verdict_label(&result.verdict);
    let mut out = String::new();

    let _ = writeln!(
        out,
        "[{}] {}",
        presentation.severity.as_str(),
        presentation.label
    );
    if result.verdict.known().is_none() {
        let _ = writeln!(out, "Reported verdict: {}", result.verdict);
    }
    // Confidence is shown exactly as received, even outside 0-100.
    let _ = writeln!(out, "Confidence: {}%", result.confidence);

    if !result.explanation.trim().is_empty() {
        let _ = writeln!(out, "\n{}", result.explanation.trim_end());
    }

    if !result.key_indicators.is_empty() {
        let _ = writeln!(out, "\nKey indicators:");
        for (index, indicator) in result.key_indicators.iter().enumerate() {
            let _ = writeln!(out, "  {}. {indicator}", index + 1);
        }
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::{ReportedVerdict, Verdict};

    #[test]
    fn renders_real_result_with_ranked_indicators() {
        let result = AnalysisResult {
            verdict: Verdict::Real.into(),
            confidence: 92.0,
            explanation: "Consistent with independent reporting.".to_string(),
            key_indicators: vec![
                "Cites peer-reviewed study".to_string(),
                "Matches wire reports".to_string(),
            ],
        };

        assert_eq!(
            render_result(&result),
            "[success] Likely Real News\n\
             Confidence: 92%\n\
             \n\
             Consistent with independent reporting.\n\
             \n\
             Key indicators:\n  \
             1. Cites peer-reviewed study\n  \
             2. Matches wire reports\n"
        );
    }

    #[test]
    fn unclear_result_without_extras_is_compact() {
        let result = AnalysisResult {
            verdict: Verdict::Unclear.into(),
            confidence: 50.0,
            explanation: String::new(),
            key_indicators: Vec::new(),
        };

        assert_eq!(
            render_result(&result),
            "[warning] Unclear / Needs Verification\nConfidence: 50%\n"
        );
    }

    #[test]
    fn unknown_verdict_and_out_of_range_confidence_render_as_received() {
        let result = AnalysisResult {
            verdict: ReportedVerdict::unrecognized("satire"),
            confidence: 120.5,
            explanation: String::new(),
            key_indicators: Vec::new(),
        };

        let rendered = render_result(&result);
        assert!(rendered.starts_with("[secondary] \n"));
        assert!(rendered.contains("Reported verdict: satire"));
        assert!(rendered.contains("Confidence: 120.5%"));
    }

    #[test]
    fn failed_state_shows_reason() {
        let state = LifecycleState::Failed {
            reason: "rate limited".to_string(),
        };
        assert_eq!(render_state(&state), "Analysis failed: rate limited\n");
    }
}
