//! Per-event steps of the interactive loop, kept free of stdin/stdout so they can be driven directly.

use std::io::Write;

use anyhow::Result;
use client_core::{AnalysisController, LifecycleState, PendingAnalysis};
use shared::{
    error::{AnalysisError, ErrorKind},
    protocol::AnalysisResult,
};
use tracing::{debug, warn};

use crate::render::{render_result, render_state};

pub const HOLD_HINT: &str = "Analysis in progress; submit again once it finishes.";

#[derive(Debug)]
pub enum LineAction {
    Submitted(PendingAnalysis),
    /// Kept as the current input; nothing was sent.
    Held,
    Rejected,
}

/// Handles one input line. While a request is in flight the line only replaces
/// the current input and a hint goes to `hints`.
pub fn handle_line(
    controller: &mut AnalysisController,
    line: String,
    out: &mut impl Write,
    hints: &mut impl Write,
) -> Result<LineAction> {
    if controller.is_analyzing() {
        controller.set_text(line);
        writeln!(hints, "{HOLD_HINT}")?;
        return Ok(LineAction::Held);
    }

    match controller.begin_submission(line) {
        Ok(pending) => {
            writeln!(out, "{}", render_state(controller.state()).trim_end())?;
            Ok(LineAction::Submitted(pending))
        }
        Err(_) => Ok(LineAction::Rejected),
    }
}

/// Applies an outcome delivered by a background task. Returns `false` and writes
/// nothing when the outcome was superseded.
pub fn handle_outcome(
    controller: &mut AnalysisController,
    generation: u64,
    outcome: Result<AnalysisResult, AnalysisError>,
    json: bool,
    out: &mut impl Write,
) -> Result<bool> {
    if !controller.settle(generation, outcome) {
        return Ok(false);
    }
    match controller.state() {
        LifecycleState::Succeeded(result) => write_result(out, result, json)?,
        // Failures were already reported through the notifier.
        LifecycleState::Failed { .. } => {}
        other => debug!(state = ?other, "unexpected state after settle"),
    }
    Ok(true)
}

pub fn write_result(out: &mut impl Write, result: &AnalysisResult, json: bool) -> Result<()> {
    if !result.confidence_in_range() {
        warn!(
            confidence = result.confidence,
            "analysis service returned confidence outside 0-100"
        );
    }
    if json {
        writeln!(out, "{}", serde_json::to_string_pretty(result)?)?;
    } else {
        write!(out, "{}", render_result(result))?;
    }
    Ok(())
}

pub fn exit_status(err: &AnalysisError) -> u8 {
    match err.kind() {
        ErrorKind::Validation => 2,
        ErrorKind::Service | ErrorKind::Transport => 1,
    }
}
