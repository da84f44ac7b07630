//! Terminal panels for a submission: the payload preview and the send result.

use std::fmt::Write;

use feedback_core::BatchEnvelope;
use feedback_sync::{ResponseBody, SendOutcome};

/// Render the technical preview of the built payload.
pub fn render_preview(envelope: &BatchEnvelope) -> anyhow::Result<String> {
    let mut out = String::new();
    writeln!(out, "Submission created.")?;
    writeln!(out)?;
    writeln!(out, "── Technical preview ──")?;
    writeln!(out, "{}", serde_json::to_string_pretty(envelope)?)?;
    Ok(out)
}

/// Render the send result.
///
/// Outcomes without a status (disabled, transport failure) become a single
/// informational line; server responses get a result banner and the body.
pub fn render_outcome(outcome: &SendOutcome) -> anyhow::Result<String> {
    let mut out = String::new();
    match outcome {
        SendOutcome::Disabled { message } | SendOutcome::Transport { message } => {
            writeln!(out, "ℹ {message}")?;
        }
        SendOutcome::Response { ok, status, body } => {
            writeln!(out, "Result: {status}")?;
            if *ok {
                writeln!(out, "✔ Sent successfully.")?;
            } else {
                writeln!(out, "✘ Sending failed.")?;
            }
            writeln!(out)?;
            writeln!(out, "── Response details ──")?;
            match body {
                ResponseBody::Json(value) => {
                    writeln!(out, "{}", serde_json::to_string_pretty(value)?)?
                }
                ResponseBody::Text(text) => writeln!(out, "{text}")?,
            }
        }
    }
    Ok(out)
}
