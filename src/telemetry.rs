//! Revive attempt reporting
//!
//! Fire-and-forget: each attempt becomes one POST that is never awaited by
//! the game loop and never retried.

use serde::Serialize;
use serde_json::Value;

use crate::settings::Settings;

/// Body sent for each revive attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReviveAttemptReport<'a> {
    /// Sent exactly as the question file wrote it (string or number)
    pub question_id: &'a Value,
    pub correct: bool,
}

/// A report ready to send
#[derive(Debug, Clone, PartialEq)]
pub struct PendingReport {
    pub url: String,
    pub body: String,
}

/// Build the request, or `None` when telemetry is off or the question has
/// no id (the built-in fallback)
pub fn prepare(
    settings: &Settings,
    question_id: Option<&Value>,
    correct: bool,
) -> Option<PendingReport> {
    let url = settings.telemetry_endpoint()?;
    let question_id = question_id.filter(|id| match id {
        Value::Null => false,
        Value::String(s) => !s.is_empty(),
        _ => true,
    })?;
    let body = serde_json::to_string(&ReviveAttemptReport {
        question_id,
        correct,
    })
    .ok()?;
    Some(PendingReport {
        url: url.to_string(),
        body,
    })
}

/// Report a revive attempt in the background
pub fn report_revive_attempt(settings: &Settings, question_id: Option<&Value>, correct: bool) {
    let Some(report) = prepare(settings, question_id, correct) else {
        return;
    };
    send(report);
}

#[cfg(target_arch = "wasm32")]
fn send(report: PendingReport) {
    wasm_bindgen_futures::spawn_local(async move {
        if let Err(e) = crate::platform::net::post_plain(&report.url, &report.body).await {
            log::debug!("Telemetry failed: {:?}", e);
        }
    });
}

#[cfg(not(target_arch = "wasm32"))]
fn send(report: PendingReport) {
    log::debug!("Telemetry (not sent natively): {} {}", report.url, report.body);
}
