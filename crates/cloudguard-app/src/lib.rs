#![warn(missing_docs)]
//! # cloudguard-app
//!
//! ## Purpose
//! Orchestrates auth, upload staging, analysis, alert recording, and UI
//! state for the `cloudguard` dashboard.
//!
//! ## Responsibilities
//! - Enforce sign-in and kill-switch gates before analysis.
//! - Assemble the request value from a staged upload.
//! - Record one alert per successful assessment.
//! - Provide the blocking HTTP model transport and run logging.
//!
//! ## Data flow
//! Auth/session + staged upload -> request assembly -> analysis invocation
//! -> alert recording -> UI projection.
//!
//! ## Ownership and lifetimes
//! This crate passes owned payloads/state snapshots between subsystems to
//! avoid hidden aliasing between long-lived runtime stages.
//!
//! ## Error model
//! Subsystem failures are wrapped in [`AppError`] and categorized for
//! runtime observability. Failures are never downgraded to placeholder
//! results.
//!
//! ## Security and privacy notes
//! - Analysis is blocked unless a signed-in context is supplied.
//! - Kill-switch env var can stop outbound model calls at runtime.
//! - Log redaction helpers strip token/credential strings; raw uploaded log
//!   text never enters run logs.

pub mod runlog;
pub mod transport;

use cloudguard_alerts::{AlertStore, AlertStoreError};
use cloudguard_analysis::{AnalysisClient, AnalysisError};
use cloudguard_analysis_contract::AnalysisResult;
use cloudguard_auth::AuthContext;
use cloudguard_core::AlertDraft;
use cloudguard_ingest::StagedUpload;
use cloudguard_ui::{AnalyzerPanel, DashboardState};
use serde_json::{Value, json};
use thiserror::Error;

/// Build-time application version loaded from root `VERSION` file.
pub const APP_VERSION: &str = env!("CLOUDGUARD_VERSION");

/// Env var naming the model endpoint.
pub const MODEL_ENDPOINT_ENV: &str = "CLOUDGUARD_MODEL_ENDPOINT";

/// Env var holding the runtime kill switch.
pub const ANALYSIS_ENABLED_ENV: &str = "CLOUDGUARD_ANALYSIS_ENABLED";

/// Env var bounding the transport deadline in seconds.
pub const MODEL_TIMEOUT_ENV: &str = "CLOUDGUARD_MODEL_TIMEOUT_SECS";

/// Default transport deadline in seconds.
pub const DEFAULT_MODEL_TIMEOUT_SECS: u64 = 30;

/// Consolidated runtime status snapshot for simple UI projection.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuntimeStatus {
    /// Whether auth and panel gates currently allow an upload.
    pub submit_allowed: bool,
    /// Analyzer panel stage as a human-readable string.
    pub analyzer: String,
    /// Visible toast count.
    pub toast_count: usize,
}

/// Returns the app version sourced from root `VERSION`.
pub fn app_version() -> &'static str {
    APP_VERSION
}

/// Checks the runtime kill-switch env var.
///
/// Semantics:
/// - Unset => analysis enabled.
/// - `0`, `false`, `off` (case-insensitive) => analysis disabled.
/// - Any other value => analysis enabled.
pub fn analysis_enabled_from_env() -> bool {
    match std::env::var(ANALYSIS_ENABLED_ENV) {
        Ok(value) => {
            let normalized = value.trim().to_ascii_lowercase();
            !(normalized == "0" || normalized == "false" || normalized == "off")
        }
        Err(_) => true,
    }
}

/// Reads the model endpoint from the environment.
///
/// # Errors
/// Returns [`AppError::Config`] when the variable is unset or blank.
pub fn model_endpoint_from_env() -> Result<String, AppError> {
    match std::env::var(MODEL_ENDPOINT_ENV) {
        Ok(value) if !value.trim().is_empty() => Ok(value.trim().to_string()),
        _ => Err(AppError::Config(format!(
            "{MODEL_ENDPOINT_ENV} must name the model endpoint"
        ))),
    }
}

/// Reads the transport deadline from the environment.
pub fn model_timeout_secs_from_env() -> u64 {
    std::env::var(MODEL_TIMEOUT_ENV)
        .ok()
        .and_then(|value| value.trim().parse::<u64>().ok())
        .filter(|secs| *secs > 0)
        .unwrap_or(DEFAULT_MODEL_TIMEOUT_SECS)
}

/// Assembles the analysis request value for one staged upload.
///
/// The staged text is embedded as-is; the ingest layer already guaranteed
/// it is non-empty UTF-8.
pub fn request_value_for_upload(upload: &StagedUpload) -> Value {
    json!({
        "logData": upload.log_data,
        "fileType": upload.format.as_str(),
    })
}

/// Runs one analysis round trip for a signed-in user and records the
/// resulting alert.
///
/// Each invocation is independent; there is no caching, so identical
/// uploads re-execute the full round trip.
///
/// # Errors
/// Returns [`AppError::AnalysisDisabled`] when the kill switch is off.
/// Returns [`AppError::Analysis`] for invoker failures (invalid input,
/// service unavailable, malformed output), surfaced verbatim for toast
/// rendering.
/// Returns [`AppError::AlertStore`] when the assessment could not be
/// recorded.
pub fn run_analysis(
    context: &AuthContext,
    upload: &StagedUpload,
    client: &AnalysisClient,
    store: &dyn AlertStore,
    now_ms: u64,
) -> Result<AnalysisResult, AppError> {
    if !analysis_enabled_from_env() {
        return Err(AppError::AnalysisDisabled);
    }

    let candidate = request_value_for_upload(upload);
    let result = client.analyze(&candidate).map_err(AppError::Analysis)?;

    store
        .record(alert_draft_from_result(context, &result, now_ms))
        .map_err(AppError::AlertStore)?;

    Ok(result)
}

/// Projects one assessment into the alert draft recorded for the owner.
pub fn alert_draft_from_result(
    context: &AuthContext,
    result: &AnalysisResult,
    now_ms: u64,
) -> AlertDraft {
    AlertDraft {
        owner_uid: context.user_id().to_string(),
        risk_level: result.risk_level,
        description: result.summary.clone(),
        timestamp_ms: now_ms,
    }
}

/// Projects UI runtime state into a flat status snapshot.
pub fn project_runtime_status(state: &DashboardState) -> RuntimeStatus {
    let analyzer = match &state.analyzer {
        AnalyzerPanel::Idle => "Idle".to_string(),
        AnalyzerPanel::Analyzing { file_name } => format!("Analyzing {file_name}"),
        AnalyzerPanel::Complete { file_name, result } => {
            format!("Complete {file_name} ({} risk)", result.risk_level)
        }
        AnalyzerPanel::Failed { file_name, .. } => format!("Failed {file_name}"),
    };

    RuntimeStatus {
        submit_allowed: state.can_submit_upload() && analysis_enabled_from_env(),
        analyzer,
        toast_count: state.toasts.visible().len(),
    }
}

/// Redacts common secret markers in log-safe output.
pub fn redact_sensitive(input: &str) -> String {
    let mut redacted = input.to_string();
    for key in ["password", "token", "authorization", "bearer", "api_key"] {
        redacted = redact_key_value(&redacted, key);
    }
    redacted
}

fn redact_key_value(input: &str, key: &str) -> String {
    let lower = input.to_ascii_lowercase();
    if let Some(position) = lower.find(key) {
        let prefix = &input[..position];
        return format!("{prefix}{key}=<redacted>");
    }

    input.to_string()
}

/// App integration error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Runtime kill switch blocks outbound analysis calls.
    #[error("analysis blocked by CLOUDGUARD_ANALYSIS_ENABLED kill-switch")]
    AnalysisDisabled,
    /// Analysis invoker failure.
    #[error("{0}")]
    Analysis(#[source] AnalysisError),
    /// Alert store failure.
    #[error("alert recording failed: {0}")]
    AlertStore(#[source] AlertStoreError),
    /// Environment/configuration failure.
    #[error("configuration error: {0}")]
    Config(String),
}
