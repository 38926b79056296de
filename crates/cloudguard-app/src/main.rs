#![warn(missing_docs)]
//! # cloudguard-app binary
//!
//! Command-line shell that stages one log file, runs one analysis round
//! trip against the configured model endpoint, and prints the resulting
//! alert feed.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use cloudguard_alerts::{AlertStore, MemoryAlertStore};
use cloudguard_analysis::AnalysisClient;
use cloudguard_app::runlog::RunLogger;
use cloudguard_app::transport::HttpModelTransport;
use cloudguard_app::{
    app_version, model_endpoint_from_env, model_timeout_secs_from_env, redact_sensitive,
    run_analysis,
};
use cloudguard_auth::{
    AuthClient, AuthError, Credentials, FederatedProvider, IdentityProvider, ProfileUpdate,
    SessionState, UserProfile,
};
use cloudguard_ingest::stage_upload;
use cloudguard_ui::{AnalyzerPanel, DashboardState, UiAuthState};

/// CLI entry point.
fn main() {
    if let Err(error) = run() {
        eprintln!("cloudguard: {error}");
        std::process::exit(1);
    }
}

/// Demo provider standing in for the hosted identity service.
#[derive(Default)]
struct DemoIdentityProvider;

impl IdentityProvider for DemoIdentityProvider {
    fn sign_up(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        self.sign_in(credentials)
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        if credentials.password.trim().eq_ignore_ascii_case("fail") {
            return Err(AuthError::Provider(
                "credentials rejected by demo identity provider".to_string(),
            ));
        }

        let local = credentials.email.split('@').next().unwrap_or("user");
        Ok(UserProfile {
            uid: format!("demo-{local}"),
            email: credentials.email.clone(),
            display_name: None,
            avatar_url: None,
        })
    }

    fn sign_in_federated(&self, _provider: FederatedProvider) -> Result<UserProfile, AuthError> {
        Err(AuthError::Provider(
            "federated sign-in is not available in the demo shell".to_string(),
        ))
    }

    fn sign_out(&self, _uid: &str) -> Result<(), AuthError> {
        Ok(())
    }

    fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<UserProfile, AuthError> {
        Ok(UserProfile {
            uid: uid.to_string(),
            email: "demo@cloudguard.test".to_string(),
            display_name: update.display_name.clone(),
            avatar_url: update.avatar_url.clone(),
        })
    }
}

fn run() -> Result<(), String> {
    let file_path = std::env::args().nth(1).map(PathBuf::from).ok_or_else(|| {
        format!(
            "usage: cloudguard-app <log-file.json|log-file.csv>\n\
             cloudguard-app {} (set CLOUDGUARD_MODEL_ENDPOINT first)",
            app_version()
        )
    })?;

    let log_dir = std::env::current_dir()
        .map_err(|error| format!("unable to resolve working directory: {error}"))?;
    let logger = RunLogger::create_in(&log_dir)?;
    logger.info(
        "bootstrap",
        "startup",
        &format!("version={} file={}", app_version(), file_path.display()),
    );

    let endpoint = model_endpoint_from_env().map_err(|error| error.to_string())?;
    let timeout = Duration::from_secs(model_timeout_secs_from_env());
    let transport =
        HttpModelTransport::new(timeout).map_err(|error| format!("transport init: {error}"))?;
    let client = AnalysisClient::new(endpoint, Arc::new(transport))
        .map_err(|error| format!("analysis client init: {error}"))?;

    let email = std::env::var("CLOUDGUARD_USER_EMAIL")
        .unwrap_or_else(|_| "analyst@cloudguard.test".to_string());
    let auth = AuthClient::new(Arc::new(DemoIdentityProvider));
    let profile = auth
        .sign_in(&Credentials {
            email,
            password: "demo-session".to_string(),
        })
        .map_err(|error| format!("sign-in failed: {error}"))?;

    let mut session = SessionState::new();
    session.on_signed_in(profile);
    let context = session
        .context()
        .ok_or_else(|| "sign-in produced no session context".to_string())?;
    logger.info("auth", "signed_in", &format!("uid={}", context.user_id()));

    let bytes = std::fs::read(&file_path)
        .map_err(|error| format!("unable to read '{}': {error}", file_path.display()))?;
    let file_name = file_path
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| "upload".to_string());

    // Media type resolution is left to the extension fallback; the CLI has
    // no picker-declared type to trust.
    let upload = stage_upload(&file_name, "", bytes).map_err(|error| {
        logger.error("ingest", "rejected", &error.to_string());
        format!("upload rejected: {error}")
    })?;
    logger.info(
        "ingest",
        "staged",
        &format!(
            "file={} format={} bytes={} digest={}",
            upload.file_name, upload.format, upload.byte_len, upload.content_digest
        ),
    );

    let mut dashboard = DashboardState::new(app_version());
    dashboard.auth = UiAuthState::SignedIn;
    dashboard.begin_analysis(&upload.file_name);

    let store = MemoryAlertStore::new();
    let subscription = store.subscribe(
        context.user_id(),
        Box::new(|snapshot| {
            for alert in snapshot {
                println!(
                    "ALERT | {} | {} | {}",
                    alert.risk_level, alert.timestamp_ms, alert.description
                );
            }
        }),
    );

    let now_ms = unix_timestamp_millis();
    match run_analysis(&context, &upload, &client, &store, now_ms) {
        Ok(result) => {
            logger.info(
                "analysis",
                "complete",
                &format!(
                    "risk={} anomalies={}",
                    result.risk_level,
                    result.anomalies.len()
                ),
            );

            println!("Risk Level: {}", result.risk_level);
            if result.anomalies.is_empty() {
                println!("No anomalies detected.");
            } else {
                println!("Detected Anomalies:");
                for anomaly in &result.anomalies {
                    println!("  - {anomaly}");
                }
            }
            println!("Summary: {}", result.summary);

            if dashboard.preferences.should_email(result.risk_level) {
                println!("An email notification would be sent for this risk level.");
            }
            dashboard.complete_analysis(result);
        }
        Err(error) => {
            let message = error.to_string();
            logger.error("analysis", "failed", &redact_sensitive(&message));
            dashboard.fail_analysis(&message);

            for toast in dashboard.toasts.visible() {
                eprintln!("{}: {}", toast.title, toast.description);
            }
            store.unsubscribe(subscription);
            return Err(message);
        }
    }

    if let AnalyzerPanel::Complete { file_name, .. } = &dashboard.analyzer {
        logger.info("ui", "rendered", &format!("results_for={file_name}"));
    }

    store.unsubscribe(subscription);
    logger.info("shutdown", "done", "run complete");
    Ok(())
}

fn unix_timestamp_millis() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |duration| duration.as_millis() as u64)
}
