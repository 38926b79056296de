#![warn(missing_docs)]
//! # cloudguard-ui
//!
//! ## Purpose
//! Defines the UI-facing runtime state model for the `cloudguard` dashboard.
//!
//! ## Responsibilities
//! - Model the analyzer panel lifecycle around one upload round trip.
//! - Maintain the dismissible toast queue used for failure messaging.
//! - Project alert snapshots into dashboard widget values.
//! - Hold notification preferences and the subscription plan catalog.
//!
//! ## Data flow
//! App orchestration events mutate [`DashboardState`]; alert snapshots from
//! the store subscription feed the widget projections.
//!
//! ## Ownership and lifetimes
//! State owns all strings and results to simplify event reducers and avoid
//! cross-thread borrowing.
//!
//! ## Error model
//! This crate favors explicit state over recoverable errors. Invalid
//! combinations are prevented by guard methods.
//!
//! ## Security and privacy notes
//! UI state intentionally excludes secrets and raw uploaded log text.

use cloudguard_analysis_contract::AnalysisResult;
use cloudguard_core::{Alert, RiskLevel};

/// Widget score for a low-risk alert.
pub const RISK_SCORE_LOW: u8 = 20;
/// Widget score for a medium-risk alert.
pub const RISK_SCORE_MEDIUM: u8 = 50;
/// Widget score for a high-risk alert.
pub const RISK_SCORE_HIGH: u8 = 85;

/// Milliseconds per risk-over-time bucket (one day).
pub const TREND_BUCKET_MS: u64 = 86_400_000;

/// Monthly upload quota on the free plan.
pub const FREE_MONTHLY_UPLOAD_QUOTA: u32 = 10;

/// UI-auth state projection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UiAuthState {
    /// No user is signed in.
    SignedOut,
    /// A user session is active.
    SignedIn,
}

/// Analyzer panel lifecycle around one upload round trip.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyzerPanel {
    /// No upload submitted yet, or panel was reset.
    Idle,
    /// Analysis round trip in flight.
    Analyzing {
        /// Name of the submitted file.
        file_name: String,
    },
    /// Round trip finished with a validated result.
    Complete {
        /// Name of the analyzed file.
        file_name: String,
        /// Validated assessment to render.
        result: AnalysisResult,
    },
    /// Round trip failed; message is surfaced verbatim.
    Failed {
        /// Name of the submitted file.
        file_name: String,
        /// Caller-facing failure message.
        message: String,
    },
}

impl AnalyzerPanel {
    /// Returns `true` while a round trip is in flight.
    pub fn is_busy(&self) -> bool {
        matches!(self, AnalyzerPanel::Analyzing { .. })
    }
}

/// Severity tone of a toast notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToastTone {
    /// Informational confirmation.
    Info,
    /// Failure requiring user attention.
    Destructive,
}

/// One dismissible toast notification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Toast {
    /// Queue-assigned identifier used for dismissal.
    pub id: u64,
    /// Short headline.
    pub title: String,
    /// Longer description, often an error rendered verbatim.
    pub description: String,
    /// Visual tone.
    pub tone: ToastTone,
}

/// Ordered queue of visible toasts.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ToastQueue {
    next_id: u64,
    toasts: Vec<Toast>,
}

impl ToastQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Pushes a toast and returns its dismissal id.
    pub fn push(
        &mut self,
        title: impl Into<String>,
        description: impl Into<String>,
        tone: ToastTone,
    ) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        self.toasts.push(Toast {
            id,
            title: title.into(),
            description: description.into(),
            tone,
        });
        id
    }

    /// Dismisses one toast; unknown ids are ignored.
    pub fn dismiss(&mut self, id: u64) {
        self.toasts.retain(|toast| toast.id != id);
    }

    /// Returns visible toasts in arrival order.
    pub fn visible(&self) -> &[Toast] {
        &self.toasts
    }
}

/// Email notification preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NotificationPreferences {
    /// Immediate email for high-risk events.
    pub high_risk_alerts: bool,
    /// Immediate email for medium-risk events.
    pub medium_risk_alerts: bool,
    /// Weekly activity summary email.
    pub weekly_summary: bool,
}

impl Default for NotificationPreferences {
    fn default() -> Self {
        Self {
            high_risk_alerts: true,
            medium_risk_alerts: false,
            weekly_summary: true,
        }
    }
}

impl NotificationPreferences {
    /// Returns `true` when an alert at this level should trigger an email.
    pub fn should_email(&self, level: RiskLevel) -> bool {
        match level {
            RiskLevel::High => self.high_risk_alerts,
            RiskLevel::Medium => self.medium_risk_alerts,
            RiskLevel::Low => false,
        }
    }
}

/// Subscription tiers offered by the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanTier {
    /// Free tier with a monthly upload quota.
    Free,
    /// Paid tier without upload limits.
    Pro,
}

/// One subscription plan as rendered on the plans page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Plan {
    /// Plan tier.
    pub tier: PlanTier,
    /// Monthly price in cents.
    pub monthly_price_cents: u32,
    /// Marketing feature bullet points.
    pub features: Vec<&'static str>,
}

/// Returns the static plan catalog.
pub fn plan_catalog() -> Vec<Plan> {
    vec![
        Plan {
            tier: PlanTier::Free,
            monthly_price_cents: 0,
            features: vec![
                "Dashboard access",
                "Manual log uploads (10/month)",
                "Basic risk analysis",
                "Email alerts for high-risk events",
            ],
        },
        Plan {
            tier: PlanTier::Pro,
            monthly_price_cents: 4_900,
            features: vec![
                "Everything in Free, plus:",
                "Unlimited log uploads",
                "Advanced AI-powered anomaly detection",
                "Detailed reporting and analytics",
                "Priority support",
            ],
        },
    ]
}

/// Returns `true` when this tier permits another upload this month.
pub fn can_upload(tier: PlanTier, uploads_this_month: u32) -> bool {
    match tier {
        PlanTier::Free => uploads_this_month < FREE_MONTHLY_UPLOAD_QUOTA,
        PlanTier::Pro => true,
    }
}

/// Per-level alert counts for the stat cards.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlertCounts {
    /// High-risk alert count.
    pub high: usize,
    /// Medium-risk alert count.
    pub medium: usize,
    /// Low-risk alert count.
    pub low: usize,
}

impl AlertCounts {
    /// Total alert count across all levels.
    pub fn total(&self) -> usize {
        self.high + self.medium + self.low
    }
}

/// Counts alerts per level from one snapshot.
pub fn alert_counts(snapshot: &[Alert]) -> AlertCounts {
    let mut counts = AlertCounts::default();
    for alert in snapshot {
        match alert.risk_level {
            RiskLevel::High => counts.high += 1,
            RiskLevel::Medium => counts.medium += 1,
            RiskLevel::Low => counts.low += 1,
        }
    }
    counts
}

/// Maps a risk level onto its widget score.
pub fn risk_score(level: RiskLevel) -> u8 {
    match level {
        RiskLevel::Low => RISK_SCORE_LOW,
        RiskLevel::Medium => RISK_SCORE_MEDIUM,
        RiskLevel::High => RISK_SCORE_HIGH,
    }
}

/// Computes the overall risk score widget value.
///
/// The score is the rounded mean over the snapshot; `None` when the feed is
/// empty so the widget can render a placeholder instead of a fake zero.
pub fn overall_risk_score(snapshot: &[Alert]) -> Option<u8> {
    if snapshot.is_empty() {
        return None;
    }

    let sum: u32 = snapshot
        .iter()
        .map(|alert| u32::from(risk_score(alert.risk_level)))
        .sum();
    let count = snapshot.len() as u32;
    Some(((sum + count / 2) / count) as u8)
}

/// One point of the risk-over-time chart series.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TrendPoint {
    /// Inclusive start of the day bucket in Unix epoch milliseconds.
    pub bucket_start_ms: u64,
    /// Mean risk score over the bucket.
    pub score: u8,
}

/// Builds the risk-over-time series from one snapshot.
///
/// Alerts are grouped into [`TREND_BUCKET_MS`] buckets; the series is
/// ascending by bucket start and skips empty days rather than inventing
/// zero-risk points.
pub fn risk_over_time(snapshot: &[Alert]) -> Vec<TrendPoint> {
    let mut buckets: Vec<(u64, u32, u32)> = Vec::new();

    for alert in snapshot {
        let bucket_start_ms = alert.timestamp_ms - alert.timestamp_ms % TREND_BUCKET_MS;
        let score = u32::from(risk_score(alert.risk_level));
        match buckets
            .iter_mut()
            .find(|(start, _, _)| *start == bucket_start_ms)
        {
            Some((_, sum, count)) => {
                *sum += score;
                *count += 1;
            }
            None => buckets.push((bucket_start_ms, score, 1)),
        }
    }

    buckets.sort_by_key(|(start, _, _)| *start);
    buckets
        .into_iter()
        .map(|(bucket_start_ms, sum, count)| TrendPoint {
            bucket_start_ms,
            score: ((sum + count / 2) / count) as u8,
        })
        .collect()
}

/// One row of the recent-activity widget.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActivityEntry {
    /// Row label, e.g. `High-Risk Alert`.
    pub kind: String,
    /// Detail text from the alert description.
    pub details: String,
    /// Event time in Unix epoch milliseconds.
    pub timestamp_ms: u64,
    /// Risk badge for the row.
    pub risk: RiskLevel,
}

/// Projects the newest alerts into recent-activity rows.
pub fn recent_activity(snapshot: &[Alert], limit: usize) -> Vec<ActivityEntry> {
    snapshot
        .iter()
        .take(limit)
        .map(|alert| ActivityEntry {
            kind: match alert.risk_level {
                RiskLevel::High => "High-Risk Alert".to_string(),
                RiskLevel::Medium | RiskLevel::Low => "Log Analysis".to_string(),
            },
            details: alert.description.clone(),
            timestamp_ms: alert.timestamp_ms,
            risk: alert.risk_level,
        })
        .collect()
}

/// Aggregate dashboard runtime state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardState {
    /// App version string sourced from root `VERSION`.
    pub version: String,
    /// Current auth projection.
    pub auth: UiAuthState,
    /// Analyzer panel lifecycle.
    pub analyzer: AnalyzerPanel,
    /// Visible toast notifications.
    pub toasts: ToastQueue,
    /// Email notification preferences.
    pub preferences: NotificationPreferences,
}

impl DashboardState {
    /// Creates default dashboard state.
    pub fn new(version: impl Into<String>) -> Self {
        Self {
            version: version.into(),
            auth: UiAuthState::SignedOut,
            analyzer: AnalyzerPanel::Idle,
            toasts: ToastQueue::new(),
            preferences: NotificationPreferences::default(),
        }
    }

    /// Returns `true` when a new upload may be submitted.
    pub fn can_submit_upload(&self) -> bool {
        self.auth == UiAuthState::SignedIn && !self.analyzer.is_busy()
    }

    /// Marks an analysis round trip as started.
    pub fn begin_analysis(&mut self, file_name: impl Into<String>) {
        self.analyzer = AnalyzerPanel::Analyzing {
            file_name: file_name.into(),
        };
    }

    /// Marks the in-flight round trip as complete.
    pub fn complete_analysis(&mut self, result: AnalysisResult) {
        if let AnalyzerPanel::Analyzing { file_name } = &self.analyzer {
            self.analyzer = AnalyzerPanel::Complete {
                file_name: file_name.clone(),
                result,
            };
        }
    }

    /// Marks the in-flight round trip as failed and raises a toast.
    pub fn fail_analysis(&mut self, message: impl Into<String>) {
        let message = message.into();
        if let AnalyzerPanel::Analyzing { file_name } = &self.analyzer {
            self.analyzer = AnalyzerPanel::Failed {
                file_name: file_name.clone(),
                message: message.clone(),
            };
        }
        self.toasts
            .push("Analysis Failed", message, ToastTone::Destructive);
    }
}

#[cfg(test)]
mod tests {
    //! Unit tests for panel transitions and widget projections.

    use cloudguard_core::Alert;

    use super::*;

    fn alert(id: &str, level: RiskLevel, timestamp_ms: u64) -> Alert {
        Alert::new(id, "uid-1", level, "detail", timestamp_ms).expect("alert fixture")
    }

    #[test]
    fn upload_gate_requires_sign_in_and_idle_panel() {
        let mut state = DashboardState::new("0.1.0");
        assert!(!state.can_submit_upload());

        state.auth = UiAuthState::SignedIn;
        assert!(state.can_submit_upload());

        state.begin_analysis("events.json");
        assert!(!state.can_submit_upload());
    }

    #[test]
    fn failed_analysis_raises_destructive_toast() {
        let mut state = DashboardState::new("0.1.0");
        state.auth = UiAuthState::SignedIn;
        state.begin_analysis("events.json");
        state.fail_analysis("analysis service unavailable: model call timed out");

        assert!(matches!(state.analyzer, AnalyzerPanel::Failed { .. }));
        assert_eq!(state.toasts.visible().len(), 1);
        assert_eq!(state.toasts.visible()[0].tone, ToastTone::Destructive);
    }

    #[test]
    fn overall_score_averages_snapshot_levels() {
        let snapshot = vec![
            alert("a", RiskLevel::High, 1),
            alert("b", RiskLevel::Low, 2),
        ];
        assert_eq!(overall_risk_score(&snapshot), Some(53));
        assert_eq!(overall_risk_score(&[]), None);
    }

    #[test]
    fn trend_series_buckets_by_day_ascending() {
        let day = TREND_BUCKET_MS;
        let snapshot = vec![
            alert("a", RiskLevel::High, day * 2 + 5),
            alert("b", RiskLevel::Low, day),
            alert("c", RiskLevel::Medium, day * 2 + 9),
        ];

        let series = risk_over_time(&snapshot);
        assert_eq!(series.len(), 2);
        assert_eq!(series[0].bucket_start_ms, day);
        assert_eq!(series[0].score, RISK_SCORE_LOW);
        assert_eq!(series[1].bucket_start_ms, day * 2);
        assert_eq!(series[1].score, 68);
    }

    #[test]
    fn default_preferences_email_high_risk_only() {
        let preferences = NotificationPreferences::default();
        assert!(preferences.should_email(RiskLevel::High));
        assert!(!preferences.should_email(RiskLevel::Medium));
        assert!(!preferences.should_email(RiskLevel::Low));
    }

    #[test]
    fn free_plan_enforces_monthly_quota() {
        assert!(can_upload(PlanTier::Free, FREE_MONTHLY_UPLOAD_QUOTA - 1));
        assert!(!can_upload(PlanTier::Free, FREE_MONTHLY_UPLOAD_QUOTA));
        assert!(can_upload(PlanTier::Pro, 10_000));
    }
}
