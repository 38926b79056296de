//! Integration tests for email notification preferences.

use cloudguard_core::RiskLevel;
use cloudguard_ui::NotificationPreferences;

#[test]
fn notification_preferences_tests_follow_per_level_toggles() {
    let mut preferences = NotificationPreferences::default();
    assert!(preferences.should_email(RiskLevel::High));
    assert!(!preferences.should_email(RiskLevel::Medium));

    preferences.high_risk_alerts = false;
    preferences.medium_risk_alerts = true;
    assert!(!preferences.should_email(RiskLevel::High));
    assert!(preferences.should_email(RiskLevel::Medium));
    assert!(!preferences.should_email(RiskLevel::Low));
}
