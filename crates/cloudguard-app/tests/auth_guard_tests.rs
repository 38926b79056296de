//! Integration tests for credential policy and the submit gate.

use std::sync::Arc;

use cloudguard_auth::{
    AuthClient, AuthError, Credentials, FederatedProvider, IdentityProvider, ProfileUpdate,
    SessionState, UserProfile,
};
use cloudguard_ui::{DashboardState, UiAuthState};

#[derive(Default)]
struct AcceptingProvider;

impl IdentityProvider for AcceptingProvider {
    fn sign_up(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        self.sign_in(credentials)
    }

    fn sign_in(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        Ok(UserProfile {
            uid: "uid-1".to_string(),
            email: credentials.email.clone(),
            display_name: None,
            avatar_url: None,
        })
    }

    fn sign_in_federated(&self, _provider: FederatedProvider) -> Result<UserProfile, AuthError> {
        Err(AuthError::Provider("not configured".to_string()))
    }

    fn sign_out(&self, _uid: &str) -> Result<(), AuthError> {
        Ok(())
    }

    fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<UserProfile, AuthError> {
        Ok(UserProfile {
            uid: uid.to_string(),
            email: "user@example.test".to_string(),
            display_name: update.display_name.clone(),
            avatar_url: update.avatar_url.clone(),
        })
    }
}

#[test]
fn auth_guard_tests_enforce_signup_password_policy() {
    let client = AuthClient::new(Arc::new(AcceptingProvider));

    let error = client
        .sign_up(&Credentials {
            email: "user@example.test".to_string(),
            password: "short".to_string(),
        })
        .expect_err("five-character password should be rejected");
    assert!(matches!(error, AuthError::WeakPassword { min: 6 }));

    client
        .sign_up(&Credentials {
            email: "user@example.test".to_string(),
            password: "longenough".to_string(),
        })
        .expect("six-plus-character password should pass");
}

#[test]
fn auth_guard_tests_validate_profile_updates() {
    let client = AuthClient::new(Arc::new(AcceptingProvider));

    let error = client
        .update_profile(
            "uid-1",
            &ProfileUpdate {
                display_name: Some("x".to_string()),
                avatar_url: None,
            },
        )
        .expect_err("one-character display name should be rejected");
    assert!(matches!(error, AuthError::InvalidProfile(_)));

    let updated = client
        .update_profile(
            "uid-1",
            &ProfileUpdate {
                display_name: Some("Dana".to_string()),
                avatar_url: Some("https://cdn.example.test/avatar.png".to_string()),
            },
        )
        .expect("valid update should pass");
    assert_eq!(updated.display_name.as_deref(), Some("Dana"));
}

#[test]
fn auth_guard_tests_block_uploads_while_signed_out() {
    let mut session = SessionState::new();
    let mut dashboard = DashboardState::new("0.1.0");
    assert!(!dashboard.can_submit_upload());

    session.on_signed_in(UserProfile {
        uid: "uid-1".to_string(),
        email: "user@example.test".to_string(),
        display_name: None,
        avatar_url: None,
    });
    dashboard.auth = UiAuthState::SignedIn;
    assert!(dashboard.can_submit_upload());

    session.sign_out();
    assert!(session.context().is_none());
}
