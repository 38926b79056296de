#![warn(missing_docs)]
//! # cloudguard-auth
//!
//! ## Purpose
//! Implements credential validation and session context handling for
//! `cloudguard`.
//!
//! ## Responsibilities
//! - Validate sign-up/sign-in credential shape before delegating upstream.
//! - Execute account operations through an injectable identity provider
//!   abstraction (the hosted provider is an external collaborator).
//! - Model the signed-in/signed-out session transition and expose an
//!   explicit context carrying the current user into queries.
//!
//! ## Data flow
//! UI collects credentials -> [`AuthClient`] validates shape and calls
//! [`IdentityProvider`] -> receives [`UserProfile`] -> [`SessionState`]
//! updates -> [`AuthContext`] is passed to components that need the owner
//! uid.
//!
//! ## Ownership and lifetimes
//! Profile values are owned (`String`) to decouple provider and session
//! lifetimes.
//!
//! ## Error model
//! Credential shape violations and provider failures surface as
//! [`AuthError`], letting the shell either re-prompt or show the provider
//! message.
//!
//! ## Security and privacy notes
//! This crate does not log credentials or provider tokens. Callers are
//! expected to keep password inputs ephemeral.
//!
//! ## Example
//! ```rust
//! use cloudguard_auth::SessionState;
//!
//! let session = SessionState::new();
//! assert!(!session.is_signed_in());
//! ```

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use url::Url;

/// Minimum password length accepted at sign-up.
pub const MIN_SIGNUP_PASSWORD_LEN: usize = 6;

/// Minimum display name length accepted on profile update.
pub const MIN_DISPLAY_NAME_LEN: usize = 2;

/// Signed-in user identity supplied by the hosted provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserProfile {
    /// Provider-assigned stable user identifier.
    pub uid: String,
    /// Account email address.
    pub email: String,
    /// Optional display name.
    pub display_name: Option<String>,
    /// Optional avatar URL.
    pub avatar_url: Option<String>,
}

/// User-provided sign-in/sign-up credentials.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Account email address.
    pub email: String,
    /// Account password.
    pub password: String,
}

/// Partial profile update applied through the provider.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProfileUpdate {
    /// New display name, when changing it.
    pub display_name: Option<String>,
    /// New avatar URL, when changing it.
    pub avatar_url: Option<String>,
}

/// Federated sign-in providers supported by the shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FederatedProvider {
    /// Google OAuth popup flow.
    Google,
}

/// Abstract hosted identity provider.
///
/// Account storage, token issuance, and session refresh all live upstream;
/// this seam only carries the operations the dashboard shell needs.
pub trait IdentityProvider: Send + Sync {
    /// Creates an account and returns the signed-in profile.
    fn sign_up(&self, credentials: &Credentials) -> Result<UserProfile, AuthError>;

    /// Signs into an existing account.
    fn sign_in(&self, credentials: &Credentials) -> Result<UserProfile, AuthError>;

    /// Signs in through a federated provider.
    fn sign_in_federated(&self, provider: FederatedProvider) -> Result<UserProfile, AuthError>;

    /// Ends the current provider session.
    fn sign_out(&self, uid: &str) -> Result<(), AuthError>;

    /// Applies a validated profile update.
    fn update_profile(&self, uid: &str, update: &ProfileUpdate) -> Result<UserProfile, AuthError>;
}

/// Session state driven by provider outcomes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Session {
    /// No user is signed in.
    SignedOut,
    /// A provider session is active for this profile.
    SignedIn(UserProfile),
}

/// Session holder with explicit legal transitions.
#[derive(Debug, Clone)]
pub struct SessionState {
    session: Session,
}

impl SessionState {
    /// Creates a signed-out session holder.
    pub fn new() -> Self {
        Self {
            session: Session::SignedOut,
        }
    }

    /// Returns the current session snapshot.
    pub fn session(&self) -> &Session {
        &self.session
    }

    /// Applies a successful sign-in/sign-up transition.
    pub fn on_signed_in(&mut self, profile: UserProfile) {
        self.session = Session::SignedIn(profile);
    }

    /// Applies a profile update to an active session; no-op when signed out.
    pub fn on_profile_updated(&mut self, profile: UserProfile) {
        if matches!(self.session, Session::SignedIn(_)) {
            self.session = Session::SignedIn(profile);
        }
    }

    /// Explicit sign-out transition.
    pub fn sign_out(&mut self) {
        self.session = Session::SignedOut;
    }

    /// Returns `true` when a user session is active.
    pub fn is_signed_in(&self) -> bool {
        matches!(self.session, Session::SignedIn(_))
    }

    /// Builds the explicit context handed to owner-scoped components.
    pub fn context(&self) -> Option<AuthContext> {
        match &self.session {
            Session::SignedIn(profile) => Some(AuthContext {
                user: profile.clone(),
            }),
            Session::SignedOut => None,
        }
    }
}

impl Default for SessionState {
    fn default() -> Self {
        Self::new()
    }
}

/// Explicit per-request context carrying the current user.
///
/// Components that need the owner identifier receive this value rather than
/// reading an ambient global.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Signed-in user profile.
    pub user: UserProfile,
}

impl AuthContext {
    /// Returns the owning user identifier used to key store queries.
    pub fn user_id(&self) -> &str {
        &self.user.uid
    }
}

/// Auth client that validates credential shape and executes provider flows.
#[derive(Clone)]
pub struct AuthClient {
    provider: Arc<dyn IdentityProvider>,
}

impl AuthClient {
    /// Creates an auth client over a provider implementation.
    pub fn new(provider: Arc<dyn IdentityProvider>) -> Self {
        Self { provider }
    }

    /// Creates an account after local credential-shape validation.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidEmail`] for malformed addresses.
    /// Returns [`AuthError::WeakPassword`] for passwords shorter than
    /// [`MIN_SIGNUP_PASSWORD_LEN`].
    /// Propagates provider errors as-is for caller messaging.
    pub fn sign_up(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        validate_email(&credentials.email)?;
        if credentials.password.chars().count() < MIN_SIGNUP_PASSWORD_LEN {
            return Err(AuthError::WeakPassword {
                min: MIN_SIGNUP_PASSWORD_LEN,
            });
        }

        self.provider.sign_up(credentials)
    }

    /// Signs into an existing account.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidEmail`] for malformed addresses and
    /// [`AuthError::EmptyPassword`] for blank passwords.
    pub fn sign_in(&self, credentials: &Credentials) -> Result<UserProfile, AuthError> {
        validate_email(&credentials.email)?;
        if credentials.password.is_empty() {
            return Err(AuthError::EmptyPassword);
        }

        self.provider.sign_in(credentials)
    }

    /// Signs in through a federated provider; no local validation applies.
    pub fn sign_in_federated(
        &self,
        provider: FederatedProvider,
    ) -> Result<UserProfile, AuthError> {
        self.provider.sign_in_federated(provider)
    }

    /// Ends the provider session for this user.
    pub fn sign_out(&self, uid: &str) -> Result<(), AuthError> {
        self.provider.sign_out(uid)
    }

    /// Applies a profile update after local validation.
    ///
    /// # Errors
    /// Returns [`AuthError::InvalidProfile`] when the display name is too
    /// short or the avatar URL does not parse.
    pub fn update_profile(
        &self,
        uid: &str,
        update: &ProfileUpdate,
    ) -> Result<UserProfile, AuthError> {
        if let Some(display_name) = &update.display_name
            && display_name.trim().chars().count() < MIN_DISPLAY_NAME_LEN
        {
            return Err(AuthError::InvalidProfile(format!(
                "display name must be at least {MIN_DISPLAY_NAME_LEN} characters"
            )));
        }

        if let Some(avatar_url) = &update.avatar_url {
            Url::parse(avatar_url).map_err(|error| {
                AuthError::InvalidProfile(format!("invalid avatar url: {error}"))
            })?;
        }

        self.provider.update_profile(uid, update)
    }
}

/// Validates email address shape.
///
/// # Errors
/// Returns [`AuthError::InvalidEmail`] when the address lacks a local part,
/// an `@` separator, or a dotted domain.
pub fn validate_email(email: &str) -> Result<(), AuthError> {
    let mut parts = email.splitn(2, '@');
    let local = parts.next().unwrap_or_default();
    let domain = parts.next().unwrap_or_default();

    if local.is_empty() || domain.is_empty() || !domain.contains('.') {
        return Err(AuthError::InvalidEmail);
    }

    Ok(())
}

/// Errors produced by auth validation and provider flows.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Email address shape is invalid.
    #[error("invalid email address")]
    InvalidEmail,
    /// Sign-up password is below the minimum length.
    #[error("password must be at least {min} characters")]
    WeakPassword {
        /// Required minimum length.
        min: usize,
    },
    /// Sign-in password is blank.
    #[error("password is required")]
    EmptyPassword,
    /// Profile update violated local validation.
    #[error("invalid profile update: {0}")]
    InvalidProfile(String),
    /// Upstream provider rejected the operation.
    #[error("identity provider failure: {0}")]
    Provider(String),
}
