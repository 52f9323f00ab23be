//! Local authentication session.
//!
//! # Responsibility
//! - Own the in-memory session (anonymous or authenticated user).
//! - Validate login/registration input and simulate the credential round
//!   trip.
//! - Persist the session through an injected [`crate::capability::UserStore`].
//!
//! # Invariants
//! - A failed attempt leaves the session unchanged.
//! - At most one current user exists at a time.
//! - Passwords are never stored or logged.

mod manager;

pub use manager::AuthManager;

use crate::model::user::User;
use std::time::Duration;

/// Authentication tuning.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Delay applied to login, registration and password change to mirror a
    /// network round trip.
    pub simulated_latency: Duration,
    pub min_password_len: usize,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            simulated_latency: Duration::from_millis(1000),
            min_password_len: crate::utils::validation::MIN_PASSWORD_LEN,
        }
    }
}

impl AuthConfig {
    /// Default rules with no simulated latency.
    pub fn instant() -> Self {
        Self {
            simulated_latency: Duration::ZERO,
            ..Self::default()
        }
    }
}

/// Session state machine: `Anonymous` → `Authenticated` → `Anonymous`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated(User),
}

impl AuthState {
    pub fn user(&self) -> Option<&User> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated(user) => Some(user),
        }
    }
}

/// Registration form input.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RegistrationRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
}

/// Field-specific authentication failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthError {
    #[error("{0} is required")]
    MissingField(&'static str),
    #[error("email address is not valid")]
    InvalidEmail,
    #[error("password must be at least {min} characters long")]
    PasswordTooShort { min: usize },
    #[error("passwords do not match")]
    PasswordMismatch,
    #[error("no user is signed in")]
    NotAuthenticated,
}

impl AuthError {
    /// Stable code used in log events.
    pub fn code(&self) -> &'static str {
        match self {
            Self::MissingField(_) => "missing_field",
            Self::InvalidEmail => "invalid_email",
            Self::PasswordTooShort { .. } => "password_too_short",
            Self::PasswordMismatch => "password_mismatch",
            Self::NotAuthenticated => "not_authenticated",
        }
    }
}
