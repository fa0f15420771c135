//! Authentication service
//!
//! Implements the account and session lifecycle:
//! - Sign-up (creates the user and their empty profile row)
//! - Sign-in / sign-out
//! - Session validation (the "current user" lookup behind every
//!   protected request)
//!
//! There is no retry policy anywhere: a failed attempt is terminal and the
//! user tries again manually.

use crate::db::repositories::{ProfileRepository, SessionRepository, UserRepository};
use crate::models::{Profile, Session, User, UserRole};
use crate::services::password::{hash_password, verify_password};
use anyhow::{Context, Result};
use chrono::{Duration, Utc};
use std::sync::Arc;
use uuid::Uuid;

/// Default session expiration time in days
const DEFAULT_SESSION_EXPIRATION_DAYS: i64 = 7;

/// Minimum accepted password length
const MIN_PASSWORD_LENGTH: usize = 8;

/// Error types for auth service operations
#[derive(Debug, thiserror::Error)]
pub enum AuthServiceError {
    /// Authentication failed (invalid credentials)
    #[error("Authentication failed: {0}")]
    AuthenticationError(String),

    /// Validation error (invalid input)
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// Email already registered
    #[error("Account already exists: {0}")]
    AccountExists(String),

    /// Internal error
    #[error("Internal error: {0}")]
    InternalError(#[from] anyhow::Error),
}

/// Input for signing up
#[derive(Debug, Clone)]
pub struct SignUpInput {
    pub email: String,
    pub password: String,
    pub role: UserRole,
}

impl SignUpInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>, role: UserRole) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            role,
        }
    }
}

/// Input for signing in
#[derive(Debug, Clone)]
pub struct SignInInput {
    pub email: String,
    pub password: String,
}

impl SignInInput {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Auth service managing accounts and sessions
pub struct AuthService {
    user_repo: Arc<dyn UserRepository>,
    session_repo: Arc<dyn SessionRepository>,
    profile_repo: Arc<dyn ProfileRepository>,
    session_expiration_days: i64,
}

impl AuthService {
    /// Create a new auth service with the given repositories
    pub fn new(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            profile_repo,
            session_expiration_days: DEFAULT_SESSION_EXPIRATION_DAYS,
        }
    }

    /// Create a new auth service with custom session expiration
    pub fn with_session_expiration(
        user_repo: Arc<dyn UserRepository>,
        session_repo: Arc<dyn SessionRepository>,
        profile_repo: Arc<dyn ProfileRepository>,
        session_expiration_days: i64,
    ) -> Self {
        Self {
            user_repo,
            session_repo,
            profile_repo,
            session_expiration_days,
        }
    }

    /// Register a new account and open a session for it.
    ///
    /// An empty profile row is created alongside the user, so the profile
    /// editor always has a row to update.
    ///
    /// # Errors
    ///
    /// - `ValidationError` if the email or password is malformed
    /// - `AccountExists` if the email is already registered
    /// - `InternalError` for database errors
    pub async fn sign_up(&self, input: SignUpInput) -> Result<(User, Session), AuthServiceError> {
        self.validate_sign_up(&input)?;

        if self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to check email")?
            .is_some()
        {
            return Err(AuthServiceError::AccountExists(format!(
                "Email '{}' is already registered",
                input.email
            )));
        }

        let password_hash = hash_password(&input.password).context("Failed to hash password")?;

        let user = User::new(input.email, password_hash, input.role);
        let created_user = self
            .user_repo
            .create(&user)
            .await
            .context("Failed to create user")?;

        self.profile_repo
            .create(&Profile::empty(created_user.id))
            .await
            .context("Failed to create profile")?;

        let session = self.create_session(created_user.id).await?;

        Ok((created_user, session))
    }

    /// Sign in with credentials.
    ///
    /// # Errors
    ///
    /// - `AuthenticationError` if the credentials are invalid
    /// - `InternalError` for database errors
    pub async fn sign_in(&self, input: SignInInput) -> Result<(User, Session), AuthServiceError> {
        let user = self
            .user_repo
            .get_by_email(&input.email)
            .await
            .context("Failed to look up user")?
            .ok_or_else(|| {
                AuthServiceError::AuthenticationError("Invalid email or password".to_string())
            })?;

        let password_valid = verify_password(&input.password, &user.password_hash)
            .context("Failed to verify password")?;

        if !password_valid {
            return Err(AuthServiceError::AuthenticationError(
                "Invalid email or password".to_string(),
            ));
        }

        let session = self.create_session(user.id).await?;

        Ok((user, session))
    }

    /// Sign out (invalidate a session token)
    pub async fn sign_out(&self, session_id: &str) -> Result<(), AuthServiceError> {
        self.session_repo
            .delete(session_id)
            .await
            .context("Failed to delete session")?;

        Ok(())
    }

    /// Resolve a session token to its user.
    ///
    /// Returns `None` for unknown tokens and for expired sessions; expired
    /// sessions are deleted on sight.
    pub async fn current_user(&self, session_id: &str) -> Result<Option<User>, AuthServiceError> {
        let session = self
            .session_repo
            .get_by_id(session_id)
            .await
            .context("Failed to look up session")?;

        let session = match session {
            Some(session) => session,
            None => return Ok(None),
        };

        if session.is_expired() {
            self.session_repo
                .delete(&session.id)
                .await
                .context("Failed to delete expired session")?;
            return Ok(None);
        }

        let user = self
            .user_repo
            .get_by_id(session.user_id)
            .await
            .context("Failed to look up session user")?;

        Ok(user)
    }

    async fn create_session(&self, user_id: i64) -> Result<Session, AuthServiceError> {
        let now = Utc::now();
        let session = Session {
            id: Uuid::new_v4().to_string(),
            user_id,
            expires_at: now + Duration::days(self.session_expiration_days),
            created_at: now,
        };

        let created = self
            .session_repo
            .create(&session)
            .await
            .context("Failed to create session")?;

        Ok(created)
    }

    fn validate_sign_up(&self, input: &SignUpInput) -> Result<(), AuthServiceError> {
        let email = input.email.trim();
        if email.is_empty() || !email.contains('@') {
            return Err(AuthServiceError::ValidationError(
                "A valid email address is required".to_string(),
            ));
        }

        if input.password.len() < MIN_PASSWORD_LENGTH {
            return Err(AuthServiceError::ValidationError(format!(
                "Password must be at least {} characters",
                MIN_PASSWORD_LENGTH
            )));
        }

        Ok(())
    }
}
