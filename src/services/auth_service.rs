//! Authentication service - Registration, login, logout and token lookup.
//!
//! Credential checks live here; token mechanics are delegated to the
//! injected [`TokenService`].

use async_trait::async_trait;
use sea_orm::SqlErr;
use std::sync::Arc;

use super::TokenService;
use super::token_service::IssuedToken;
use crate::config::MSG_EMAIL_TAKEN;
use crate::domain::{Password, User};
use crate::errors::{AppError, AppResult};
use crate::infra::Repositories;

/// Authentication service trait for dependency injection.
#[async_trait]
pub trait AuthService: Send + Sync {
    /// Register a new user. Fails validation if the email is taken.
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User>;

    /// Whether an account already uses this email
    async fn email_taken(&self, email: &str) -> AppResult<bool>;

    /// Check credentials and issue a token
    async fn login(&self, email: String, password: String) -> AppResult<IssuedToken>;

    /// Revoke the given token
    async fn logout(&self, token: &str) -> AppResult<()>;

    /// Resolve a bearer token to its user
    async fn authenticate(&self, token: &str) -> AppResult<User>;
}

/// Concrete implementation of AuthService.
pub struct Authenticator<R: Repositories> {
    repos: Arc<R>,
    tokens: Arc<dyn TokenService>,
}

impl<R: Repositories> Authenticator<R> {
    pub fn new(repos: Arc<R>, tokens: Arc<dyn TokenService>) -> Self {
        Self { repos, tokens }
    }
}

/// A concurrent registration can slip past the lookup; the unique index
/// still catches it.
fn email_taken_on_conflict(err: AppError) -> AppError {
    match err {
        AppError::Database(ref db)
            if matches!(db.sql_err(), Some(SqlErr::UniqueConstraintViolation(_))) =>
        {
            AppError::validation("email", MSG_EMAIL_TAKEN)
        }
        other => other,
    }
}

#[async_trait]
impl<R: Repositories> AuthService for Authenticator<R> {
    async fn register(&self, name: String, email: String, password: String) -> AppResult<User> {
        if self.email_taken(&email).await? {
            return Err(AppError::validation("email", MSG_EMAIL_TAKEN));
        }

        let password_hash = Password::new(&password)?.into_string();
        let user = self
            .repos
            .users()
            .create(name, email, password_hash)
            .await
            .map_err(email_taken_on_conflict)?;

        tracing::info!(user_id = %user.id, "User registered");
        Ok(user)
    }

    async fn email_taken(&self, email: &str) -> AppResult<bool> {
        Ok(self.repos.users().find_by_email(email).await?.is_some())
    }

    async fn login(&self, email: String, password: String) -> AppResult<IssuedToken> {
        let user = self.repos.users().find_by_email(&email).await?;

        // Verify against a dummy hash for unknown emails so both paths cost the same
        let stored = match &user {
            Some(user) => Password::from_hash(user.password_hash.clone()),
            None => Password::dummy(),
        };
        let password_valid = stored.verify(&password);

        let user = match user {
            Some(user) if password_valid => user,
            _ => {
                tracing::info!("Rejected login attempt");
                return Err(AppError::InvalidCredentials);
            }
        };

        let token = self.tokens.issue(user.id).await?;
        tracing::info!(user_id = %user.id, "User logged in");
        Ok(token)
    }

    async fn logout(&self, token: &str) -> AppResult<()> {
        self.tokens.invalidate(token).await?;
        tracing::info!("User logged out");
        Ok(())
    }

    async fn authenticate(&self, token: &str) -> AppResult<User> {
        let user_id = self.tokens.resolve(token).await?;

        self.repos
            .users()
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::unauthorized("User not found"))
    }
}
