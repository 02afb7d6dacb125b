//! Bearer token authentication middleware.

use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, HeaderMap},
    middleware::Next,
    response::Response,
};

use crate::api::AppState;
use crate::config::BEARER_TOKEN_PREFIX;
use crate::domain::User;
use crate::errors::AppError;

/// The authenticated caller, resolved before any protected handler runs.
#[derive(Clone, Debug)]
pub struct CurrentUser {
    pub user: User,
    /// Raw bearer token, kept so logout can revoke exactly this token
    pub token: String,
}

/// Pull the token out of `Authorization: Bearer <token>`.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
    headers
        .get(AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|h| h.strip_prefix(BEARER_TOKEN_PREFIX))
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Authentication middleware.
///
/// Resolves the bearer token to a user record and injects [`CurrentUser`]
/// into the request extensions. Missing, invalid, expired or revoked tokens
/// short-circuit with 401.
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let token = bearer_token(request.headers())
        .ok_or_else(|| AppError::unauthorized("Token not provided"))?
        .to_string();

    let user = state.auth_service.authenticate(&token).await?;

    request
        .extensions_mut()
        .insert(CurrentUser { user, token });

    Ok(next.run(request).await)
}
