//! Token service - Issues, resolves and revokes bearer tokens.
//!
//! Tokens are HS256 JWTs. Each carries a random `jti` so a single token can
//! be revoked on logout without touching the user's other sessions.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Duration, TimeZone, Utc};
use jsonwebtoken::{
    decode, encode, errors::ErrorKind, DecodingKey, EncodingKey, Header, Validation,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::config::{
    Config, MSG_LOGOUT_FAILED, MSG_TOKEN_NOT_CREATED, SECONDS_PER_HOUR, TOKEN_TYPE_BEARER,
};
use crate::errors::{AppError, AppResult};
use crate::infra::RevokedTokenRepository;

/// JWT claims payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,
    pub jti: Uuid,
    pub iat: i64,
    pub exp: i64,
}

/// Token handed to the client after a successful login
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct IssuedToken {
    /// Bearer token for the `Authorization` header
    #[schema(example = "eyJhbGciOiJIUzI1NiIsInR5cCI6IkpXVCJ9...")]
    pub token: String,
    /// Always "bearer"
    #[schema(example = "bearer")]
    pub token_type: String,
    /// Seconds until the token expires
    #[schema(example = 86400)]
    pub expires_in: i64,
}

/// Token capability injected into the auth service and middleware.
#[async_trait]
pub trait TokenService: Send + Sync {
    /// Issue a fresh token for `user_id`
    async fn issue(&self, user_id: Uuid) -> AppResult<IssuedToken>;

    /// Revoke `token` so it no longer resolves
    async fn invalidate(&self, token: &str) -> AppResult<()>;

    /// Resolve `token` to the user it was issued for
    async fn resolve(&self, token: &str) -> AppResult<Uuid>;
}

/// JWT implementation backed by a revocation denylist.
pub struct JwtTokenService {
    revocations: Arc<dyn RevokedTokenRepository>,
    config: Config,
}

impl JwtTokenService {
    pub fn new(revocations: Arc<dyn RevokedTokenRepository>, config: Config) -> Self {
        Self {
            revocations,
            config,
        }
    }

    /// Delete denylist rows for tokens that have expired anyway.
    pub async fn purge_expired(&self) -> AppResult<u64> {
        let removed = self.revocations.purge_expired(Utc::now()).await?;
        tracing::info!(removed, "Purged expired revoked tokens");
        Ok(removed)
    }

    /// Check signature and expiry
    fn decode(&self, token: &str) -> AppResult<Claims> {
        decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| match e.kind() {
            ErrorKind::ExpiredSignature => AppError::unauthorized("Token has expired"),
            _ => {
                tracing::debug!("Rejected token: {}", e);
                AppError::unauthorized("Token is invalid")
            }
        })
    }
}

fn expiry_of(claims: &Claims) -> DateTime<Utc> {
    Utc.timestamp_opt(claims.exp, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

#[async_trait]
impl TokenService for JwtTokenService {
    async fn issue(&self, user_id: Uuid) -> AppResult<IssuedToken> {
        let now = Utc::now();
        let expires_at = now + Duration::hours(self.config.jwt_expiration_hours);

        let claims = Claims {
            sub: user_id,
            jti: Uuid::new_v4(),
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
        };

        let token = encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret_bytes()),
        )
        .map_err(|e| AppError::token_service(MSG_TOKEN_NOT_CREATED, e))?;

        Ok(IssuedToken {
            token,
            token_type: TOKEN_TYPE_BEARER.to_string(),
            expires_in: self.config.jwt_expiration_hours * SECONDS_PER_HOUR,
        })
    }

    async fn invalidate(&self, token: &str) -> AppResult<()> {
        let claims = self.decode(token)?;

        self.revocations
            .revoke(claims.jti, claims.sub, expiry_of(&claims))
            .await
            .map_err(|e| AppError::token_service(MSG_LOGOUT_FAILED, format!("{:?}", e)))?;

        tracing::debug!(user_id = %claims.sub, jti = %claims.jti, "Token revoked");
        Ok(())
    }

    async fn resolve(&self, token: &str) -> AppResult<Uuid> {
        let claims = self.decode(token)?;

        if self.revocations.is_revoked(claims.jti).await? {
            return Err(AppError::unauthorized("Token has been revoked"));
        }

        Ok(claims.sub)
    }
}
