//! Denylist of invalidated tokens.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    sea_query::OnConflict, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, Set,
};
use uuid::Uuid;

use super::entities::revoked_token::{self, ActiveModel, Entity as RevokedTokenEntity};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait RevokedTokenRepository: Send + Sync {
    /// Record `jti` as revoked. Revoking twice is not an error.
    async fn revoke(&self, jti: Uuid, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<()>;

    async fn is_revoked(&self, jti: Uuid) -> AppResult<bool>;

    /// Drop rows for tokens that expired before `now`; returns rows removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64>;
}

/// SeaORM-backed denylist
pub struct RevokedTokenStore {
    db: DatabaseConnection,
}

impl RevokedTokenStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl RevokedTokenRepository for RevokedTokenStore {
    async fn revoke(&self, jti: Uuid, user_id: Uuid, expires_at: DateTime<Utc>) -> AppResult<()> {
        let active_model = ActiveModel {
            jti: Set(jti),
            user_id: Set(user_id),
            expires_at: Set(expires_at),
            revoked_at: Set(Utc::now()),
        };

        RevokedTokenEntity::insert(active_model)
            .on_conflict(
                OnConflict::column(revoked_token::Column::Jti)
                    .do_nothing()
                    .to_owned(),
            )
            .exec_without_returning(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(())
    }

    async fn is_revoked(&self, jti: Uuid) -> AppResult<bool> {
        let found = RevokedTokenEntity::find_by_id(jti)
            .one(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(found.is_some())
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> AppResult<u64> {
        let result = RevokedTokenEntity::delete_many()
            .filter(revoked_token::Column::ExpiresAt.lt(now))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected)
    }
}
