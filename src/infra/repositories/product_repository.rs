//! Product repository.
//!
//! Every query takes the owning user's id and filters on it, so a product
//! belonging to someone else is indistinguishable from one that does not
//! exist.

use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use super::entities::product::{self, ActiveModel, Entity as ProductEntity};
use crate::domain::{Product, ProductDraft};
use crate::errors::{AppError, AppResult};

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Owner-scoped product persistence.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait ProductRepository: Send + Sync {
    /// All products owned by `owner_id`, oldest first
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Product>>;

    /// Product `id` if it is owned by `owner_id`
    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Product>>;

    /// Insert a new product owned by `owner_id`
    async fn create(&self, owner_id: Uuid, draft: ProductDraft) -> AppResult<Product>;

    /// Overwrite product `id` if owned by `owner_id`; `None` otherwise
    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<Option<Product>>;

    /// Delete product `id` if owned by `owner_id`; returns whether a row went away
    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool>;
}

/// SeaORM-backed product repository
pub struct ProductStore {
    db: DatabaseConnection,
}

impl ProductStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }

    async fn find_model(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<product::Model>> {
        ProductEntity::find_by_id(id)
            .filter(product::Column::UserId.eq(owner_id))
            .one(&self.db)
            .await
            .map_err(AppError::from)
    }
}

#[async_trait]
impl ProductRepository for ProductStore {
    async fn list_by_owner(&self, owner_id: Uuid) -> AppResult<Vec<Product>> {
        let models = ProductEntity::find()
            .filter(product::Column::UserId.eq(owner_id))
            .order_by_asc(product::Column::CreatedAt)
            .all(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(models.into_iter().map(Product::from).collect())
    }

    async fn find_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<Option<Product>> {
        Ok(self.find_model(owner_id, id).await?.map(Product::from))
    }

    async fn create(&self, owner_id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        let now = chrono::Utc::now();
        let active_model = ActiveModel {
            id: Set(Uuid::new_v4()),
            user_id: Set(owner_id),
            name: Set(draft.name),
            company: Set(draft.company),
            price: Set(draft.price),
            quantity: Set(draft.quantity),
            created_at: Set(now),
            updated_at: Set(now),
        };

        let model = active_model
            .insert(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(Product::from(model))
    }

    async fn update_owned(
        &self,
        owner_id: Uuid,
        id: Uuid,
        draft: ProductDraft,
    ) -> AppResult<Option<Product>> {
        let Some(existing) = self.find_model(owner_id, id).await? else {
            return Ok(None);
        };

        let mut active: ActiveModel = existing.into();
        active.name = Set(draft.name);
        active.company = Set(draft.company);
        active.price = Set(draft.price);
        active.quantity = Set(draft.quantity);
        active.updated_at = Set(chrono::Utc::now());

        let model = active.update(&self.db).await.map_err(AppError::from)?;
        Ok(Some(Product::from(model)))
    }

    async fn delete_owned(&self, owner_id: Uuid, id: Uuid) -> AppResult<bool> {
        let result = ProductEntity::delete_many()
            .filter(product::Column::Id.eq(id))
            .filter(product::Column::UserId.eq(owner_id))
            .exec(&self.db)
            .await
            .map_err(AppError::from)?;

        Ok(result.rows_affected > 0)
    }
}
