//! Product service - CRUD on products owned by the caller.
//!
//! Every method takes the caller's id as `owner_id` and passes it down to
//! the repository. A product owned by someone else reports as not found on
//! read, update and delete alike.

use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

use crate::config::MSG_PRODUCT_NOT_FOUND;
use crate::domain::{Product, ProductDraft};
use crate::errors::{AppResult, OptionExt};
use crate::infra::Repositories;

/// Product service trait for dependency injection.
#[async_trait]
pub trait ProductService: Send + Sync {
    async fn list(&self, owner_id: Uuid) -> AppResult<Vec<Product>>;

    async fn create(&self, owner_id: Uuid, draft: ProductDraft) -> AppResult<Product>;

    async fn show(&self, owner_id: Uuid, id: Uuid) -> AppResult<Product>;

    async fn update(&self, owner_id: Uuid, id: Uuid, draft: ProductDraft) -> AppResult<Product>;

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()>;
}

/// Concrete implementation of ProductService.
pub struct ProductManager<R: Repositories> {
    repos: Arc<R>,
}

impl<R: Repositories> ProductManager<R> {
    pub fn new(repos: Arc<R>) -> Self {
        Self { repos }
    }
}

#[async_trait]
impl<R: Repositories> ProductService for ProductManager<R> {
    async fn list(&self, owner_id: Uuid) -> AppResult<Vec<Product>> {
        self.repos.products().list_by_owner(owner_id).await
    }

    async fn create(&self, owner_id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        let product = self.repos.products().create(owner_id, draft).await?;
        tracing::info!(product_id = %product.id, owner_id = %owner_id, "Product created");
        Ok(product)
    }

    async fn show(&self, owner_id: Uuid, id: Uuid) -> AppResult<Product> {
        self.repos
            .products()
            .find_owned(owner_id, id)
            .await?
            .ok_or_not_found(MSG_PRODUCT_NOT_FOUND)
    }

    async fn update(&self, owner_id: Uuid, id: Uuid, draft: ProductDraft) -> AppResult<Product> {
        let product = self
            .repos
            .products()
            .update_owned(owner_id, id, draft)
            .await?
            .ok_or_not_found(MSG_PRODUCT_NOT_FOUND)?;

        tracing::info!(product_id = %id, owner_id = %owner_id, "Product updated");
        Ok(product)
    }

    async fn delete(&self, owner_id: Uuid, id: Uuid) -> AppResult<()> {
        let deleted = self.repos.products().delete_owned(owner_id, id).await?;
        deleted.then_some(()).ok_or_not_found(MSG_PRODUCT_NOT_FOUND)?;

        tracing::info!(product_id = %id, owner_id = %owner_id, "Product deleted");
        Ok(())
    }
}
