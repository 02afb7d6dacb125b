//! Product domain entity.
//!
//! A product always belongs to exactly one user; `user_id` is set at
//! creation and never changes.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product as stored and returned to its owner.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Product {
    #[schema(example = "7d3c5b1e-4f0a-4b8e-9a44-2f1e7c9d0b11")]
    pub id: Uuid,
    /// Owning user
    pub user_id: Uuid,
    #[schema(example = "Widget")]
    pub name: String,
    #[schema(example = "Acme")]
    pub company: String,
    #[schema(example = 10.0)]
    pub price: f64,
    #[schema(example = 5)]
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The four writable product fields, already validated.
#[derive(Debug, Clone, PartialEq)]
pub struct ProductDraft {
    pub name: String,
    pub company: String,
    pub price: f64,
    pub quantity: i32,
}

impl Product {
    /// Build a new product for `owner` from a validated draft.
    pub fn new(id: Uuid, owner: Uuid, draft: ProductDraft) -> Self {
        let now = Utc::now();
        Self {
            id,
            user_id: owner,
            name: draft.name,
            company: draft.company,
            price: draft.price,
            quantity: draft.quantity,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn is_owned_by(&self, user_id: Uuid) -> bool {
        self.user_id == user_id
    }

    /// Replace every writable field and bump `updated_at`.
    pub fn apply(&mut self, draft: ProductDraft) {
        self.name = draft.name;
        self.company = draft.company;
        self.price = draft.price;
        self.quantity = draft.quantity;
        self.updated_at = Utc::now();
    }
}
