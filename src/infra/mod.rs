//! Infrastructure layer - External systems integration
//!
//! This module handles all external system concerns:
//! - Database connection and migrations
//! - SeaORM entities and repositories
//! - The repository registry handed to services

pub mod db;
pub mod persistence;
pub mod repositories;

pub use db::{Database, Migrator};
pub use persistence::{Persistence, Repositories};
pub use repositories::{
    ProductRepository, ProductStore, RevokedTokenRepository, RevokedTokenStore, UserRepository,
    UserStore,
};
