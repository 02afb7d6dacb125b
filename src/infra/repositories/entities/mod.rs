//! SeaORM entity definitions
//!
//! These are database-specific entities separate from domain models.

pub mod product;
pub mod revoked_token;
pub mod user;
