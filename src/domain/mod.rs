//! Domain layer - Core business entities and logic
//!
//! Users, their products, password hashing, and the field validation
//! vocabulary shared by every request type. Nothing here touches the
//! database or HTTP.

pub mod password;
pub mod product;
pub mod user;
pub mod validation;

pub use password::Password;
pub use product::{Product, ProductDraft};
pub use user::{User, UserResponse};
pub use validation::{FieldError, FieldErrors, Rules, Validate};
