//! JSON body extractors - deserialization with the API's error shape, and
//! deserialization combined with validation.

use axum::{
    async_trait,
    extract::{rejection::JsonRejection, FromRequest, Request},
    Json,
};
use serde::de::DeserializeOwned;

use crate::domain::Validate;
use crate::errors::AppError;

/// Deserializes the body as `T` without running any rules.
///
/// A body that is not JSON, or not an object of the expected shape, is a
/// validation failure on `body` rather than axum's plain-text rejection.
/// Handlers that need to combine field rules with their own checks take
/// this and call [`Validate::validate`] themselves.
pub struct JsonBody<T>(pub T);

#[async_trait]
impl<S, T> FromRequest<S> for JsonBody<T>
where
    S: Send + Sync,
    T: DeserializeOwned,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(|e| AppError::validation("body", e.body_text()))?;

        Ok(JsonBody(value))
    }
}

/// Deserializes the body as `T` and runs its [`Validate`] rules, handing the
/// handler the validated form `T::Valid`.
///
/// # Example
///
/// ```rust,ignore
/// async fn create(ValidatedJson(draft): ValidatedJson<ProductRequest>) {
///     // every field of `draft` is present and checked
/// }
/// ```
pub struct ValidatedJson<T: Validate>(pub T::Valid);

#[async_trait]
impl<S, T> FromRequest<S> for ValidatedJson<T>
where
    S: Send + Sync,
    T: DeserializeOwned + Validate,
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let JsonBody(value) = JsonBody::<T>::from_request(req, state).await?;

        Ok(ValidatedJson(value.validate()?))
    }
}
