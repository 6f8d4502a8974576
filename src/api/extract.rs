use axum::{
    async_trait,
    extract::{FromRequest, FromRequestParts, Path, Request},
    http::request::Parts,
    Json,
};
use serde::de::DeserializeOwned;

use crate::api::validation::Validate;
use crate::error::ApiError;

/// JSON body that has passed its [`Validate`] constraints.
///
/// Decode failures and constraint violations both surface as [`ApiError`],
/// so every body-accepting route reports them the same way.
#[derive(Debug)]
pub struct ValidatedJson<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;

        if let Err(violations) = value.validate() {
            let err = ApiError::Validation(violations);
            tracing::error!("Request body validation failed: {}", err);
            return Err(err);
        }

        Ok(Self(value))
    }
}

/// `{personId}` path segment as a 32-bit integer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PersonId(pub i32);

#[async_trait]
impl<S> FromRequestParts<S> for PersonId
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(id) = Path::<i32>::from_request_parts(parts, state).await?;
        Ok(Self(id))
    }
}
