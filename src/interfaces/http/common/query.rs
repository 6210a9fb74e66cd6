//! Query-string extractor that reports failures in the standard envelope
//!
//! `ApiQuery<T>` works like `axum::extract::Query<T>`; a query string that
//! does not deserialize becomes a 400 `{"status": "fail", ...}` response
//! instead of axum's plain-text rejection.

use axum::extract::{FromRequestParts, Query};
use axum::http::request::Parts;
use serde::de::DeserializeOwned;

use crate::shared::errors::DomainError;

pub struct ApiQuery<T>(pub T);

impl<S, T> FromRequestParts<S> for ApiQuery<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = DomainError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                DomainError::BadRequest(format!("Invalid query: {}", rejection.body_text()))
            })?;
        Ok(ApiQuery(value))
    }
}
