//! Caller identity extractor.
//!
//! Token verification happens upstream (an identity-provider collaborator);
//! this service trusts the `X-User-Id` header that collaborator installs
//! and never parses credentials itself. The extracted string is the `owner`
//! every store query is scoped by.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::http::error::AppError;

/// Authenticated caller identifier, taken from the `X-User-Id` header.
#[derive(Debug)]
pub struct CallerIdentity(pub String);

impl<S: Send + Sync> FromRequestParts<S> for CallerIdentity {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let value = parts
            .headers
            .get("x-user-id")
            .ok_or_else(|| AppError::Unauthorized("missing caller identity".to_string()))?;

        let owner = value
            .to_str()
            .map_err(|_| AppError::Unauthorized("invalid caller identity encoding".to_string()))?
            .trim();

        if owner.is_empty() {
            return Err(AppError::Unauthorized("missing caller identity".to_string()));
        }

        Ok(CallerIdentity(owner.to_string()))
    }
}
