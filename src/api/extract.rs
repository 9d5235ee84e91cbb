//! Bearer-token request extractor
//!
//! Adding an [`AuthUser`] parameter to a handler makes the route protected:
//! the token is read from the `Authorization` header and resolved through
//! the auth service before the handler body runs. No token → 401; a token
//! that does not resolve → 403. Both fail closed.

use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;

use super::AppState;
use crate::auth::AuthUser;
use crate::core::error::AppError;

#[async_trait]
impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, AppError> {
        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .and_then(|value| value.strip_prefix("Bearer "))
            .ok_or(AppError::Unauthorized("Access denied. No token provided."))?;

        state.auth.authenticate(token)
    }
}
