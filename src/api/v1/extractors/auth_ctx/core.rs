use axum::extract::FromRequestParts;
use axum::http::request::Parts;

use crate::error::{AppError, NO_CREDENTIALS};
use crate::services::auth::VerifiedClaims;
use crate::state::AppState;

use super::Credentials;

/// Credentials the bearer guard stored in `request.extensions()`.
/// Missing means the route is not behind the guard: 401.
pub struct BearerCredentials(pub Credentials);

impl FromRequestParts<AppState> for BearerCredentials {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<Credentials>()
            .cloned()
            .map(BearerCredentials)
            .ok_or(AppError::Unauthorized(NO_CREDENTIALS))
    }
}

/// Claims the verifier returned for this request's token.
///
/// Only the bearer guard inserts `VerifiedClaims`; without it: 401.
pub struct UserClaims(pub VerifiedClaims);

impl FromRequestParts<AppState> for UserClaims {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        _state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<VerifiedClaims>()
            .cloned()
            .map(UserClaims)
            .ok_or(AppError::Unauthorized(NO_CREDENTIALS))
    }
}
