/*
 * Responsibility
 * - GET /me: who the bearer token says the caller is (guard only, no permission)
 * - Display only, so it reads the guard-accepted token with claims_of instead
 *   of asking for VerifiedClaims
 */
use axum::Json;

use crate::{
    api::v1::{dto::me::MeResponse, extractors::BearerCredentials},
    error::AppError,
    services::auth::claims_of,
};

pub async fn me(
    BearerCredentials(credentials): BearerCredentials,
) -> Result<Json<MeResponse>, AppError> {
    let claims = claims_of(&credentials.token)?;

    let permissions = claims
        .permissions()
        .unwrap_or_default()
        .into_iter()
        .map(str::to_string)
        .collect();

    Ok(Json(MeResponse {
        sub: claims.subject().map(str::to_string),
        permissions,
    }))
}
