//! Bearer guard: `Authorization: Bearer <jwt>` → verify → Credentials + VerifiedClaims in extensions.
//!
//! - No header / no token → 401 "No credentials"
//! - Scheme other than exactly `Bearer` → 401 "Invalid authentication scheme"
//! - Any verification failure → 401 with a short detail; the precise cause is logged

use axum::{
    Router,
    body::Body,
    extract::State,
    http::{HeaderMap, Request, header},
    middleware::{self, Next},
    response::Response,
};

use crate::api::v1::extractors::Credentials;
use crate::error::{AppError, INVALID_SCHEME, NO_CREDENTIALS};
use crate::state::AppState;

/// Put every route of `router` behind the bearer guard.
///
/// ```ignore
/// let protected = Router::new().route("/me", get(me));
/// let protected = middleware::auth::bearer::apply(protected, state.clone());
/// ```
pub fn apply(router: Router<AppState>, state: AppState) -> Router<AppState> {
    // route_layer: unknown paths still fall through to 404 instead of 401
    router.route_layer(middleware::from_fn_with_state(state, bearer_middleware))
}

/// Split the Authorization header into scheme and token.
///
/// The scheme comparison is case-sensitive.
pub fn extract_credentials(headers: &HeaderMap) -> Result<Credentials, AppError> {
    let value = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .ok_or(AppError::Unauthorized(NO_CREDENTIALS))?;

    let (scheme, token) = value.split_once(' ').unwrap_or((value, ""));
    let token = token.trim();

    if token.is_empty() {
        return Err(AppError::Unauthorized(NO_CREDENTIALS));
    }
    if scheme != "Bearer" {
        return Err(AppError::Unauthorized(INVALID_SCHEME));
    }

    Ok(Credentials::bearer(token))
}

async fn bearer_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    let credentials = extract_credentials(req.headers()).inspect_err(|err| {
        tracing::debug!(error = %err, "rejected authorization header");
    })?;

    let claims = state
        .verifier
        .verify(&credentials.token)
        .await
        .inspect_err(|err| tracing::warn!(error = ?err, "access token verification failed"))?;

    req.extensions_mut().insert(credentials);
    req.extensions_mut().insert(claims);

    Ok(next.run(req).await)
}
