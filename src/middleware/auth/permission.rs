//! Permission gate: per-route check of the `permissions` claim.
//!
//! Wraps a handler with "required permission + next handler" and must sit
//! behind the bearer guard: it reads the `VerifiedClaims` the guard stored. Every path that is not an exact match fails
//! closed with 403; the wrapped handler's response passes through untouched.

use std::sync::Arc;

use axum::{
    body::Body,
    extract::State,
    http::Request,
    middleware::{self, Next},
    response::Response,
    routing::MethodRouter,
};

use crate::error::{AppError, PERMISSION_DENIED};
use crate::services::auth::VerifiedClaims;
use crate::state::AppState;

#[derive(Clone, Debug)]
struct RequiredPermission(Arc<str>);

/// Gate `handler` on `permission`.
///
/// ```ignore
/// .route(
///     "/messages",
///     permission::require(get(list_messages), "read:messages")
///         .merge(permission::require(post(create_message), "write:messages")),
/// )
/// ```
pub fn require(handler: MethodRouter<AppState>, permission: &str) -> MethodRouter<AppState> {
    handler.route_layer(middleware::from_fn_with_state(
        RequiredPermission(Arc::from(permission)),
        permission_middleware,
    ))
}

/// Allow only when `required` is literally one of the caller's permissions.
pub fn check_permission(claims: Option<&VerifiedClaims>, required: &str) -> Result<(), AppError> {
    let Some(claims) = claims else {
        // Gate mounted without the bearer guard in front of it.
        tracing::error!(permission = required, "permission gate reached without verified claims");
        return Err(AppError::Forbidden(PERMISSION_DENIED));
    };

    if claims.has_permission(required) {
        return Ok(());
    }

    tracing::warn!(
        permission = required,
        sub = claims.subject().unwrap_or("-"),
        has_permissions_claim = claims.permissions().is_some(),
        "permission denied"
    );
    Err(AppError::Forbidden(PERMISSION_DENIED))
}

async fn permission_middleware(
    State(required): State<RequiredPermission>,
    req: Request<Body>,
    next: Next,
) -> Result<Response, AppError> {
    check_permission(req.extensions().get::<VerifiedClaims>(), &required.0)?;

    Ok(next.run(req).await)
}
