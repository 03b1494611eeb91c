/// Factory: build `TokenVerifier` (and its remote key resolver) from `AuthSettings`.
use std::sync::Arc;

use crate::config::AuthSettings;
use crate::error::AppError;
use crate::services::auth::TokenVerifier;
use crate::services::auth::jwks::{KeyResolver, RemoteJwks};

pub fn build_token_verifier(settings: &AuthSettings) -> Result<Arc<TokenVerifier>, AppError> {
    let source = RemoteJwks::new(settings.jwks_url.clone(), settings.jwks_timeout).map_err(|e| {
        tracing::error!(error = ?e, "cannot build JWK set http client");
        AppError::Internal
    })?;

    let verifier = TokenVerifier::new(
        KeyResolver::new(Arc::new(source)),
        &settings.audience,
        &settings.issuer,
        settings.leeway_seconds,
    );

    Ok(Arc::new(verifier))
}
