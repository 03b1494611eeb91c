/*
 * Responsibility
 * - Framework-independent logic (JWKS lookup, token verification, claims)
 * - Nothing in here knows about axum extractors or responses
 */
pub mod auth;
