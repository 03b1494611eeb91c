/*!
 * Authentication context extractors
 *
 * Responsibility:
 * - Give handlers the credentials / claims the bearer guard accepted
 * - axum-specific code stays in core; types are split into types
 *
 * Public API:
 * - Credentials
 * - BearerCredentials, UserClaims
 */

mod core;
mod types;

pub use core::{BearerCredentials, UserClaims};
pub use types::Credentials;
