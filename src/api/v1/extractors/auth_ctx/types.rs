/*
 * Responsibility
 * - Types handlers see after the bearer guard accepted a request
 * - The guard inserts Credentials into request extensions; extractors read them back
 *
 * Notes
 * - Verification lives in services/auth; this file is only the contract
 */

/// Authorization header of a request the bearer guard verified.
///
/// `scheme` is always exactly `"Bearer"`. The raw token is redacted in `Debug`.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub scheme: String,
    pub token: String,
}

impl Credentials {
    pub fn bearer(token: impl Into<String>) -> Self {
        Self {
            scheme: "Bearer".to_string(),
            token: token.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Do not print the token
        f.debug_struct("Credentials")
            .field("scheme", &self.scheme)
            .finish_non_exhaustive()
    }
}
