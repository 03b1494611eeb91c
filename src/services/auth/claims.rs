/*
 * Responsibility
 * - Types on both sides of the trust boundary:
 *   - UnverifiedHeader: kid/alg read from a token before anything is checked
 *   - VerifiedClaims: payload that passed signature + alg + aud + iss + exp
 * - DecodedClaims: payload read by claims_of() without any check
 * - claims_of(): decode-only access to the payload of an already verified token
 */
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::Algorithm;
use serde_json::{Map, Value};
use thiserror::Error;

/// Header fields read *without* verification.
///
/// Only good for choosing which key and algorithm to try. There is no way to
/// turn this into claims; that takes a full `TokenVerifier::verify`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnverifiedHeader {
    pub kid: String,
    pub alg: Algorithm,
}

/// Claims of a token that passed full verification.
///
/// Only `TokenVerifier::verify` constructs this. The bearer guard stores it in
/// request extensions for the permission gate and the `UserClaims` extractor.
#[derive(Debug, Clone, PartialEq)]
pub struct VerifiedClaims(Map<String, Value>);

impl VerifiedClaims {
    pub(super) fn new(claims: Map<String, Value>) -> Self {
        Self(claims)
    }

    pub fn subject(&self) -> Option<&str> {
        subject_of(&self.0)
    }

    /// The `permissions` claim, if present and shaped as an array.
    ///
    /// Non-string entries are skipped; they can never match a permission.
    pub fn permissions(&self) -> Option<Vec<&str>> {
        permissions_of(&self.0)
    }

    pub fn has_permission(&self, permission: &str) -> bool {
        self.permissions()
            .is_some_and(|perms| perms.contains(&permission))
    }
}

/// Payload read by `claims_of`. Nothing in it has been checked.
///
/// Fine for display once the guard accepted the same token; never an input to
/// an authorization decision.
#[derive(Debug, Clone, PartialEq)]
pub struct DecodedClaims(Map<String, Value>);

impl DecodedClaims {
    pub fn subject(&self) -> Option<&str> {
        subject_of(&self.0)
    }

    pub fn permissions(&self) -> Option<Vec<&str>> {
        permissions_of(&self.0)
    }
}

fn subject_of(claims: &Map<String, Value>) -> Option<&str> {
    claims.get("sub").and_then(Value::as_str)
}

fn permissions_of(claims: &Map<String, Value>) -> Option<Vec<&str>> {
    claims
        .get("permissions")?
        .as_array()
        .map(|items| items.iter().filter_map(Value::as_str).collect())
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ClaimsError {
    #[error("token is not a three-part JWS compact serialization")]
    Format,
    #[error("payload is not base64url")]
    Base64,
    #[error("payload is not a JSON object")]
    Json,
}

/// Decode the payload of `token` **without** checking signature or expiry.
///
/// Decode-only, trust-on-prior-verification: call this only with a token the
/// bearer guard verified earlier on the same request (`BearerCredentials`).
/// The result is a `DecodedClaims`, so it cannot stand in for `VerifiedClaims`.
pub fn claims_of(token: &str) -> Result<DecodedClaims, ClaimsError> {
    let mut parts = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) =
        (parts.next(), parts.next(), parts.next(), parts.next())
    else {
        return Err(ClaimsError::Format);
    };

    let bytes = URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|_| ClaimsError::Base64)?;

    match serde_json::from_slice::<Value>(&bytes) {
        Ok(Value::Object(map)) => Ok(DecodedClaims(map)),
        _ => Err(ClaimsError::Json),
    }
}
