use jsonwebtoken::errors::ErrorKind;
use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, KeyAlgorithm};
use jsonwebtoken::{Algorithm, DecodingKey, Validation};
use serde_json::{Map, Value};
use thiserror::Error;

use crate::services::auth::claims::{UnverifiedHeader, VerifiedClaims};
use crate::services::auth::jwks::{KeyFetchError, KeyResolveError, KeyResolver};

/// Algorithms a token may be signed with. Asymmetric RSA only: `none` and
/// the HMAC family are refused before any key is looked up.
const ALLOWED_ALGORITHMS: [Algorithm; 6] = [
    Algorithm::RS256,
    Algorithm::RS384,
    Algorithm::RS512,
    Algorithm::PS256,
    Algorithm::PS384,
    Algorithm::PS512,
];

#[derive(Debug, Error)]
pub enum VerificationError {
    #[error("malformed token")]
    MalformedToken,
    #[error("no JWK matches kid {kid:?}")]
    KeyNotFound { kid: String },
    #[error("failed to fetch JWK set")]
    KeyFetchFailed(#[source] KeyFetchError),
    #[error("JWK cannot be used to verify this token")]
    UnsupportedKey,
    #[error("token expired")]
    ExpiredToken,
    #[error("invalid audience")]
    InvalidAudience,
    #[error("invalid issuer")]
    InvalidIssuer,
    #[error("invalid signature")]
    InvalidSignature,
    #[error("invalid token: {0}")]
    InvalidToken(String),
}

impl From<KeyResolveError> for VerificationError {
    fn from(e: KeyResolveError) -> Self {
        match e {
            KeyResolveError::NotFound { kid } => Self::KeyNotFound { kid },
            KeyResolveError::Unusable { .. } => Self::UnsupportedKey,
            KeyResolveError::Fetch(e) => Self::KeyFetchFailed(e),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for VerificationError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        match e.kind() {
            ErrorKind::ExpiredSignature => Self::ExpiredToken,
            ErrorKind::InvalidAudience => Self::InvalidAudience,
            ErrorKind::InvalidIssuer => Self::InvalidIssuer,
            ErrorKind::InvalidSignature => Self::InvalidSignature,
            ErrorKind::MissingRequiredClaim(claim) => match claim.as_str() {
                "aud" => Self::InvalidAudience,
                "iss" => Self::InvalidIssuer,
                other => Self::InvalidToken(format!("missing required claim: {other}")),
            },
            ErrorKind::InvalidToken | ErrorKind::Base64(_) | ErrorKind::Json(_) | ErrorKind::Utf8(_) => {
                Self::MalformedToken
            }
            _ => Self::InvalidToken(e.to_string()),
        }
    }
}

/// Read `kid` and `alg` from the token header. Nothing here is trusted.
pub fn read_unverified_header(token: &str) -> Result<UnverifiedHeader, VerificationError> {
    let header = jsonwebtoken::decode_header(token).map_err(|e| {
        tracing::debug!(error = ?e, "cannot decode token header");
        VerificationError::MalformedToken
    })?;

    let kid = header
        .kid
        .filter(|kid| !kid.is_empty())
        .ok_or(VerificationError::MalformedToken)?;

    Ok(UnverifiedHeader {
        kid,
        alg: header.alg,
    })
}

/// Verifies bearer tokens against the published key set.
///
/// Holds read-only settings only; safe to share across requests behind an `Arc`.
#[derive(Debug, Clone)]
pub struct TokenVerifier {
    resolver: KeyResolver,
    audience: String,
    issuer: String,
    leeway_seconds: u64,
}

impl TokenVerifier {
    pub fn new(
        resolver: KeyResolver,
        audience: impl Into<String>,
        issuer: impl Into<String>,
        leeway_seconds: u64,
    ) -> Self {
        Self {
            resolver,
            audience: audience.into(),
            issuer: issuer.into(),
            leeway_seconds,
        }
    }

    /// Full verification: header → key lookup → signature + alg + aud + iss + exp.
    ///
    /// Claims are only returned once every check passed.
    pub async fn verify(&self, token: &str) -> Result<VerifiedClaims, VerificationError> {
        let header = read_unverified_header(token)?;

        if !ALLOWED_ALGORITHMS.contains(&header.alg) {
            return Err(VerificationError::InvalidToken(format!(
                "algorithm {:?} is not accepted",
                header.alg
            )));
        }

        let jwk = self.resolver.resolve(&header.kid).await?;
        let decoding_key = decoding_key_for(&jwk, header.alg)?;

        let data = jsonwebtoken::decode::<Map<String, Value>>(
            token,
            &decoding_key,
            &self.validation_for(header.alg),
        )?;

        Ok(VerifiedClaims::new(data.claims))
    }

    fn validation_for(&self, alg: Algorithm) -> Validation {
        // Exactly one algorithm: the one the key was selected for.
        let mut validation = Validation::new(alg);
        validation.set_audience(&[&self.audience]);
        validation.set_issuer(&[&self.issuer]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);
        validation.leeway = self.leeway_seconds;
        validation
    }
}

/// Build a decoding key from `jwk`, refusing any mismatch between the key and `alg`.
fn decoding_key_for(jwk: &Jwk, alg: Algorithm) -> Result<DecodingKey, VerificationError> {
    if !matches!(jwk.algorithm, AlgorithmParameters::RSA(_)) {
        return Err(VerificationError::UnsupportedKey);
    }

    // A JWK that pins its algorithm only verifies tokens signed with that algorithm.
    if let Some(key_alg) = &jwk.common.key_algorithm
        && signing_algorithm(key_alg) != Some(alg)
    {
        return Err(VerificationError::InvalidToken(format!(
            "token alg {alg:?} does not match key alg {key_alg:?}"
        )));
    }

    DecodingKey::from_jwk(jwk).map_err(|e| {
        tracing::warn!(error = ?e, "cannot build decoding key from JWK");
        VerificationError::UnsupportedKey
    })
}

/// The signing algorithm a JWK `alg` pins, for the algorithms we accept.
fn signing_algorithm(key_alg: &KeyAlgorithm) -> Option<Algorithm> {
    match key_alg {
        KeyAlgorithm::RS256 => Some(Algorithm::RS256),
        KeyAlgorithm::RS384 => Some(Algorithm::RS384),
        KeyAlgorithm::RS512 => Some(Algorithm::RS512),
        KeyAlgorithm::PS256 => Some(Algorithm::PS256),
        KeyAlgorithm::PS384 => Some(Algorithm::PS384),
        KeyAlgorithm::PS512 => Some(Algorithm::PS512),
        _ => None,
    }
}
