//! Shared fixtures for unit and router tests.
//!
//! - `trusted_rsa.pem` is the private half of the key published as `TRUSTED_KID`.
//! - `rogue_rsa.pem` is never published; tokens signed with it must fail.

use std::sync::Arc;

use async_trait::async_trait;
use base64::Engine as _;
use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use jsonwebtoken::{Algorithm, EncodingKey, Header};
use serde_json::{Value, json};

use crate::services::auth::jwks::{KeyFetchError, KeyResolver, KeySet, KeySource};
use crate::services::auth::VerifiedClaims;
use crate::services::auth::verifier::TokenVerifier;

pub const TRUSTED_KID: &str = "abc";
pub const AUDIENCE: &str = "my-api";
pub const ISSUER: &str = "https://issuer.example";

pub const TRUSTED_PEM: &str = include_str!("fixtures/trusted_rsa.pem");
pub const ROGUE_PEM: &str = include_str!("fixtures/rogue_rsa.pem");

/// Base64url modulus of `trusted_rsa.pem`.
pub const TRUSTED_N: &str = "sZvHSttSuNAJs6_wABmJutbHIDO_N0wZ7B1t5sBV8c1e92D945pcAkbvnfuY4iRJ1oNSShMn8M7lA7LvBtUyviiCEslGNiaPYNldRW0922IrM6z96VheV4FplMC5P6ICeaJCD9zMB7mT0_idk1wfNL-eiqQIcdlQyf8ruxZsTXn1e7UVoCe3r053nR8rBrl1KetkNpty0GUcx3q06H4OD15HIDCEd_6u9tXsdtDBee_lArodYU8SWs3GpgJQBQfJ6Ue4YGWpQ6sEhPn6zVc8fzMmnwD3meglGZqkYlnjablWosi4kTWXgI-YWGoQ5VyOObD0aCG_SFLMSGCpDDIyHQ";

pub fn now() -> i64 {
    chrono::Utc::now().timestamp()
}

pub fn trusted_jwk_json() -> Value {
    json!({
        "kid": TRUSTED_KID,
        "kty": "RSA",
        "alg": "RS256",
        "use": "sig",
        "n": TRUSTED_N,
        "e": "AQAB",
    })
}

pub fn jwks_json() -> Value {
    json!({ "keys": [trusted_jwk_json()] })
}

/// Claims that pass every check of `static_verifier()`.
pub fn valid_claims() -> Value {
    json!({
        "sub": "user-1",
        "aud": AUDIENCE,
        "iss": ISSUER,
        "exp": now() + 3600,
        "permissions": ["read"],
    })
}

pub fn claims_with_permissions(permissions: &[&str]) -> Value {
    let mut claims = valid_claims();
    claims["permissions"] = json!(permissions);
    claims
}

pub fn sign(claims: &Value) -> String {
    sign_with(claims, Algorithm::RS256, Some(TRUSTED_KID), TRUSTED_PEM)
}

pub fn sign_with(claims: &Value, alg: Algorithm, kid: Option<&str>, pem: &str) -> String {
    let mut header = Header::new(alg);
    header.kid = kid.map(str::to_string);

    let key = EncodingKey::from_rsa_pem(pem.as_bytes()).unwrap();
    jsonwebtoken::encode(&header, claims, &key).unwrap()
}

/// Replace the header segment, keeping payload and signature.
pub fn with_header(token: &str, header: &Value) -> String {
    let (_, rest) = token.split_once('.').unwrap();
    format!("{}.{rest}", URL_SAFE_NO_PAD.encode(header.to_string()))
}

/// Replace the payload segment, keeping header and signature.
pub fn with_payload(token: &str, payload: &Value) -> String {
    let mut parts: Vec<String> = token.split('.').map(str::to_string).collect();
    parts[1] = URL_SAFE_NO_PAD.encode(payload.to_string());
    parts.join(".")
}

/// Fixed, in-memory key set.
#[derive(Clone, Debug)]
pub struct StaticJwks(pub KeySet);

impl StaticJwks {
    pub fn from_json(jwks: Value) -> Self {
        Self(serde_json::from_value(jwks).unwrap())
    }
}

#[async_trait]
impl KeySource for StaticJwks {
    async fn fetch(&self) -> Result<KeySet, KeyFetchError> {
        Ok(self.0.clone())
    }
}

pub fn static_key_resolver() -> KeyResolver {
    KeyResolver::new(Arc::new(StaticJwks::from_json(jwks_json())))
}

pub fn static_verifier() -> TokenVerifier {
    TokenVerifier::new(static_key_resolver(), AUDIENCE, ISSUER, 60)
}

/// Claims as the guard would store them after verifying `claims`.
pub async fn verified(claims: &Value) -> VerifiedClaims {
    static_verifier().verify(&sign(claims)).await.unwrap()
}
