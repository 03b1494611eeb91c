pub mod claims;
pub mod factory;
pub mod jwks;
pub mod verifier;

pub use claims::{ClaimsError, VerifiedClaims, claims_of};
pub use factory::build_token_verifier;
pub use verifier::{TokenVerifier, VerificationError};
