/*
 * Responsibility
 * - App-wide AppError
 * - IntoResponse (HTTP status / JSON error body)
 * - Map verification failures to short, non-leaky 401 details
 */
use axum::{
    Json,
    http::{HeaderValue, StatusCode, header},
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::services::auth::{ClaimsError, VerificationError};

pub const NO_CREDENTIALS: &str = "No credentials";
pub const INVALID_SCHEME: &str = "Invalid authentication scheme";
pub const INVALID_TOKEN: &str = "Invalid token";
pub const PERMISSION_DENIED: &str = "You do not have permission to access this resource";

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub code: &'static str,
    pub message: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{code}: {message}")]
    BadRequest { code: &'static str, message: String },
    #[error("{0}")]
    Unauthorized(&'static str),
    #[error("{0}")]
    Forbidden(&'static str),
    #[error("internal server error")]
    Internal,
}

impl AppError {
    pub fn bad_request(code: &'static str, message: impl Into<String>) -> Self {
        Self::BadRequest {
            code,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (code, message) = match self {
            AppError::BadRequest { code, message } => (code, message),
            AppError::Unauthorized(detail) => ("UNAUTHORIZED", detail.to_string()),
            AppError::Forbidden(detail) => ("FORBIDDEN", detail.to_string()),
            AppError::Internal => ("INTERNAL_SERVER_ERROR", "internal server error".into()),
        };

        let body = ErrorResponse {
            error: ErrorBody { code, message },
        };

        let mut response = (status, Json(body)).into_response();
        if status == StatusCode::UNAUTHORIZED {
            response
                .headers_mut()
                .insert(header::WWW_AUTHENTICATE, HeaderValue::from_static("Bearer"));
        }
        response
    }
}

impl From<VerificationError> for AppError {
    fn from(e: VerificationError) -> Self {
        // Crypto and transport details stay in the logs.
        match e {
            VerificationError::KeyNotFound { .. } => AppError::Unauthorized("JWK public key not found"),
            VerificationError::ExpiredToken => AppError::Unauthorized("Token expired"),
            VerificationError::InvalidAudience => AppError::Unauthorized("Invalid audience"),
            VerificationError::InvalidIssuer => AppError::Unauthorized("Invalid issuer"),
            VerificationError::MalformedToken
            | VerificationError::KeyFetchFailed(_)
            | VerificationError::UnsupportedKey
            | VerificationError::InvalidSignature
            | VerificationError::InvalidToken(_) => AppError::Unauthorized(INVALID_TOKEN),
        }
    }
}

impl From<ClaimsError> for AppError {
    fn from(e: ClaimsError) -> Self {
        tracing::warn!(error = ?e, "cannot decode claims of accepted token");
        AppError::Unauthorized(INVALID_TOKEN)
    }
}
