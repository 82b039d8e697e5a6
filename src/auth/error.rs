// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Authentication errors.

use axum::response::{IntoResponse, Response};

use crate::error::ApiError;

/// Message returned for every token that fails verification.
pub const INVALID_TOKEN_MESSAGE: &str = "Invalid or expired token";

/// Uniform verdict for a token that did not verify.
///
/// Carries no reason; the verifier logs the failed check at debug level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Invalid or expired token")]
pub struct InvalidToken;

/// Authentication error type.
///
/// The token variants describe why verification failed. They stay inside the
/// crate: `TokenVerifier` collapses them into [`InvalidToken`] and HTTP
/// responses render them all with the same message.
#[derive(Debug, thiserror::Error)]
pub enum AuthError {
    /// No authorization header or body token present
    #[error("Authorization header missing")]
    MissingAuthHeader,
    /// Authorization header is not `Bearer <token>`
    #[error("Authorization header must be Bearer token")]
    InvalidAuthHeader,
    /// Header or payload could not be decoded
    #[error("Token is malformed")]
    MalformedToken,
    /// Header has no `kid`
    #[error("Token header has no key identifier")]
    MissingKeyId,
    /// Header `alg` is not the allowed algorithm
    #[error("Token algorithm is not allowed")]
    InvalidAlgorithm,
    /// Token signature is invalid
    #[error("Token signature is invalid")]
    InvalidSignature,
    /// Token has expired
    #[error("Token has expired")]
    TokenExpired,
    /// Token issuer is invalid
    #[error("Token issuer is invalid")]
    InvalidIssuer,
    /// Token audience is invalid
    #[error("Token audience is invalid")]
    InvalidAudience,
    /// JWKS fetch failed
    #[error("Failed to fetch JWKS: {0}")]
    JwksFetchError(String),
    /// No matching key in JWKS, even after a refetch
    #[error("No matching key found in JWKS")]
    NoMatchingKey,
    /// Matching JWK cannot verify RS256 signatures
    #[error("Unsupported key in JWKS: {0}")]
    UnsupportedKey(String),
    /// Collapsed verification failure
    #[error(transparent)]
    InvalidToken(#[from] InvalidToken),
}

impl AuthError {
    /// Get the error code for this error.
    pub fn error_code(&self) -> &'static str {
        match self {
            AuthError::MissingAuthHeader => "missing_auth_header",
            AuthError::InvalidAuthHeader => "invalid_auth_header",
            AuthError::MalformedToken => "malformed_token",
            AuthError::MissingKeyId => "missing_key_id",
            AuthError::InvalidAlgorithm => "invalid_algorithm",
            AuthError::InvalidSignature => "invalid_signature",
            AuthError::TokenExpired => "token_expired",
            AuthError::InvalidIssuer => "invalid_issuer",
            AuthError::InvalidAudience => "invalid_audience",
            AuthError::JwksFetchError(_) => "jwks_fetch_error",
            AuthError::NoMatchingKey => "no_matching_key",
            AuthError::UnsupportedKey(_) => "unsupported_key",
            AuthError::InvalidToken(_) => "invalid_token",
        }
    }

    /// Message safe to show to the caller.
    pub fn public_message(&self) -> String {
        match self {
            AuthError::MissingAuthHeader | AuthError::InvalidAuthHeader => self.to_string(),
            _ => INVALID_TOKEN_MESSAGE.to_string(),
        }
    }
}

impl From<jsonwebtoken::errors::Error> for AuthError {
    fn from(e: jsonwebtoken::errors::Error) -> Self {
        use jsonwebtoken::errors::ErrorKind;

        match e.kind() {
            ErrorKind::ExpiredSignature => AuthError::TokenExpired,
            ErrorKind::InvalidSignature => AuthError::InvalidSignature,
            ErrorKind::InvalidIssuer => AuthError::InvalidIssuer,
            ErrorKind::InvalidAudience => AuthError::InvalidAudience,
            ErrorKind::InvalidAlgorithm | ErrorKind::InvalidAlgorithmName => {
                AuthError::InvalidAlgorithm
            }
            _ => AuthError::MalformedToken,
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        ApiError::unauthorized(self.public_message()).into_response()
    }
}
