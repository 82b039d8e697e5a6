// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token extraction.
//!
//! The protected endpoint takes its token from the `Authorization` header or,
//! when the header is absent, from the request body:
//!
//! ```rust,ignore
//! async fn handler(
//!     AuthorizationHeader(header): AuthorizationHeader,
//!     Json(body): Json<ProtectedRequest>,
//! ) -> Result<_, AuthError> {
//!     let token = resolve_bearer_token(header.as_deref(), Some(&body.token))?;
//! }
//! ```

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use super::AuthError;

/// Raw `Authorization` header value, if the request has one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthorizationHeader(pub Option<String>);

impl<S> FromRequestParts<S> for AuthorizationHeader
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(AUTHORIZATION) else {
            return Ok(AuthorizationHeader(None));
        };

        let value = value.to_str().map_err(|_| AuthError::InvalidAuthHeader)?;
        Ok(AuthorizationHeader(Some(value.to_string())))
    }
}

/// Parse `Bearer <token>`.
///
/// The value must split into exactly two whitespace-separated parts and the
/// scheme is matched case-insensitively.
pub fn parse_bearer(value: &str) -> Result<&str, AuthError> {
    let mut parts = value.split_whitespace();
    match (parts.next(), parts.next(), parts.next()) {
        (Some(scheme), Some(token), None) if scheme.eq_ignore_ascii_case("bearer") => Ok(token),
        _ => Err(AuthError::InvalidAuthHeader),
    }
}

/// Pick the token from the header, falling back to the body token.
///
/// A non-blank header always wins, even when malformed. A blank header counts
/// as absent.
pub fn resolve_bearer_token<'a>(
    header: Option<&'a str>,
    body_token: Option<&'a str>,
) -> Result<&'a str, AuthError> {
    match header.filter(|value| !value.trim().is_empty()) {
        Some(value) => parse_bearer(value),
        None => match body_token.map(str::trim) {
            Some(token) if !token.is_empty() => {
                if token.split_whitespace().count() == 1 {
                    Ok(token)
                } else {
                    Err(AuthError::InvalidAuthHeader)
                }
            }
            _ => Err(AuthError::MissingAuthHeader),
        },
    }
}
