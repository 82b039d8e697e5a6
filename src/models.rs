// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # API Data Models
//!
//! Request and response bodies of the HTTP API. Every response is wrapped in
//! the same envelope:
//!
//! ```json
//! { "status": "ok", "msg": "Login successful.", "data": { ... } }
//! ```
//!
//! Token fields keep the identity provider's PascalCase names so clients can
//! pass them through unchanged.

use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;
use utoipa::ToSchema;

use crate::{auth::TokenClaims, providers::TokenBundle};

// =============================================================================
// Envelope
// =============================================================================

#[derive(Debug, Clone, Copy, Serialize, Deserialize, ToSchema, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ResponseStatus {
    Ok,
    Error,
}

/// Standard response envelope.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    pub status: ResponseStatus,
    /// Human-readable outcome
    pub msg: String,
    pub data: T,
}

impl<T> ApiResponse<T> {
    pub fn ok(msg: impl Into<String>, data: T) -> Self {
        Self {
            status: ResponseStatus::Ok,
            msg: msg.into(),
            data,
        }
    }
}

/// Empty `data` object.
#[derive(Debug, Clone, Default, Serialize, ToSchema, PartialEq, Eq)]
pub struct EmptyData {}

/// Error envelope as documented in OpenAPI; rendered by `ApiError`.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub status: ResponseStatus,
    pub msg: String,
    #[schema(value_type = Object)]
    pub data: Value,
}

// =============================================================================
// Requests
// =============================================================================

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct LoginRequest {
    pub username: String,
    /// Numbers are accepted and converted to text
    #[serde(deserialize_with = "string_or_number")]
    pub password: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RegistrationRequest {
    pub username: String,
    #[serde(deserialize_with = "string_or_number")]
    pub password: String,
    pub email: String,
    pub name: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ConfirmSignUpRequest {
    pub username: String,
    /// Code delivered to the user; numbers are accepted
    #[serde(deserialize_with = "string_or_number")]
    pub confirmation_code: String,
    /// Session issued alongside the code, if any
    #[serde(default)]
    pub session: Option<String>,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct ResetPasswordRequest {
    pub email: String,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct RefreshRequest {
    pub username: String,
    #[serde(rename = "refreshToken")]
    pub refresh_token: String,
}

/// Body of the protected endpoint.
///
/// `token` is used only when no `Authorization` header is sent.
#[derive(Debug, Clone, Default, Deserialize, ToSchema)]
pub struct ProtectedRequest {
    #[serde(default)]
    pub token: Option<String>,
}

// =============================================================================
// Response data
// =============================================================================

/// Tokens plus the profile read from the verified ID token.
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct LoginData {
    #[serde(flatten)]
    pub tokens: TokenBundle,
    pub email: Option<String>,
    pub name: Option<String>,
    /// Subject of the ID token
    pub username: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct ProtectedData {
    /// Verified token claims
    #[schema(value_type = Object)]
    pub user: TokenClaims,
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    match Value::deserialize(deserializer)? {
        Value::String(text) => Ok(text),
        Value::Number(number) => Ok(number.to_string()),
        other => Err(de::Error::custom(format!(
            "expected a string or number, found {other}"
        ))),
    }
}
