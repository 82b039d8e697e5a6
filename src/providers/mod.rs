// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Identity provider integration.
//!
//! [`IdentityProvider`] is the seam between the auth flows and the user pool.
//! `CognitoClient` binds it to AWS Cognito; tests bind it to `StubProvider`.

use std::collections::BTreeMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::auth::SecretHash;

pub mod cognito;

#[cfg(test)]
pub(crate) mod stub;

pub use cognito::{AwsCredentials, CognitoClient, CognitoSettings};

// =============================================================================
// Provider results
// =============================================================================

/// Tokens issued by the provider, in its wire format.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct TokenBundle {
    pub access_token: String,
    /// Absent on some refresh responses
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id_token: Option<String>,
    /// Only issued by password authentication
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub refresh_token: Option<String>,
    /// Lifetime of the access token in seconds
    pub expires_in: i64,
    pub token_type: String,
}

/// Further step requested by the provider instead of issuing tokens.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct AuthChallenge {
    /// e.g. `NEW_PASSWORD_REQUIRED`
    pub challenge_name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub session: Option<String>,
    #[serde(default)]
    pub challenge_parameters: BTreeMap<String, String>,
}

/// Result of an `InitiateAuth` call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SignIn {
    Authenticated(TokenBundle),
    Challenge(AuthChallenge),
}

/// Where the confirmation code was sent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct CodeDeliveryDetails {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub attribute_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_medium: Option<String>,
    /// Masked destination, e.g. `j***@e***`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub destination: Option<String>,
}

/// Result of registering a user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "PascalCase")]
pub struct SignUpResult {
    /// Subject identifier the user's tokens will carry as `sub`
    pub user_sub: String,
    pub user_confirmed: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub code_delivery_details: Option<CodeDeliveryDetails>,
}

// =============================================================================
// Provider requests
// =============================================================================

pub struct PasswordAuthRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub secret_hash: &'a SecretHash,
}

pub struct RefreshTokenAuthRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub refresh_token: &'a str,
    pub secret_hash: &'a SecretHash,
}

/// Profile attribute attached to a new user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserAttribute {
    pub name: String,
    pub value: String,
}

impl UserAttribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

pub struct SignUpRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub password: &'a str,
    pub secret_hash: &'a SecretHash,
    pub user_attributes: Vec<UserAttribute>,
}

pub struct ConfirmSignUpRequest<'a> {
    pub client_id: &'a str,
    pub username: &'a str,
    pub confirmation_code: &'a str,
    pub secret_hash: &'a SecretHash,
    /// Only sent when the provider issued one
    pub session: Option<&'a str>,
}

// =============================================================================
// Errors
// =============================================================================

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    /// The provider answered with an error document
    #[error("{message}")]
    Rejected { code: String, message: String },

    #[error("Identity provider request failed: {0}")]
    Request(String),

    #[error("Identity provider response was invalid: {0}")]
    InvalidResponse(String),
}

impl ProviderError {
    pub fn rejected(code: impl Into<String>, message: impl Into<String>) -> Self {
        ProviderError::Rejected {
            code: code.into(),
            message: message.into(),
        }
    }
}

// =============================================================================
// Provider capability
// =============================================================================

/// The five user pool operations the auth flows rely on.
#[async_trait]
pub trait IdentityProvider: Send + Sync {
    /// `InitiateAuth` with `USER_PASSWORD_AUTH`.
    async fn password_auth(&self, request: PasswordAuthRequest<'_>) -> Result<SignIn, ProviderError>;

    /// `InitiateAuth` with `REFRESH_TOKEN_AUTH`.
    async fn refresh_token_auth(
        &self,
        request: RefreshTokenAuthRequest<'_>,
    ) -> Result<SignIn, ProviderError>;

    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResult, ProviderError>;

    async fn confirm_sign_up(&self, request: ConfirmSignUpRequest<'_>) -> Result<(), ProviderError>;

    /// `AdminResetUserPassword`. Not bound to the client secret.
    async fn admin_reset_password(&self, username: &str) -> Result<(), ProviderError>;
}
