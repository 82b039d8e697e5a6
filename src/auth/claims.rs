// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Verified token claims.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Claims of a token that passed verification.
///
/// Cognito ID tokens carry standard OIDC claims plus provider fields such as
/// `cognito:username`, `email_verified` or `auth_time`. Those land in `extra`
/// untouched, so serializing a `TokenClaims` reproduces the token payload.
///
/// Produced by `TokenVerifier::verify`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenClaims {
    /// Subject: the Cognito user's UUID
    pub sub: String,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    /// Issuer (user pool URL)
    pub iss: String,

    /// Audience (app client id)
    pub aud: String,

    /// Expiration timestamp
    pub exp: i64,

    /// Issued at timestamp
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iat: Option<i64>,

    /// `id` or `access`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token_use: Option<String>,

    /// Remaining provider-specific claims
    #[serde(flatten)]
    pub extra: BTreeMap<String, Value>,
}

impl TokenClaims {
    /// Expiry as a timestamp.
    pub fn expires_at(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.exp, 0)
    }

    /// Look up a provider-specific claim.
    pub fn extra_claim(&self, name: &str) -> Option<&Value> {
        self.extra.get(name)
    }
}
