// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use crate::{
    auth::{InvalidToken, TokenClaims, TokenVerifier},
    flows::AuthFlows,
};

#[derive(Clone)]
pub struct AppState {
    pub flows: Arc<AuthFlows>,
    pub verifier: TokenVerifier,
    /// Expected `iss` of user tokens
    pub issuer: String,
}

impl AppState {
    pub fn new(flows: AuthFlows, verifier: TokenVerifier, issuer: impl Into<String>) -> Self {
        Self {
            flows: Arc::new(flows),
            verifier,
            issuer: issuer.into(),
        }
    }

    /// Verify a user pool token issued to this app client.
    pub async fn verify_token(&self, token: &str) -> Result<TokenClaims, InvalidToken> {
        self.verifier
            .verify(token, self.flows.client_id(), &self.issuer)
            .await
    }
}
