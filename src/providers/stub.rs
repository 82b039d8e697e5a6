// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! In-memory [`IdentityProvider`] for flow and handler tests.

use std::sync::Mutex;

use async_trait::async_trait;

use super::{
    ConfirmSignUpRequest, IdentityProvider, PasswordAuthRequest, ProviderError,
    RefreshTokenAuthRequest, SignIn, SignUpRequest, SignUpResult, TokenBundle, UserAttribute,
};

/// A provider call as the stub saw it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordedCall {
    PasswordAuth {
        client_id: String,
        username: String,
        password: String,
        secret_hash: String,
    },
    RefreshTokenAuth {
        client_id: String,
        username: String,
        refresh_token: String,
        secret_hash: String,
    },
    SignUp {
        client_id: String,
        username: String,
        password: String,
        secret_hash: String,
        user_attributes: Vec<UserAttribute>,
    },
    ConfirmSignUp {
        client_id: String,
        username: String,
        confirmation_code: String,
        secret_hash: String,
        session: Option<String>,
    },
    AdminResetPassword {
        username: String,
    },
}

/// Answers every call with a preset result and records what it was asked.
pub struct StubProvider {
    pub password_auth: Result<SignIn, ProviderError>,
    pub refresh_token_auth: Result<SignIn, ProviderError>,
    pub sign_up: Result<SignUpResult, ProviderError>,
    pub confirm_sign_up: Result<(), ProviderError>,
    pub admin_reset_password: Result<(), ProviderError>,
    pub(crate) calls: Mutex<Vec<RecordedCall>>,
}

pub fn token_bundle(id_token: Option<String>, refresh_token: Option<&str>) -> TokenBundle {
    TokenBundle {
        access_token: "access-token".to_string(),
        id_token,
        refresh_token: refresh_token.map(str::to_string),
        expires_in: 3600,
        token_type: "Bearer".to_string(),
    }
}

impl Default for StubProvider {
    fn default() -> Self {
        Self {
            password_auth: Ok(SignIn::Authenticated(token_bundle(
                Some("id-token".to_string()),
                Some("refresh-token"),
            ))),
            refresh_token_auth: Ok(SignIn::Authenticated(token_bundle(
                Some("id-token".to_string()),
                None,
            ))),
            sign_up: Ok(SignUpResult {
                user_sub: "user-sub".to_string(),
                user_confirmed: false,
                code_delivery_details: None,
            }),
            confirm_sign_up: Ok(()),
            admin_reset_password: Ok(()),
            calls: Mutex::new(Vec::new()),
        }
    }
}

impl StubProvider {
    pub fn calls(&self) -> Vec<RecordedCall> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: RecordedCall) {
        self.calls.lock().unwrap().push(call);
    }
}

#[async_trait]
impl IdentityProvider for StubProvider {
    async fn password_auth(&self, request: PasswordAuthRequest<'_>) -> Result<SignIn, ProviderError> {
        self.record(RecordedCall::PasswordAuth {
            client_id: request.client_id.to_string(),
            username: request.username.to_string(),
            password: request.password.to_string(),
            secret_hash: request.secret_hash.as_str().to_string(),
        });
        self.password_auth.clone()
    }

    async fn refresh_token_auth(
        &self,
        request: RefreshTokenAuthRequest<'_>,
    ) -> Result<SignIn, ProviderError> {
        self.record(RecordedCall::RefreshTokenAuth {
            client_id: request.client_id.to_string(),
            username: request.username.to_string(),
            refresh_token: request.refresh_token.to_string(),
            secret_hash: request.secret_hash.as_str().to_string(),
        });
        self.refresh_token_auth.clone()
    }

    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResult, ProviderError> {
        self.record(RecordedCall::SignUp {
            client_id: request.client_id.to_string(),
            username: request.username.to_string(),
            password: request.password.to_string(),
            secret_hash: request.secret_hash.as_str().to_string(),
            user_attributes: request.user_attributes,
        });
        self.sign_up.clone()
    }

    async fn confirm_sign_up(&self, request: ConfirmSignUpRequest<'_>) -> Result<(), ProviderError> {
        self.record(RecordedCall::ConfirmSignUp {
            client_id: request.client_id.to_string(),
            username: request.username.to_string(),
            confirmation_code: request.confirmation_code.to_string(),
            secret_hash: request.secret_hash.as_str().to_string(),
            session: request.session.map(str::to_string),
        });
        self.confirm_sign_up.clone()
    }

    async fn admin_reset_password(&self, username: &str) -> Result<(), ProviderError> {
        self.record(RecordedCall::AdminResetPassword {
            username: username.to_string(),
        });
        self.admin_reset_password.clone()
    }
}
