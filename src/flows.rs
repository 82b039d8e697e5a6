// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! User authentication flows.
//!
//! Each flow derives the secret hash where the user pool requires one, makes
//! a single provider call and normalizes the result. Any provider error
//! becomes an [`AuthFailure`] carrying the provider's message.
//!
//! Tokens returned by [`AuthFlows::authenticate`] are not verified here;
//! callers that need claims pass the ID token to `TokenVerifier`.

use std::{fmt, sync::Arc};

use tracing::{info, instrument, warn};

use crate::{
    auth::{secret_hash, SecretHash},
    providers::{
        ConfirmSignUpRequest, IdentityProvider, PasswordAuthRequest, ProviderError,
        RefreshTokenAuthRequest, SignIn, SignUpRequest, SignUpResult, TokenBundle, UserAttribute,
    },
};

/// App client the flows authenticate as.
#[derive(Clone)]
pub struct ClientCredentials {
    pub client_id: String,
    pub client_secret: String,
}

impl fmt::Debug for ClientCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientCredentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

/// A flow that did not succeed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct AuthFailure {
    pub message: String,
}

impl AuthFailure {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl From<ProviderError> for AuthFailure {
    fn from(err: ProviderError) -> Self {
        match &err {
            ProviderError::Rejected { code, .. } => info!(%code, "Provider rejected request"),
            other => warn!(error = %other, "Provider call failed"),
        }
        AuthFailure::new(err.to_string())
    }
}

pub type AuthOutcome<T> = Result<T, AuthFailure>;

/// Registration details for a new user.
pub struct NewUser<'a> {
    pub username: &'a str,
    pub password: &'a str,
    pub email: &'a str,
    pub name: &'a str,
}

#[derive(Clone)]
pub struct AuthFlows {
    provider: Arc<dyn IdentityProvider>,
    client: ClientCredentials,
}

impl AuthFlows {
    pub fn new(provider: Arc<dyn IdentityProvider>, client: ClientCredentials) -> Self {
        Self { provider, client }
    }

    pub fn client_id(&self) -> &str {
        &self.client.client_id
    }

    /// Log in with username and password.
    #[instrument(skip(self, password))]
    pub async fn authenticate(&self, username: &str, password: &str) -> AuthOutcome<SignIn> {
        let secret_hash = self.secret_hash(username);
        let result = self
            .provider
            .password_auth(PasswordAuthRequest {
                client_id: &self.client.client_id,
                username,
                password,
                secret_hash: &secret_hash,
            })
            .await?;

        if let SignIn::Challenge(challenge) = &result {
            info!(challenge = %challenge.challenge_name, "Login requires a further step");
        }
        Ok(result)
    }

    /// Register a user; `email` and `name` become user attributes.
    #[instrument(skip_all, fields(username = %user.username))]
    pub async fn sign_up(&self, user: NewUser<'_>) -> AuthOutcome<SignUpResult> {
        let secret_hash = self.secret_hash(user.username);
        let result = self
            .provider
            .sign_up(SignUpRequest {
                client_id: &self.client.client_id,
                username: user.username,
                password: user.password,
                secret_hash: &secret_hash,
                user_attributes: vec![
                    UserAttribute::new("email", user.email),
                    UserAttribute::new("name", user.name),
                ],
            })
            .await?;

        info!(user_confirmed = result.user_confirmed, "User registered");
        Ok(result)
    }

    /// Confirm a registration with the code the user received.
    #[instrument(skip(self, confirmation_code, session))]
    pub async fn confirm_sign_up(
        &self,
        username: &str,
        confirmation_code: &str,
        session: Option<&str>,
    ) -> AuthOutcome<()> {
        let secret_hash = self.secret_hash(username);
        self.provider
            .confirm_sign_up(ConfirmSignUpRequest {
                client_id: &self.client.client_id,
                username,
                confirmation_code,
                secret_hash: &secret_hash,
                session,
            })
            .await?;
        Ok(())
    }

    /// Exchange a refresh token for fresh tokens.
    ///
    /// The provider does not reissue the refresh token, so the returned bundle
    /// carries the submitted one. `IdToken` is always present, empty when the
    /// provider omits it.
    #[instrument(skip(self, refresh_token))]
    pub async fn refresh(&self, username: &str, refresh_token: &str) -> AuthOutcome<TokenBundle> {
        let secret_hash = self.secret_hash(username);
        let result = self
            .provider
            .refresh_token_auth(RefreshTokenAuthRequest {
                client_id: &self.client.client_id,
                username,
                refresh_token,
                secret_hash: &secret_hash,
            })
            .await?;

        match result {
            SignIn::Authenticated(tokens) => Ok(TokenBundle {
                id_token: Some(tokens.id_token.unwrap_or_default()),
                refresh_token: Some(refresh_token.to_string()),
                ..tokens
            }),
            SignIn::Challenge(challenge) => {
                warn!(challenge = %challenge.challenge_name, "Refresh answered with a challenge");
                Err(AuthFailure::new(format!(
                    "Token refresh requires {}",
                    challenge.challenge_name
                )))
            }
        }
    }

    /// Start the administrative password reset for a user.
    #[instrument(skip(self))]
    pub async fn reset_password(&self, username: &str) -> AuthOutcome<()> {
        self.provider.admin_reset_password(username).await?;
        info!("Password reset started");
        Ok(())
    }

    fn secret_hash(&self, username: &str) -> SecretHash {
        secret_hash::derive(username, &self.client.client_id, &self.client.client_secret)
    }
}
