// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! AWS Cognito user pool client.
//!
//! Backed by the official `aws-sdk-cognitoidentityprovider` crate. Client-facing
//! operations are authorized by the app client's secret hash;
//! `AdminResetUserPassword` is signed with AWS credentials, taken from the
//! explicit pair when configured and from the default provider chain otherwise
//! (environment, profile, SSO, ECS or instance role).

use std::{collections::BTreeMap, fmt, time::Duration};

use async_trait::async_trait;
use aws_config::{timeout::TimeoutConfig, BehaviorVersion, Region};
use aws_sdk_cognitoidentityprovider::{
    config::Credentials,
    error::{DisplayErrorContext, ProvideErrorMetadata, SdkError},
    operation::initiate_auth::InitiateAuthOutput,
    types::{AttributeType, AuthFlowType, AuthenticationResultType},
    Client,
};
use tracing::{debug, info, warn};

use super::{
    AuthChallenge, CodeDeliveryDetails, ConfirmSignUpRequest, IdentityProvider,
    PasswordAuthRequest, ProviderError, RefreshTokenAuthRequest, SignIn, SignUpRequest,
    SignUpResult, TokenBundle, UserAttribute,
};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const CREDENTIALS_SOURCE: &str = "relational-auth-gateway-explicit";
const DEFAULT_TOKEN_TYPE: &str = "Bearer";

/// Static AWS credentials from the environment.
#[derive(Clone)]
pub struct AwsCredentials {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub session_token: Option<String>,
}

impl fmt::Debug for AwsCredentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AwsCredentials")
            .field("access_key_id", &self.access_key_id)
            .field("secret_access_key", &"<redacted>")
            .field("session_token", &self.session_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl From<AwsCredentials> for Credentials {
    fn from(creds: AwsCredentials) -> Self {
        Credentials::new(
            creds.access_key_id,
            creds.secret_access_key,
            creds.session_token,
            None,
            CREDENTIALS_SOURCE,
        )
    }
}

/// Where and how to reach the user pool.
#[derive(Debug, Clone)]
pub struct CognitoSettings {
    pub region: String,
    pub user_pool_id: String,
    /// Endpoint override, e.g. a local emulator
    pub endpoint: Option<String>,
    /// Explicit credentials; the default provider chain is used when absent
    pub credentials: Option<AwsCredentials>,
}

#[derive(Debug, Clone)]
pub struct CognitoClient {
    client: Client,
    user_pool_id: String,
}

impl CognitoClient {
    /// Load the SDK configuration and build the client.
    pub async fn new(settings: CognitoSettings) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(settings.region.clone()))
            .timeout_config(
                TimeoutConfig::builder()
                    .operation_timeout(REQUEST_TIMEOUT)
                    .build(),
            );

        let explicit_creds = settings.credentials.is_some();
        if let Some(credentials) = settings.credentials {
            loader = loader.credentials_provider(Credentials::from(credentials));
        }
        if let Some(endpoint) = &settings.endpoint {
            loader = loader.endpoint_url(endpoint);
        }

        let sdk_config = loader.load().await;

        info!(
            region = %settings.region,
            endpoint = ?settings.endpoint,
            explicit_creds,
            "Cognito client initialized"
        );

        Self::with_client(Client::new(&sdk_config), settings.user_pool_id)
    }

    fn with_client(client: Client, user_pool_id: impl Into<String>) -> Self {
        Self {
            client,
            user_pool_id: user_pool_id.into(),
        }
    }
}

fn sign_in(output: InitiateAuthOutput) -> Result<SignIn, ProviderError> {
    if let Some(result) = output.authentication_result() {
        return token_bundle(result).map(SignIn::Authenticated);
    }

    match output.challenge_name() {
        Some(challenge_name) => Ok(SignIn::Challenge(AuthChallenge {
            challenge_name: challenge_name.as_str().to_string(),
            session: output.session().map(str::to_string),
            challenge_parameters: output
                .challenge_parameters()
                .map(|params| {
                    params
                        .iter()
                        .map(|(k, v)| (k.clone(), v.clone()))
                        .collect::<BTreeMap<_, _>>()
                })
                .unwrap_or_default(),
        })),
        None => Err(ProviderError::InvalidResponse(
            "InitiateAuth returned neither tokens nor a challenge".to_string(),
        )),
    }
}

fn token_bundle(result: &AuthenticationResultType) -> Result<TokenBundle, ProviderError> {
    let access_token = result.access_token().ok_or_else(|| {
        ProviderError::InvalidResponse("authentication result has no access token".to_string())
    })?;

    Ok(TokenBundle {
        access_token: access_token.to_string(),
        id_token: result.id_token().map(str::to_string),
        refresh_token: result.refresh_token().map(str::to_string),
        expires_in: i64::from(result.expires_in()),
        token_type: result
            .token_type()
            .unwrap_or(DEFAULT_TOKEN_TYPE)
            .to_string(),
    })
}

fn attribute(attr: &UserAttribute) -> Result<AttributeType, ProviderError> {
    AttributeType::builder()
        .name(&attr.name)
        .value(&attr.value)
        .build()
        .map_err(|e| ProviderError::Request(format!("invalid user attribute {}: {e}", attr.name)))
}

/// Map an SDK failure.
///
/// Service errors with a code become [`ProviderError::Rejected`] carrying the
/// provider's message unchanged; everything else is a request failure.
fn provider_error<E, R>(operation: &str, err: SdkError<E, R>) -> ProviderError
where
    E: ProvideErrorMetadata + std::error::Error + Send + Sync + 'static,
    R: fmt::Debug,
{
    if let Some(service) = err.as_service_error() {
        if let Some(code) = ProvideErrorMetadata::code(service) {
            debug!(operation, %code, "Cognito rejected request");
            let message = ProvideErrorMetadata::message(service).unwrap_or(code);
            return ProviderError::rejected(code, message);
        }
    }

    let detail = DisplayErrorContext(&err);
    warn!(operation, error = %detail, "Cognito request failed");
    ProviderError::Request(format!("{operation} failed: {detail}"))
}

#[async_trait]
impl IdentityProvider for CognitoClient {
    async fn password_auth(&self, request: PasswordAuthRequest<'_>) -> Result<SignIn, ProviderError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::UserPasswordAuth)
            .client_id(request.client_id)
            .auth_parameters("USERNAME", request.username)
            .auth_parameters("PASSWORD", request.password)
            .auth_parameters("SECRET_HASH", request.secret_hash.as_str())
            .send()
            .await
            .map_err(|e| provider_error("InitiateAuth", e))?;
        sign_in(output)
    }

    async fn refresh_token_auth(
        &self,
        request: RefreshTokenAuthRequest<'_>,
    ) -> Result<SignIn, ProviderError> {
        let output = self
            .client
            .initiate_auth()
            .auth_flow(AuthFlowType::RefreshTokenAuth)
            .client_id(request.client_id)
            .auth_parameters("REFRESH_TOKEN", request.refresh_token)
            .auth_parameters("SECRET_HASH", request.secret_hash.as_str())
            .auth_parameters("USERNAME", request.username)
            .send()
            .await
            .map_err(|e| provider_error("InitiateAuth", e))?;
        sign_in(output)
    }

    async fn sign_up(&self, request: SignUpRequest<'_>) -> Result<SignUpResult, ProviderError> {
        let attributes = request
            .user_attributes
            .iter()
            .map(attribute)
            .collect::<Result<Vec<_>, _>>()?;

        let output = self
            .client
            .sign_up()
            .client_id(request.client_id)
            .secret_hash(request.secret_hash.as_str())
            .username(request.username)
            .password(request.password)
            .set_user_attributes(Some(attributes))
            .send()
            .await
            .map_err(|e| provider_error("SignUp", e))?;

        Ok(SignUpResult {
            user_sub: output.user_sub().to_string(),
            user_confirmed: output.user_confirmed(),
            code_delivery_details: output.code_delivery_details().map(|details| {
                CodeDeliveryDetails {
                    attribute_name: details.attribute_name().map(str::to_string),
                    delivery_medium: details.delivery_medium().map(|m| m.as_str().to_string()),
                    destination: details.destination().map(str::to_string),
                }
            }),
        })
    }

    async fn confirm_sign_up(&self, request: ConfirmSignUpRequest<'_>) -> Result<(), ProviderError> {
        self.client
            .confirm_sign_up()
            .client_id(request.client_id)
            .secret_hash(request.secret_hash.as_str())
            .username(request.username)
            .confirmation_code(request.confirmation_code)
            .set_session(request.session.map(str::to_string))
            .send()
            .await
            .map_err(|e| provider_error("ConfirmSignUp", e))?;
        Ok(())
    }

    async fn admin_reset_password(&self, username: &str) -> Result<(), ProviderError> {
        self.client
            .admin_reset_user_password()
            .user_pool_id(&self.user_pool_id)
            .username(username)
            .send()
            .await
            .map_err(|e| provider_error("AdminResetUserPassword", e))?;
        Ok(())
    }
}
