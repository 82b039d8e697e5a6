// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Runtime Configuration
//!
//! Environment variable names, defaults and the loader that turns them into a
//! [`GatewayConfig`] at startup.
//!
//! ## Environment Variables
//!
//! | Variable | Description | Default |
//! |----------|-------------|---------|
//! | `COGNITO_USER_POOL_ID` | User pool id | Required |
//! | `COGNITO_APP_CLIENT_ID` | App client id, also the expected token audience | Required |
//! | `COGNITO_APP_CLIENT_SECRET` | App client secret | Required |
//! | `AWS_REGION` | Region of the user pool | `us-east-1` |
//! | `COGNITO_ENDPOINT` | User pool API endpoint override | SDK regional endpoint |
//! | `COGNITO_ISSUER` | Expected JWT issuer claim | `https://cognito-idp.{region}.amazonaws.com/{pool}` |
//! | `AWS_ACCESS_KEY_ID` | Explicit credentials for the admin password reset | Default provider chain |
//! | `AWS_SECRET_ACCESS_KEY` | Explicit credentials for the admin password reset | Default provider chain |
//! | `AWS_SESSION_TOKEN` | Temporary credential session token | Optional |
//! | `JWT_LEEWAY_SECS` | Clock skew tolerance for `exp` | `0` |
//! | `HOST` | Server bind address | `0.0.0.0` |
//! | `PORT` | Server bind port | `5000` |
//! | `LOG_FORMAT` | Logging format (`json` or `pretty`) | `pretty` |
//! | `RUST_LOG` | Log level filter | `info,tower_http=debug` |

use std::{fmt, net::SocketAddr};

use crate::{
    flows::ClientCredentials,
    providers::{AwsCredentials, CognitoSettings},
};

pub const USER_POOL_ID_ENV: &str = "COGNITO_USER_POOL_ID";
pub const CLIENT_ID_ENV: &str = "COGNITO_APP_CLIENT_ID";
pub const CLIENT_SECRET_ENV: &str = "COGNITO_APP_CLIENT_SECRET";
pub const REGION_ENV: &str = "AWS_REGION";
pub const ENDPOINT_ENV: &str = "COGNITO_ENDPOINT";
pub const ISSUER_ENV: &str = "COGNITO_ISSUER";
pub const ACCESS_KEY_ID_ENV: &str = "AWS_ACCESS_KEY_ID";
pub const SECRET_ACCESS_KEY_ENV: &str = "AWS_SECRET_ACCESS_KEY";
pub const SESSION_TOKEN_ENV: &str = "AWS_SESSION_TOKEN";
pub const LEEWAY_ENV: &str = "JWT_LEEWAY_SECS";
pub const HOST_ENV: &str = "HOST";
pub const PORT_ENV: &str = "PORT";

/// Environment variable selecting the log output format.
pub const LOG_FORMAT_ENV: &str = "LOG_FORMAT";

pub const DEFAULT_REGION: &str = "us-east-1";
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 5000;

/// Filter used when `RUST_LOG` is unset.
pub const DEFAULT_LOG_FILTER: &str = "info,tower_http=debug";

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum ConfigError {
    #[error("missing required environment variable {0}")]
    Missing(&'static str),

    #[error("invalid value for {name}: {reason}")]
    Invalid { name: &'static str, reason: String },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Json,
    Pretty,
}

impl LogFormat {
    /// `json` (any case) selects JSON; anything else is pretty.
    pub fn parse(value: Option<&str>) -> Self {
        match value {
            Some(v) if v.trim().eq_ignore_ascii_case("json") => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }

    pub fn from_env() -> Self {
        Self::parse(std::env::var(LOG_FORMAT_ENV).ok().as_deref())
    }
}

#[derive(Clone)]
pub struct GatewayConfig {
    pub bind_addr: SocketAddr,
    pub region: String,
    pub user_pool_id: String,
    pub client: ClientCredentials,
    /// Provider endpoint override
    pub endpoint: Option<String>,
    pub issuer: String,
    pub aws_credentials: Option<AwsCredentials>,
    pub jwt_leeway_secs: u64,
}

impl fmt::Debug for GatewayConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GatewayConfig")
            .field("bind_addr", &self.bind_addr)
            .field("region", &self.region)
            .field("user_pool_id", &self.user_pool_id)
            .field("client", &self.client)
            .field("endpoint", &self.endpoint)
            .field("issuer", &self.issuer)
            .field("aws_credentials", &self.aws_credentials)
            .field("jwt_leeway_secs", &self.jwt_leeway_secs)
            .finish()
    }
}

impl GatewayConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let env = Env(lookup);

        let user_pool_id = env.required(USER_POOL_ID_ENV)?;
        let client = ClientCredentials {
            client_id: env.required(CLIENT_ID_ENV)?,
            client_secret: env.required(CLIENT_SECRET_ENV)?,
        };
        let region = env.or_default(REGION_ENV, DEFAULT_REGION);
        let endpoint = env.optional(ENDPOINT_ENV);
        let issuer = env
            .optional(ISSUER_ENV)
            .unwrap_or_else(|| default_issuer(&region, &user_pool_id));

        let aws_credentials = match (
            env.optional(ACCESS_KEY_ID_ENV),
            env.optional(SECRET_ACCESS_KEY_ENV),
        ) {
            (Some(access_key_id), Some(secret_access_key)) => Some(AwsCredentials {
                access_key_id,
                secret_access_key,
                session_token: env.optional(SESSION_TOKEN_ENV),
            }),
            (None, None) => None,
            (Some(_), None) => {
                return Err(ConfigError::Invalid {
                    name: SECRET_ACCESS_KEY_ENV,
                    reason: format!("required when {ACCESS_KEY_ID_ENV} is set"),
                })
            }
            (None, Some(_)) => {
                return Err(ConfigError::Invalid {
                    name: ACCESS_KEY_ID_ENV,
                    reason: format!("required when {SECRET_ACCESS_KEY_ENV} is set"),
                })
            }
        };

        let jwt_leeway_secs = env.parsed(LEEWAY_ENV, 0u64)?;
        let port = env.parsed(PORT_ENV, DEFAULT_PORT)?;
        let host = env.or_default(HOST_ENV, DEFAULT_HOST);
        let bind_addr = format!("{host}:{port}")
            .parse::<SocketAddr>()
            .map_err(|e| ConfigError::Invalid {
                name: HOST_ENV,
                reason: format!("{host}: {e}"),
            })?;

        Ok(Self {
            bind_addr,
            region,
            user_pool_id,
            client,
            endpoint,
            issuer,
            aws_credentials,
            jwt_leeway_secs,
        })
    }
}

impl GatewayConfig {
    /// Settings for the Cognito client.
    pub fn cognito_settings(&self) -> CognitoSettings {
        CognitoSettings {
            region: self.region.clone(),
            user_pool_id: self.user_pool_id.clone(),
            endpoint: self.endpoint.clone(),
            credentials: self.aws_credentials.clone(),
        }
    }
}

/// Issuer of tokens minted by a Cognito user pool.
pub fn default_issuer(region: &str, user_pool_id: &str) -> String {
    format!("https://cognito-idp.{region}.amazonaws.com/{user_pool_id}")
}

struct Env<F>(F);

impl<F> Env<F>
where
    F: Fn(&str) -> Option<String>,
{
    /// Trimmed value; empty counts as unset.
    fn optional(&self, name: &str) -> Option<String> {
        (self.0)(name)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn required(&self, name: &'static str) -> Result<String, ConfigError> {
        self.optional(name).ok_or(ConfigError::Missing(name))
    }

    fn or_default(&self, name: &str, default: &str) -> String {
        self.optional(name).unwrap_or_else(|| default.to_string())
    }

    fn parsed<T>(&self, name: &'static str, default: T) -> Result<T, ConfigError>
    where
        T: std::str::FromStr,
        T::Err: fmt::Display,
    {
        match self.optional(name) {
            Some(value) => value.parse().map_err(|e: T::Err| ConfigError::Invalid {
                name,
                reason: format!("{value}: {e}"),
            }),
            None => Ok(default),
        }
    }
}
