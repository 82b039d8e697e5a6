// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use std::sync::Arc;

use relational_auth_gateway::{
    api::router,
    auth::{HttpJwksFetcher, KeySetCache, TokenVerifier},
    config::{GatewayConfig, LogFormat},
    flows::AuthFlows,
    logging::init_logging,
    providers::CognitoClient,
    state::AppState,
};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() {
    init_logging(LogFormat::from_env());

    let config = match GatewayConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("FATAL: {e}");
            std::process::exit(1);
        }
    };
    info!(
        region = %config.region,
        user_pool_id = %config.user_pool_id,
        issuer = %config.issuer,
        "Configuration loaded"
    );
    let provider = CognitoClient::new(config.cognito_settings()).await;

    let fetcher = match HttpJwksFetcher::new() {
        Ok(fetcher) => fetcher,
        Err(e) => {
            error!(error = %e, "Failed to create JWKS client");
            std::process::exit(1);
        }
    };

    let verifier =
        TokenVerifier::new(KeySetCache::new(Arc::new(fetcher))).with_leeway(config.jwt_leeway_secs);
    let flows = AuthFlows::new(Arc::new(provider), config.client.clone());
    let app = router(AppState::new(flows, verifier, config.issuer.clone()));

    let listener = match TcpListener::bind(config.bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            error!(addr = %config.bind_addr, error = %e, "Failed to bind");
            std::process::exit(1);
        }
    };

    info!(addr = %config.bind_addr, "Auth gateway listening (docs at /openapi)");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        error!(error = %e, "Server failed");
        std::process::exit(1);
    }

    info!("Server stopped");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
