// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    routing::{get, post},
    Router,
};
use tower_http::{
    cors::CorsLayer,
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    trace::TraceLayer,
};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::{
    models::{
        ConfirmSignUpRequest, EmptyData, ErrorResponse, LoginData, LoginRequest, ProtectedData,
        ProtectedRequest, RefreshRequest, RegistrationRequest, ResetPasswordRequest,
        ResponseStatus,
    },
    providers::{AuthChallenge, CodeDeliveryDetails, SignUpResult, TokenBundle},
    state::AppState,
};

pub mod auth;
pub mod health;

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/", get(auth::home))
        .route("/login", post(auth::login))
        .route("/reset-password", post(auth::reset_password))
        .route("/sign-up", post(auth::sign_up))
        .route("/confirm-sign-up", post(auth::confirm_sign_up))
        .route("/refresh-token", post(auth::refresh_token))
        .route("/protected", post(auth::protected))
        .route("/health", get(health::health))
        .route("/health/live", get(health::liveness))
        .route("/health/ready", get(health::readiness))
        .with_state(state)
        .merge(SwaggerUi::new("/openapi").url("/openapi/openapi.json", ApiDoc::openapi()))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .layer(CorsLayer::permissive())
}

#[derive(OpenApi)]
#[openapi(
    info(title = "Auth Gateway", description = "User pool authentication API"),
    paths(
        auth::home,
        auth::login,
        auth::reset_password,
        auth::sign_up,
        auth::confirm_sign_up,
        auth::refresh_token,
        auth::protected,
        health::health,
        health::liveness,
        health::readiness
    ),
    components(
        schemas(
            LoginRequest,
            RegistrationRequest,
            ConfirmSignUpRequest,
            ResetPasswordRequest,
            RefreshRequest,
            ProtectedRequest,
            LoginData,
            ProtectedData,
            TokenBundle,
            AuthChallenge,
            SignUpResult,
            CodeDeliveryDetails,
            EmptyData,
            ErrorResponse,
            ResponseStatus,
            health::ReadyResponse,
            health::HealthChecks,
            health::HealthResponse
        )
    ),
    tags(
        (name = "Docs", description = "Documentation redirect"),
        (name = "Auth", description = "Authentication against the user pool"),
        (name = "Health", description = "Liveness and readiness probes")
    )
)]
struct ApiDoc;
