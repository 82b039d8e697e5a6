// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

use axum::{
    extract::{rejection::JsonRejection, State},
    response::Redirect,
    Json,
};
use tracing::{debug, info};

use crate::{
    auth::{extractor::resolve_bearer_token, AuthError, AuthorizationHeader},
    error::ApiError,
    flows::NewUser,
    models::{
        ApiResponse, ConfirmSignUpRequest, EmptyData, ErrorResponse, LoginData, LoginRequest,
        ProtectedData, ProtectedRequest, RefreshRequest, RegistrationRequest,
        ResetPasswordRequest,
    },
    providers::{SignIn, SignUpResult, TokenBundle},
    state::AppState,
};

/// Login succeeded at the provider but the ID token did not verify.
pub const TOKEN_DECODE_FAILED: &str = "Failed to decode the token";

/// Redirects to the OpenAPI documentation.
#[utoipa::path(
    get,
    path = "/",
    tag = "Docs",
    responses((status = 303, description = "Redirect to /openapi"))
)]
pub async fn home() -> Redirect {
    Redirect::to("/openapi")
}

/// Authenticates with the user pool and returns tokens plus the user profile.
#[utoipa::path(
    post,
    path = "/login",
    request_body = LoginRequest,
    tag = "Auth",
    responses(
        (status = 200, body = ApiResponse<LoginData>),
        (status = 401, body = ErrorResponse)
    )
)]
pub async fn login(
    State(state): State<AppState>,
    Json(request): Json<LoginRequest>,
) -> Result<Json<ApiResponse<LoginData>>, ApiError> {
    let tokens = match state
        .flows
        .authenticate(&request.username, &request.password)
        .await
    {
        Ok(SignIn::Authenticated(tokens)) => tokens,
        Ok(SignIn::Challenge(challenge)) => {
            let message = format!(
                "Additional authentication step required: {}",
                challenge.challenge_name
            );
            let data = serde_json::to_value(&challenge).unwrap_or_default();
            return Err(ApiError::unauthorized(message).with_data(data));
        }
        Err(failure) => return Err(ApiError::unauthorized(failure.message)),
    };

    let id_token = tokens
        .id_token
        .as_deref()
        .ok_or_else(|| ApiError::unauthorized(TOKEN_DECODE_FAILED))?;
    let claims = state
        .verify_token(id_token)
        .await
        .map_err(|_| ApiError::unauthorized(TOKEN_DECODE_FAILED))?;

    info!(sub = %claims.sub, "User logged in");
    Ok(Json(ApiResponse::ok(
        "Login successful.",
        LoginData {
            email: claims.email,
            name: claims.name,
            username: claims.sub,
            tokens,
        },
    )))
}

/// Starts a password reset for the user with this email.
#[utoipa::path(
    post,
    path = "/reset-password",
    request_body = ResetPasswordRequest,
    tag = "Auth",
    responses(
        (status = 200, body = ApiResponse<EmptyData>),
        (status = 400, body = ErrorResponse)
    )
)]
pub async fn reset_password(
    State(state): State<AppState>,
    Json(request): Json<ResetPasswordRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state
        .flows
        .reset_password(&request.email)
        .await
        .map_err(|failure| ApiError::bad_request(failure.message))?;

    Ok(Json(ApiResponse::ok(
        "Password reset successfully.",
        EmptyData::default(),
    )))
}

/// Registers a new user.
#[utoipa::path(
    post,
    path = "/sign-up",
    request_body = RegistrationRequest,
    tag = "Auth",
    responses(
        (status = 200, body = ApiResponse<SignUpResult>),
        (status = 400, body = ErrorResponse)
    )
)]
pub async fn sign_up(
    State(state): State<AppState>,
    Json(request): Json<RegistrationRequest>,
) -> Result<Json<ApiResponse<SignUpResult>>, ApiError> {
    let result = state
        .flows
        .sign_up(NewUser {
            username: &request.username,
            password: &request.password,
            email: &request.email,
            name: &request.name,
        })
        .await
        .map_err(|failure| ApiError::bad_request(failure.message))?;

    Ok(Json(ApiResponse::ok(
        "Sign-up successful. Please check your email, copy the confirmation code and complete the verification process.",
        result,
    )))
}

/// Confirms a registration with the emailed code.
#[utoipa::path(
    post,
    path = "/confirm-sign-up",
    request_body = ConfirmSignUpRequest,
    tag = "Auth",
    responses(
        (status = 200, body = ApiResponse<EmptyData>),
        (status = 400, body = ErrorResponse)
    )
)]
pub async fn confirm_sign_up(
    State(state): State<AppState>,
    Json(request): Json<ConfirmSignUpRequest>,
) -> Result<Json<ApiResponse<EmptyData>>, ApiError> {
    state
        .flows
        .confirm_sign_up(
            &request.username,
            &request.confirmation_code,
            request.session.as_deref(),
        )
        .await
        .map_err(|failure| ApiError::bad_request(failure.message))?;

    Ok(Json(ApiResponse::ok(
        "Confirmation successful! You can now log in.",
        EmptyData::default(),
    )))
}

/// Issues fresh tokens for a refresh token.
#[utoipa::path(
    post,
    path = "/refresh-token",
    request_body = RefreshRequest,
    tag = "Auth",
    responses(
        (status = 200, body = ApiResponse<TokenBundle>),
        (status = 401, body = ErrorResponse)
    )
)]
pub async fn refresh_token(
    State(state): State<AppState>,
    Json(request): Json<RefreshRequest>,
) -> Result<Json<ApiResponse<TokenBundle>>, ApiError> {
    let tokens = state
        .flows
        .refresh(&request.username, &request.refresh_token)
        .await
        .map_err(|failure| ApiError::unauthorized(failure.message))?;

    Ok(Json(ApiResponse::ok("Token refreshed successfully.", tokens)))
}

/// Returns the verified claims of the caller's token.
///
/// The token comes from `Authorization: Bearer <token>` or, without that
/// header, from the `token` body field.
#[utoipa::path(
    post,
    path = "/protected",
    request_body = ProtectedRequest,
    tag = "Auth",
    responses(
        (status = 200, body = ApiResponse<ProtectedData>),
        (status = 401, body = ErrorResponse)
    )
)]
pub async fn protected(
    State(state): State<AppState>,
    AuthorizationHeader(header): AuthorizationHeader,
    body: Result<Json<ProtectedRequest>, JsonRejection>,
) -> Result<Json<ApiResponse<ProtectedData>>, AuthError> {
    let body = match body {
        Ok(Json(body)) => body,
        Err(rejection) => {
            debug!(error = %rejection, "Ignoring unreadable protected body");
            ProtectedRequest::default()
        }
    };

    let token = resolve_bearer_token(header.as_deref(), body.token.as_deref())?;
    let claims = state.verify_token(token).await?;

    Ok(Json(ApiResponse::ok(
        "Access granted",
        ProtectedData { user: claims },
    )))
}
