// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Relational Auth Gateway - Cognito-backed authentication service
//!
//! Fronts an AWS Cognito user pool: credential operations are forwarded with
//! the app client's secret hash, and Cognito-issued JWTs are verified locally
//! against the pool's published signing keys.
//!
//! ## Modules
//!
//! - `api` - HTTP API handlers (Axum)
//! - `auth` - Secret hash, JWKS cache and JWT verification
//! - `flows` - Login, sign-up, confirmation, refresh and password reset
//! - `providers` - Identity provider capability and the Cognito client

pub mod api;
pub mod auth;
pub mod config;
pub mod error;
pub mod flows;
pub mod logging;
pub mod models;
pub mod providers;
pub mod state;
