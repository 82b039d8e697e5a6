// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! # Authentication Module
//!
//! Local verification of Cognito-issued JWTs and the client-secret hash the
//! user pool requires on credential calls.
//!
//! ## Verification Flow
//!
//! 1. Client sends `Authorization: Bearer <Cognito ID token>`
//! 2. Gateway:
//!    - Reads the `kid` from the unverified header
//!    - Resolves the key from the pool's JWKS (cached per issuer, refetched
//!      when the `kid` is unknown)
//!    - Verifies the RS256 signature, issuer, audience and expiry
//!    - Returns the verified claims (`sub` is the canonical user id)
//!
//! ## Security
//!
//! - Only RS256 is accepted; the header algorithm is never trusted
//! - Every verification failure surfaces as the same `InvalidToken`
//! - Passwords, secrets and tokens are never logged

pub mod claims;
pub mod error;
pub mod extractor;
pub mod jwks;
pub mod secret_hash;
pub mod verifier;

#[cfg(test)]
pub(crate) mod test_support;

pub use claims::TokenClaims;
pub use error::{AuthError, InvalidToken};
pub use extractor::AuthorizationHeader;
pub use jwks::{HttpJwksFetcher, JwksFetcher, KeySetCache};
pub use secret_hash::SecretHash;
pub use verifier::TokenVerifier;
