// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Cognito `SECRET_HASH` derivation.
//!
//! App clients configured with a client secret require every public API call
//! that names a user to carry `Base64(HMAC-SHA256(client_secret, username ||
//! client_id))`. Cognito recomputes the value on its side, so the output has
//! to match byte for byte or the call is rejected as `NotAuthorizedException`.

use std::fmt;

use base64ct::{Base64, Encoding};
use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Base64-encoded HMAC-SHA256 digest bound to one username.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct SecretHash(String);

impl SecretHash {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// The hash is a bearer credential for the username it was derived for.
impl fmt::Debug for SecretHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("SecretHash(..)")
    }
}

impl From<SecretHash> for String {
    fn from(value: SecretHash) -> Self {
        value.0
    }
}

/// Derive the secret hash for `username`.
///
/// The message is `username` immediately followed by `client_id`, keyed with
/// `client_secret`. Any input bytes are valid.
pub fn derive(username: &str, client_id: &str, client_secret: &str) -> SecretHash {
    tracing::debug!(username = %username, "Deriving secret hash");

    let mut mac = HmacSha256::new_from_slice(client_secret.as_bytes())
        .expect("HMAC accepts keys of any length");
    mac.update(username.as_bytes());
    mac.update(client_id.as_bytes());
    let digest = mac.finalize().into_bytes();

    SecretHash(Base64::encode_string(&digest))
}
