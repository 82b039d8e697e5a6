// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! Bearer token verification against the issuer's JWKS.
//!
//! A token is accepted only if all of these hold:
//!
//! - the header decodes, names `RS256` and carries a `kid`
//! - the `kid` resolves to an RSA key in the issuer's key set
//! - the signature verifies with that key
//! - `aud` equals the expected audience and `iss` the issuer URL
//! - `exp` is in the future (leeway defaults to zero)
//!
//! Every failure is reported as the same [`InvalidToken`].

use jsonwebtoken::jwk::{AlgorithmParameters, Jwk, KeyAlgorithm};
use jsonwebtoken::{decode, decode_header, Algorithm, DecodingKey, Validation};
use tracing::{debug, instrument};

use super::claims::TokenClaims;
use super::error::{AuthError, InvalidToken};
use super::jwks::KeySetCache;

/// The only signing algorithm accepted in token headers.
pub const ALLOWED_ALGORITHM: Algorithm = Algorithm::RS256;

/// Stateless verifier; cross-call state lives in the shared [`KeySetCache`].
#[derive(Clone)]
pub struct TokenVerifier {
    keys: KeySetCache,
    /// Clock skew tolerance for `exp`, in seconds
    leeway: u64,
}

impl TokenVerifier {
    pub fn new(keys: KeySetCache) -> Self {
        Self { keys, leeway: 0 }
    }

    /// Create with a clock skew tolerance.
    pub fn with_leeway(mut self, leeway_secs: u64) -> Self {
        self.leeway = leeway_secs;
        self
    }

    pub fn key_set_cache(&self) -> &KeySetCache {
        &self.keys
    }

    /// Verify `token` for `expected_audience` as issued by `issuer_url`.
    #[instrument(skip(self, token))]
    pub async fn verify(
        &self,
        token: &str,
        expected_audience: &str,
        issuer_url: &str,
    ) -> Result<TokenClaims, InvalidToken> {
        self.try_verify(token, expected_audience, issuer_url)
            .await
            .map_err(|e| {
                debug!(reason = e.error_code(), error = %e, "Token rejected");
                InvalidToken
            })
    }

    async fn try_verify(
        &self,
        token: &str,
        expected_audience: &str,
        issuer_url: &str,
    ) -> Result<TokenClaims, AuthError> {
        let header = decode_header(token).map_err(|_| AuthError::MalformedToken)?;

        // Checked before key lookup so forged headers never trigger a JWKS fetch.
        if header.alg != ALLOWED_ALGORITHM {
            return Err(AuthError::InvalidAlgorithm);
        }

        let kid = header.kid.ok_or(AuthError::MissingKeyId)?;
        let jwk = self.keys.resolve(issuer_url, &kid).await?;
        let decoding_key = jwk_to_decoding_key(&jwk)?;

        let mut validation = Validation::new(ALLOWED_ALGORITHM);
        validation.leeway = self.leeway;
        validation.set_audience(&[expected_audience]);
        validation.set_issuer(&[issuer_url]);
        validation.set_required_spec_claims(&["exp", "aud", "iss"]);

        let token_data = decode::<TokenClaims>(token, &decoding_key, &validation)?;

        debug!(subject = %token_data.claims.sub, kid = %kid, "Token verified");
        Ok(token_data.claims)
    }
}

/// Convert an RS256 JWK to a DecodingKey.
fn jwk_to_decoding_key(jwk: &Jwk) -> Result<DecodingKey, AuthError> {
    if let Some(alg) = jwk.common.key_algorithm {
        if alg != KeyAlgorithm::RS256 {
            return Err(AuthError::UnsupportedKey(format!("key algorithm {alg:?}")));
        }
    }

    match &jwk.algorithm {
        AlgorithmParameters::RSA(rsa) => DecodingKey::from_rsa_components(&rsa.n, &rsa.e)
            .map_err(|e| AuthError::UnsupportedKey(format!("invalid RSA components: {e}"))),
        _ => Err(AuthError::UnsupportedKey("key type is not RSA".to_string())),
    }
}
