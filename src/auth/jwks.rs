// SPDX-License-Identifier: AGPL-3.0-or-later
//
// Copyright (C) 2026 Relational Network

//! JWKS (JSON Web Key Set) fetching and caching.
//!
//! ## Caching
//!
//! - One key set per issuer, fetched from `{issuer}/.well-known/jwks.json`
//! - No TTL: a cached set is only replaced when a lookup misses it
//!   (first use of an issuer, or an unknown `kid` after key rotation)
//! - A refetch replaces the issuer's set wholesale in one write
//! - A failed fetch leaves the previous set in place
//!
//! ## Usage
//!
//! Build one `KeySetCache` in main.rs and store it in AppState (through
//! `TokenVerifier`). Clones share the same cache.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use jsonwebtoken::jwk::{Jwk, JwkSet};
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use super::error::AuthError;

/// Path of the key set document relative to the issuer.
pub const JWKS_PATH: &str = "/.well-known/jwks.json";

/// Timeout for a single JWKS request.
const FETCH_TIMEOUT: Duration = Duration::from_secs(10);

/// Build the JWKS URL for an issuer.
pub fn jwks_url(issuer_url: &str) -> String {
    format!("{}{}", issuer_url.trim_end_matches('/'), JWKS_PATH)
}

/// Capability to download a key set document.
#[async_trait]
pub trait JwksFetcher: Send + Sync {
    /// Fetch and parse the key set at `jwks_url`.
    ///
    /// Transport failures, non-success statuses and unparsable bodies are all
    /// `AuthError::JwksFetchError`.
    async fn fetch(&self, jwks_url: &str) -> Result<JwkSet, AuthError>;
}

/// HTTPS fetcher backed by `reqwest`.
#[derive(Clone)]
pub struct HttpJwksFetcher {
    client: reqwest::Client,
}

impl HttpJwksFetcher {
    pub fn new() -> Result<Self, AuthError> {
        let client = reqwest::Client::builder()
            .timeout(FETCH_TIMEOUT)
            .build()
            .map_err(|e| AuthError::JwksFetchError(format!("failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl JwksFetcher for HttpJwksFetcher {
    async fn fetch(&self, jwks_url: &str) -> Result<JwkSet, AuthError> {
        let response = self
            .client
            .get(jwks_url)
            .send()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        if !response.status().is_success() {
            return Err(AuthError::JwksFetchError(format!(
                "HTTP {} from JWKS endpoint",
                response.status()
            )));
        }

        let jwks: JwkSet = response
            .json()
            .await
            .map_err(|e| AuthError::JwksFetchError(e.to_string()))?;

        Ok(jwks)
    }
}

/// Per-issuer key set cache.
#[derive(Clone)]
pub struct KeySetCache {
    /// Most recent key set for each issuer URL
    sets: Arc<RwLock<HashMap<String, Arc<JwkSet>>>>,
    fetcher: Arc<dyn JwksFetcher>,
}

impl KeySetCache {
    pub fn new(fetcher: Arc<dyn JwksFetcher>) -> Self {
        Self {
            sets: Arc::new(RwLock::new(HashMap::new())),
            fetcher,
        }
    }

    /// Resolve the key `kid` published by `issuer_url`.
    ///
    /// Served from the cache when the cached set has the key. Otherwise the
    /// set is refetched once and the lookup retried against the fresh set.
    pub async fn resolve(&self, issuer_url: &str, kid: &str) -> Result<Jwk, AuthError> {
        if let Some(jwk) = self.cached_key(issuer_url, kid).await {
            return Ok(jwk);
        }

        debug!(issuer = %issuer_url, kid = %kid, "Key not cached, fetching JWKS");
        let jwks = self.refresh(issuer_url).await?;

        find_key(&jwks, kid).cloned().ok_or_else(|| {
            warn!(issuer = %issuer_url, kid = %kid, "Key not present in fresh JWKS");
            AuthError::NoMatchingKey
        })
    }

    /// Fetch the issuer's key set and replace the cached one.
    pub async fn refresh(&self, issuer_url: &str) -> Result<Arc<JwkSet>, AuthError> {
        let jwks = Arc::new(self.fetcher.fetch(&jwks_url(issuer_url)).await?);

        if jwks.keys.is_empty() {
            warn!(issuer = %issuer_url, "JWKS returned empty key set");
        }

        self.sets
            .write()
            .await
            .insert(issuer_url.to_string(), Arc::clone(&jwks));

        info!(issuer = %issuer_url, key_count = jwks.keys.len(), "JWKS cached");
        Ok(jwks)
    }

    /// Check if a key set is cached for the issuer.
    pub async fn is_cached(&self, issuer_url: &str) -> bool {
        self.sets.read().await.contains_key(issuer_url)
    }

    /// Drop the cached key set for the issuer.
    pub async fn invalidate(&self, issuer_url: &str) {
        if self.sets.write().await.remove(issuer_url).is_some() {
            debug!(issuer = %issuer_url, "JWKS cache entry invalidated");
        }
    }

    async fn cached_key(&self, issuer_url: &str, kid: &str) -> Option<Jwk> {
        let sets = self.sets.read().await;
        sets.get(issuer_url)
            .and_then(|jwks| find_key(jwks, kid))
            .cloned()
    }
}

fn find_key<'a>(jwks: &'a JwkSet, kid: &str) -> Option<&'a Jwk> {
    jwks.keys
        .iter()
        .find(|k| k.common.key_id.as_deref() == Some(kid))
}
