// Copyright 2025 Google LLC
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     https://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! A lazy, single-flight token cache.
//!
//! Unlike a background-refresh cache, nothing here ever runs unprompted:
//! the first caller to observe an expired (or absent) token performs the
//! refresh; concurrent callers queue on the same [tokio::sync::Mutex] and
//! observe its result, rather than each starting their own STS round-trip.

use crate::Result;
use crate::token::{Token, TokenProvider};
use tokio::sync::Mutex;
use tokio::time::Instant;

/// The margin subtracted from a token's expiry to decide it needs refreshing
/// a little early, so a caller never hands out a token that expires mid-request.
const EXPIRY_SKEW: std::time::Duration = std::time::Duration::from_secs(30);

#[derive(Debug)]
pub(crate) struct TokenCache<P> {
    provider: P,
    cached: Mutex<Option<Token>>,
}

impl<P> TokenCache<P>
where
    P: TokenProvider,
{
    pub(crate) fn new(provider: P) -> Self {
        Self {
            provider,
            cached: Mutex::new(None),
        }
    }

    /// Returns a valid token, refreshing through the wrapped provider if the
    /// cached one is missing or within [EXPIRY_SKEW] of expiring.
    pub(crate) async fn token(&self) -> Result<Token> {
        let mut guard = self.cached.lock().await;
        if let Some(token) = guard.as_ref() {
            if is_fresh(token) {
                return Ok(token.clone());
            }
        }
        tracing::debug!("refreshing cached token");
        let fresh = self.provider.token().await?;
        *guard = Some(fresh.clone());
        Ok(fresh)
    }
}

fn is_fresh(token: &Token) -> bool {
    match token.expires_at {
        None => true,
        Some(expires_at) => expires_at.checked_duration_since(Instant::now()) > Some(EXPIRY_SKEW),
    }
}

#[async_trait::async_trait]
impl<P> TokenProvider for TokenCache<P>
where
    P: TokenProvider,
{
    async fn token(&self) -> Result<Token> {
        TokenCache::token(self).await
    }
}
