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

//! Service-account impersonation via the IAM Credentials
//! `generateAccessToken` API.

use crate::Result;
use crate::clock::Clock;
use crate::errors::CredentialsError;
use crate::http_request::{HttpRequestHandler, Request};
use crate::token::{Token, TokenProvider};
use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Exchanges a source credential's access token for a delegated
/// service-account token at `service_account_impersonation_url`.
///
/// The source is *the same credential type*, constructed without its own
/// impersonation URL (I3/the depth-1 recursion rule in the impersonation
/// design note); it is expressed here as any [TokenProvider] so this module
/// does not need to know about `ExternalAccountCredential` concretely.
#[derive(Debug)]
pub(crate) struct ImpersonatedTokenProvider {
    source: Arc<dyn TokenProvider>,
    transport: Arc<dyn HttpRequestHandler>,
    clock: Arc<dyn Clock>,
    iam_endpoint: String,
    scopes: Vec<String>,
    lifetime: Duration,
}

impl ImpersonatedTokenProvider {
    pub(crate) fn new(
        source: Arc<dyn TokenProvider>,
        transport: Arc<dyn HttpRequestHandler>,
        clock: Arc<dyn Clock>,
        iam_endpoint: String,
        scopes: Vec<String>,
        lifetime: Duration,
    ) -> Self {
        Self {
            source,
            transport,
            clock,
            iam_endpoint,
            scopes,
            lifetime,
        }
    }
}

#[derive(Serialize)]
struct GenerateAccessTokenRequest {
    scope: Vec<String>,
    lifetime: String,
}

#[derive(Deserialize)]
struct GenerateAccessTokenResponse {
    #[serde(rename = "accessToken")]
    access_token: String,
    #[serde(rename = "expireTime")]
    expire_time: String,
}

const FAILURE_MESSAGE: &str = "Unable to acquire impersonated credentials";

#[async_trait::async_trait]
impl TokenProvider for ImpersonatedTokenProvider {
    async fn token(&self) -> Result<Token> {
        let source_token = self
            .source
            .token()
            .await
            .map_err(|e| CredentialsError::new(e.is_transient(), FAILURE_MESSAGE, e))?;

        let body = serde_json::to_vec(&GenerateAccessTokenRequest {
            scope: self.scopes.clone(),
            lifetime: format!("{}s", self.lifetime.as_secs()),
        })
        .map_err(|e| CredentialsError::new(false, FAILURE_MESSAGE, e))?;

        let request = Request::new(Method::POST, self.iam_endpoint.clone())
            .with_header(CONTENT_TYPE, "application/json")
            .with_header(AUTHORIZATION, &format!("Bearer {}", source_token.token))
            .with_body(body);

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            tracing::warn!(status = %response.status, endpoint = %self.iam_endpoint, "impersonation request failed");
            return Err(CredentialsError::from_msg(
                true,
                format!(
                    "{FAILURE_MESSAGE}: status {}: {}",
                    response.status,
                    response.text()
                ),
            ));
        }
        let decoded: GenerateAccessTokenResponse = response
            .json()
            .map_err(|e| CredentialsError::new(false, FAILURE_MESSAGE, e))?;

        let expire_time = time::OffsetDateTime::parse(
            &decoded.expire_time,
            &time::format_description::well_known::Rfc3339,
        )
        .map_err(|e| CredentialsError::new(false, FAILURE_MESSAGE, e))?;
        let now = self.clock.now();
        let remaining = (expire_time - now).max(time::Duration::ZERO);
        let expires_at = tokio::time::Instant::now()
            + Duration::from_secs(remaining.whole_seconds().max(0) as u64);

        Ok(Token {
            token: decoded.access_token,
            token_type: "Bearer".to_string(),
            expires_at: Some(expires_at),
            metadata: None,
        })
    }
}
