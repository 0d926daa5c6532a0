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

//! The OAuth 2.0 Token Exchange client (RFC 8693).
//!
//! `STSHandler` is the only piece of the crate that knows the STS wire
//! format; external account and workforce pool credentials build a request
//! and hand it here.

use crate::Result;
use crate::client_auth::ClientAuthentication;
use crate::constants::{
    ACCESS_TOKEN_TYPE, REFRESH_TOKEN_GRANT_TYPE, TOKEN_EXCHANGE_GRANT_TYPE,
};
use crate::errors::{CredentialsError, OAuthError};
use crate::allowlist;
use crate::http_request::{HttpRequestHandler, Request};
use http::Method;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use serde::Deserialize;
use std::collections::HashMap;
use std::sync::Arc;

/// Handles OAuth 2.0 Secure Token Service (STS) exchange.
///
/// Reference: <https://datatracker.ietf.org/doc/html/rfc8693>
#[derive(Clone, Debug)]
pub(crate) struct StsHandler {
    transport: Arc<dyn HttpRequestHandler>,
}

impl StsHandler {
    pub(crate) fn new(transport: Arc<dyn HttpRequestHandler>) -> Self {
        Self { transport }
    }

    /// Performs the refresh-token flow against `req.token_url`.
    pub(crate) async fn refresh_token(
        &self,
        req: RefreshAccessTokenRequest,
    ) -> Result<TokenResponse> {
        let mut params: HashMap<&str, String> = HashMap::new();
        params.insert("grant_type", REFRESH_TOKEN_GRANT_TYPE.to_string());
        params.insert("refresh_token", req.refresh_token);
        self.execute(req.url, req.authentication, params).await
    }

    /// Performs the token-exchange flow against `req.url`.
    pub(crate) async fn exchange_token(&self, req: ExchangeTokenRequest) -> Result<TokenResponse> {
        let mut params: HashMap<&str, String> = HashMap::new();
        params.insert("grant_type", TOKEN_EXCHANGE_GRANT_TYPE.to_string());
        params.insert("requested_token_type", ACCESS_TOKEN_TYPE.to_string());
        params.insert("subject_token", req.subject_token);
        params.insert("subject_token_type", req.subject_token_type);

        if !req.scope.is_empty() {
            params.insert("scope", req.scope.join(" "));
        }
        if let Some(audience) = req.audience {
            params.insert("audience", audience);
        }
        if let Some(resource) = req.resource {
            params.insert("resource", resource);
        }
        if let Some(actor_token) = req.actor_token {
            params.insert("actor_token", actor_token);
        }
        if let Some(actor_token_type) = req.actor_token_type {
            params.insert("actor_token_type", actor_token_type);
        }
        if let Some(options) = req.extra_options {
            if let Ok(value) = serde_json::to_value(options) {
                params.insert("options", value.to_string());
            }
        }

        self.execute(req.url, req.authentication, params).await
    }

    async fn execute(
        &self,
        url: String,
        client_auth: Option<ClientAuthentication>,
        params: HashMap<&str, String>,
    ) -> Result<TokenResponse> {
        if !allowlist::is_valid(&allowlist::STS_PATTERNS, &url) {
            return Err(CredentialsError::from_msg(
                false,
                format!("token_url `{url}` is not an allow-listed STS endpoint"),
            ));
        }

        let body = {
            let mut serializer = url::form_urlencoded::Serializer::new(String::new());
            for (key, value) in &params {
                serializer.append_pair(key, value);
            }
            serializer.finish()
        };

        let mut request = Request::new(Method::POST, url)
            .with_header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .with_body(body.into_bytes());
        if let Some(auth) = client_auth {
            request = request.with_header(AUTHORIZATION, &auth.basic_auth_header());
        }

        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            let status = response.status;
            tracing::warn!(%status, "STS request failed");
            return Err(match response.json::<OAuthError>() {
                Ok(oauth_err) => CredentialsError::new(
                    false,
                    format!("STS token exchange failed with status {status}"),
                    oauth_err,
                ),
                Err(_) => CredentialsError::from_msg(
                    false,
                    format!(
                        "STS token exchange failed with status {status}: {}",
                        response.text()
                    ),
                ),
            });
        }
        response.json::<TokenResponse>()
    }
}

/// The decoded STS token endpoint response.
#[derive(Deserialize, Default, PartialEq, Debug, Clone)]
pub(crate) struct TokenResponse {
    pub access_token: String,
    pub issued_token_type: String,
    pub token_type: String,
    pub expires_in: u64,
    #[serde(default)]
    pub scope: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

/// Information required to perform a token exchange against the STS endpoint.
#[derive(Default)]
pub(crate) struct ExchangeTokenRequest {
    pub url: String,
    pub authentication: Option<ClientAuthentication>,
    pub resource: Option<String>,
    pub subject_token: String,
    pub subject_token_type: String,
    pub audience: Option<String>,
    pub scope: Vec<String>,
    pub actor_token: Option<String>,
    pub actor_token_type: Option<String>,
    pub extra_options: Option<HashMap<String, String>>,
}

/// Information required to perform the refresh-token flow.
#[derive(Default)]
pub(crate) struct RefreshAccessTokenRequest {
    pub url: String,
    pub authentication: Option<ClientAuthentication>,
    pub refresh_token: String,
}
