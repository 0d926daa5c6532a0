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

//! The `external_account_authorized_user` credential (C10): an end-user
//! refresh token exchanged at the Security Token Service, grounded on
//! `external_account_authorized_user.py`.

use crate::Result;
use crate::build_errors::Error as ConfigError;
use crate::client_auth::ClientAuthentication;
use crate::constants::{
    DEFAULT_AUTHORIZED_USER_TOKEN_URL, EXTERNAL_ACCOUNT_AUTHORIZED_USER_JSON_TYPE,
};
use crate::credentials::Credentials;
use crate::credentials::internal::sts_exchange::{RefreshAccessTokenRequest, StsHandler};
use crate::http_request::{HttpRequestHandler, Request, default_transport};
use crate::token::{Token, TokenProvider};
use crate::token_cache::TokenCache;
use crate::allowlist;
use http::Method;
use http::header::CONTENT_TYPE;
use serde::Deserialize;
use serde_json::{Value, json};
use std::sync::Arc;
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{Duration, Instant};

/// An end-user credential: exchanges a long-lived OAuth refresh token for a
/// short-lived access token at the STS endpoint, rotating the refresh token
/// when the response carries a new one.
#[derive(Debug)]
pub struct AuthorizedUserCredential {
    token_url: String,
    revoke_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    quota_project_id: Option<String>,
    refresh_token: Arc<AsyncMutex<String>>,
    transport: Arc<dyn HttpRequestHandler>,
    cache: TokenCache<AuthorizedUserTokenProvider>,
}

impl AuthorizedUserCredential {
    fn new(
        refresh_token: String,
        token_url: String,
        revoke_url: Option<String>,
        client_id: Option<String>,
        client_secret: Option<String>,
        quota_project_id: Option<String>,
        transport: Arc<dyn HttpRequestHandler>,
    ) -> std::result::Result<Self, ConfigError> {
        if !allowlist::is_valid(&allowlist::STS_PATTERNS, &token_url) {
            return Err(ConfigError::invalid_url("token_url", token_url));
        }
        let refresh_token = Arc::new(AsyncMutex::new(refresh_token));
        let client_auth = match (&client_id, &client_secret) {
            (Some(id), Some(secret)) => Some(ClientAuthentication::new(id.clone(), secret.clone())),
            _ => None,
        };
        let provider = AuthorizedUserTokenProvider {
            sts: StsHandler::new(transport.clone()),
            token_url: token_url.clone(),
            client_auth,
            refresh_token: refresh_token.clone(),
        };
        Ok(Self {
            token_url,
            revoke_url,
            client_id,
            client_secret,
            quota_project_id,
            refresh_token,
            transport,
            cache: TokenCache::new(provider),
        })
    }

    /// Builds a credential from its JSON `external_account_authorized_user`
    /// representation.
    pub fn from_info(info: Value) -> std::result::Result<Self, ConfigError> {
        Self::from_info_with_transport(info, default_transport())
    }

    pub(crate) fn from_info_with_transport(
        info: Value,
        transport: Arc<dyn HttpRequestHandler>,
    ) -> std::result::Result<Self, ConfigError> {
        let wire: WireInfo = serde_json::from_value(info).map_err(ConfigError::parsing)?;
        if wire.type_ != EXTERNAL_ACCOUNT_AUTHORIZED_USER_JSON_TYPE {
            return Err(ConfigError::unknown_type(wire.type_));
        }
        if wire.refresh_token.trim().is_empty() {
            return Err(ConfigError::missing_field("refresh_token"));
        }
        Self::new(
            wire.refresh_token,
            wire.token_url.unwrap_or_else(|| DEFAULT_AUTHORIZED_USER_TOKEN_URL.to_string()),
            wire.revoke_url,
            wire.client_id,
            wire.client_secret,
            wire.quota_project_id,
            transport,
        )
    }

    /// Reads a JSON `external_account_authorized_user` file and delegates to
    /// [Self::from_info].
    pub async fn from_file(path: impl AsRef<std::path::Path>) -> std::result::Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::loading)?;
        let value: Value = serde_json::from_str(&content).map_err(ConfigError::parsing)?;
        Self::from_info(value)
    }

    /// The `external_account_authorized_user` JSON representation of this
    /// credential, with the *current* (possibly rotated) refresh token.
    pub fn info(&self) -> Value {
        let refresh_token = self
            .refresh_token
            .try_lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        let mut value = json!({
            "type": EXTERNAL_ACCOUNT_AUTHORIZED_USER_JSON_TYPE,
            "refresh_token": refresh_token,
            "token_url": self.token_url,
        });
        if let Some(url) = &self.revoke_url {
            value["revoke_url"] = json!(url);
        }
        if let Some(id) = &self.client_id {
            value["client_id"] = json!(id);
        }
        if let Some(secret) = &self.client_secret {
            value["client_secret"] = json!(secret);
        }
        if let Some(qpid) = &self.quota_project_id {
            value["quota_project_id"] = json!(qpid);
        }
        value
    }

    /// Returns a fresh credential with `quota_project_id` replaced.
    pub fn with_quota_project(&self, quota_project_id: String) -> std::result::Result<Self, ConfigError> {
        let refresh_token = self
            .refresh_token
            .try_lock()
            .map(|guard| guard.clone())
            .unwrap_or_default();
        Self::new(
            refresh_token,
            self.token_url.clone(),
            self.revoke_url.clone(),
            self.client_id.clone(),
            self.client_secret.clone(),
            Some(quota_project_id),
            self.transport.clone(),
        )
    }

    /// `true` for authorized-user credentials: they act on behalf of an end
    /// user, not a workload or service account.
    pub fn is_user(&self) -> bool {
        true
    }

    /// `false` for authorized-user credentials: the refresh-token grant
    /// carries no scope parameter.
    pub fn requires_scopes(&self) -> bool {
        false
    }

    /// Invalidates the current refresh token at `revoke_url`, if configured.
    pub async fn revoke(&self) -> Result<()> {
        let Some(revoke_url) = &self.revoke_url else {
            return Ok(());
        };
        let token = self.refresh_token.lock().await.clone();
        let body = url::form_urlencoded::Serializer::new(String::new())
            .append_pair("token", &token)
            .finish();
        let request = Request::new(Method::POST, revoke_url.clone())
            .with_header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .with_body(body.into_bytes());
        self.transport.execute(request).await?;
        Ok(())
    }
}

#[async_trait::async_trait]
impl Credentials for AuthorizedUserCredential {
    async fn token(&self) -> Result<Token> {
        self.cache.token().await
    }

    async fn headers(&self) -> Result<http::HeaderMap> {
        crate::credentials::bearer_headers(self.token().await?, self.quota_project_id.as_deref())
    }

    fn is_user(&self) -> bool {
        AuthorizedUserCredential::is_user(self)
    }
}

#[derive(Debug)]
struct AuthorizedUserTokenProvider {
    sts: StsHandler,
    token_url: String,
    client_auth: Option<ClientAuthentication>,
    refresh_token: Arc<AsyncMutex<String>>,
}

#[async_trait::async_trait]
impl TokenProvider for AuthorizedUserTokenProvider {
    async fn token(&self) -> Result<Token> {
        let current_refresh_token = self.refresh_token.lock().await.clone();
        let request = RefreshAccessTokenRequest {
            url: self.token_url.clone(),
            authentication: self.client_auth.clone(),
            refresh_token: current_refresh_token,
        };
        let response = self.sts.refresh_token(request).await?;
        if let Some(rotated) = &response.refresh_token {
            *self.refresh_token.lock().await = rotated.clone();
        }
        Ok(Token {
            token: response.access_token,
            token_type: if response.token_type.is_empty() {
                "Bearer".to_string()
            } else {
                response.token_type
            },
            expires_at: Some(Instant::now() + Duration::from_secs(response.expires_in)),
            metadata: None,
        })
    }
}

#[derive(Deserialize)]
struct WireInfo {
    #[serde(rename = "type")]
    type_: String,
    refresh_token: String,
    token_url: Option<String>,
    revoke_url: Option<String>,
    client_id: Option<String>,
    client_secret: Option<String>,
    quota_project_id: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_request::Response;
    use crate::http_request::tests::MockTransport;
    use http::StatusCode;
    use serde_json::json;

    fn info() -> Value {
        json!({
            "type": "external_account_authorized_user",
            "refresh_token": "rt-1",
            "token_url": "https://sts.googleapis.com/v1/oauthtoken",
            "client_id": "client_id",
            "client_secret": "supersecret",
        })
    }

    fn transport_with(body: &str) -> Arc<dyn HttpRequestHandler> {
        Arc::new(MockTransport::with_responses(vec![Ok(Response {
            status: StatusCode::OK,
            headers: http::HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        })]))
    }

    #[tokio::test]
    async fn refreshes_and_rotates_refresh_token() {
        let response = r#"{"access_token":"AT","issued_token_type":"urn:ietf:params:oauth:token-type:access_token","token_type":"Bearer","expires_in":3600,"refresh_token":"rt-2"}"#;
        let credential =
            AuthorizedUserCredential::from_info_with_transport(info(), transport_with(response)).unwrap();
        let token = credential.token().await.unwrap();
        assert_eq!(token.token, "AT");
        assert_eq!(credential.info()["refresh_token"], json!("rt-2"));
        assert!(credential.is_user());
        assert!(!credential.requires_scopes());
    }

    #[test]
    fn empty_refresh_token_is_rejected() {
        let mut value = info();
        value["refresh_token"] = json!("");
        let err = AuthorizedUserCredential::from_info(value).unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn non_allowlisted_token_url_is_rejected() {
        let mut value = info();
        value["token_url"] = json!("https://evil.example.com/token");
        let err = AuthorizedUserCredential::from_info(value).unwrap_err();
        assert!(err.is_invalid_url());
    }
}
