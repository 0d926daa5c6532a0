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

//! External account and authorized-user credentials.
//!
//! This crate does not implement the full [Application Default Credentials
//! (ADC)][adc] hierarchy: it covers only the two credential types exchanged
//! through the Security Token Service, `external_account` and
//! `external_account_authorized_user`. [load_credentials_from_file] and
//! [load_credentials_from_env] are a thin convenience layer on top of those
//! two types' own `from_file`/`from_info` constructors.
//!
//! [adc]: https://cloud.google.com/docs/authentication/application-default-credentials

pub mod authorized_user;
pub mod external_account;
pub(crate) mod external_account_sources;
pub(crate) mod impersonated;
pub(crate) mod internal;
pub mod subject_token;

use crate::Result;
use crate::build_errors::Error as ConfigError;
use crate::constants::{GOOGLE_APPLICATION_CREDENTIALS_VAR, GOOGLE_CLOUD_QUOTA_PROJECT_VAR};
use crate::token::Token;
use authorized_user::AuthorizedUserCredential;
use external_account::ExternalAccountCredential;
use http::HeaderMap;
use http::header::{AUTHORIZATION, HeaderValue};

/// The header used to attribute billing/quota to a project other than the
/// one implied by the credential itself.
pub(crate) const QUOTA_PROJECT_KEY: &str = "x-goog-user-project";

/// Something that can produce `Authorization` headers for an outgoing
/// request, refreshing its underlying token as needed.
///
/// Implemented by [ExternalAccountCredential] and [AuthorizedUserCredential].
/// Both forward their actual refresh logic to a private [crate::token::TokenProvider]
/// wrapped in a [crate::token_cache::TokenCache]; this trait is the public,
/// object-safe seam applications and `load_credentials_from_file` program
/// against.
#[async_trait::async_trait]
pub trait Credentials: std::fmt::Debug + Send + Sync {
    /// Returns a valid access token, refreshing if necessary.
    async fn token(&self) -> Result<Token>;

    /// Returns the HTTP headers (namely `Authorization`, and `x-goog-user-project`
    /// when a quota project is configured) to attach to an outgoing request.
    async fn headers(&self) -> Result<HeaderMap>;

    /// The Google Cloud project ID associated with this credential, if one
    /// can be determined. Not every credential type can answer this.
    async fn get_project_id(&self) -> Result<Option<String>> {
        Ok(None)
    }

    /// `true` iff this credential represents an end user rather than a
    /// workload or service account.
    fn is_user(&self) -> bool {
        false
    }
}

/// Builds the standard `Authorization: Bearer ...` (and, when configured,
/// `x-goog-user-project`) header set for `token`.
pub(crate) fn bearer_headers(token: Token, quota_project_id: Option<&str>) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    let mut value = HeaderValue::try_from(format!("Bearer {}", token.token))
        .map_err(|e| crate::errors::CredentialsError::from_source(false, e))?;
    value.set_sensitive(true);
    headers.insert(AUTHORIZATION, value);
    if let Some(quota_project_id) = quota_project_id {
        if let Ok(value) = HeaderValue::try_from(quota_project_id) {
            headers.insert(QUOTA_PROJECT_KEY, value);
        }
    }
    Ok(headers)
}

/// Loads a credential from a JSON file, dispatching on its `type` field.
///
/// Falls back to `GOOGLE_CLOUD_QUOTA_PROJECT` when the JSON carries no
/// `quota_project_id` of its own.
pub async fn load_credentials_from_file(
    path: impl AsRef<std::path::Path>,
) -> std::result::Result<Box<dyn Credentials>, ConfigError> {
    let content = tokio::fs::read_to_string(path.as_ref())
        .await
        .map_err(ConfigError::loading)?;
    let info: serde_json::Value = serde_json::from_str(&content).map_err(ConfigError::parsing)?;
    load_credentials_from_value(info)
}

/// Checks `GOOGLE_APPLICATION_CREDENTIALS` and delegates to
/// [load_credentials_from_file] when it is set; returns `None` when the
/// variable is unset, so callers can fall back to another credential source.
pub async fn load_credentials_from_env()
-> Option<std::result::Result<Box<dyn Credentials>, ConfigError>> {
    let path = std::env::var(GOOGLE_APPLICATION_CREDENTIALS_VAR).ok()?;
    Some(load_credentials_from_file(path).await)
}

fn load_credentials_from_value(
    info: serde_json::Value,
) -> std::result::Result<Box<dyn Credentials>, ConfigError> {
    let credential_type = info
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or_else(|| ConfigError::missing_field("type"))?
        .to_string();

    let fallback_quota_project = std::env::var(GOOGLE_CLOUD_QUOTA_PROJECT_VAR).ok();

    match credential_type.as_str() {
        "external_account" => {
            let mut credential = ExternalAccountCredential::from_info(info)?;
            if credential.info()["quota_project_id"].is_null() {
                if let Some(quota_project_id) = fallback_quota_project {
                    credential = credential.with_quota_project(quota_project_id)?;
                }
            }
            Ok(Box::new(credential))
        }
        "external_account_authorized_user" => {
            let mut credential = AuthorizedUserCredential::from_info(info)?;
            if credential.info()["quota_project_id"].is_null() {
                if let Some(quota_project_id) = fallback_quota_project {
                    credential = credential.with_quota_project(quota_project_id)?;
                }
            }
            Ok(Box::new(credential))
        }
        other => Err(ConfigError::unknown_type(other.to_string())),
    }
}
