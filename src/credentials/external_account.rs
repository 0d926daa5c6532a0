// Copyright 2024 Google LLC
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

//! The external account credential (C8): composes a subject-token supplier,
//! the STS client, and optional service-account impersonation.

use crate::Result;
use crate::build_errors::Error as ConfigError;
use crate::clock::{Clock, SystemClock};
use crate::constants::{
    DEFAULT_IMPERSONATION_LIFETIME_SECS, EXTERNAL_ACCOUNT_JSON_TYPE,
    MAX_EXECUTABLE_TIMEOUT_MILLIS, MAX_INTERACTIVE_TIMEOUT_MILLIS, MIN_EXECUTABLE_TIMEOUT_MILLIS,
    MIN_INTERACTIVE_TIMEOUT_MILLIS, WORKFORCE_POOL_AUDIENCE_PATTERN,
};
use crate::credentials::Credentials;
use crate::credentials::external_account_sources::CredentialFormat;
use crate::credentials::external_account_sources::executable_sourced::{
    ExecutableConfig, ExecutableSourcedCredentials,
};
use crate::credentials::external_account_sources::file_sourced::FileSourcedCredentials;
use crate::credentials::external_account_sources::url_sourced::UrlSourcedCredentials;
use crate::credentials::impersonated::ImpersonatedTokenProvider;
use crate::credentials::internal::sts_exchange::{ExchangeTokenRequest, StsHandler};
use crate::credentials::subject_token::SubjectToken;
use crate::http_request::{HttpRequestHandler, Request, default_transport};
use crate::token::{Token, TokenProvider};
use crate::token_cache::TokenCache;
use crate::{allowlist, client_auth::ClientAuthentication};
use http::Method;
use http::header::AUTHORIZATION;
use serde::Deserialize;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::sync::{Arc, LazyLock};
use tokio::sync::Mutex as AsyncMutex;
use tokio::time::{Duration, Instant};

static WORKFORCE_POOL_AUDIENCE_REGEX: LazyLock<regex::Regex> =
    LazyLock::new(|| regex::Regex::new(WORKFORCE_POOL_AUDIENCE_PATTERN).unwrap());

/// Validated, immutable configuration for an [ExternalAccountCredential].
#[derive(Debug, Clone)]
pub(crate) struct Config {
    pub audience: String,
    pub subject_token_type: String,
    pub token_url: String,
    pub credential_source: CredentialSourceConfig,
    pub service_account_impersonation_url: Option<String>,
    pub impersonation_lifetime: Duration,
    pub client_id: Option<String>,
    pub client_secret: Option<String>,
    pub quota_project_id: Option<String>,
    pub scopes: Option<Vec<String>>,
    pub default_scopes: Option<Vec<String>>,
    pub workforce_pool_user_project: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) enum CredentialSourceConfig {
    File {
        file: String,
        format: CredentialFormat,
    },
    Url {
        url: String,
        headers: HashMap<String, String>,
        format: CredentialFormat,
    },
    Executable(ExecutableConfig),
}

/// An external account credential: obtains a Google Cloud access token by
/// exchanging a subject token (from a file, a URL, or a local executable) at
/// the Security Token Service, optionally chaining into service-account
/// impersonation.
#[derive(Debug)]
pub struct ExternalAccountCredential {
    config: Config,
    transport: Arc<dyn HttpRequestHandler>,
    clock: Arc<dyn Clock>,
    cache: TokenCache<TokenProviderKind>,
    project_id: AsyncMutex<Option<String>>,
}

impl ExternalAccountCredential {
    pub(crate) fn new(
        config: Config,
        transport: Arc<dyn HttpRequestHandler>,
        clock: Arc<dyn Clock>,
    ) -> std::result::Result<Self, ConfigError> {
        validate(&config)?;
        let provider = build_token_provider(&config, transport.clone(), clock.clone());
        Ok(Self {
            config,
            transport,
            clock,
            cache: TokenCache::new(provider),
            project_id: AsyncMutex::new(None),
        })
    }

    /// Builds a credential from its JSON `external_account` representation.
    pub fn from_info(info: Value) -> std::result::Result<Self, ConfigError> {
        Self::from_info_with_transport(info, default_transport())
    }

    pub(crate) fn from_info_with_transport(
        info: Value,
        transport: Arc<dyn HttpRequestHandler>,
    ) -> std::result::Result<Self, ConfigError> {
        let wire: WireInfo = serde_json::from_value(info).map_err(ConfigError::parsing)?;
        if wire.type_ != EXTERNAL_ACCOUNT_JSON_TYPE {
            return Err(ConfigError::unknown_type(wire.type_));
        }
        if wire.credential_source.environment_id.is_some() {
            return Err(ConfigError::disallowed_field("environment_id"));
        }

        let format = parse_format(wire.credential_source.format)?;
        let source_count = [
            wire.credential_source.file.is_some(),
            wire.credential_source.url.is_some(),
            wire.credential_source.executable.is_some(),
        ]
        .iter()
        .filter(|set| **set)
        .count();
        if source_count == 0 {
            return Err(ConfigError::missing_field("credential_source"));
        }
        if source_count > 1 {
            return Err(ConfigError::mutually_exclusive("file", "url"));
        }

        let credential_source = if let Some(file) = wire.credential_source.file {
            CredentialSourceConfig::File { file, format }
        } else if let Some(url) = wire.credential_source.url {
            CredentialSourceConfig::Url {
                url,
                headers: wire.credential_source.headers.unwrap_or_default(),
                format,
            }
        } else {
            let executable = wire.credential_source.executable.unwrap();
            let command = executable
                .command
                .ok_or_else(|| ConfigError::missing_field("credential_source.executable.command"))?;
            CredentialSourceConfig::Executable(ExecutableConfig {
                command: Some(command),
                timeout_millis: executable.timeout_millis,
                interactive_timeout_millis: executable.interactive_timeout_millis,
                output_file: executable.output_file,
            })
        };

        let config = Config {
            audience: wire.audience,
            subject_token_type: wire.subject_token_type,
            token_url: wire.token_url,
            credential_source,
            service_account_impersonation_url: wire.service_account_impersonation_url,
            impersonation_lifetime: Duration::from_secs(
                wire.service_account_impersonation
                    .and_then(|o| o.token_lifetime_seconds)
                    .unwrap_or(DEFAULT_IMPERSONATION_LIFETIME_SECS),
            ),
            client_id: wire.client_id,
            client_secret: wire.client_secret,
            quota_project_id: wire.quota_project_id,
            scopes: None,
            default_scopes: None,
            workforce_pool_user_project: wire.workforce_pool_user_project,
        };
        Self::new(config, transport, Arc::new(SystemClock))
    }

    /// Reads a JSON `external_account` file and delegates to [Self::from_info].
    pub async fn from_file(path: impl AsRef<std::path::Path>) -> std::result::Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path)
            .await
            .map_err(ConfigError::loading)?;
        let value: Value = serde_json::from_str(&content).map_err(ConfigError::parsing)?;
        Self::from_info(value)
    }

    /// The `external_account` JSON representation of this credential.
    pub fn info(&self) -> Value {
        let mut credential_source = json!({});
        match &self.config.credential_source {
            CredentialSourceConfig::File { file, format } => {
                credential_source["file"] = json!(file);
                merge_format(&mut credential_source, format);
            }
            CredentialSourceConfig::Url { url, headers, format } => {
                credential_source["url"] = json!(url);
                if !headers.is_empty() {
                    credential_source["headers"] = json!(headers);
                }
                merge_format(&mut credential_source, format);
            }
            CredentialSourceConfig::Executable(executable) => {
                let mut exe = json!({ "command": executable.command });
                if let Some(timeout) = executable.timeout_millis {
                    exe["timeout_millis"] = json!(timeout);
                }
                if let Some(timeout) = executable.interactive_timeout_millis {
                    exe["interactive_timeout_millis"] = json!(timeout);
                }
                if let Some(output_file) = &executable.output_file {
                    exe["output_file"] = json!(output_file);
                }
                credential_source["executable"] = exe;
            }
        }

        let mut value = json!({
            "type": EXTERNAL_ACCOUNT_JSON_TYPE,
            "audience": self.config.audience,
            "subject_token_type": self.config.subject_token_type,
            "token_url": self.config.token_url,
            "credential_source": credential_source,
        });
        if let Some(url) = &self.config.service_account_impersonation_url {
            value["service_account_impersonation_url"] = json!(url);
            value["service_account_impersonation"] =
                json!({ "token_lifetime_seconds": self.config.impersonation_lifetime.as_secs() });
        }
        if let Some(id) = &self.config.client_id {
            value["client_id"] = json!(id);
        }
        if let Some(secret) = &self.config.client_secret {
            value["client_secret"] = json!(secret);
        }
        if let Some(qpid) = &self.config.quota_project_id {
            value["quota_project_id"] = json!(qpid);
        }
        if self.is_workforce_pool() {
            if let Some(user_project) = &self.config.workforce_pool_user_project {
                value["workforce_pool_user_project"] = json!(user_project);
            }
        }
        value
    }

    /// `true` iff `audience` identifies a workforce pool (AIP-4117).
    pub fn is_workforce_pool(&self) -> bool {
        WORKFORCE_POOL_AUDIENCE_REGEX.is_match(&self.config.audience)
    }

    /// `false` for external account credentials: they always act on behalf of
    /// a workload or workforce identity, never an end user.
    pub fn is_user(&self) -> bool {
        false
    }

    /// `true` for external account credentials: a scope list is required to
    /// mint an access token.
    pub fn requires_scopes(&self) -> bool {
        true
    }

    /// The service account being impersonated, parsed out of
    /// `service_account_impersonation_url`; `None` when not impersonating.
    pub fn service_account_email(&self) -> Option<String> {
        let url = self.config.service_account_impersonation_url.as_ref()?;
        let last_slash = url.rfind('/')?;
        let suffix = &url[last_slash + 1..];
        suffix.strip_suffix(":generateAccessToken").map(str::to_string)
    }

    /// Returns a fresh credential with `scopes` (and optionally
    /// `default_scopes`) replaced; the original is left untouched (I5).
    pub fn with_scopes(
        &self,
        scopes: Vec<String>,
        default_scopes: Option<Vec<String>>,
    ) -> std::result::Result<Self, ConfigError> {
        self.derive(|config| {
            config.scopes = Some(scopes);
            if default_scopes.is_some() {
                config.default_scopes = default_scopes;
            }
        })
    }

    /// Returns a fresh credential with `quota_project_id` replaced.
    pub fn with_quota_project(&self, quota_project_id: String) -> std::result::Result<Self, ConfigError> {
        self.derive(|config| config.quota_project_id = Some(quota_project_id))
    }

    /// Returns a fresh credential with `token_url` replaced.
    pub fn with_token_uri(&self, token_url: String) -> std::result::Result<Self, ConfigError> {
        self.derive(|config| config.token_url = token_url)
    }

    fn derive(
        &self,
        mutate: impl FnOnce(&mut Config),
    ) -> std::result::Result<Self, ConfigError> {
        let mut config = self.config.clone();
        mutate(&mut config);
        if !WORKFORCE_POOL_AUDIENCE_REGEX.is_match(&config.audience) {
            config.workforce_pool_user_project = None;
        }
        Self::new(config, self.transport.clone(), self.clock.clone())
    }

    fn effective_scopes(&self) -> Vec<String> {
        self.config
            .scopes
            .clone()
            .or_else(|| self.config.default_scopes.clone())
            .unwrap_or_default()
    }

    /// Looks up the Cloud Resource Manager project ID for this credential's
    /// audience, memoizing the result. Returns `None` (not an error) on any
    /// failure, per the spec's "no error" contract for this lookup.
    pub async fn get_project_id(&self) -> Result<Option<String>> {
        if let Some(cached) = self.project_id.lock().await.clone() {
            return Ok(Some(cached));
        }
        if self.effective_scopes().is_empty() {
            return Ok(None);
        }
        let Some(project_number) = project_number_from_audience(&self.config.audience)
            .or_else(|| self.config.workforce_pool_user_project.clone())
        else {
            return Ok(None);
        };
        let Ok(token) = self.cache.token().await else {
            return Ok(None);
        };
        let request = Request::new(
            Method::GET,
            format!("https://cloudresourcemanager.googleapis.com/v1/projects/{project_number}"),
        )
        .with_header(AUTHORIZATION, &format!("Bearer {}", token.token));
        let Ok(response) = self.transport.execute(request).await else {
            return Ok(None);
        };
        if !response.is_success() {
            return Ok(None);
        }
        #[derive(Deserialize)]
        struct ProjectResponse {
            #[serde(rename = "projectId")]
            project_id: Option<String>,
        }
        let Ok(decoded) = response.json::<ProjectResponse>() else {
            return Ok(None);
        };
        if let Some(id) = &decoded.project_id {
            *self.project_id.lock().await = Some(id.clone());
        }
        Ok(decoded.project_id)
    }
}

#[async_trait::async_trait]
impl Credentials for ExternalAccountCredential {
    async fn token(&self) -> Result<Token> {
        self.cache.token().await
    }

    async fn headers(&self) -> Result<http::HeaderMap> {
        crate::credentials::bearer_headers(self.token().await?, self.config.quota_project_id.as_deref())
    }

    async fn get_project_id(&self) -> Result<Option<String>> {
        ExternalAccountCredential::get_project_id(self).await
    }

    fn is_user(&self) -> bool {
        ExternalAccountCredential::is_user(self)
    }
}

fn project_number_from_audience(audience: &str) -> Option<String> {
    let parts: Vec<&str> = audience.split('/').collect();
    let index = parts.iter().position(|segment| *segment == "projects")?;
    parts.get(index + 1).map(|s| s.to_string())
}

fn parse_format(format: Option<WireFormat>) -> std::result::Result<CredentialFormat, ConfigError> {
    match format {
        None => Ok(CredentialFormat::Text),
        Some(WireFormat {
            format_type: None, ..
        }) => Ok(CredentialFormat::Text),
        Some(WireFormat {
            format_type: Some(ref t),
            ..
        }) if t == "text" => Ok(CredentialFormat::Text),
        Some(WireFormat {
            format_type: Some(ref t),
            subject_token_field_name,
        }) if t == "json" => {
            let field = subject_token_field_name
                .ok_or_else(|| ConfigError::missing_field("credential_source.format.subject_token_field_name"))?;
            Ok(CredentialFormat::Json {
                subject_token_field_name: field,
            })
        }
        Some(WireFormat { format_type: Some(other), .. }) => {
            Err(ConfigError::parsing(format!("unsupported format type `{other}`")))
        }
    }
}

fn merge_format(value: &mut Value, format: &CredentialFormat) {
    match format {
        CredentialFormat::Text => {}
        CredentialFormat::Json {
            subject_token_field_name,
        } => {
            value["format"] = json!({
                "type": "json",
                "subject_token_field_name": subject_token_field_name,
            });
        }
    }
}

fn validate(config: &Config) -> std::result::Result<(), ConfigError> {
    if !allowlist::is_valid(&allowlist::STS_PATTERNS, &config.token_url) {
        return Err(ConfigError::invalid_url("token_url", config.token_url.clone()));
    }
    if let Some(url) = &config.service_account_impersonation_url {
        if !allowlist::is_valid(&allowlist::IAM_CREDENTIALS_PATTERNS, url) {
            return Err(ConfigError::invalid_url(
                "service_account_impersonation_url",
                url.clone(),
            ));
        }
    }
    if config.workforce_pool_user_project.is_some()
        && !WORKFORCE_POOL_AUDIENCE_REGEX.is_match(&config.audience)
    {
        return Err(ConfigError::disallowed_field("workforce_pool_user_project"));
    }
    if let CredentialSourceConfig::Executable(executable) = &config.credential_source {
        executable.timeout().map_err(|_| {
            ConfigError::out_of_range(
                "credential_source.executable.timeout_millis",
                MIN_EXECUTABLE_TIMEOUT_MILLIS as i64,
                MAX_EXECUTABLE_TIMEOUT_MILLIS as i64,
            )
        })?;
        executable.interactive_timeout().map_err(|_| {
            ConfigError::out_of_range(
                "credential_source.executable.interactive_timeout_millis",
                MIN_INTERACTIVE_TIMEOUT_MILLIS as i64,
                MAX_INTERACTIVE_TIMEOUT_MILLIS as i64,
            )
        })?;
    }
    Ok(())
}

#[derive(Debug)]
enum SubjectTokenSource {
    File(FileSourcedCredentials),
    Url(UrlSourcedCredentials),
    Executable(ExecutableSourcedCredentials),
}

impl SubjectTokenSource {
    async fn subject_token(&self) -> Result<SubjectToken> {
        match self {
            Self::File(source) => source.subject_token().await,
            Self::Url(source) => source.subject_token().await,
            Self::Executable(source) => source.subject_token(false).await,
        }
    }
}

#[derive(Debug)]
struct StsOnlyProvider {
    source: SubjectTokenSource,
    sts: StsHandler,
    audience: String,
    subject_token_type: String,
    token_url: String,
    client_auth: Option<ClientAuthentication>,
    scopes: Vec<String>,
    workforce_pool_user_project: Option<String>,
}

#[async_trait::async_trait]
impl TokenProvider for StsOnlyProvider {
    async fn token(&self) -> Result<Token> {
        let subject_token = self.source.subject_token().await?;

        let mut extra_options = None;
        if self.client_auth.is_none() {
            if let Some(user_project) = &self.workforce_pool_user_project {
                let mut options = HashMap::new();
                options.insert("userProject".to_string(), user_project.clone());
                extra_options = Some(options);
            }
        }

        let request = ExchangeTokenRequest {
            url: self.token_url.clone(),
            authentication: self.client_auth.clone(),
            subject_token: subject_token.token,
            subject_token_type: self.subject_token_type.clone(),
            audience: Some(self.audience.clone()),
            scope: self.scopes.clone(),
            extra_options,
            ..Default::default()
        };
        let response = self.sts.exchange_token(request).await?;
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

#[derive(Debug)]
enum TokenProviderKind {
    Direct(StsOnlyProvider),
    Impersonated(ImpersonatedTokenProvider),
}

#[async_trait::async_trait]
impl TokenProvider for TokenProviderKind {
    async fn token(&self) -> Result<Token> {
        match self {
            Self::Direct(provider) => provider.token().await,
            Self::Impersonated(provider) => provider.token().await,
        }
    }
}

fn build_token_provider(
    config: &Config,
    transport: Arc<dyn HttpRequestHandler>,
    clock: Arc<dyn Clock>,
) -> TokenProviderKind {
    let impersonation_email = config.service_account_impersonation_url.as_ref().and_then(|url| {
        let last_slash = url.rfind('/')?;
        url[last_slash + 1..]
            .strip_suffix(":generateAccessToken")
            .map(str::to_string)
    });

    let source = match &config.credential_source {
        CredentialSourceConfig::File { file, format } => {
            SubjectTokenSource::File(FileSourcedCredentials::new(file.clone(), format.clone()))
        }
        CredentialSourceConfig::Url { url, headers, format } => SubjectTokenSource::Url(
            UrlSourcedCredentials::new(url.clone(), headers.clone(), format.clone(), transport.clone()),
        ),
        CredentialSourceConfig::Executable(executable) => {
            SubjectTokenSource::Executable(ExecutableSourcedCredentials {
                executable: executable.clone(),
                audience: config.audience.clone(),
                subject_token_type: config.subject_token_type.clone(),
                service_account_impersonation_email: impersonation_email,
            })
        }
    };

    let client_auth = match (&config.client_id, &config.client_secret) {
        (Some(id), Some(secret)) => Some(ClientAuthentication::new(id.clone(), secret.clone())),
        _ => None,
    };
    let scopes = config
        .scopes
        .clone()
        .or_else(|| config.default_scopes.clone())
        .unwrap_or_default();

    let sts_only = StsOnlyProvider {
        source,
        sts: StsHandler::new(transport.clone()),
        audience: config.audience.clone(),
        subject_token_type: config.subject_token_type.clone(),
        token_url: config.token_url.clone(),
        client_auth,
        scopes: scopes.clone(),
        workforce_pool_user_project: config.workforce_pool_user_project.clone(),
    };

    match &config.service_account_impersonation_url {
        Some(url) => TokenProviderKind::Impersonated(ImpersonatedTokenProvider::new(
            Arc::new(sts_only),
            transport,
            clock,
            url.clone(),
            scopes,
            config.impersonation_lifetime,
        )),
        None => TokenProviderKind::Direct(sts_only),
    }
}

#[derive(Deserialize)]
struct WireInfo {
    #[serde(rename = "type")]
    type_: String,
    audience: String,
    subject_token_type: String,
    token_url: String,
    service_account_impersonation_url: Option<String>,
    service_account_impersonation: Option<WireImpersonationOptions>,
    credential_source: WireCredentialSource,
    client_id: Option<String>,
    client_secret: Option<String>,
    quota_project_id: Option<String>,
    workforce_pool_user_project: Option<String>,
}

#[derive(Deserialize)]
struct WireImpersonationOptions {
    token_lifetime_seconds: Option<u64>,
}

#[derive(Deserialize)]
struct WireCredentialSource {
    file: Option<String>,
    url: Option<String>,
    headers: Option<HashMap<String, String>>,
    format: Option<WireFormat>,
    executable: Option<WireExecutable>,
    environment_id: Option<String>,
}

#[derive(Deserialize)]
struct WireFormat {
    #[serde(rename = "type")]
    format_type: Option<String>,
    subject_token_field_name: Option<String>,
}

#[derive(Deserialize)]
struct WireExecutable {
    command: Option<String>,
    timeout_millis: Option<u64>,
    interactive_timeout_millis: Option<u64>,
    output_file: Option<String>,
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::http_request::Response;
    use crate::http_request::tests::MockTransport;
    use http::StatusCode;

    fn sts_response_transport(body: &str) -> Arc<dyn HttpRequestHandler> {
        Arc::new(MockTransport::with_responses(vec![Ok(Response {
            status: StatusCode::OK,
            headers: http::HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        })]))
    }

    fn file_sourced_info(file: &str) -> Value {
        json!({
            "type": "external_account",
            "audience": "//iam.googleapis.com/projects/123/locations/global/workloadIdentityPools/pool/providers/provider",
            "subject_token_type": "urn:ietf:params:oauth:token-type:jwt",
            "token_url": "https://sts.googleapis.com/v1/token",
            "credential_source": { "file": file },
        })
    }

    #[tokio::test]
    async fn file_sourced_text_token_round_trips_through_sts() {
        let file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file.as_file(), b"abc").unwrap();
        let response = r#"{"access_token":"AT","issued_token_type":"urn:ietf:params:oauth:token-type:access_token","token_type":"Bearer","expires_in":3600,"scope":""}"#;
        let credential = ExternalAccountCredential::from_info_with_transport(
            file_sourced_info(file.path().to_str().unwrap()),
            sts_response_transport(response),
        )
        .unwrap();
        let token = credential.token().await.unwrap();
        assert_eq!(token.token, "AT");
        assert!(!credential.is_user());
    }

    #[test]
    fn workforce_user_project_on_non_workforce_audience_is_rejected() {
        let mut info = file_sourced_info("/tmp/whatever");
        info["workforce_pool_user_project"] = json!("my-project");
        let err = ExternalAccountCredential::from_info(info).unwrap_err();
        assert!(err.is_disallowed_field());
    }

    #[test]
    fn both_file_and_url_is_rejected() {
        let mut info = file_sourced_info("/tmp/whatever");
        info["credential_source"]["url"] = json!("https://broker.example.com/token");
        let err = ExternalAccountCredential::from_info(info).unwrap_err();
        assert!(err.is_mutually_exclusive());
    }

    #[test]
    fn neither_file_nor_url_nor_executable_is_rejected() {
        let mut info = file_sourced_info("/tmp/whatever");
        info["credential_source"] = json!({});
        let err = ExternalAccountCredential::from_info(info).unwrap_err();
        assert!(err.is_missing_field());
    }

    #[test]
    fn non_allowlisted_token_url_is_rejected() {
        let mut info = file_sourced_info("/tmp/whatever");
        info["token_url"] = json!("https://evil.example.com/token");
        let err = ExternalAccountCredential::from_info(info).unwrap_err();
        assert!(err.is_invalid_url());
    }

    #[test]
    fn service_account_email_parses_impersonation_url() {
        let mut info = file_sourced_info("/tmp/whatever");
        info["service_account_impersonation_url"] = json!(
            "https://iamcredentials.googleapis.com/v1/projects/-/serviceAccounts/sa@p.iam.gserviceaccount.com:generateAccessToken"
        );
        let credential = ExternalAccountCredential::from_info(info).unwrap();
        assert_eq!(
            credential.service_account_email().as_deref(),
            Some("sa@p.iam.gserviceaccount.com")
        );
    }

    #[test]
    fn info_round_trips_configured_fields() {
        let info = file_sourced_info("/tmp/whatever");
        let credential = ExternalAccountCredential::from_info(info.clone()).unwrap();
        let round_tripped = credential.info();
        assert_eq!(round_tripped["audience"], info["audience"]);
        assert_eq!(round_tripped["token_url"], info["token_url"]);
        assert_eq!(round_tripped["credential_source"]["file"], info["credential_source"]["file"]);
    }

    #[test]
    fn with_scopes_preserves_other_config_and_resets_derivation_independent_state() {
        let info = file_sourced_info("/tmp/whatever");
        let original = ExternalAccountCredential::from_info(info).unwrap();
        let derived = original
            .with_scopes(vec!["https://www.googleapis.com/auth/cloud-platform".to_string()], None)
            .unwrap();
        assert_eq!(derived.config.audience, original.config.audience);
        assert_eq!(
            derived.config.scopes,
            Some(vec!["https://www.googleapis.com/auth/cloud-platform".to_string()])
        );
        assert_eq!(original.config.scopes, None);
    }
}
