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

pub(crate) const DEFAULT_SCOPE: &str = "https://www.googleapis.com/auth/cloud-platform";
pub(crate) const GOOGLE_CLOUD_QUOTA_PROJECT_VAR: &str = "GOOGLE_CLOUD_QUOTA_PROJECT";
pub(crate) const GOOGLE_APPLICATION_CREDENTIALS_VAR: &str = "GOOGLE_APPLICATION_CREDENTIALS";

/// Token Exchange OAuth Grant Type
pub(crate) const TOKEN_EXCHANGE_GRANT_TYPE: &str =
    "urn:ietf:params:oauth:grant-type:token-exchange";
/// Refresh Token OAuth Grant Type
pub(crate) const REFRESH_TOKEN_GRANT_TYPE: &str = "refresh_token";
/// Access Token Oauth Token Type
pub(crate) const ACCESS_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:access_token";
/// JWT OAuth Token Type
pub(crate) const JWT_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:jwt";
/// OIDC ID Token OAuth Token Type
pub(crate) const ID_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:id_token";
/// SAML2 Token OAuth Token Type
pub(crate) const SAML2_TOKEN_TYPE: &str = "urn:ietf:params:oauth:token-type:saml2";

/// The tag used in the serialized `info`/`from_info` representation of
/// [crate::credentials::external_account].
pub(crate) const EXTERNAL_ACCOUNT_JSON_TYPE: &str = "external_account";
/// The tag used in the serialized `info`/`from_info` representation of
/// [crate::credentials::authorized_user].
pub(crate) const EXTERNAL_ACCOUNT_AUTHORIZED_USER_JSON_TYPE: &str =
    "external_account_authorized_user";

/// Gate env var: the executable supplier refuses to run unless this is `"1"`.
pub(crate) const ALLOW_EXECUTABLES_VAR: &str = "GOOGLE_EXTERNAL_ACCOUNT_ALLOW_EXECUTABLES";

pub(crate) const EXECUTABLE_ENV_AUDIENCE: &str = "GOOGLE_EXTERNAL_ACCOUNT_AUDIENCE";
pub(crate) const EXECUTABLE_ENV_TOKEN_TYPE: &str = "GOOGLE_EXTERNAL_ACCOUNT_TOKEN_TYPE";
pub(crate) const EXECUTABLE_ENV_ID: &str = "GOOGLE_EXTERNAL_ACCOUNT_ID";
pub(crate) const EXECUTABLE_ENV_INTERACTIVE: &str = "GOOGLE_EXTERNAL_ACCOUNT_INTERACTIVE";
pub(crate) const EXECUTABLE_ENV_REVOKE: &str = "GOOGLE_EXTERNAL_ACCOUNT_REVOKE";
pub(crate) const EXECUTABLE_ENV_IMPERSONATED_EMAIL: &str =
    "GOOGLE_EXTERNAL_ACCOUNT_IMPERSONATED_EMAIL";
pub(crate) const EXECUTABLE_ENV_OUTPUT_FILE: &str = "GOOGLE_EXTERNAL_ACCOUNT_OUTPUT_FILE";

/// Regex matching an `audience` that identifies a workforce pool, per AIP-4117.
pub(crate) const WORKFORCE_POOL_AUDIENCE_PATTERN: &str =
    r"^//iam\.googleapis\.com/locations/[^/]+/workforcePools/";

pub(crate) const DEFAULT_EXECUTABLE_TIMEOUT_MILLIS: u64 = 30_000;
pub(crate) const MIN_EXECUTABLE_TIMEOUT_MILLIS: u64 = 5_000;
pub(crate) const MAX_EXECUTABLE_TIMEOUT_MILLIS: u64 = 120_000;

pub(crate) const DEFAULT_INTERACTIVE_TIMEOUT_MILLIS: u64 = 300_000;
pub(crate) const MIN_INTERACTIVE_TIMEOUT_MILLIS: u64 = 300_000;
pub(crate) const MAX_INTERACTIVE_TIMEOUT_MILLIS: u64 = 1_800_000;

pub(crate) const DEFAULT_IMPERSONATION_LIFETIME_SECS: u64 = 3600;

/// Default STS endpoint for the `external_account_authorized_user`
/// refresh-token grant, used when the credential JSON carries no `token_url`.
pub(crate) const DEFAULT_AUTHORIZED_USER_TOKEN_URL: &str = "https://sts.googleapis.com/v1/oauthtoken";
