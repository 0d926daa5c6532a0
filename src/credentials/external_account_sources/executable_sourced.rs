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

//! The executable-sourced subject token supplier, per [AIP-4117][aip-4117].
//!
//! [aip-4117]: https://google.aip.dev/auth/4117#determining-the-subject-token-in-executable-sourced-credentials

use crate::Result;
use crate::constants::{
    ALLOW_EXECUTABLES_VAR, DEFAULT_EXECUTABLE_TIMEOUT_MILLIS,
    DEFAULT_INTERACTIVE_TIMEOUT_MILLIS, EXECUTABLE_ENV_AUDIENCE, EXECUTABLE_ENV_ID,
    EXECUTABLE_ENV_IMPERSONATED_EMAIL, EXECUTABLE_ENV_INTERACTIVE, EXECUTABLE_ENV_OUTPUT_FILE,
    EXECUTABLE_ENV_REVOKE, EXECUTABLE_ENV_TOKEN_TYPE, ID_TOKEN_TYPE, JWT_TOKEN_TYPE,
    MAX_EXECUTABLE_TIMEOUT_MILLIS, MAX_INTERACTIVE_TIMEOUT_MILLIS, MIN_EXECUTABLE_TIMEOUT_MILLIS,
    MIN_INTERACTIVE_TIMEOUT_MILLIS, SAML2_TOKEN_TYPE,
};
use crate::credentials::subject_token::{Builder as SubjectTokenBuilder, SubjectToken};
use crate::errors::CredentialsError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::process::Command;
use tokio::time::timeout as tokio_timeout;

/// Configuration for the executable subject token source.
#[derive(Serialize, Deserialize, Debug, Clone, Default)]
pub(crate) struct ExecutableConfig {
    pub command: Option<String>,
    pub timeout_millis: Option<u64>,
    pub output_file: Option<String>,
    pub interactive_timeout_millis: Option<u64>,
}

impl ExecutableConfig {
    /// Validates `timeout_millis` against the AIP-4117 bounds, clamping to
    /// the default when unset.
    pub(crate) fn timeout(&self) -> Result<Duration> {
        let millis = self.timeout_millis.unwrap_or(DEFAULT_EXECUTABLE_TIMEOUT_MILLIS);
        if !(MIN_EXECUTABLE_TIMEOUT_MILLIS..=MAX_EXECUTABLE_TIMEOUT_MILLIS).contains(&millis) {
            return Err(CredentialsError::from_msg(
                false,
                format!(
                    "executable timeout_millis {millis} is out of the allowed range \
                     [{MIN_EXECUTABLE_TIMEOUT_MILLIS}, {MAX_EXECUTABLE_TIMEOUT_MILLIS}]"
                ),
            ));
        }
        Ok(Duration::from_millis(millis))
    }

    pub(crate) fn interactive_timeout(&self) -> Result<Duration> {
        let millis = self
            .interactive_timeout_millis
            .unwrap_or(DEFAULT_INTERACTIVE_TIMEOUT_MILLIS);
        if !(MIN_INTERACTIVE_TIMEOUT_MILLIS..=MAX_INTERACTIVE_TIMEOUT_MILLIS).contains(&millis) {
            return Err(CredentialsError::from_msg(
                false,
                format!(
                    "executable interactive_timeout_millis {millis} is out of the allowed range \
                     [{MIN_INTERACTIVE_TIMEOUT_MILLIS}, {MAX_INTERACTIVE_TIMEOUT_MILLIS}]"
                ),
            ));
        }
        Ok(Duration::from_millis(millis))
    }
}

/// The JSON document a conforming executable writes to stdout (or to
/// `output_file`), per AIP-4117.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
struct ExecutableResponse {
    version: i32,
    success: bool,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expiration_time: Option<i64>,
    id_token: Option<String>,
    saml_response: Option<String>,
    code: Option<String>,
    message: Option<String>,
}

impl ExecutableResponse {
    fn to_cred_error(&self) -> CredentialsError {
        match (&self.code, &self.message) {
            (Some(code), Some(message)) => CredentialsError::from_msg(
                false,
                format!("{MSG}, response contains unsuccessful response: ({code}) {message}"),
            ),
            _ => CredentialsError::from_msg(
                false,
                format!("{MSG}, response must include `code` and `message` fields when unsuccessful"),
            ),
        }
    }

    fn is_expired(&self) -> bool {
        match self.expiration_time {
            Some(expiration) => expiration <= time::OffsetDateTime::now_utc().unix_timestamp(),
            None => false,
        }
    }
}

const MSG: &str = "failed to read subject token";

/// Runs a local executable (or reads its cached output) to obtain a subject
/// token, per AIP-4117.
#[derive(Debug, Clone)]
pub(crate) struct ExecutableSourcedCredentials {
    pub(crate) executable: ExecutableConfig,
    pub(crate) audience: String,
    pub(crate) subject_token_type: String,
    pub(crate) service_account_impersonation_email: Option<String>,
}

impl ExecutableSourcedCredentials {
    pub(crate) async fn subject_token(&self, interactive: bool) -> Result<SubjectToken> {
        if let Some(output_file) = &self.executable.output_file {
            if let Some(token) = self.try_cached_output(output_file, interactive).await? {
                return Ok(token);
            }
        }
        let response = self.run(interactive).await?;
        self.decode(response, interactive)
    }

    /// Invokes the executable with `GOOGLE_EXTERNAL_ACCOUNT_REVOKE=1` to
    /// release any cached credential it may hold, e.g. an interactive login
    /// session. Best-effort: callers should not treat a failure here as
    /// fatal to whatever triggered the revoke.
    pub(crate) async fn revoke(&self) -> Result<()> {
        let command = self
            .executable
            .command
            .clone()
            .ok_or_else(|| CredentialsError::from_msg(false, format!("{MSG}, no `command` to revoke")))?;
        let mut env = self.base_env();
        env.push((EXECUTABLE_ENV_REVOKE.to_string(), "1".to_string()));
        let timeout = self.executable.timeout()?;
        self.run_command(command, env, timeout).await?;
        Ok(())
    }

    /// Reads and parses `output_file`. Returns `Ok(None)` when the file is
    /// missing or its content is not valid JSON at all, or when the cached
    /// token is expired — any of these mean the caller should fall through
    /// to invoking the executable. A payload that *is* valid JSON but fails
    /// to match the expected schema is a malformed response and propagates
    /// as an error, matching the conforming-executable contract.
    async fn try_cached_output(
        &self,
        output_file: &str,
        interactive: bool,
    ) -> Result<Option<SubjectToken>> {
        let content = match tokio::fs::read_to_string(output_file).await {
            Ok(content) => content,
            Err(_) => return Ok(None),
        };
        let value: serde_json::Value = match serde_json::from_str(content.trim()) {
            Ok(value) => value,
            Err(_) => return Ok(None),
        };
        let response: ExecutableResponse = serde_json::from_value(value).map_err(|e| {
            CredentialsError::from_msg(
                false,
                format!("{MSG}, cached executable response is malformed: {e}"),
            )
        })?;
        if response.is_expired() {
            return Ok(None);
        }
        self.decode(response, interactive).map(Some)
    }

    async fn run(&self, interactive: bool) -> Result<ExecutableResponse> {
        let command = self.executable.command.clone().ok_or_else(|| {
            CredentialsError::from_msg(false, format!("{MSG}, no `command` configured"))
        })?;
        let allow_executable = std::env::var(ALLOW_EXECUTABLES_VAR).unwrap_or_default();
        if allow_executable != "1" {
            return Err(CredentialsError::from_msg(
                false,
                format!(
                    "executables need to be explicitly allowed (set {ALLOW_EXECUTABLES_VAR} to \
                     '1') to run"
                ),
            ));
        }

        let mut env = self.base_env();
        let timeout = if interactive {
            env.push((EXECUTABLE_ENV_INTERACTIVE.to_string(), "1".to_string()));
            self.executable.interactive_timeout()?
        } else {
            self.executable.timeout()?
        };

        tracing::debug!(interactive, "invoking external account executable");
        let stdout = self.run_command(command, env, timeout).await?;
        serde_json::from_str(stdout.trim()).map_err(|e| CredentialsError::from_source(false, e))
    }

    async fn run_command(
        &self,
        command: String,
        env: Vec<(String, String)>,
        timeout: Duration,
    ) -> Result<String> {
        let (program, args) = split_command(&command);
        let mut cmd = Command::new(program);
        cmd.args(&args);
        for (key, value) in env {
            cmd.env(key, value);
        }

        let output = tokio_timeout(timeout, cmd.output())
            .await
            .map_err(|e| CredentialsError::from_source(true, e))?
            .map_err(|e| CredentialsError::from_source(true, e))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            let code = output
                .status
                .code()
                .map(|c| c.to_string())
                .unwrap_or_else(|| "unknown".to_string());
            return Err(CredentialsError::from_msg(
                true,
                format!("{MSG}, command execution failed, code={code}, stderr=<{stderr}>"),
            ));
        }
        Ok(String::from_utf8_lossy(&output.stdout).into_owned())
    }

    fn base_env(&self) -> Vec<(String, String)> {
        let mut env = vec![
            (EXECUTABLE_ENV_AUDIENCE.to_string(), self.audience.clone()),
            (
                EXECUTABLE_ENV_TOKEN_TYPE.to_string(),
                self.subject_token_type.clone(),
            ),
            (EXECUTABLE_ENV_ID.to_string(), "1.0".to_string()),
        ];
        if let Some(email) = &self.service_account_impersonation_email {
            env.push((
                EXECUTABLE_ENV_IMPERSONATED_EMAIL.to_string(),
                email.clone(),
            ));
        }
        if let Some(output_file) = &self.executable.output_file {
            env.push((
                EXECUTABLE_ENV_OUTPUT_FILE.to_string(),
                output_file.clone(),
            ));
        }
        env
    }

    fn decode(&self, response: ExecutableResponse, interactive: bool) -> Result<SubjectToken> {
        if !response.success {
            return Err(response.to_cred_error());
        }
        if response.version > 1 {
            return Err(CredentialsError::from_msg(
                false,
                format!(
                    "{MSG}, unsupported executable response version {}",
                    response.version
                ),
            ));
        }
        if response.is_expired() {
            return Err(CredentialsError::from_msg(
                false,
                format!("{MSG}, executable response is expired"),
            ));
        }
        if !interactive && self.executable.output_file.is_some() && response.expiration_time.is_none()
        {
            return Err(CredentialsError::from_msg(
                false,
                format!("{MSG}, `expiration_time` is required when `output_file` is set"),
            ));
        }
        let token = match response.token_type.as_str() {
            JWT_TOKEN_TYPE | ID_TOKEN_TYPE => response
                .id_token
                .clone()
                .ok_or_else(|| CredentialsError::from_msg(false, "missing `id_token` field"))?,
            SAML2_TOKEN_TYPE => response.saml_response.clone().ok_or_else(|| {
                CredentialsError::from_msg(false, "missing `saml_response` field")
            })?,
            other => {
                return Err(CredentialsError::from_msg(
                    false,
                    format!("executable response contains unsupported token type `{other}`"),
                ));
            }
        };
        if token.trim().is_empty() {
            return Err(CredentialsError::from_msg(false, format!("{MSG}, subject token is empty")));
        }
        Ok(SubjectTokenBuilder::new(token).build())
    }
}

fn split_command(command: &str) -> (String, Vec<String>) {
    let mut parts = command.split_whitespace();
    let program = parts.next().unwrap_or(command).to_string();
    let args = parts.map(String::from).collect();
    (program, args)
}

#[cfg(test)]
mod test {
    use super::*;
    use scoped_env::ScopedEnv;
    use serde_json::json;
    use serial_test::serial;

    fn future_expiration() -> i64 {
        (time::OffsetDateTime::now_utc() + time::Duration::hours(1)).unix_timestamp()
    }

    #[tokio::test]
    #[serial]
    async fn read_token_from_command() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let json_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": future_expiration(),
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"an_example_token",
        })
        .to_string();
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", path.to_str().unwrap())),
                ..ExecutableConfig::default()
            },
            audience: "//iam.googleapis.com/projects/123/locations/global".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let token = supplier.subject_token(false).await.unwrap();
        assert_eq!(token.token, "an_example_token");
    }

    #[tokio::test]
    async fn reads_fresh_cached_output_without_running_command() {
        let json_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": future_expiration(),
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"a_cached_token",
        })
        .to_string();
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some("false".to_string()),
                output_file: Some(path.to_str().unwrap().to_string()),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let token = supplier.subject_token(false).await.unwrap();
        assert_eq!(token.token, "a_cached_token");
    }

    #[tokio::test]
    #[serial]
    async fn falls_through_to_command_when_cached_output_is_expired() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let expired_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": 1,
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"a_stale_token",
        })
        .to_string();
        let cache_file = tempfile::NamedTempFile::new().unwrap();
        let cache_path = cache_file.into_temp_path();
        std::fs::write(&cache_path, expired_response).unwrap();

        let fresh_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": future_expiration(),
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"a_fresh_token",
        })
        .to_string();
        let command_file = tempfile::NamedTempFile::new().unwrap();
        let command_path = command_file.into_temp_path();
        std::fs::write(&command_path, fresh_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", command_path.to_str().unwrap())),
                output_file: Some(cache_path.to_str().unwrap().to_string()),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let token = supplier.subject_token(false).await.unwrap();
        assert_eq!(token.token, "a_fresh_token");
    }

    #[tokio::test]
    async fn refuses_to_run_without_allow_executables_env() {
        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some("true".to_string()),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        // Note: assumes the ambient test process does not itself export
        // GOOGLE_EXTERNAL_ACCOUNT_ALLOW_EXECUTABLES=1.
        if std::env::var(ALLOW_EXECUTABLES_VAR).as_deref() != Ok("1") {
            let err = supplier.subject_token(false).await.unwrap_err();
            assert!(!err.is_transient());
        }
    }

    #[cfg(not(target_os = "windows"))]
    #[tokio::test]
    #[serial]
    async fn command_timeout_is_transient() {
        use std::os::unix::fs::PermissionsExt;

        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let script = "#!/bin/bash\nwhile true; do echo working; done";
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, script).unwrap();
        let mut perms = std::fs::metadata(&path).unwrap().permissions();
        perms.set_mode(0o700);
        std::fs::set_permissions(&path, perms).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(path.to_str().unwrap().to_string()),
                timeout_millis: Some(MIN_EXECUTABLE_TIMEOUT_MILLIS),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let err = supplier.subject_token(false).await.unwrap_err();
        assert!(err.is_transient());
    }

    #[test]
    fn timeout_out_of_range_is_rejected() {
        let config = ExecutableConfig {
            timeout_millis: Some(1),
            ..ExecutableConfig::default()
        };
        assert!(config.timeout().is_err());
    }

    #[tokio::test]
    #[serial]
    async fn id_token_type_is_accepted() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let json_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": future_expiration(),
            "token_type": ID_TOKEN_TYPE,
            "id_token":"an_oidc_token",
        })
        .to_string();
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", path.to_str().unwrap())),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: ID_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let token = supplier.subject_token(false).await.unwrap();
        assert_eq!(token.token, "an_oidc_token");
    }

    #[tokio::test]
    #[serial]
    async fn access_token_type_is_rejected() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let json_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": future_expiration(),
            "token_type": "urn:ietf:params:oauth:token-type:access_token",
            "id_token":"should_not_be_used",
        })
        .to_string();
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", path.to_str().unwrap())),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let err = supplier.subject_token(false).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    #[serial]
    async fn unsupported_response_version_is_rejected() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let json_response = json!({
            "success": true,
            "version": 2,
            "expiration_time": future_expiration(),
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"an_example_token",
        })
        .to_string();
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", path.to_str().unwrap())),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let err = supplier.subject_token(false).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    #[serial]
    async fn expired_live_response_is_rejected() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let json_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": 1,
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"a_stale_token",
        })
        .to_string();
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", path.to_str().unwrap())),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let err = supplier.subject_token(false).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    #[serial]
    async fn missing_expiration_time_is_rejected_when_output_file_configured() {
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let json_response = json!({
            "success": true,
            "version": 1,
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"an_example_token",
        })
        .to_string();
        let command_file = tempfile::NamedTempFile::new().unwrap();
        let command_path = command_file.into_temp_path();
        std::fs::write(&command_path, json_response).unwrap();
        let cache_path = tempfile::NamedTempFile::new().unwrap().into_temp_path();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", command_path.to_str().unwrap())),
                output_file: Some(cache_path.to_str().unwrap().to_string()),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let err = supplier.subject_token(false).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    async fn malformed_cached_output_propagates_instead_of_falling_through() {
        let file = tempfile::NamedTempFile::new().unwrap();
        let path = file.into_temp_path();
        std::fs::write(&path, json!({"success": true}).to_string()).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some("false".to_string()),
                output_file: Some(path.to_str().unwrap().to_string()),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let err = supplier.subject_token(false).await.unwrap_err();
        assert!(!err.is_transient());
    }

    #[tokio::test]
    #[serial]
    async fn unparseable_cached_output_falls_through_to_command() {
        let cache_file = tempfile::NamedTempFile::new().unwrap();
        let cache_path = cache_file.into_temp_path();
        std::fs::write(&cache_path, "not json at all").unwrap();

        let fresh_response = json!({
            "success": true,
            "version": 1,
            "expiration_time": future_expiration(),
            "token_type": JWT_TOKEN_TYPE,
            "id_token":"a_fresh_token",
        })
        .to_string();
        let command_file = tempfile::NamedTempFile::new().unwrap();
        let command_path = command_file.into_temp_path();
        std::fs::write(&command_path, fresh_response).unwrap();

        let supplier = ExecutableSourcedCredentials {
            executable: ExecutableConfig {
                command: Some(format!("cat {}", command_path.to_str().unwrap())),
                output_file: Some(cache_path.to_str().unwrap().to_string()),
                ..ExecutableConfig::default()
            },
            audience: "aud".to_string(),
            subject_token_type: JWT_TOKEN_TYPE.to_string(),
            service_account_impersonation_email: None,
        };
        let _e = ScopedEnv::set(ALLOW_EXECUTABLES_VAR, "1");
        let token = supplier.subject_token(false).await.unwrap();
        assert_eq!(token.token, "a_fresh_token");
    }
}
