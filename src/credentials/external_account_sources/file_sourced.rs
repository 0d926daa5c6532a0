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

//! The file-sourced subject token supplier.

use crate::Result;
use crate::credentials::external_account_sources::CredentialFormat;
use crate::credentials::subject_token::{Builder as SubjectTokenBuilder, SubjectToken};
use crate::errors::CredentialsError;
use serde_json::Value;

const JSON_FORMAT_TYPE: &str = "json";

/// Reads a subject token from a file on the local filesystem.
///
/// Grounded on the `file` credential source of `identity_pool.py`: the file
/// is read fresh on every call (no caching), and its content is interpreted
/// as plain text or as a JSON document with the token under
/// `subject_token_field_name`, depending on `format`.
#[derive(Debug, Clone)]
pub(crate) struct FileSourcedCredentials {
    pub(crate) file: String,
    pub(crate) format: CredentialFormat,
}

impl FileSourcedCredentials {
    pub(crate) fn new(file: String, format: CredentialFormat) -> Self {
        Self { file, format }
    }

    pub(crate) async fn subject_token(&self) -> Result<SubjectToken> {
        let content = tokio::fs::read_to_string(&self.file).await.map_err(|e| {
            CredentialsError::from_source(
                false,
                std::io::Error::new(e.kind(), format!("failed to read `{}`: {e}", self.file)),
            )
        })?;
        parse_token_content(&content, &self.format)
    }
}

/// Shared parsing logic for file- and URL-sourced subject tokens.
pub(crate) fn parse_token_content(
    content: &str,
    format: &CredentialFormat,
) -> Result<SubjectToken> {
    match format {
        CredentialFormat::Json {
            subject_token_field_name,
        } => {
            let parsed: Value = serde_json::from_str(content)
                .map_err(|e| CredentialsError::from_source(false, e))?;
            match parsed.get(subject_token_field_name) {
                Some(Value::String(token)) if !token.trim().is_empty() => {
                    Ok(SubjectTokenBuilder::new(token.clone()).build())
                }
                _ => Err(CredentialsError::from_msg(
                    false,
                    format!(
                        "failed to read subject token field `{subject_token_field_name}` as a \
                         non-empty string, body=<{parsed}>"
                    ),
                )),
            }
        }
        CredentialFormat::Text => {
            if content.trim().is_empty() {
                return Err(CredentialsError::from_msg(
                    false,
                    "subject token source returned an empty document",
                ));
            }
            Ok(SubjectTokenBuilder::new(content.to_string()).build())
        }
    }
}
