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

//! The URL-sourced subject token supplier.

use crate::Result;
use crate::credentials::external_account_sources::CredentialFormat;
use crate::credentials::external_account_sources::file_sourced::parse_token_content;
use crate::credentials::subject_token::SubjectToken;
use crate::errors::CredentialsError;
use crate::http_request::{HttpRequestHandler, Request};
use http::Method;
use std::collections::HashMap;
use std::sync::Arc;

/// Fetches a subject token with a plain `GET` against a caller-specified URL.
///
/// Grounded on the `url` credential source of `identity_pool.py`. Unlike the
/// STS and IAM Credentials endpoints, this URL is not allow-listed: it comes
/// from the same trusted configuration document as the rest of the
/// credential and is expected to point at the caller's own token broker.
#[derive(Debug, Clone)]
pub(crate) struct UrlSourcedCredentials {
    pub(crate) url: String,
    pub(crate) headers: HashMap<String, String>,
    pub(crate) format: CredentialFormat,
    transport: Arc<dyn HttpRequestHandler>,
}

impl UrlSourcedCredentials {
    pub(crate) fn new(
        url: String,
        headers: HashMap<String, String>,
        format: CredentialFormat,
        transport: Arc<dyn HttpRequestHandler>,
    ) -> Self {
        Self {
            url,
            headers,
            format,
            transport,
        }
    }

    pub(crate) async fn subject_token(&self) -> Result<SubjectToken> {
        let mut request = Request::new(Method::GET, self.url.clone());
        for (name, value) in &self.headers {
            if let Ok(header_name) = http::header::HeaderName::from_bytes(name.as_bytes()) {
                request = request.with_header(header_name, value);
            }
        }
        let response = self.transport.execute(request).await?;
        if !response.is_success() {
            return Err(CredentialsError::from_msg(
                true,
                format!(
                    "failed to request subject token from `{}`: status {}",
                    self.url, response.status
                ),
            ));
        }
        parse_token_content(&response.text(), &self.format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http_request::Response;
    use crate::http_request::tests::MockTransport;
    use http::StatusCode;

    fn transport_with(body: &str) -> Arc<dyn HttpRequestHandler> {
        Arc::new(MockTransport::with_responses(vec![Ok(Response {
            status: StatusCode::OK,
            headers: http::HeaderMap::new(),
            body: body.as_bytes().to_vec(),
        })]))
    }

    #[tokio::test]
    async fn get_json_token() {
        let supplier = UrlSourcedCredentials::new(
            "https://broker.example.com/token".to_string(),
            HashMap::from([("Metadata".to_string(), "True".to_string())]),
            CredentialFormat::Json {
                subject_token_field_name: "access_token".to_string(),
            },
            transport_with(r#"{"access_token":"an_example_token"}"#),
        );
        let token = supplier.subject_token().await.unwrap();
        assert_eq!(token.token, "an_example_token");
    }

    #[tokio::test]
    async fn get_text_token() {
        let supplier = UrlSourcedCredentials::new(
            "https://broker.example.com/token".to_string(),
            HashMap::new(),
            CredentialFormat::Text,
            transport_with("an_example_token"),
        );
        let token = supplier.subject_token().await.unwrap();
        assert_eq!(token.token, "an_example_token");
    }

    #[tokio::test]
    async fn get_json_token_missing_field() {
        let supplier = UrlSourcedCredentials::new(
            "https://broker.example.com/token".to_string(),
            HashMap::new(),
            CredentialFormat::Json {
                subject_token_field_name: "access_token".to_string(),
            },
            transport_with(r#"{"wrong_field":"an_example_token"}"#),
        );
        let err = supplier.subject_token().await.unwrap_err();
        assert!(!err.is_transient());
        assert!(err.to_string().contains("access_token"));
    }
}
