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

//! The injected HTTP transport capability.
//!
//! The credential core never talks to `reqwest` (or any other client)
//! directly; it goes through [HttpRequestHandler], a single-method trait
//! object. This keeps `refresh()` hermetically testable against
//! [httptest](https://docs.rs/httptest) servers and leaves transport-level
//! concerns (TLS configuration, proxies, connection pooling, retry policy)
//! to the host application.

use crate::Result;
use crate::errors::{CredentialsError, non_retryable};
use http::{HeaderMap, Method, StatusCode};
use std::sync::Arc;

/// An HTTP request, already fully formed by the caller.
#[derive(Debug, Clone)]
pub(crate) struct Request {
    pub method: Method,
    pub url: String,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Request {
    pub(crate) fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }

    pub(crate) fn with_header(mut self, name: http::header::HeaderName, value: &str) -> Self {
        if let Ok(value) = http::HeaderValue::from_str(value) {
            self.headers.insert(name, value);
        }
        self
    }

    pub(crate) fn with_body(mut self, body: Vec<u8>) -> Self {
        self.body = body;
        self
    }
}

/// The raw HTTP response: status, headers, and body bytes.
#[derive(Debug, Clone)]
pub(crate) struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl Response {
    pub(crate) fn is_success(&self) -> bool {
        self.status.is_success()
    }

    pub(crate) fn json<T: serde::de::DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(non_retryable)
    }

    pub(crate) fn text(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }
}

/// The single-method capability: (method, url, headers, body) → (status,
/// headers, body bytes).
#[async_trait::async_trait]
pub(crate) trait HttpRequestHandler: std::fmt::Debug + Send + Sync {
    async fn execute(&self, request: Request) -> Result<Response>;
}

/// The default [HttpRequestHandler], backed by a shared `reqwest::Client`.
#[derive(Clone, Debug, Default)]
pub(crate) struct ReqwestTransport {
    inner: reqwest::Client,
}

impl ReqwestTransport {
    pub(crate) fn new() -> Self {
        Self {
            inner: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl HttpRequestHandler for ReqwestTransport {
    async fn execute(&self, request: Request) -> Result<Response> {
        let mut builder = self.inner.request(request.method, &request.url);
        builder = builder.headers(request.headers);
        if !request.body.is_empty() {
            builder = builder.body(request.body);
        }
        let response = builder
            .send()
            .await
            .map_err(|e| CredentialsError::from_source(true, e))?;
        let status = response.status();
        let headers = response.headers().clone();
        let body = response
            .bytes()
            .await
            .map_err(|e| CredentialsError::from_source(true, e))?
            .to_vec();
        Ok(Response {
            status,
            headers,
            body,
        })
    }
}

pub(crate) fn default_transport() -> Arc<dyn HttpRequestHandler> {
    Arc::new(ReqwestTransport::new())
}
