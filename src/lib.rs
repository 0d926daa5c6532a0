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

//! Google Cloud external account credentials.
//!
//! **WARNING:** this crate is under active development. We expect multiple
//! breaking changes in the upcoming releases. Testing is also incomplete, we do
//! **not** recommend that you use this crate in production. We welcome feedback
//! about the APIs, documentation, missing features, bugs, etc.
//!
//! This crate implements the credential types used to exchange an external
//! subject token — obtained from a non-Google identity provider — for a Google
//! Cloud access token at the Security Token Service (STS), per [RFC 8693] and
//! [AIP-4117]. The exchanged token can optionally be used to impersonate a
//! service account via the IAM Credentials `generateAccessToken` API.
//!
//! The SDK clients consume an implementation of [credentials::Credentials] and
//! use these credentials to authenticate RPCs issued by the application.
//!
//! [RFC 8693]: https://datatracker.ietf.org/doc/html/rfc8693
//! [AIP-4117]: https://google.aip.dev/auth/4117

pub mod errors;

/// Construction-time errors for credential builders.
pub mod build_errors;

/// Types and functions to work with Google Cloud authentication [Credentials].
///
/// [Credentials]: credentials::Credentials
pub mod credentials;

/// Types and functions to work with auth [Tokens].
///
/// [Tokens]: https://cloud.google.com/docs/authentication#token
pub mod token;

/// The lazy, single-flight token cache shared by credential implementations.
pub(crate) mod token_cache;

/// An abstract, test-friendly UTC clock.
pub(crate) mod clock;

/// The injected HTTP transport capability and its default `reqwest`-backed implementation.
pub(crate) mod http_request;

/// The STS / IAM-credentials hostname allow-list validator.
pub(crate) mod allowlist;

/// HTTP Basic client authentication for the STS endpoint.
pub(crate) mod client_auth;

pub(crate) mod constants;

/// A `Result` alias where the `Err` case is
/// [errors::CredentialsError].
pub type Result<T> = std::result::Result<T, crate::errors::CredentialsError>;
