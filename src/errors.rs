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

//! Runtime errors raised while obtaining or refreshing a token.

use std::error::Error as StdError;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Whether a [CredentialsError] is worth retrying.
#[derive(Clone, Debug)]
pub enum Retryability {
    /// The error is permanent; retrying the same request will not help.
    Permanent,
    /// The error may be transient; the caller can retry, optionally not
    /// before `retry_in` has elapsed.
    Transient { retry_in: Option<Duration> },
}

/// The error returned by [crate::credentials::Credentials::refresh],
/// [crate::credentials::Credentials::before_request], and the subject-token
/// supplier implementations.
#[derive(Clone, Debug)]
pub struct CredentialsError {
    retryability: Retryability,
    message: Option<String>,
    source: Option<Arc<dyn StdError + Send + Sync>>,
}

impl CredentialsError {
    /// Creates a new error wrapping `source`.
    pub fn from_source<T>(is_transient: bool, source: T) -> Self
    where
        T: StdError + Send + Sync + 'static,
    {
        Self {
            retryability: Self::retryability(is_transient),
            message: None,
            source: Some(Arc::new(source)),
        }
    }

    /// Creates a new error from a message, with no underlying source.
    pub fn from_msg<T: Into<String>>(is_transient: bool, message: T) -> Self {
        Self {
            retryability: Self::retryability(is_transient),
            message: Some(message.into()),
            source: None,
        }
    }

    /// Creates a new error with both a message and an underlying source.
    pub fn new<M, S>(is_transient: bool, message: M, source: S) -> Self
    where
        M: Into<String>,
        S: StdError + Send + Sync + 'static,
    {
        Self {
            retryability: Self::retryability(is_transient),
            message: Some(message.into()),
            source: Some(Arc::new(source)),
        }
    }

    fn retryability(is_transient: bool) -> Retryability {
        if is_transient {
            Retryability::Transient { retry_in: None }
        } else {
            Retryability::Permanent
        }
    }

    /// `true` if the caller may retry the failed operation.
    pub fn is_transient(&self) -> bool {
        matches!(self.retryability, Retryability::Transient { .. })
    }

    /// Attaches a suggested retry delay. Has no effect on a permanent error.
    pub fn with_retry_in(mut self, retry_in: Duration) -> Self {
        if let Retryability::Transient { .. } = self.retryability {
            self.retryability = Retryability::Transient {
                retry_in: Some(retry_in),
            };
        }
        self
    }

    /// The suggested retry delay, if any was attached.
    pub fn retry_in(&self) -> Option<Duration> {
        match &self.retryability {
            Retryability::Transient { retry_in } => *retry_in,
            Retryability::Permanent => None,
        }
    }
}

impl fmt::Display for CredentialsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.source) {
            (Some(message), _) => write!(f, "{message}")?,
            (None, Some(source)) => write!(f, "{source}")?,
            (None, None) => write!(f, "credentials error")?,
        }
        if self.is_transient() {
            write!(f, " (but future attempts may succeed)")
        } else {
            write!(f, " (and future attempts will not succeed)")
        }
    }
}

impl StdError for CredentialsError {
    fn source(&self) -> Option<&(dyn StdError + 'static)> {
        self.source.as_ref().map(|s| s.as_ref() as &(dyn StdError + 'static))
    }
}

/// A structured error returned by the STS token endpoint, per RFC 6749 §5.2.
///
/// Carried as the `source` of a permanent [CredentialsError] when STS
/// responds with a non-2xx status and a JSON error body.
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize)]
pub struct OAuthError {
    pub error: String,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error_uri: Option<String>,
}

impl fmt::Display for OAuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "oauth error `{}`", self.error)?;
        if let Some(description) = &self.error_description {
            write!(f, ": {description}")?;
        }
        if let Some(uri) = &self.error_uri {
            write!(f, " ({uri})")?;
        }
        Ok(())
    }
}

impl StdError for OAuthError {}

/// Marker trait for errors returned by a custom
/// [crate::credentials::subject_token::SubjectTokenProvider].
pub trait SubjectTokenProviderError: StdError + Send + Sync + 'static {
    /// `true` if the authentication client should treat the failure as
    /// retryable.
    fn is_transient(&self) -> bool;
}

impl SubjectTokenProviderError for CredentialsError {
    fn is_transient(&self) -> bool {
        CredentialsError::is_transient(self)
    }
}

pub(crate) fn non_retryable<E: StdError + Send + Sync + 'static>(source: E) -> CredentialsError {
    CredentialsError::from_source(false, source)
}
