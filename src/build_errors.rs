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

//! Errors raised while constructing a credential from configuration.
//!
//! Unlike [crate::errors::CredentialsError], these errors are never
//! transient: a malformed `credential_source` or a disallowed URL does not
//! start working on retry.

type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// The error type for [Credentials] builders.
///
/// Applications rarely need to create instances of this error type. The
/// exception might be when testing application code, where the application is
/// mocking a client library behavior.
///
/// [Credentials]: super::credentials::Credentials
#[derive(thiserror::Error, Debug)]
#[error(transparent)]
pub struct Error(ErrorKind);

impl Error {
    /// A problem finding or opening the credentials file.
    pub fn is_loading(&self) -> bool {
        matches!(self.0, ErrorKind::Loading(_))
    }

    /// A problem parsing a credentials JSON specification.
    pub fn is_parsing(&self) -> bool {
        matches!(self.0, ErrorKind::Parsing(_))
    }

    /// The credentials type is invalid or unknown.
    pub fn is_unknown_type(&self) -> bool {
        matches!(self.0, ErrorKind::UnknownType(_))
    }

    /// A required field was missing from the builder.
    pub fn is_missing_field(&self) -> bool {
        matches!(self.0, ErrorKind::MissingField(_))
    }

    /// Two fields were set that are mutually exclusive.
    pub fn is_mutually_exclusive(&self) -> bool {
        matches!(self.0, ErrorKind::MutuallyExclusive { .. })
    }

    /// A field was set that is disallowed in this context.
    pub fn is_disallowed_field(&self) -> bool {
        matches!(self.0, ErrorKind::DisallowedField(_))
    }

    /// A numeric field fell outside its supported range.
    pub fn is_out_of_range(&self) -> bool {
        matches!(self.0, ErrorKind::OutOfRange { .. })
    }

    /// A URL field did not match the required host allow-list.
    pub fn is_invalid_url(&self) -> bool {
        matches!(self.0, ErrorKind::InvalidUrl { .. })
    }

    /// Creates an error representing problems loading or reading a credentials
    /// file.
    pub(crate) fn loading<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Loading(source.into()))
    }

    /// A problem parsing a credentials specification.
    pub(crate) fn parsing<T>(source: T) -> Error
    where
        T: Into<BoxError>,
    {
        Error(ErrorKind::Parsing(source.into()))
    }

    /// The credential type is unknown or invalid.
    pub(crate) fn unknown_type<T: Into<String>>(type_name: T) -> Error {
        Error(ErrorKind::UnknownType(type_name.into()))
    }

    /// A required field was missing from the builder.
    pub(crate) fn missing_field(field: &'static str) -> Error {
        Error(ErrorKind::MissingField(field))
    }

    /// Two mutually exclusive fields were both set.
    pub(crate) fn mutually_exclusive(a: &'static str, b: &'static str) -> Error {
        Error(ErrorKind::MutuallyExclusive { a, b })
    }

    /// A field is not allowed in the current configuration.
    pub(crate) fn disallowed_field(field: &'static str) -> Error {
        Error(ErrorKind::DisallowedField(field))
    }

    /// A numeric field was outside of its allowed range.
    pub(crate) fn out_of_range(field: &'static str, min: i64, max: i64) -> Error {
        Error(ErrorKind::OutOfRange { field, min, max })
    }

    /// A URL field did not pass the host allow-list.
    pub(crate) fn invalid_url(field: &'static str, url: impl Into<String>) -> Error {
        Error(ErrorKind::InvalidUrl {
            field,
            url: url.into(),
        })
    }
}

#[derive(thiserror::Error, Debug)]
enum ErrorKind {
    #[error("could not find or open the credentials file: {0}")]
    Loading(#[source] BoxError),
    #[error("cannot parse the credentials specification: {0}")]
    Parsing(#[source] BoxError),
    #[error("unknown or invalid credentials type: {0}")]
    UnknownType(String),
    #[error("missing required field: {0}")]
    MissingField(&'static str),
    #[error("fields `{a}` and `{b}` are mutually exclusive")]
    MutuallyExclusive { a: &'static str, b: &'static str },
    #[error("field `{0}` is not allowed for this credential configuration")]
    DisallowedField(&'static str),
    #[error("field `{field}` must be between {min} and {max}")]
    OutOfRange {
        field: &'static str,
        min: i64,
        max: i64,
    },
    #[error("field `{field}` has a URL that is not on the allow-list: {url}")]
    InvalidUrl { field: &'static str, url: String },
}
