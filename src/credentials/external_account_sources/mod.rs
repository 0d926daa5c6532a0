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

//! Subject token suppliers backed by a file, a URL, or a local executable.

pub(crate) mod executable_sourced;
pub(crate) mod file_sourced;
pub(crate) mod programmatic_sourced;
pub(crate) mod url_sourced;

/// How a file- or URL-sourced subject token document should be parsed.
///
/// Mirrors `identity_pool.py`'s `format.type`/`format.subject_token_field_name`:
/// a `text` document is the token itself, a `json` document carries the
/// token under a named field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CredentialFormat {
    Text,
    Json { subject_token_field_name: String },
}
