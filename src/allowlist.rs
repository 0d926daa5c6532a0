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

//! Host allow-listing for the STS and IAM-credentials endpoints.
//!
//! External account credentials read their token and impersonation URLs from
//! untrusted JSON configuration. Without a host allow-list, a malicious
//! `credential_source` could redirect the subject token (and the resulting
//! access token) to an attacker-controlled endpoint.

use regex::Regex;
use std::sync::LazyLock;

/// Hostnames accepted for the STS `token_url`.
pub(crate) static STS_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| compile(STS_PATTERN_SRC));

/// Hostnames accepted for the `service_account_impersonation_url`.
pub(crate) static IAM_CREDENTIALS_PATTERNS: LazyLock<Vec<Regex>> =
    LazyLock::new(|| compile(IAM_CREDENTIALS_PATTERN_SRC));

const STS_PATTERN_SRC: &[&str] = &[
    r"^sts\.googleapis\.com$",
    r"^sts\.[^.\s/]+\.googleapis\.com$",
    r"^[^.\s/]+-sts\.googleapis\.com$",
    r"^sts-[^.\s/]+\.p\.googleapis\.com$",
    r"^[^.\s/]+\.sts\.googleapis\.com$",
];

const IAM_CREDENTIALS_PATTERN_SRC: &[&str] = &[
    r"^iamcredentials\.googleapis\.com$",
    r"^iamcredentials\.[^.\s/]+\.googleapis\.com$",
    r"^[^.\s/]+-iamcredentials\.googleapis\.com$",
    r"^iamcredentials-[^.\s/]+\.p\.googleapis\.com$",
    r"^[^.\s/]+\.iamcredentials\.googleapis\.com$",
];

fn compile(patterns: &[&str]) -> Vec<Regex> {
    patterns
        .iter()
        .map(|p| Regex::new(p).expect("allow-list patterns are static and known-valid"))
        .collect()
}

/// Returns `true` iff `url` is an `https://` URL whose lower-cased hostname
/// matches at least one of `patterns`.
///
/// Rejects empty URLs and URLs containing internal whitespace before
/// attempting to parse them, closing off encoded-space bypasses.
pub(crate) fn is_valid(patterns: &[Regex], url: &str) -> bool {
    if url.trim().is_empty() || url.chars().any(char::is_whitespace) {
        return false;
    }
    let Ok(parsed) = url::Url::parse(url) else {
        return false;
    };
    if parsed.scheme() != "https" {
        return false;
    }
    let Some(host) = parsed.host_str() else {
        return false;
    };
    if host.is_empty() {
        return false;
    }
    let host = host.to_lowercase();
    patterns.iter().any(|pattern| pattern.is_match(&host))
}
