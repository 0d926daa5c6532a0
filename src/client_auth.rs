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

//! HTTP Basic client authentication for the STS token endpoint.

use base64::prelude::{BASE64_STANDARD, Engine as _};

/// Optional `client_id`/`client_secret` pair used to authenticate a
/// credential to the STS endpoint with HTTP Basic auth.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ClientAuthentication {
    pub client_id: String,
    pub client_secret: String,
}

impl ClientAuthentication {
    pub(crate) fn new(client_id: String, client_secret: String) -> Self {
        Self {
            client_id,
            client_secret,
        }
    }

    /// The value of the `Authorization` header: `Basic base64(id:secret)`.
    pub(crate) fn basic_auth_header(&self) -> String {
        let raw = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", BASE64_STANDARD.encode(raw))
    }
}
