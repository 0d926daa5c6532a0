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

//! An abstract UTC clock, so tests can pin `now` and lock down expiry math
//! deterministically.

use time::OffsetDateTime;

/// A source of the current UTC time.
///
/// Production code uses [SystemClock]. Tests inject a fixed-time
/// implementation to assert exact expiry values without racing the wall
/// clock.
pub(crate) trait Clock: std::fmt::Debug + Send + Sync {
    fn now(&self) -> OffsetDateTime;
}

/// The default [Clock], backed by [OffsetDateTime::now_utc].
#[derive(Clone, Debug, Default)]
pub(crate) struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
