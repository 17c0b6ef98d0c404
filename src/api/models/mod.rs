// Copyright 2025 The Traffic Counts API Authors.
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! API models: query parameters accepted by the endpoints and the legacy
//! record schema served by v1.
//!
//! Count, metadata and location payloads are serialized straight from
//! [`crate::models`]; only shapes that exist purely for the HTTP surface live
//! here.

pub mod params;
pub mod report;

pub use params::{DateRangeQuery, LocationSearchQuery, RecordsQuery, SuppressedQuery};
pub use report::ReportRecord;
