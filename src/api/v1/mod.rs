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

//! API Version 1 (v1) implementation.
//!
//! The legacy record endpoints, kept for existing clients:
//!
//! - `GET {prefix}/v1/records` - All record numbers
//! - `GET {prefix}/v1/report/record/{num}` - A record in the legacy report schema

pub mod handlers;
pub mod openapi;
pub mod routes;

pub use openapi::ApiDocV1;
pub use routes::build_v1_router;
