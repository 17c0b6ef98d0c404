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

//! API v1 route definitions.
//!
//! Routes are relative to the version root and nested under `{prefix}/v1`.

use axum::{routing::get, Router};

use super::handlers;

/// Build the v1 API router. Shared state is layered on by the caller.
pub fn build_v1_router() -> Router {
    Router::new()
        .route("/records", get(handlers::list_records))
        .route("/report/record/:num", get(handlers::get_report_record))
}
