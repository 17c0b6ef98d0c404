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

//! API v1 handler functions with OpenAPI documentation.
//!
//! These wrap the shared handler implementations with v1 path annotations.

use axum::{
    extract::{Extension, Path, Query},
    response::Json,
};
use std::sync::Arc;

use crate::api::models::{RecordsQuery, ReportRecord};
use crate::api::shared::handlers::{self as shared, ApiResult};
use crate::api::shared::{ApiVersionsResponse, ErrorResponse, HealthResponse};
use crate::service::CountService;

/// List available API versions
#[utoipa::path(
    get,
    path = "/api/traffic-counts/versions",
    responses(
        (status = 200, description = "List of available API versions", body = ApiVersionsResponse),
    ),
    tag = "API"
)]
pub async fn list_api_versions() -> Json<ApiVersionsResponse> {
    shared::list_api_versions().await
}

/// Check server health
#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Server is healthy", body = HealthResponse),
    ),
    tag = "Health"
)]
pub async fn health_check() -> Json<HealthResponse> {
    shared::health_check().await
}

/// List the record numbers of all counts
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v1/records",
    responses(
        (status = 200, description = "Record numbers, newest first", body = [i64]),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Records"
)]
pub async fn list_records(service: Extension<Arc<CountService>>) -> ApiResult<Vec<i64>> {
    shared::list_record_numbers(service, Query(RecordsQuery::default())).await
}

/// Get a count record in the legacy report schema
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v1/report/record/{num}",
    params(
        ("num" = i64, Path, description = "Record number")
    ),
    responses(
        (status = 200, description = "The record", body = ReportRecord),
        (status = 400, description = "Malformed record number", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Records"
)]
pub async fn get_report_record(
    service: Extension<Arc<CountService>>,
    num: Path<String>,
) -> ApiResult<ReportRecord> {
    shared::get_report_record(service, num).await
}
