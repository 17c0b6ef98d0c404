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

//! OpenAPI documentation for API v1.
//!
//! Served at `{prefix}/v1/openapi.json` with the Swagger UI at `{prefix}/v1/docs`.

use utoipa::OpenApi;

use crate::api::models::ReportRecord;
use crate::api::shared::{ApiVersionsResponse, ErrorDetail, ErrorResponse, HealthResponse};

#[derive(OpenApi)]
#[openapi(
    paths(
        super::handlers::list_api_versions,
        super::handlers::health_check,
        super::handlers::list_records,
        super::handlers::get_report_record,
    ),
    components(
        schemas(
            HealthResponse,
            ApiVersionsResponse,
            ReportRecord,
            ErrorResponse,
            ErrorDetail,
        )
    ),
    tags(
        (name = "API", description = "API version information"),
        (name = "Health", description = "Health check endpoints"),
        (name = "Records", description = "Legacy count records"),
    ),
    info(
        title = "DVRPC Traffic Counts API",
        version = "1.0.0",
        description = "Legacy (v1) endpoints of the DVRPC Traffic Counts API.\n\nNew clients should use v2, which adds hourly volume, vehicle class, CSV exports and count locations.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    )
)]
pub struct ApiDocV1;
