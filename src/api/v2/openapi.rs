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

//! OpenAPI documentation for API v2.
//!
//! Served at `{prefix}/v2/openapi.json` with the Swagger UI at `{prefix}/v2/docs`.

use utoipa::OpenApi;

use crate::api::shared::{ApiVersionsResponse, ErrorDetail, ErrorResponse, HealthResponse};
use crate::counts::{CountKind, CountSubType};
use crate::models::{
    HourlyClass, HourlyClassRecord, HourlyCount, HourlyVolumeRecord, Location, LocationCounts,
    LocationHourlyCount, Metadata, NonNormalHourlyCount, NonNormalHourlyVolumeRecord,
};

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::api::v1::handlers::list_api_versions,
        crate::api::v1::handlers::health_check,
        super::handlers::list_records,
        super::handlers::get_record,
        super::handlers::get_hourly_volume,
        super::handlers::get_hourly_volume_csv,
        super::handlers::get_non_normal_hourly_volume,
        super::handlers::get_non_normal_hourly_volume_csv,
        super::handlers::get_hourly_class,
        super::handlers::get_hourly_class_csv,
        super::handlers::search_locations,
        super::handlers::get_location,
        super::handlers::get_location_counts,
    ),
    components(
        schemas(
            HealthResponse,
            ApiVersionsResponse,
            ErrorResponse,
            ErrorDetail,
            CountKind,
            CountSubType,
            Metadata,
            HourlyCount,
            HourlyVolumeRecord,
            NonNormalHourlyCount,
            NonNormalHourlyVolumeRecord,
            HourlyClass,
            HourlyClassRecord,
            Location,
            LocationCounts,
            LocationHourlyCount,
        )
    ),
    tags(
        (name = "API", description = "API version information"),
        (name = "Health", description = "Health check endpoints"),
        (name = "Records", description = "Count records and metadata"),
        (name = "Volume", description = "Hourly volume, as JSON or CSV"),
        (name = "Class", description = "Hourly vehicle class counts, as JSON or CSV"),
        (name = "Locations", description = "Count locations and their counts"),
    ),
    info(
        title = "DVRPC Traffic Counts API",
        version = "2.0.0",
        description = "Read-only access to DVRPC's traffic counts.\n\n## API Versioning\n\nThis API uses URL-based versioning. v2 is the current version; v1 keeps the legacy record endpoints.\n\n## Counts not in the database\n\nSome count types are only published as PDF reports. Their records carry metadata and a `static_pdf` link instead of data.\n\n## Suppressed dates\n\nDays flagged as unreliable are listed in `suppressed_dates` and left out of the non-normal and class views unless `include_suppressed=true`.",
        license(
            name = "Apache-2.0",
            url = "https://www.apache.org/licenses/LICENSE-2.0"
        )
    )
)]
pub struct ApiDocV2;
