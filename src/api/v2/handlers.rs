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

//! API v2 handler functions with OpenAPI documentation.
//!
//! These wrap the shared handler implementations with v2 path annotations.

use axum::{
    extract::{Extension, Path, Query},
    response::Response,
};
use std::sync::Arc;

use crate::api::models::{DateRangeQuery, LocationSearchQuery, RecordsQuery, SuppressedQuery};
use crate::api::shared::handlers::{self as shared, ApiResult};
use crate::api::shared::ErrorResponse;
use crate::csv_export::{CsvCache, CsvView};
use crate::models::{
    HourlyClassRecord, HourlyVolumeRecord, Location, LocationCounts, Metadata,
    NonNormalHourlyVolumeRecord,
};
use crate::service::CountService;

/// List record numbers, optionally filtered by count type or sub type
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/records",
    params(RecordsQuery),
    responses(
        (status = 200, description = "Record numbers, newest first", body = [i64]),
        (status = 400, description = "Unknown count type or sub type", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Records"
)]
pub async fn list_records(
    service: Extension<Arc<CountService>>,
    query: Query<RecordsQuery>,
) -> ApiResult<Vec<i64>> {
    shared::list_record_numbers(service, query).await
}

/// Get the metadata of a count
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/records/{num}",
    params(
        ("num" = i64, Path, description = "Record number")
    ),
    responses(
        (status = 200, description = "Count metadata", body = Metadata),
        (status = 400, description = "Malformed record number", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Records"
)]
pub async fn get_record(
    service: Extension<Arc<CountService>>,
    num: Path<String>,
) -> ApiResult<Metadata> {
    shared::get_metadata(service, num).await
}

/// Get the hourly volume of a count
///
/// Counts that are not kept in the database return an empty series and a
/// link to their static PDF.
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/volume/hourly/{num}",
    params(
        ("num" = i64, Path, description = "Record number"),
        DateRangeQuery,
    ),
    responses(
        (status = 200, description = "Metadata and hourly volume", body = HourlyVolumeRecord),
        (status = 400, description = "Malformed record number or date range", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Volume"
)]
pub async fn get_hourly_volume(
    service: Extension<Arc<CountService>>,
    num: Path<String>,
    query: Query<DateRangeQuery>,
) -> ApiResult<HourlyVolumeRecord> {
    shared::get_hourly_volume(service, num, query).await
}

/// Download the hourly volume of a count as CSV
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/volume/hourly/csv/{num}",
    params(
        ("num" = i64, Path, description = "Record number")
    ),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Volume"
)]
pub async fn get_hourly_volume_csv(
    Extension(service): Extension<Arc<CountService>>,
    Extension(cache): Extension<Arc<CsvCache>>,
    Path(num): Path<String>,
) -> Result<Response, ErrorResponse> {
    shared::download_csv(
        service,
        cache,
        CsvView::HourlyVolume,
        &num,
        SuppressedQuery::default(),
    )
    .await
}

/// Get the hourly volume of a count with one row per day
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/volume/hourly/non-normal/{num}",
    params(
        ("num" = i64, Path, description = "Record number"),
        SuppressedQuery,
    ),
    responses(
        (status = 200, description = "Metadata and daily rows of hourly volume", body = NonNormalHourlyVolumeRecord),
        (status = 400, description = "Malformed parameter", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Volume"
)]
pub async fn get_non_normal_hourly_volume(
    service: Extension<Arc<CountService>>,
    num: Path<String>,
    query: Query<SuppressedQuery>,
) -> ApiResult<NonNormalHourlyVolumeRecord> {
    shared::get_non_normal_hourly_volume(service, num, query).await
}

/// Download the daily rows of hourly volume as CSV
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/volume/hourly/non-normal/csv/{num}",
    params(
        ("num" = i64, Path, description = "Record number"),
        SuppressedQuery,
    ),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 400, description = "Malformed parameter", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Volume"
)]
pub async fn get_non_normal_hourly_volume_csv(
    Extension(service): Extension<Arc<CountService>>,
    Extension(cache): Extension<Arc<CsvCache>>,
    Path(num): Path<String>,
    Query(query): Query<SuppressedQuery>,
) -> Result<Response, ErrorResponse> {
    shared::download_csv(service, cache, CsvView::NonNormalVolume, &num, query).await
}

/// Get hourly vehicle class counts
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/class/hourly/{num}",
    params(
        ("num" = i64, Path, description = "Record number"),
        SuppressedQuery,
    ),
    responses(
        (status = 200, description = "Metadata and hourly class counts", body = HourlyClassRecord),
        (status = 400, description = "Malformed parameter", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Class"
)]
pub async fn get_hourly_class(
    service: Extension<Arc<CountService>>,
    num: Path<String>,
    query: Query<SuppressedQuery>,
) -> ApiResult<HourlyClassRecord> {
    shared::get_hourly_class(service, num, query).await
}

/// Download hourly vehicle class counts as CSV
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/class/hourly/csv/{num}",
    params(
        ("num" = i64, Path, description = "Record number"),
        SuppressedQuery,
    ),
    responses(
        (status = 200, description = "CSV file", content_type = "text/csv", body = String),
        (status = 400, description = "Malformed parameter", body = ErrorResponse),
        (status = 404, description = "Record not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Class"
)]
pub async fn get_hourly_class_csv(
    Extension(service): Extension<Arc<CountService>>,
    Extension(cache): Extension<Arc<CsvCache>>,
    Path(num): Path<String>,
    Query(query): Query<SuppressedQuery>,
) -> Result<Response, ErrorResponse> {
    shared::download_csv(service, cache, CsvView::HourlyClass, &num, query).await
}

/// Search count locations
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/locations",
    params(LocationSearchQuery),
    responses(
        (status = 200, description = "Matching locations, ordered by station id", body = [Location]),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Locations"
)]
pub async fn search_locations(
    service: Extension<Arc<CountService>>,
    query: Query<LocationSearchQuery>,
) -> ApiResult<Vec<Location>> {
    shared::search_locations(service, query).await
}

/// Get a count location
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/locations/{station_id}",
    params(
        ("station_id" = String, Path, description = "Station id")
    ),
    responses(
        (status = 200, description = "The location", body = Location),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Locations"
)]
pub async fn get_location(
    service: Extension<Arc<CountService>>,
    station_id: Path<String>,
) -> ApiResult<Location> {
    shared::get_location(service, station_id).await
}

/// Get the hourly volume of every count taken at a location
#[utoipa::path(
    get,
    path = "/api/traffic-counts/v2/locations/{station_id}/counts",
    params(
        ("station_id" = String, Path, description = "Station id"),
        DateRangeQuery,
    ),
    responses(
        (status = 200, description = "Hourly volume in chronological order", body = LocationCounts),
        (status = 400, description = "Malformed or inverted date range", body = ErrorResponse),
        (status = 404, description = "Location not found", body = ErrorResponse),
        (status = 503, description = "Database unavailable", body = ErrorResponse),
    ),
    tag = "Locations"
)]
pub async fn get_location_counts(
    service: Extension<Arc<CountService>>,
    station_id: Path<String>,
    query: Query<DateRangeQuery>,
) -> ApiResult<LocationCounts> {
    shared::get_location_counts(service, station_id, query).await
}
