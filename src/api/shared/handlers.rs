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

//! Shared handler implementations used across API versions.
//!
//! Version modules wrap these with their own path annotations. Handlers take
//! the count service and CSV cache from `Extension` layers installed by the
//! router builder.

use axum::{
    extract::{Extension, Path, Query},
    http::{header, HeaderValue},
    response::{IntoResponse, Json, Response},
};
use log::debug;
use std::sync::Arc;

use super::error::ErrorResponse;
use super::responses::{ApiVersionsResponse, HealthResponse};
use crate::api::models::params::parse_record_num;
use crate::api::models::{
    DateRangeQuery, LocationSearchQuery, RecordsQuery, ReportRecord, SuppressedQuery,
};
use crate::api::version::{ApiVersion, API_CURRENT_VERSION};
use crate::csv_export::{CsvCache, CsvFile, CsvView};
use crate::models::{
    HourlyClassRecord, HourlyVolumeRecord, Location, LocationCounts, Metadata,
    NonNormalHourlyVolumeRecord,
};
use crate::service::CountService;

pub type ApiResult<T> = Result<Json<T>, ErrorResponse>;

/// List available API versions
pub async fn list_api_versions() -> Json<ApiVersionsResponse> {
    Json(ApiVersionsResponse {
        versions: ApiVersion::all_strings(),
        current: API_CURRENT_VERSION.to_string(),
    })
}

/// Check server health
pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        timestamp: chrono::Utc::now(),
    })
}

pub async fn list_record_numbers(
    Extension(service): Extension<Arc<CountService>>,
    Query(query): Query<RecordsQuery>,
) -> ApiResult<Vec<i64>> {
    let nums = service
        .list_record_numbers(query.count_type.as_deref(), query.sub_type.as_deref())
        .await?;
    Ok(Json(nums))
}

pub async fn get_report_record(
    Extension(service): Extension<Arc<CountService>>,
    Path(num): Path<String>,
) -> ApiResult<ReportRecord> {
    let num = parse_record_num(&num)?;
    let header = service.header(num).await?;
    Ok(Json(header.into()))
}

pub async fn get_metadata(
    Extension(service): Extension<Arc<CountService>>,
    Path(num): Path<String>,
) -> ApiResult<Metadata> {
    let num = parse_record_num(&num)?;
    Ok(Json(service.metadata(num).await?))
}

pub async fn get_hourly_volume(
    Extension(service): Extension<Arc<CountService>>,
    Path(num): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<HourlyVolumeRecord> {
    let num = parse_record_num(&num)?;
    let range = query.range()?;
    Ok(Json(service.hourly_volume(num, &range).await?))
}

pub async fn get_non_normal_hourly_volume(
    Extension(service): Extension<Arc<CountService>>,
    Path(num): Path<String>,
    Query(query): Query<SuppressedQuery>,
) -> ApiResult<NonNormalHourlyVolumeRecord> {
    let num = parse_record_num(&num)?;
    let include_suppressed = query.include_suppressed()?;
    Ok(Json(
        service
            .non_normal_hourly_volume(num, include_suppressed)
            .await?,
    ))
}

pub async fn get_hourly_class(
    Extension(service): Extension<Arc<CountService>>,
    Path(num): Path<String>,
    Query(query): Query<SuppressedQuery>,
) -> ApiResult<HourlyClassRecord> {
    let num = parse_record_num(&num)?;
    let include_suppressed = query.include_suppressed()?;
    Ok(Json(service.hourly_class(num, include_suppressed).await?))
}

pub async fn search_locations(
    Extension(service): Extension<Arc<CountService>>,
    Query(query): Query<LocationSearchQuery>,
) -> ApiResult<Vec<Location>> {
    Ok(Json(service.search_locations(&query.criteria()).await?))
}

pub async fn get_location(
    Extension(service): Extension<Arc<CountService>>,
    Path(station_id): Path<String>,
) -> ApiResult<Location> {
    Ok(Json(service.location(station_id.trim()).await?))
}

/// The date range is validated before the location is looked up.
pub async fn get_location_counts(
    Extension(service): Extension<Arc<CountService>>,
    Path(station_id): Path<String>,
    Query(query): Query<DateRangeQuery>,
) -> ApiResult<LocationCounts> {
    let range = query.range()?;
    Ok(Json(
        service.location_counts(station_id.trim(), range).await?,
    ))
}

/// Serve a CSV view of a count, rendering and caching it when stale.
pub async fn download_csv(
    service: Arc<CountService>,
    cache: Arc<CsvCache>,
    view: CsvView,
    num: &str,
    query: SuppressedQuery,
) -> Result<Response, ErrorResponse> {
    let num = parse_record_num(num)?;
    let include_suppressed = match view {
        CsvView::HourlyVolume => false,
        CsvView::NonNormalVolume | CsvView::HourlyClass => query.include_suppressed()?,
    };

    let file = cache
        .fetch(&service, view, num, include_suppressed)
        .await?;
    debug!("Sending {} ({} bytes)", file.filename, file.contents.len());
    Ok(csv_response(file))
}

fn csv_response(file: CsvFile) -> Response {
    let disposition = HeaderValue::from_str(&format!(
        "attachment; filename=\"{}\"",
        file.filename
    ))
    .unwrap_or_else(|_| HeaderValue::from_static("attachment"));

    (
        [
            (
                header::CONTENT_TYPE,
                HeaderValue::from_static("text/csv; charset=utf-8"),
            ),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        file.contents,
    )
        .into_response()
}
