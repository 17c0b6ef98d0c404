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

//! API v2 route definitions.
//!
//! Routes are relative to the version root and nested under `{prefix}/v2`.

use axum::{routing::get, Router};

use super::handlers;

/// Build the v2 API router. Shared state is layered on by the caller.
pub fn build_v2_router() -> Router {
    let record_routes = Router::new()
        .route("/records", get(handlers::list_records))
        .route("/records/:num", get(handlers::get_record));

    let volume_routes = Router::new()
        .route("/volume/hourly/:num", get(handlers::get_hourly_volume))
        .route(
            "/volume/hourly/csv/:num",
            get(handlers::get_hourly_volume_csv),
        )
        .route(
            "/volume/hourly/non-normal/:num",
            get(handlers::get_non_normal_hourly_volume),
        )
        .route(
            "/volume/hourly/non-normal/csv/:num",
            get(handlers::get_non_normal_hourly_volume_csv),
        );

    let class_routes = Router::new()
        .route("/class/hourly/:num", get(handlers::get_hourly_class))
        .route(
            "/class/hourly/csv/:num",
            get(handlers::get_hourly_class_csv),
        );

    let location_routes = Router::new()
        .route("/locations", get(handlers::search_locations))
        .route("/locations/:station_id", get(handlers::get_location))
        .route(
            "/locations/:station_id/counts",
            get(handlers::get_location_counts),
        );

    Router::new()
        .merge(record_routes)
        .merge(volume_routes)
        .merge(class_routes)
        .merge(location_routes)
}
