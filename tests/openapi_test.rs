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

//! OpenAPI Integration Tests
//!
//! Verifies that each version's OpenAPI document covers its endpoints and is
//! served next to its Swagger UI.

#![allow(clippy::unwrap_used)]

mod test_support;

use axum::http::StatusCode;
use std::sync::Arc;
use tempfile::TempDir;
use utoipa::OpenApi;

use test_support::{fixture_store, get_json, test_router};
use traffic_counts_api::api::{ApiDocV1, ApiDocV2};

#[test]
fn test_v2_documents_every_endpoint() {
    let json = serde_json::to_value(ApiDocV2::openapi()).unwrap();
    let paths = json["paths"].as_object().unwrap();

    for path in [
        "/health",
        "/api/traffic-counts/versions",
        "/api/traffic-counts/v2/records",
        "/api/traffic-counts/v2/records/{num}",
        "/api/traffic-counts/v2/volume/hourly/{num}",
        "/api/traffic-counts/v2/volume/hourly/csv/{num}",
        "/api/traffic-counts/v2/volume/hourly/non-normal/{num}",
        "/api/traffic-counts/v2/volume/hourly/non-normal/csv/{num}",
        "/api/traffic-counts/v2/class/hourly/{num}",
        "/api/traffic-counts/v2/class/hourly/csv/{num}",
        "/api/traffic-counts/v2/locations",
        "/api/traffic-counts/v2/locations/{station_id}",
        "/api/traffic-counts/v2/locations/{station_id}/counts",
    ] {
        assert!(paths[path]["get"].is_object(), "GET {path} is not documented");
    }
}

#[test]
fn test_v2_documents_query_parameters() {
    let json = serde_json::to_value(ApiDocV2::openapi()).unwrap();

    let params = json["paths"]["/api/traffic-counts/v2/locations/{station_id}/counts"]["get"]
        ["parameters"]
        .as_array()
        .unwrap();
    let names: Vec<&str> = params
        .iter()
        .map(|p| p["name"].as_str().unwrap())
        .collect();

    assert!(names.contains(&"station_id"));
    assert!(names.contains(&"start_date"));
    assert!(names.contains(&"end_date"));
}

#[test]
fn test_v1_documents_only_legacy_endpoints() {
    let json = serde_json::to_value(ApiDocV1::openapi()).unwrap();
    let paths = json["paths"].as_object().unwrap();

    assert!(paths.contains_key("/api/traffic-counts/v1/records"));
    assert!(paths.contains_key("/api/traffic-counts/v1/report/record/{num}"));
    assert!(!paths.keys().any(|path| path.contains("/v2/")));
    assert!(json["components"]["schemas"]["ReportRecord"].is_object());
}

#[tokio::test]
async fn test_openapi_served_per_version() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    for version in ["v1", "v2"] {
        let (status, json) =
            get_json(&router, &format!("/api/traffic-counts/{version}/openapi.json")).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(json["info"]["title"], "DVRPC Traffic Counts API");
    }
}
