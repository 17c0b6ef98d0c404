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

//! API v1 and unversioned endpoint tests.

#![allow(clippy::unwrap_used)]

mod test_support;

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
};
use pretty_assertions::assert_eq;
use serde_json::json;
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use test_support::{fixture_store, get_json, test_router};

const V1: &str = "/api/traffic-counts/v1";

#[tokio::test]
async fn test_health_check() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, json) = get_json(&router, "/health").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["status"], "ok");
    assert!(json["timestamp"].is_string());
}

#[tokio::test]
async fn test_list_api_versions() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, json) = get_json(&router, "/api/traffic-counts/versions").await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!({"versions": ["v1", "v2"], "current": "v2"}));
}

#[tokio::test]
async fn test_v1_records_lists_every_record() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, json) = get_json(&router, &format!("{V1}/records")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json, json!([1005, 1004, 1003, 1002, 1001]));
}

#[tokio::test]
async fn test_v1_report_record_uses_legacy_schema() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, json) = get_json(&router, &format!("{V1}/report/record/1001")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["record_num"], 1001);
    assert_eq!(json["type"], "Volume");
    assert_eq!(json["date"], "2023-05-01");
    assert_eq!(json["station_id"], "ST-1");
    assert_eq!(json["road"], "Main St");
    assert_eq!(json["MCD"], "4209101000");
    for key in ["SR", "SEQ", "SRI", "MP", "FC", "weather", "taken_by"] {
        assert!(json.get(key).is_some(), "missing legacy key {key}");
    }
    // v2-only fields are not part of the legacy schema
    assert!(json.get("municipality").is_none());
    assert!(json.get("aadv").is_none());
}

#[tokio::test]
async fn test_v1_report_record_served_even_for_unrecognized_type() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, json) = get_json(&router, &format!("{V1}/report/record/1005")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["type"], "Bogus");
}

#[tokio::test]
async fn test_v1_report_record_not_found() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, json) = get_json(&router, &format!("{V1}/report/record/7")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["message"], "Record not found");
}

#[tokio::test]
async fn test_v2_only_routes_are_absent_from_v1() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("{V1}/volume/hourly/1001"))
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_cors_allows_any_origin() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let response = router
        .oneshot(
            Request::builder()
                .uri(format!("{V1}/records"))
                .header(header::ORIGIN, "https://www.dvrpc.org")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(
        response
            .headers()
            .get(header::ACCESS_CONTROL_ALLOW_ORIGIN)
            .unwrap(),
        "*"
    );
}
