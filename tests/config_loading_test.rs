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

//! Configuration loading tests against the shipped configuration and a
//! server built from it.

#![allow(clippy::unwrap_used)]

mod test_support;

use axum::http::StatusCode;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;
use tempfile::TempDir;

use test_support::{fixture_store, get_json};
use traffic_counts_api::{load_config_file, ConfigError, TrafficCountsServer};

fn shipped_config() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("config/server.yaml")
}

#[test]
fn test_shipped_config_is_valid() {
    let config = load_config_file(shipped_config()).unwrap();

    assert_eq!(config.port, 8080);
    assert_eq!(config.url_prefix, "/api/traffic-counts");
    assert_eq!(config.database.port, 5432);
    assert!(config.database.max_connections > 0);
}

#[test]
fn test_config_errors_name_the_problem() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("server.yaml");
    fs::write(
        &path,
        "urlPrefix: /api/traffic-counts/\ndatabase:\n  user: u\n  name: n\n",
    )
    .unwrap();

    let err = load_config_file(&path).unwrap_err();

    assert!(matches!(err, ConfigError::ValidationError(_)));
    assert!(err.to_string().contains("urlPrefix"), "{err}");
}

#[tokio::test]
async fn test_server_serves_configured_prefix() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("server.yaml");
    fs::write(
        &path,
        format!(
            "urlPrefix: /counts\ncsvCacheDir: {}\ndatabase:\n  user: u\n  name: n\n",
            dir.path().join("csv").display()
        ),
    )
    .unwrap();

    let config = load_config_file(&path).unwrap();
    let server = TrafficCountsServer::with_store(config, Arc::new(fixture_store()));
    let router = server.router();

    let (status, json) = get_json(&router, "/counts/v2/records/1003").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["sub_type"], "Bicycle 2");

    let (status, json) = get_json(&router, "/counts/v2/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(json["paths"]["/counts/v2/records"].is_object());

    let (status, _) = get_json(&router, "/counts/versions").await;
    assert_eq!(status, StatusCode::OK);
}
