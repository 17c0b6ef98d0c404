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

//! CSV export tests: response headers, file layout and the on-disk cache.

#![allow(clippy::unwrap_used)]

mod test_support;

use axum::http::{header, StatusCode};
use std::sync::Arc;
use tempfile::TempDir;

use test_support::{at, fixture_store, get, test_router};
use traffic_counts_api::csv_export::UNCLASSIFIED_NOTE;
use traffic_counts_api::{CsvCache, CsvView};

const V2: &str = "/api/traffic-counts/v2";

#[tokio::test]
async fn test_hourly_volume_csv_response() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, headers, body) = get(&router, &format!("{V2}/volume/hourly/csv/1001")).await;

    assert_eq!(status, StatusCode::OK);
    assert!(headers[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/csv"));
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"volume_1001.csv\""
    );

    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[0].starts_with("record_num,"));
    assert!(lines[1].starts_with("1001,"));
    assert_eq!(lines[2], "");
    assert_eq!(lines[3], "datetime,volume");
    assert_eq!(lines[4], "2023-05-01T00:00:00,2");
    assert_eq!(lines.len(), 4 + 30);

    let cached = CsvCache::new(dir.path()).path_for(CsvView::HourlyVolume, 1001, false);
    assert!(cached.exists(), "{} was not written", cached.display());
}

#[tokio::test]
async fn test_non_normal_csv_lists_suppressed_dates() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, _, body) = get(
        &router,
        &format!("{V2}/volume/hourly/non-normal/csv/1001"),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    let text = String::from_utf8(body).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    let section = lines.iter().position(|l| *l == "suppressed_dates:").unwrap();
    assert_eq!(lines[section + 1], "2023-05-02");
    assert!(lines.iter().any(|l| l.starts_with("2023-05-01,2,")));
    assert!(!lines.iter().any(|l| l.starts_with("2023-05-02,10,")));
}

#[tokio::test]
async fn test_suppressed_variants_are_cached_separately() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (_, _, default_body) = get(
        &router,
        &format!("{V2}/volume/hourly/non-normal/csv/1001"),
    )
    .await;
    let (_, _, full_body) = get(
        &router,
        &format!("{V2}/volume/hourly/non-normal/csv/1001?include_suppressed=true"),
    )
    .await;

    assert_ne!(default_body, full_body);
    assert!(String::from_utf8(full_body)
        .unwrap()
        .lines()
        .any(|l| l.starts_with("2023-05-02,10,")));

    let cache = CsvCache::new(dir.path());
    assert!(cache.path_for(CsvView::NonNormalVolume, 1001, false).exists());
    assert!(cache.path_for(CsvView::NonNormalVolume, 1001, true).exists());
}

#[tokio::test]
async fn test_class_csv_ends_with_note() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, headers, body) = get(&router, &format!("{V2}/class/hourly/csv/1002")).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        headers[header::CONTENT_DISPOSITION],
        "attachment; filename=\"class_1002.csv\""
    );
    let text = String::from_utf8(body).unwrap();
    assert!(text.trim_end().ends_with(UNCLASSIFIED_NOTE));
}

#[tokio::test]
async fn test_csv_for_unknown_record_is_not_found() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());

    let (status, _, _) = get(&router, &format!("{V2}/class/hourly/csv/99")).await;

    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(!CsvCache::new(dir.path())
        .path_for(CsvView::HourlyClass, 99, false)
        .exists());
}

#[tokio::test]
async fn test_cache_reused_until_aadv_recalculated() {
    let dir = TempDir::new().unwrap();
    let mut store = fixture_store();
    // Calculated long before the file is written
    store.set_aadv_calculated(1001, at(2000, 1, 1, 0, 0));
    let router = test_router(Arc::new(store), dir.path());
    let uri = format!("{V2}/volume/hourly/csv/1001");

    get(&router, &uri).await;
    let path = CsvCache::new(dir.path()).path_for(CsvView::HourlyVolume, 1001, false);
    std::fs::write(&path, "cached").unwrap();

    let (status, _, body) = get(&router, &uri).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"cached");
}

#[tokio::test]
async fn test_cache_rebuilt_when_aadv_is_newer() {
    let dir = TempDir::new().unwrap();
    let mut store = fixture_store();
    store.set_aadv_calculated(1001, at(2999, 1, 1, 0, 0));
    let router = test_router(Arc::new(store), dir.path());
    let uri = format!("{V2}/volume/hourly/csv/1001");

    get(&router, &uri).await;
    let path = CsvCache::new(dir.path()).path_for(CsvView::HourlyVolume, 1001, false);
    std::fs::write(&path, "stale").unwrap();

    let (_, _, body) = get(&router, &uri).await;

    assert!(body.starts_with(b"record_num,"));
    assert_eq!(std::fs::read(&path).unwrap(), body);
}

#[tokio::test]
async fn test_cache_rebuilt_without_aadv_date() {
    let dir = TempDir::new().unwrap();
    let router = test_router(Arc::new(fixture_store()), dir.path());
    let uri = format!("{V2}/class/hourly/csv/1002");

    get(&router, &uri).await;
    let path = CsvCache::new(dir.path()).path_for(CsvView::HourlyClass, 1002, false);
    std::fs::write(&path, "stale").unwrap();

    let (_, _, body) = get(&router, &uri).await;

    assert_ne!(body, b"stale");
}
