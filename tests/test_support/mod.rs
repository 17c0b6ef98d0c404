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

//! Shared fixtures for the integration tests.
//!
//! `fixture_store` holds a handful of counts covering every kind of record
//! the API distinguishes:
//!
//! | record | type             | station | notes                                  |
//! |--------|------------------|---------|----------------------------------------|
//! | 1001   | Volume           | ST-1    | 2023-05-01 full day, 2023-05-02 suppressed |
//! | 1002   | Class            | ST-1    | 2023-06-10 10:00-12:00, class rows     |
//! | 1003   | Bicycle 2        | ST-2    | bicycle table                          |
//! | 1004   | Turning Movement | ST-3    | not in the database (static PDF)       |
//! | 1005   | Bogus            | ST-4    | unrecognized type                      |

#![allow(dead_code)]

use axum::{
    body::{to_bytes, Body},
    http::{HeaderMap, Request, StatusCode},
    Router,
};
use chrono::{NaiveDate, NaiveDateTime};
use std::path::Path;
use std::sync::Arc;
use tower::ServiceExt;

use traffic_counts_api::api;
use traffic_counts_api::models::HourlyClass;
use traffic_counts_api::store::{HeaderRow, MunicipalityRow};
use traffic_counts_api::{CountService, CountStore, CountTable, CsvCache, MemoryCountStore};

pub const PREFIX: &str = "/api/traffic-counts";
pub const PDF_BASE_URL: &str = "https://example.org/TrafficCountPDF";

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub fn at(y: i32, m: u32, d: u32, hour: u32, minute: u32) -> NaiveDateTime {
    date(y, m, d).and_hms_opt(hour, minute, 0).unwrap()
}

pub fn header(num: i64, count_type: &str, station: &str, road: &str, mcd: &str) -> HeaderRow {
    HeaderRow {
        recordnum: num,
        source: Some("0".to_string()),
        stationid: Some(station.to_string()),
        count_type: Some(count_type.to_string()),
        road: Some(road.to_string()),
        mcd: Some(mcd.to_string()),
        ..Default::default()
    }
}

pub fn class_row(datetime: NaiveDateTime, cars: i64, trucks: i64) -> HourlyClass {
    HourlyClass {
        datetime,
        total: cars + trucks,
        motorcycles: 0,
        passenger_cars: cars,
        other_four_tire_single_unit_vehicles: 0,
        buses: 0,
        two_axle_six_tire_single_unit_trucks: trucks,
        three_axle_single_unit_trucks: 0,
        four_or_more_axle_single_unit_trucks: 0,
        four_or_fewer_axle_single_trailer_trucks: 0,
        five_axle_single_trailer_trucks: 0,
        six_or_more_axle_single_trailer_trucks: 0,
        five_or_fewer_axle_multi_trailer_trucks: 0,
        six_axle_multi_trailer_trucks: 0,
        seven_or_more_axle_multi_trailer_trucks: 0,
        unclassified_vehicle: Some(0),
    }
}

pub fn fixture_store() -> MemoryCountStore {
    let mut store = MemoryCountStore::new();

    store.insert_municipality(
        "4209101000",
        MunicipalityRow {
            mcdname: Some("Abington Township".to_string()),
            county: Some("Montgomery".to_string()),
            state: Some("PA".to_string()),
        },
    );
    store.insert_municipality(
        "4210160000",
        MunicipalityRow {
            mcdname: Some("Philadelphia".to_string()),
            county: Some("Philadelphia".to_string()),
            state: Some("PA".to_string()),
        },
    );

    let mut volume = header(1001, "Volume", "ST-1", "Main St", "4209101000");
    volume.setdate = Some(date(2023, 5, 1));
    store.insert_header(volume);
    // 15-minute rows: hour h carries (h + 1) at :00 and 1 at :30
    for hour in 0..24 {
        store.insert_volume(CountTable::Vehicle, 1001, at(2023, 5, 1, hour, 0), i64::from(hour) + 1);
        store.insert_volume(CountTable::Vehicle, 1001, at(2023, 5, 1, hour, 30), 1);
    }
    for hour in 0..6 {
        store.insert_volume(CountTable::Vehicle, 1001, at(2023, 5, 2, hour, 0), 10);
    }
    store.suppress_date(1001, date(2023, 5, 2));

    let mut class = header(1002, "Class", "ST-1", "Main St", "4209101000");
    class.setdate = Some(date(2023, 6, 10));
    store.insert_header(class);
    for hour in 10..13 {
        store.insert_volume(CountTable::Vehicle, 1002, at(2023, 6, 10, hour, 0), 100);
        store.insert_class(1002, class_row(at(2023, 6, 10, hour, 0), 90, 10));
    }

    store.insert_header(header(1003, "Bicycle 2", "ST-2", "Schuylkill River Trail", "4210160000"));
    store.insert_volume(CountTable::Bicycle, 1003, at(2022, 9, 14, 7, 0), 12);
    store.insert_volume(CountTable::Bicycle, 1003, at(2022, 9, 14, 8, 0), 30);

    store.insert_header(header(1004, "Turning Movement", "ST-3", "Broad St", "4210160000"));
    store.insert_header(header(1005, "Bogus", "ST-4", "Market St", "4210160000"));

    store
}

/// Router over `store` with the default prefix, caching CSVs in `csv_dir`.
pub fn test_router(store: Arc<MemoryCountStore>, csv_dir: &Path) -> Router {
    let service = CountService::new(store as Arc<dyn CountStore>, PDF_BASE_URL);
    api::build_router(
        Arc::new(service),
        Arc::new(CsvCache::new(csv_dir)),
        PREFIX,
    )
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, HeaderMap, Vec<u8>) {
    let response = router
        .clone()
        .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap();

    let status = response.status();
    let headers = response.headers().clone();
    let body = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, headers, body.to_vec())
}

pub async fn get_json(router: &Router, uri: &str) -> (StatusCode, serde_json::Value) {
    let (status, _, body) = get(router, uri).await;
    let json = serde_json::from_slice(&body)
        .unwrap_or_else(|e| panic!("{uri} returned non-JSON body ({e}): {body:?}"));
    (status, json)
}
