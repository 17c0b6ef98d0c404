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

use chrono::NaiveDate;
use serde::Serialize;
use utoipa::ToSchema;

/// A count record in the legacy v1 schema.
///
/// Field names follow the historical report format, including the upper-case
/// `SR`, `SEQ`, `SRI`, `MP`, `MCD` and `FC` keys.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct ReportRecord {
    pub record_num: i64,
    #[serde(rename = "type")]
    pub count_type: Option<String>,
    pub date: Option<NaiveDate>,
    pub taken_by: Option<String>,
    pub counter_id: Option<String>,
    pub station_id: Option<String>,
    pub description: Option<String>,
    pub project: Option<String>,
    pub program: Option<String>,
    pub group: Option<String>,
    pub facility: Option<String>,
    #[serde(rename = "SR")]
    pub sr: Option<String>,
    #[serde(rename = "SEQ")]
    pub seq: Option<String>,
    pub offset: Option<String>,
    #[serde(rename = "SRI")]
    pub sri: Option<String>,
    #[serde(rename = "MP")]
    pub mp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    #[serde(rename = "MCD")]
    pub mcd: Option<String>,
    pub route: Option<i32>,
    pub road: Option<String>,
    pub road_prefix: Option<String>,
    pub road_suffix: Option<String>,
    pub is_urban: Option<String>,
    pub sidewalk: Option<String>,
    pub out_direction: Option<String>,
    pub in_direction: Option<String>,
    pub counter_direction: Option<String>,
    pub traffic_direction: Option<String>,
    #[serde(rename = "FC")]
    pub fc: Option<i32>,
    pub speed_limit: Option<i32>,
    pub weather: Option<String>,
}
