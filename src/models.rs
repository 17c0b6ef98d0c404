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

//! Result types returned by the query service.
//!
//! Field names are the public (snake_case) names used in JSON bodies and CSV
//! headers, so the declaration order here is also the CSV column order.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::counts::{CountKind, CountSubType};

/// Count metadata, from the count header table.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Metadata {
    pub record_num: i64,
    pub source: Option<String>,
    pub counter_id: Option<String>,
    pub station_id: Option<String>,
    /// Broad grouping derived from `sub_type`
    pub count_kind: Option<CountKind>,
    pub sub_type: Option<CountSubType>,
    pub set_date: Option<NaiveDate>,
    pub project: Option<String>,
    pub program: Option<String>,
    pub group: Option<String>,
    pub facility: Option<String>,
    pub sr: Option<String>,
    pub seg: Option<String>,
    pub offset: Option<String>,
    pub sri: Option<String>,
    pub mp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mcd: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    pub route: Option<i32>,
    pub road: Option<String>,
    pub road_prefix: Option<String>,
    pub road_suffix: Option<String>,
    pub is_urban: Option<String>,
    pub sidewalk: Option<String>,
    pub lane1_dir: Option<String>,
    pub lane2_dir: Option<String>,
    pub lane3_dir: Option<String>,
    pub count_direction: Option<String>,
    pub traffic_direction: Option<String>,
    pub functional_class: Option<i32>,
    pub speed_limit: Option<i32>,
    pub aadv: Option<i64>,
    pub am_peak_volume: Option<i64>,
    pub avg_am_max_percent: Option<f64>,
    pub pm_peak_volume: Option<i64>,
    pub avg_pm_max_percent: Option<f64>,
    pub comments: Option<String>,
}

/// Volume of a count for one hour.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HourlyCount {
    pub datetime: NaiveDateTime,
    pub volume: i64,
}

/// A volume count by hour.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyVolumeRecord {
    pub metadata: Metadata,
    /// Link to the scanned count for counts kept outside the database
    pub static_pdf: Option<String>,
    pub counts: Vec<HourlyCount>,
}

/// One day of a count, pivoted into hourly columns.
///
/// `total` is only present when all 24 hours have data.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, ToSchema)]
pub struct NonNormalHourlyCount {
    pub date: NaiveDate,
    pub am12: Option<i64>,
    pub am1: Option<i64>,
    pub am2: Option<i64>,
    pub am3: Option<i64>,
    pub am4: Option<i64>,
    pub am5: Option<i64>,
    pub am6: Option<i64>,
    pub am7: Option<i64>,
    pub am8: Option<i64>,
    pub am9: Option<i64>,
    pub am10: Option<i64>,
    pub am11: Option<i64>,
    pub pm12: Option<i64>,
    pub pm1: Option<i64>,
    pub pm2: Option<i64>,
    pub pm3: Option<i64>,
    pub pm4: Option<i64>,
    pub pm5: Option<i64>,
    pub pm6: Option<i64>,
    pub pm7: Option<i64>,
    pub pm8: Option<i64>,
    pub pm9: Option<i64>,
    pub pm10: Option<i64>,
    pub pm11: Option<i64>,
    pub total: Option<i64>,
}

impl NonNormalHourlyCount {
    pub fn new(date: NaiveDate) -> Self {
        Self {
            date,
            ..Default::default()
        }
    }

    /// Mutable slot for an hour of the day (0-23).
    pub fn hour_mut(&mut self, hour: u32) -> Option<&mut Option<i64>> {
        let slot = match hour {
            0 => &mut self.am12,
            1 => &mut self.am1,
            2 => &mut self.am2,
            3 => &mut self.am3,
            4 => &mut self.am4,
            5 => &mut self.am5,
            6 => &mut self.am6,
            7 => &mut self.am7,
            8 => &mut self.am8,
            9 => &mut self.am9,
            10 => &mut self.am10,
            11 => &mut self.am11,
            12 => &mut self.pm12,
            13 => &mut self.pm1,
            14 => &mut self.pm2,
            15 => &mut self.pm3,
            16 => &mut self.pm4,
            17 => &mut self.pm5,
            18 => &mut self.pm6,
            19 => &mut self.pm7,
            20 => &mut self.pm8,
            21 => &mut self.pm9,
            22 => &mut self.pm10,
            23 => &mut self.pm11,
            _ => return None,
        };
        Some(slot)
    }

    pub fn hours(&self) -> [Option<i64>; 24] {
        [
            self.am12, self.am1, self.am2, self.am3, self.am4, self.am5, self.am6, self.am7,
            self.am8, self.am9, self.am10, self.am11, self.pm12, self.pm1, self.pm2, self.pm3,
            self.pm4, self.pm5, self.pm6, self.pm7, self.pm8, self.pm9, self.pm10, self.pm11,
        ]
    }
}

/// A non-normal hourly volume count.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct NonNormalHourlyVolumeRecord {
    pub metadata: Metadata,
    pub static_pdf: Option<String>,
    pub suppressed_dates: Vec<NaiveDate>,
    pub counts: Vec<NonNormalHourlyCount>,
}

/// Hourly volume by vehicle class.
///
/// Unclassified vehicles are listed in their own field, but are also included
/// in `passenger_cars`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct HourlyClass {
    pub datetime: NaiveDateTime,
    pub total: i64,
    pub motorcycles: i64,
    pub passenger_cars: i64,
    pub other_four_tire_single_unit_vehicles: i64,
    pub buses: i64,
    pub two_axle_six_tire_single_unit_trucks: i64,
    pub three_axle_single_unit_trucks: i64,
    pub four_or_more_axle_single_unit_trucks: i64,
    pub four_or_fewer_axle_single_trailer_trucks: i64,
    pub five_axle_single_trailer_trucks: i64,
    pub six_or_more_axle_single_trailer_trucks: i64,
    pub five_or_fewer_axle_multi_trailer_trucks: i64,
    pub six_axle_multi_trailer_trucks: i64,
    pub seven_or_more_axle_multi_trailer_trucks: i64,
    pub unclassified_vehicle: Option<i64>,
}

/// A class count by hour.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct HourlyClassRecord {
    pub metadata: Metadata,
    pub static_pdf: Option<String>,
    pub suppressed_dates: Vec<NaiveDate>,
    pub counts: Vec<HourlyClass>,
}

/// A count site.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct Location {
    pub station_id: String,
    pub road: Option<String>,
    pub road_prefix: Option<String>,
    pub road_suffix: Option<String>,
    pub route: Option<i32>,
    pub functional_class: Option<i32>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mcd: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
    /// Record numbers of all counts taken at this site, newest first
    pub record_nums: Vec<i64>,
}

/// Hourly volume of every count taken at a location, in chronological order.
#[derive(Debug, Clone, PartialEq, Serialize, ToSchema)]
pub struct LocationCounts {
    pub location: Location,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub counts: Vec<LocationHourlyCount>,
}

/// An hourly volume tagged with the count it came from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
pub struct LocationHourlyCount {
    pub record_num: i64,
    pub datetime: NaiveDateTime,
    pub volume: i64,
}

/// Criteria for searching count locations. Empty criteria match every location.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LocationSearch {
    /// Case-insensitive substring of the road name
    pub road: Option<String>,
    pub mcd: Option<String>,
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

/// Inclusive date bounds; either side may be open.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DateRange {
    pub start: Option<NaiveDate>,
    pub end: Option<NaiveDate>,
}

impl DateRange {
    /// Parse optional `YYYY-MM-DD` bounds, rejecting malformed or inverted ranges.
    pub fn parse(start: Option<&str>, end: Option<&str>) -> Result<Self, String> {
        let start = parse_date("start_date", start)?;
        let end = parse_date("end_date", end)?;

        if let (Some(start), Some(end)) = (start, end) {
            if start > end {
                return Err(format!(
                    "start_date ({start}) must not be after end_date ({end})"
                ));
            }
        }

        Ok(Self { start, end })
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start.map_or(true, |start| date >= start) && self.end.map_or(true, |end| date <= end)
    }

    pub fn is_unbounded(&self) -> bool {
        self.start.is_none() && self.end.is_none()
    }
}

fn parse_date(name: &str, value: Option<&str>) -> Result<Option<NaiveDate>, String> {
    match value.map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Some)
            .map_err(|_| format!("{name} must be a date in YYYY-MM-DD format, got '{raw}'")),
    }
}
