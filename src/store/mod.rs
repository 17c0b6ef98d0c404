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

//! Read access to the traffic counts database.
//!
//! [`CountStore`] is the only seam between the query service and the database.
//! Every method is a single read; the store never writes.
//!
//! - [`postgres::PgCountStore`] runs parameterized SQL over a shared `sqlx` pool.
//! - [`memory::MemoryCountStore`] holds fixture rows in memory and mirrors the
//!   SQL semantics (hourly truncation, ordering, filters).

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::counts::{CountSubType, CountTable};
use crate::models::{DateRange, HourlyClass, HourlyCount, LocationSearch};

pub mod memory;
pub mod postgres;

pub use memory::MemoryCountStore;
pub use postgres::PgCountStore;

/// Errors raised by a [`CountStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The database could not be reached (pool exhausted or closed, network, TLS).
    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// A row held a value that could not be decoded into the expected type.
    #[error("Unexpected data: {0}")]
    Decode(String),

    #[error("Query failed: {0}")]
    Query(String),
}

/// A row of the count header table, with raw column values.
///
/// Columns are selected with explicit casts, so the Rust types here are the
/// types the store guarantees regardless of the underlying column definitions.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct HeaderRow {
    pub recordnum: i64,
    pub source: Option<String>,
    pub counterid: Option<String>,
    pub stationid: Option<String>,
    #[sqlx(rename = "type")]
    #[serde(rename = "type")]
    pub count_type: Option<String>,
    pub setdate: Option<NaiveDate>,
    pub takenby: Option<String>,
    pub description: Option<String>,
    pub prj: Option<String>,
    pub program: Option<String>,
    pub bikepedgroup: Option<String>,
    pub bikepedfacility: Option<String>,
    pub sr: Option<String>,
    pub seg: Option<String>,
    pub offset: Option<String>,
    pub sri: Option<String>,
    pub mp: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub mcd: Option<String>,
    pub route: Option<i32>,
    pub road: Option<String>,
    pub rdprefix: Option<String>,
    pub rdsuffix: Option<String>,
    pub isurban: Option<String>,
    pub sidewalk: Option<String>,
    pub cldir1: Option<String>,
    pub cldir2: Option<String>,
    pub cldir3: Option<String>,
    pub outdir: Option<String>,
    pub indir: Option<String>,
    pub cntdir: Option<String>,
    pub trafdir: Option<String>,
    pub fc: Option<i32>,
    pub speedlimit: Option<i32>,
    pub aadv: Option<i64>,
    pub am_peak_volume: Option<i64>,
    pub avg_am_max_percent: Option<f64>,
    pub pm_peak_volume: Option<i64>,
    pub avg_pm_max_percent: Option<f64>,
    pub weather: Option<String>,
    pub comments: Option<String>,
}

/// A row of the municipality (MCD) table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct MunicipalityRow {
    pub mcdname: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

/// One count at a location: header site columns joined with municipality names.
#[derive(Debug, Clone, PartialEq, sqlx::FromRow)]
pub struct LocationRow {
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
    pub record_num: i64,
}

/// Read-only access to the traffic counts database.
#[async_trait]
pub trait CountStore: Send + Sync {
    /// Record numbers, newest first, optionally limited to the given sub types.
    async fn record_numbers(
        &self,
        sub_types: Option<&[CountSubType]>,
    ) -> Result<Vec<i64>, StoreError>;

    async fn header(&self, record_num: i64) -> Result<Option<HeaderRow>, StoreError>;

    async fn municipality(&self, mcd: &str) -> Result<Option<MunicipalityRow>, StoreError>;

    /// Volume summed per hour, ascending, limited to dates inside `range`.
    async fn hourly_volume(
        &self,
        table: CountTable,
        record_num: i64,
        range: &DateRange,
    ) -> Result<Vec<HourlyCount>, StoreError>;

    /// Class volumes summed per hour, ascending.
    async fn hourly_class(&self, record_num: i64) -> Result<Vec<HourlyClass>, StoreError>;

    /// Dates of a count excluded from published data, ascending.
    async fn suppressed_dates(&self, record_num: i64) -> Result<Vec<NaiveDate>, StoreError>;

    /// When AADV was last calculated for a count.
    async fn latest_aadv_calculation(
        &self,
        record_num: i64,
    ) -> Result<Option<NaiveDateTime>, StoreError>;

    /// Counts at locations, ordered by station id then record number (newest first).
    ///
    /// `station_id` restricts to one location; `criteria` filters further.
    async fn location_rows(
        &self,
        station_id: Option<&str>,
        criteria: &LocationSearch,
    ) -> Result<Vec<LocationRow>, StoreError>;
}
