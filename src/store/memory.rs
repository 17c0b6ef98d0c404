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

//! In-memory [`CountStore`] holding raw interval rows.
//!
//! Rows are kept at the granularity the ingestion process writes them (for
//! example 15 minute intervals) and aggregated per hour on read, like the SQL
//! implementation does.

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Timelike};
use std::collections::{BTreeMap, BTreeSet, HashMap};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use super::{CountStore, HeaderRow, LocationRow, MunicipalityRow, StoreError};
use crate::counts::{CountSubType, CountTable};
use crate::models::{DateRange, HourlyClass, HourlyCount, LocationSearch};

#[derive(Default)]
pub struct MemoryCountStore {
    headers: BTreeMap<i64, HeaderRow>,
    municipalities: HashMap<String, MunicipalityRow>,
    volumes: Vec<(CountTable, i64, NaiveDateTime, i64)>,
    classes: Vec<(i64, HourlyClass)>,
    suppressed: HashMap<i64, BTreeSet<NaiveDate>>,
    aadv_calculated: HashMap<i64, NaiveDateTime>,
    queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryCountStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_header(&mut self, header: HeaderRow) {
        self.headers.insert(header.recordnum, header);
    }

    pub fn insert_municipality(&mut self, mcd: impl Into<String>, municipality: MunicipalityRow) {
        self.municipalities.insert(mcd.into(), municipality);
    }

    /// Add a raw volume row for a count.
    pub fn insert_volume(
        &mut self,
        table: CountTable,
        record_num: i64,
        datetime: NaiveDateTime,
        volume: i64,
    ) {
        self.volumes.push((table, record_num, datetime, volume));
    }

    /// Add a raw class row; `datetime` is truncated to the hour on read.
    pub fn insert_class(&mut self, record_num: i64, row: HourlyClass) {
        self.classes.push((record_num, row));
    }

    pub fn suppress_date(&mut self, record_num: i64, date: NaiveDate) {
        self.suppressed.entry(record_num).or_default().insert(date);
    }

    pub fn set_aadv_calculated(&mut self, record_num: i64, calculated: NaiveDateTime) {
        self.aadv_calculated.insert(record_num, calculated);
    }

    /// Make every subsequent call fail as if the database were unreachable.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of store calls made so far.
    pub fn query_count(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    fn begin_query(&self) -> Result<(), StoreError> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(
                "connection refused (in-memory store marked unavailable)".to_string(),
            ));
        }
        Ok(())
    }
}

fn truncate_to_hour(datetime: NaiveDateTime) -> NaiveDateTime {
    let hour = NaiveTime::from_hms_opt(datetime.hour(), 0, 0).unwrap_or_default();
    datetime.date().and_time(hour)
}

fn matches_ignore_case(value: Option<&String>, wanted: Option<&String>) -> bool {
    match wanted {
        None => true,
        Some(wanted) => value.is_some_and(|value| value.eq_ignore_ascii_case(wanted)),
    }
}

#[async_trait]
impl CountStore for MemoryCountStore {
    async fn record_numbers(
        &self,
        sub_types: Option<&[CountSubType]>,
    ) -> Result<Vec<i64>, StoreError> {
        self.begin_query()?;

        Ok(self
            .headers
            .values()
            .rev()
            .filter(|header| match sub_types {
                None => true,
                Some(sub_types) => header.count_type.as_deref().is_some_and(|raw| {
                    sub_types.iter().any(|sub_type| sub_type.as_str() == raw)
                }),
            })
            .map(|header| header.recordnum)
            .collect())
    }

    async fn header(&self, record_num: i64) -> Result<Option<HeaderRow>, StoreError> {
        self.begin_query()?;
        Ok(self.headers.get(&record_num).cloned())
    }

    async fn municipality(&self, mcd: &str) -> Result<Option<MunicipalityRow>, StoreError> {
        self.begin_query()?;
        Ok(self.municipalities.get(mcd).cloned())
    }

    async fn hourly_volume(
        &self,
        table: CountTable,
        record_num: i64,
        range: &DateRange,
    ) -> Result<Vec<HourlyCount>, StoreError> {
        self.begin_query()?;

        let mut hours: BTreeMap<NaiveDateTime, i64> = BTreeMap::new();
        for (row_table, row_num, datetime, volume) in &self.volumes {
            if *row_table != table || *row_num != record_num || !range.contains(datetime.date()) {
                continue;
            }
            *hours.entry(truncate_to_hour(*datetime)).or_insert(0) += volume;
        }

        Ok(hours
            .into_iter()
            .map(|(datetime, volume)| HourlyCount { datetime, volume })
            .collect())
    }

    async fn hourly_class(&self, record_num: i64) -> Result<Vec<HourlyClass>, StoreError> {
        self.begin_query()?;

        let mut hours: BTreeMap<NaiveDateTime, HourlyClass> = BTreeMap::new();
        for (row_num, row) in &self.classes {
            if *row_num != record_num {
                continue;
            }
            let hour = truncate_to_hour(row.datetime);
            match hours.get_mut(&hour) {
                None => {
                    let mut first = row.clone();
                    first.datetime = hour;
                    hours.insert(hour, first);
                }
                Some(sum) => {
                    sum.total += row.total;
                    sum.motorcycles += row.motorcycles;
                    sum.passenger_cars += row.passenger_cars;
                    sum.other_four_tire_single_unit_vehicles +=
                        row.other_four_tire_single_unit_vehicles;
                    sum.buses += row.buses;
                    sum.two_axle_six_tire_single_unit_trucks +=
                        row.two_axle_six_tire_single_unit_trucks;
                    sum.three_axle_single_unit_trucks += row.three_axle_single_unit_trucks;
                    sum.four_or_more_axle_single_unit_trucks +=
                        row.four_or_more_axle_single_unit_trucks;
                    sum.four_or_fewer_axle_single_trailer_trucks +=
                        row.four_or_fewer_axle_single_trailer_trucks;
                    sum.five_axle_single_trailer_trucks += row.five_axle_single_trailer_trucks;
                    sum.six_or_more_axle_single_trailer_trucks +=
                        row.six_or_more_axle_single_trailer_trucks;
                    sum.five_or_fewer_axle_multi_trailer_trucks +=
                        row.five_or_fewer_axle_multi_trailer_trucks;
                    sum.six_axle_multi_trailer_trucks += row.six_axle_multi_trailer_trucks;
                    sum.seven_or_more_axle_multi_trailer_trucks +=
                        row.seven_or_more_axle_multi_trailer_trucks;
                    // SQL sum() ignores nulls and is null only when every value is.
                    sum.unclassified_vehicle = match (sum.unclassified_vehicle, row.unclassified_vehicle) {
                        (Some(a), Some(b)) => Some(a + b),
                        (a, b) => a.or(b),
                    };
                }
            }
        }

        Ok(hours.into_values().collect())
    }

    async fn suppressed_dates(&self, record_num: i64) -> Result<Vec<NaiveDate>, StoreError> {
        self.begin_query()?;
        Ok(self
            .suppressed
            .get(&record_num)
            .map(|dates| dates.iter().copied().collect())
            .unwrap_or_default())
    }

    async fn latest_aadv_calculation(
        &self,
        record_num: i64,
    ) -> Result<Option<NaiveDateTime>, StoreError> {
        self.begin_query()?;
        Ok(self.aadv_calculated.get(&record_num).copied())
    }

    async fn location_rows(
        &self,
        station_id: Option<&str>,
        criteria: &LocationSearch,
    ) -> Result<Vec<LocationRow>, StoreError> {
        self.begin_query()?;

        let road = criteria.road.as_ref().map(|road| road.to_lowercase());
        let mut rows: Vec<LocationRow> = self
            .headers
            .values()
            .filter_map(|header| {
                let header_station = header.stationid.as_ref()?;
                if station_id.is_some_and(|wanted| wanted != header_station) {
                    return None;
                }
                if let Some(road) = &road {
                    let header_road = header.road.as_ref()?;
                    if !header_road.to_lowercase().contains(road.as_str()) {
                        return None;
                    }
                }
                if criteria.mcd.is_some() && criteria.mcd != header.mcd {
                    return None;
                }

                let municipality = header
                    .mcd
                    .as_ref()
                    .and_then(|mcd| self.municipalities.get(mcd));
                let name = municipality.and_then(|m| m.mcdname.as_ref());
                let county = municipality.and_then(|m| m.county.as_ref());
                let state = municipality.and_then(|m| m.state.as_ref());
                if !matches_ignore_case(name, criteria.municipality.as_ref())
                    || !matches_ignore_case(county, criteria.county.as_ref())
                    || !matches_ignore_case(state, criteria.state.as_ref())
                {
                    return None;
                }

                Some(LocationRow {
                    station_id: header_station.clone(),
                    road: header.road.clone(),
                    road_prefix: header.rdprefix.clone(),
                    road_suffix: header.rdsuffix.clone(),
                    route: header.route,
                    functional_class: header.fc,
                    latitude: header.latitude,
                    longitude: header.longitude,
                    mcd: header.mcd.clone(),
                    municipality: name.cloned(),
                    county: county.cloned(),
                    state: state.cloned(),
                    record_num: header.recordnum,
                })
            })
            .collect();

        rows.sort_by(|a, b| {
            a.station_id
                .cmp(&b.station_id)
                .then(b.record_num.cmp(&a.record_num))
        });
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(date: &str, time: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(&format!("{date} {time}"), "%Y-%m-%d %H:%M").unwrap()
    }

    #[tokio::test]
    async fn test_hourly_volume_sums_intervals_per_hour() {
        let mut store = MemoryCountStore::new();
        store.insert_volume(CountTable::Vehicle, 1, at("2023-05-01", "08:00"), 10);
        store.insert_volume(CountTable::Vehicle, 1, at("2023-05-01", "08:45"), 5);
        store.insert_volume(CountTable::Vehicle, 1, at("2023-05-01", "07:15"), 3);
        store.insert_volume(CountTable::Bicycle, 1, at("2023-05-01", "08:00"), 99);

        let counts = store
            .hourly_volume(CountTable::Vehicle, 1, &DateRange::default())
            .await
            .unwrap();

        assert_eq!(
            counts,
            vec![
                HourlyCount {
                    datetime: at("2023-05-01", "07:00"),
                    volume: 3
                },
                HourlyCount {
                    datetime: at("2023-05-01", "08:00"),
                    volume: 15
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_record_numbers_descending_and_filtered() {
        let mut store = MemoryCountStore::new();
        for (num, sub_type) in [(5, "Class"), (9, "Bicycle 2"), (7, "Volume")] {
            store.insert_header(HeaderRow {
                recordnum: num,
                count_type: Some(sub_type.to_string()),
                ..Default::default()
            });
        }

        assert_eq!(store.record_numbers(None).await.unwrap(), vec![9, 7, 5]);
        let vehicle = crate::counts::CountKind::Vehicle.sub_types();
        assert_eq!(store.record_numbers(Some(&vehicle)).await.unwrap(), vec![7, 5]);
    }

    #[tokio::test]
    async fn test_unavailable_store_fails_and_counts_queries() {
        let store = MemoryCountStore::new();
        store.set_unavailable(true);

        let err = store.header(1).await.unwrap_err();
        assert!(matches!(err, StoreError::Unavailable(_)));
        assert_eq!(store.query_count(), 1);
    }
}
