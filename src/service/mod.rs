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

//! Query service.
//!
//! Translates requests into [`CountStore`] reads and shapes the results. Every
//! operation is read-only and independent of the others, so the service is
//! shared between all request handlers behind an `Arc`.

use log::{debug, warn};
use std::sync::Arc;

use crate::counts::{describe_source, CountKind, CountSubType, CountTable};
use crate::models::{
    DateRange, HourlyClassRecord, HourlyVolumeRecord, Location, LocationCounts,
    LocationHourlyCount, LocationSearch, Metadata, NonNormalHourlyVolumeRecord,
};
use crate::store::{CountStore, HeaderRow, LocationRow, StoreError};

pub mod non_normal;

/// Errors returned by [`CountService`] operations.
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Record not found")]
    RecordNotFound(i64),

    #[error("Location '{0}' not found")]
    LocationNotFound(String),

    #[error("{0}")]
    InvalidRequest(String),

    #[error("Database unavailable: {0}")]
    Unavailable(String),

    /// A stored value did not fit the expected type or vocabulary.
    #[error("Unexpected data type found: {0}")]
    UnexpectedData(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<StoreError> for ServiceError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Unavailable(msg) => ServiceError::Unavailable(msg),
            StoreError::Decode(msg) => ServiceError::UnexpectedData(msg),
            StoreError::Query(msg) => ServiceError::Internal(msg),
        }
    }
}

/// Parse optional `YYYY-MM-DD` query bounds into a [`DateRange`].
pub fn parse_date_range(
    start_date: Option<&str>,
    end_date: Option<&str>,
) -> Result<DateRange, ServiceError> {
    DateRange::parse(start_date, end_date).map_err(ServiceError::InvalidRequest)
}

pub struct CountService {
    store: Arc<dyn CountStore>,
    static_pdf_base_url: String,
}

impl CountService {
    pub fn new(store: Arc<dyn CountStore>, static_pdf_base_url: impl Into<String>) -> Self {
        let static_pdf_base_url = static_pdf_base_url.into().trim_end_matches('/').to_string();
        Self {
            store,
            static_pdf_base_url,
        }
    }

    /// Record numbers of all counts, newest first.
    ///
    /// `sub_type` takes precedence over `kind` when both are given.
    pub async fn list_record_numbers(
        &self,
        kind: Option<&str>,
        sub_type: Option<&str>,
    ) -> Result<Vec<i64>, ServiceError> {
        let kind = kind
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<CountKind>)
            .transpose()
            .map_err(ServiceError::InvalidRequest)?;
        let sub_type = sub_type
            .filter(|raw| !raw.trim().is_empty())
            .map(str::parse::<CountSubType>)
            .transpose()
            .map_err(ServiceError::InvalidRequest)?;

        let filter = match (sub_type, kind) {
            (Some(sub_type), _) => Some(vec![sub_type]),
            (None, Some(kind)) => Some(kind.sub_types()),
            (None, None) => None,
        };

        Ok(self.store.record_numbers(filter.as_deref()).await?)
    }

    pub async fn metadata(&self, record_num: i64) -> Result<Metadata, ServiceError> {
        let header = self.header(record_num).await?;
        self.build_metadata(header).await
    }

    /// Raw header row, used by the legacy record schema.
    pub async fn header(&self, record_num: i64) -> Result<HeaderRow, ServiceError> {
        self.store
            .header(record_num)
            .await?
            .ok_or(ServiceError::RecordNotFound(record_num))
    }

    pub async fn hourly_volume(
        &self,
        record_num: i64,
        range: &DateRange,
    ) -> Result<HourlyVolumeRecord, ServiceError> {
        let metadata = self.metadata(record_num).await?;

        let (static_pdf, counts) = match metadata.sub_type {
            Some(sub_type) => match sub_type.data_table() {
                Some(table) => (
                    None,
                    self.store.hourly_volume(table, record_num, range).await?,
                ),
                None => (Some(self.static_pdf_url(sub_type, record_num)), Vec::new()),
            },
            None => (None, Vec::new()),
        };

        Ok(HourlyVolumeRecord {
            metadata,
            static_pdf,
            counts,
        })
    }

    pub async fn non_normal_hourly_volume(
        &self,
        record_num: i64,
        include_suppressed: bool,
    ) -> Result<NonNormalHourlyVolumeRecord, ServiceError> {
        let metadata = self.metadata(record_num).await?;

        let table = match metadata.sub_type {
            Some(sub_type) => match sub_type.data_table() {
                Some(table) => table,
                None => {
                    return Ok(NonNormalHourlyVolumeRecord {
                        static_pdf: Some(self.static_pdf_url(sub_type, record_num)),
                        metadata,
                        suppressed_dates: Vec::new(),
                        counts: Vec::new(),
                    })
                }
            },
            None => {
                return Ok(NonNormalHourlyVolumeRecord {
                    metadata,
                    static_pdf: None,
                    suppressed_dates: Vec::new(),
                    counts: Vec::new(),
                })
            }
        };

        let hourly = self
            .store
            .hourly_volume(table, record_num, &DateRange::default())
            .await?;
        let suppressed_dates = self.store.suppressed_dates(record_num).await?;

        let mut counts = non_normal::pivot_by_date(&hourly);
        if !include_suppressed {
            counts.retain(|day| !suppressed_dates.contains(&day.date));
        }

        Ok(NonNormalHourlyVolumeRecord {
            metadata,
            static_pdf: None,
            suppressed_dates,
            counts,
        })
    }

    pub async fn hourly_class(
        &self,
        record_num: i64,
        include_suppressed: bool,
    ) -> Result<HourlyClassRecord, ServiceError> {
        let metadata = self.metadata(record_num).await?;

        if let Some(sub_type) = metadata.sub_type.filter(|s| s.data_table().is_none()) {
            return Ok(HourlyClassRecord {
                static_pdf: Some(self.static_pdf_url(sub_type, record_num)),
                metadata,
                suppressed_dates: Vec::new(),
                counts: Vec::new(),
            });
        }

        let mut counts = self.store.hourly_class(record_num).await?;
        let suppressed_dates = self.store.suppressed_dates(record_num).await?;
        if !include_suppressed {
            counts.retain(|count| !suppressed_dates.contains(&count.datetime.date()));
        }

        Ok(HourlyClassRecord {
            metadata,
            static_pdf: None,
            suppressed_dates,
            counts,
        })
    }

    pub async fn location(&self, station_id: &str) -> Result<Location, ServiceError> {
        let rows = self
            .store
            .location_rows(Some(station_id), &LocationSearch::default())
            .await?;

        group_locations(rows)
            .into_iter()
            .next()
            .ok_or_else(|| ServiceError::LocationNotFound(station_id.to_string()))
    }

    /// Locations matching every given criterion, ordered by station id.
    pub async fn search_locations(
        &self,
        criteria: &LocationSearch,
    ) -> Result<Vec<Location>, ServiceError> {
        let rows = self.store.location_rows(None, criteria).await?;
        Ok(group_locations(rows))
    }

    /// Hourly volume of every count taken at a location, within `range`.
    ///
    /// Results are ordered by time, then by record number. Counts without
    /// rows in the database contribute nothing.
    pub async fn location_counts(
        &self,
        station_id: &str,
        range: DateRange,
    ) -> Result<LocationCounts, ServiceError> {
        let location = self.location(station_id).await?;

        let mut counts = Vec::new();
        for &record_num in &location.record_nums {
            let table = match self.count_table(record_num).await {
                Ok(Some(table)) => table,
                Ok(None) => continue,
                Err(ServiceError::UnexpectedData(detail)) => {
                    warn!("Skipping record {record_num} at '{station_id}': {detail}");
                    continue;
                }
                Err(err) => return Err(err),
            };
            let hourly = self.store.hourly_volume(table, record_num, &range).await?;
            counts.extend(hourly.into_iter().map(|count| LocationHourlyCount {
                record_num,
                datetime: count.datetime,
                volume: count.volume,
            }));
        }
        counts.sort_by(|a, b| {
            a.datetime
                .cmp(&b.datetime)
                .then(a.record_num.cmp(&b.record_num))
        });

        debug!(
            "Location '{station_id}': {} hourly counts from {} records",
            counts.len(),
            location.record_nums.len()
        );

        Ok(LocationCounts {
            location,
            start_date: range.start,
            end_date: range.end,
            counts,
        })
    }

    /// Date of the most recent AADV calculation for a count, if known.
    pub async fn latest_aadv_calculation(
        &self,
        record_num: i64,
    ) -> Result<Option<chrono::NaiveDateTime>, ServiceError> {
        Ok(self.store.latest_aadv_calculation(record_num).await?)
    }

    async fn count_table(&self, record_num: i64) -> Result<Option<CountTable>, ServiceError> {
        let header = self.header(record_num).await?;
        Ok(parse_sub_type(&header)?.and_then(|sub_type| sub_type.data_table()))
    }

    async fn build_metadata(&self, header: HeaderRow) -> Result<Metadata, ServiceError> {
        let sub_type = parse_sub_type(&header)?;

        let municipality = match header.mcd.as_deref().filter(|mcd| !mcd.is_empty()) {
            Some(mcd) => self.store.municipality(mcd).await?,
            None => None,
        };
        let (municipality, county, state) = match municipality {
            Some(row) => (row.mcdname, row.county, row.state),
            None => (None, None, None),
        };

        Ok(Metadata {
            record_num: header.recordnum,
            source: header.source.as_deref().map(describe_source),
            counter_id: header.counterid,
            station_id: header.stationid,
            count_kind: sub_type.map(|sub_type| sub_type.kind()),
            sub_type,
            set_date: header.setdate,
            project: header.prj,
            program: header.program,
            group: header.bikepedgroup,
            facility: header.bikepedfacility,
            sr: header.sr,
            seg: header.seg,
            offset: header.offset,
            sri: header.sri,
            mp: header.mp,
            latitude: header.latitude,
            longitude: header.longitude,
            mcd: header.mcd,
            municipality,
            county,
            state,
            route: header.route,
            road: header.road,
            road_prefix: header.rdprefix,
            road_suffix: header.rdsuffix,
            is_urban: header.isurban,
            sidewalk: header.sidewalk,
            lane1_dir: header.cldir1,
            lane2_dir: header.cldir2,
            lane3_dir: header.cldir3,
            count_direction: header.cntdir,
            traffic_direction: header.trafdir,
            functional_class: header.fc,
            speed_limit: header.speedlimit,
            aadv: header.aadv,
            am_peak_volume: header.am_peak_volume,
            avg_am_max_percent: header.avg_am_max_percent,
            pm_peak_volume: header.pm_peak_volume,
            avg_pm_max_percent: header.avg_pm_max_percent,
            comments: header.comments,
        })
    }

    fn static_pdf_url(&self, sub_type: CountSubType, record_num: i64) -> String {
        format!(
            "{}/{}/{record_num}.pdf",
            self.static_pdf_base_url,
            sub_type.pdf_segment()
        )
    }
}

fn parse_sub_type(header: &HeaderRow) -> Result<Option<CountSubType>, ServiceError> {
    match header.count_type.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw.parse::<CountSubType>().map(Some).map_err(|err| {
            warn!("Record {} has an unrecognized type: {err}", header.recordnum);
            ServiceError::UnexpectedData(err)
        }),
    }
}

/// Collapse per-record rows (sorted by station id) into locations.
///
/// Site attributes come from the newest record at each station.
fn group_locations(rows: Vec<LocationRow>) -> Vec<Location> {
    let mut locations: Vec<Location> = Vec::new();

    for row in rows {
        if let Some(last) = locations.last_mut() {
            if last.station_id == row.station_id {
                last.record_nums.push(row.record_num);
                continue;
            }
        }
        locations.push(Location {
            station_id: row.station_id,
            road: row.road,
            road_prefix: row.road_prefix,
            road_suffix: row.road_suffix,
            route: row.route,
            functional_class: row.functional_class,
            latitude: row.latitude,
            longitude: row.longitude,
            mcd: row.mcd,
            municipality: row.municipality,
            county: row.county,
            state: row.state,
            record_nums: vec![row.record_num],
        });
    }

    locations
}
