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

//! CSV renderings of count data, cached on disk.
//!
//! A file holds the count metadata (header row and value row), a blank row,
//! the suppressed dates where the view has them, another blank row, then the
//! count rows with their own header. Cached files live at
//! `<cache dir>/<view>/<record num>.csv` and are rebuilt when AADV has been
//! recalculated for the count since the file was written.

use chrono::{DateTime, Local, NaiveDate};
use log::{debug, info};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::models::{
    HourlyClassRecord, HourlyVolumeRecord, Metadata, NonNormalHourlyVolumeRecord,
};
use crate::service::{CountService, ServiceError};

const HOURLY_VOLUME_COLUMNS: &[&str] = &["datetime", "volume"];

const NON_NORMAL_COLUMNS: &[&str] = &[
    "date", "am12", "am1", "am2", "am3", "am4", "am5", "am6", "am7", "am8", "am9", "am10", "am11",
    "pm12", "pm1", "pm2", "pm3", "pm4", "pm5", "pm6", "pm7", "pm8", "pm9", "pm10", "pm11", "total",
];

const CLASS_COLUMNS: &[&str] = &[
    "datetime",
    "total",
    "motorcycles",
    "passenger_cars",
    "other_four_tire_single_unit_vehicles",
    "buses",
    "two_axle_six_tire_single_unit_trucks",
    "three_axle_single_unit_trucks",
    "four_or_more_axle_single_unit_trucks",
    "four_or_fewer_axle_single_trailer_trucks",
    "five_axle_single_trailer_trucks",
    "six_or_more_axle_single_trailer_trucks",
    "five_or_fewer_axle_multi_trailer_trucks",
    "six_axle_multi_trailer_trucks",
    "seven_or_more_axle_multi_trailer_trucks",
    "unclassified_vehicle",
];

pub const UNCLASSIFIED_NOTE: &str =
    "Note: Unclassified vehicles are included in the 'passenger_cars' count.";

#[derive(Debug, thiserror::Error)]
pub enum CsvExportError {
    #[error(transparent)]
    Service(#[from] ServiceError),

    #[error("CSV cache I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
}

/// Count data views available as CSV.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CsvView {
    HourlyVolume,
    NonNormalVolume,
    HourlyClass,
}

impl CsvView {
    /// Cache subdirectory and download filename prefix.
    pub fn dir_name(&self) -> &'static str {
        match self {
            CsvView::HourlyVolume => "volume",
            CsvView::NonNormalVolume => "non_normal_volume",
            CsvView::HourlyClass => "class",
        }
    }
}

/// A rendered CSV ready to send.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CsvFile {
    pub filename: String,
    pub contents: Vec<u8>,
}

pub struct CsvCache {
    root: PathBuf,
}

impl CsvCache {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Where a view of a count is cached. Files including suppressed dates
    /// are cached separately from the default ones.
    pub fn path_for(&self, view: CsvView, record_num: i64, include_suppressed: bool) -> PathBuf {
        let file_name = if include_suppressed {
            format!("{record_num}-with-suppressed.csv")
        } else {
            format!("{record_num}.csv")
        };
        self.root.join(view.dir_name()).join(file_name)
    }

    /// Serve a view of a count from the cache, rendering it first if needed.
    pub async fn fetch(
        &self,
        service: &CountService,
        view: CsvView,
        record_num: i64,
        include_suppressed: bool,
    ) -> Result<CsvFile, CsvExportError> {
        let path = self.path_for(view, record_num, include_suppressed);
        let filename = format!("{}_{record_num}.csv", view.dir_name());

        if self.is_fresh(service, &path, record_num).await {
            match tokio::fs::read(&path).await {
                Ok(contents) => {
                    debug!("Serving cached CSV {}", path.display());
                    return Ok(CsvFile { filename, contents });
                }
                Err(e) => debug!("Cached CSV {} unreadable, rebuilding: {e}", path.display()),
            }
        }

        let contents = match view {
            CsvView::HourlyVolume => {
                let record = service
                    .hourly_volume(record_num, &Default::default())
                    .await?;
                render_hourly_volume(&record)?
            }
            CsvView::NonNormalVolume => {
                let record = service
                    .non_normal_hourly_volume(record_num, include_suppressed)
                    .await?;
                render_non_normal_volume(&record)?
            }
            CsvView::HourlyClass => {
                let record = service.hourly_class(record_num, include_suppressed).await?;
                render_hourly_class(&record)?
            }
        };

        write_atomically(&path, &contents).await?;
        info!("Wrote CSV {}", path.display());

        Ok(CsvFile { filename, contents })
    }

    /// A cached file is fresh when it was written no earlier than the date AADV
    /// was last calculated for the count. Anything undeterminable is stale.
    async fn is_fresh(&self, service: &CountService, path: &Path, record_num: i64) -> bool {
        let modified = match tokio::fs::metadata(path).await.and_then(|m| m.modified()) {
            Ok(modified) => modified,
            Err(_) => return false,
        };
        let written_on: NaiveDate = DateTime::<Local>::from(modified).date_naive();

        match service.latest_aadv_calculation(record_num).await {
            Ok(Some(calculated)) => written_on >= calculated.date(),
            Ok(None) => {
                debug!("No AADV calculation date for record {record_num}; rebuilding CSV");
                false
            }
            Err(e) => {
                debug!("Could not check AADV date for record {record_num}: {e}");
                false
            }
        }
    }
}

/// Write to a temporary file beside `path`, then rename it into place.
async fn write_atomically(path: &Path, contents: &[u8]) -> std::io::Result<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    tokio::fs::create_dir_all(dir).await?;

    let tmp = dir.join(format!(".{}.tmp", uuid::Uuid::new_v4()));
    tokio::fs::write(&tmp, contents).await?;
    if let Err(e) = tokio::fs::rename(&tmp, path).await {
        let _ = tokio::fs::remove_file(&tmp).await;
        return Err(e);
    }
    Ok(())
}

fn write_metadata(out: &mut Vec<u8>, metadata: &Metadata) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(true)
        .from_writer(&mut *out);
    wtr.serialize(metadata)?;
    wtr.flush()?;
    Ok(())
}

fn write_suppressed_dates(out: &mut Vec<u8>, dates: &[NaiveDate]) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut *out);
    wtr.write_record(["suppressed_dates:"])?;
    for date in dates {
        wtr.write_record([date.to_string()])?;
    }
    wtr.flush()?;
    Ok(())
}

fn write_rows<T: Serialize>(
    out: &mut Vec<u8>,
    columns: &[&str],
    rows: &[T],
) -> Result<(), csv::Error> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut *out);
    wtr.write_record(columns)?;
    for row in rows {
        wtr.serialize(row)?;
    }
    wtr.flush()?;
    Ok(())
}

fn blank_row(out: &mut Vec<u8>) {
    out.push(b'\n');
}

pub fn render_hourly_volume(record: &HourlyVolumeRecord) -> Result<Vec<u8>, csv::Error> {
    let mut out = Vec::new();
    write_metadata(&mut out, &record.metadata)?;
    blank_row(&mut out);
    write_rows(&mut out, HOURLY_VOLUME_COLUMNS, &record.counts)?;
    Ok(out)
}

pub fn render_non_normal_volume(record: &NonNormalHourlyVolumeRecord) -> Result<Vec<u8>, csv::Error> {
    let mut out = Vec::new();
    write_metadata(&mut out, &record.metadata)?;
    blank_row(&mut out);
    write_suppressed_dates(&mut out, &record.suppressed_dates)?;
    blank_row(&mut out);
    write_rows(&mut out, NON_NORMAL_COLUMNS, &record.counts)?;
    Ok(out)
}

pub fn render_hourly_class(record: &HourlyClassRecord) -> Result<Vec<u8>, csv::Error> {
    let mut out = Vec::new();
    write_metadata(&mut out, &record.metadata)?;
    blank_row(&mut out);
    write_suppressed_dates(&mut out, &record.suppressed_dates)?;
    blank_row(&mut out);
    write_rows(&mut out, CLASS_COLUMNS, &record.counts)?;
    blank_row(&mut out);

    // The note sits in the column after the last class column.
    let mut note = vec![""; CLASS_COLUMNS.len() - 1];
    note.push(UNCLASSIFIED_NOTE);
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(&mut out);
    wtr.write_record(&note)?;
    wtr.flush()?;
    drop(wtr);

    Ok(out)
}
