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

//! Count kinds and sub types.
//!
//! Every count in the header table carries a sub type (the `TYPE` column).
//! Sub types are grouped into broad kinds according to where their data lives:
//! bicycle, pedestrian and vehicle counts have rows in a count table, while the
//! remaining sub types only exist as static PDFs.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Broad grouping of count sub types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CountKind {
    #[serde(rename = "vehicle")]
    Vehicle,
    #[serde(rename = "bicycle")]
    Bicycle,
    #[serde(rename = "pedestrian")]
    Pedestrian,
    #[serde(rename = "count data not in database")]
    NoData,
}

impl CountKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            CountKind::Vehicle => "vehicle",
            CountKind::Bicycle => "bicycle",
            CountKind::Pedestrian => "pedestrian",
            CountKind::NoData => "count data not in database",
        }
    }

    /// All sub types belonging to this kind.
    pub fn sub_types(&self) -> Vec<CountSubType> {
        CountSubType::ALL
            .iter()
            .copied()
            .filter(|sub_type| sub_type.kind() == *self)
            .collect()
    }
}

impl fmt::Display for CountKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CountKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "vehicle" => Ok(CountKind::Vehicle),
            "bicycle" => Ok(CountKind::Bicycle),
            "pedestrian" => Ok(CountKind::Pedestrian),
            "count data not in database" | "no data" | "no_data" => Ok(CountKind::NoData),
            _ => Err(format!("Unknown count type: {s}")),
        }
    }
}

/// Count sub type as stored in the header table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum CountSubType {
    #[serde(rename = "Bicycle 1")]
    Bicycle1,
    #[serde(rename = "Bicycle 2")]
    Bicycle2,
    #[serde(rename = "Bicycle 3")]
    Bicycle3,
    #[serde(rename = "Bicycle 4")]
    Bicycle4,
    #[serde(rename = "Bicycle 5")]
    Bicycle5,
    #[serde(rename = "Bicycle 6")]
    Bicycle6,
    #[serde(rename = "Pedestrian")]
    Pedestrian,
    #[serde(rename = "Pedestrian 2")]
    Pedestrian2,
    #[serde(rename = "Volume")]
    Volume,
    #[serde(rename = "15 min Volume")]
    FifteenMinVolume,
    #[serde(rename = "Class")]
    Class,
    #[serde(rename = "Speed")]
    Speed,
    // "8 Day" and "Loop" are being recategorized upstream into the other vehicle types.
    #[serde(rename = "8 Day")]
    EightDay,
    #[serde(rename = "Loop")]
    Loop,
    #[serde(rename = "Turning Movement")]
    TurningMovement,
    #[serde(rename = "Manual Class")]
    ManualClass,
    #[serde(rename = "Crosswalk")]
    Crosswalk,
}

impl CountSubType {
    pub const ALL: [CountSubType; 17] = [
        CountSubType::Bicycle1,
        CountSubType::Bicycle2,
        CountSubType::Bicycle3,
        CountSubType::Bicycle4,
        CountSubType::Bicycle5,
        CountSubType::Bicycle6,
        CountSubType::Pedestrian,
        CountSubType::Pedestrian2,
        CountSubType::Volume,
        CountSubType::FifteenMinVolume,
        CountSubType::Class,
        CountSubType::Speed,
        CountSubType::EightDay,
        CountSubType::Loop,
        CountSubType::TurningMovement,
        CountSubType::ManualClass,
        CountSubType::Crosswalk,
    ];

    /// The value stored in the `TYPE` column.
    pub fn as_str(&self) -> &'static str {
        match self {
            CountSubType::Bicycle1 => "Bicycle 1",
            CountSubType::Bicycle2 => "Bicycle 2",
            CountSubType::Bicycle3 => "Bicycle 3",
            CountSubType::Bicycle4 => "Bicycle 4",
            CountSubType::Bicycle5 => "Bicycle 5",
            CountSubType::Bicycle6 => "Bicycle 6",
            CountSubType::Pedestrian => "Pedestrian",
            CountSubType::Pedestrian2 => "Pedestrian 2",
            CountSubType::Volume => "Volume",
            CountSubType::FifteenMinVolume => "15 min Volume",
            CountSubType::Class => "Class",
            CountSubType::Speed => "Speed",
            CountSubType::EightDay => "8 Day",
            CountSubType::Loop => "Loop",
            CountSubType::TurningMovement => "Turning Movement",
            CountSubType::ManualClass => "Manual Class",
            CountSubType::Crosswalk => "Crosswalk",
        }
    }

    pub fn kind(&self) -> CountKind {
        use CountSubType::*;

        match self {
            Bicycle1 | Bicycle2 | Bicycle3 | Bicycle4 | Bicycle5 | Bicycle6 => CountKind::Bicycle,
            Pedestrian | Pedestrian2 => CountKind::Pedestrian,
            Volume | FifteenMinVolume | Class | Speed | EightDay | Loop => CountKind::Vehicle,
            TurningMovement | ManualClass | Crosswalk => CountKind::NoData,
        }
    }

    /// Table holding the raw count rows for this sub type, if any.
    pub fn data_table(&self) -> Option<CountTable> {
        match self.kind() {
            CountKind::Bicycle => Some(CountTable::Bicycle),
            CountKind::Pedestrian => Some(CountTable::Pedestrian),
            CountKind::Vehicle => Some(CountTable::Vehicle),
            CountKind::NoData => None,
        }
    }

    /// Path segment used for the static PDF of counts kept outside the database.
    pub fn pdf_segment(&self) -> String {
        self.as_str().replace(' ', "")
    }
}

impl fmt::Display for CountSubType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CountSubType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim();
        CountSubType::ALL
            .iter()
            .copied()
            .find(|sub_type| sub_type.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| format!("Unknown count sub type: {s}"))
    }
}

/// Tables holding per-interval volume rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CountTable {
    Bicycle,
    Pedestrian,
    Vehicle,
}

impl CountTable {
    pub fn table_name(&self) -> &'static str {
        match self {
            CountTable::Bicycle => "tc_bikecount_new",
            CountTable::Pedestrian => "tc_pedcount_new",
            CountTable::Vehicle => "tc_volcount_new",
        }
    }
}

/// Maps the raw `SOURCE` column to a readable value.
pub fn describe_source(raw: &str) -> String {
    match raw {
        "0" => "DVRPC".to_string(),
        "-1" => "external".to_string(),
        other => other.to_string(),
    }
}
