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

//! Query-string parameters.
//!
//! Every parameter is taken as a raw string and validated by the handler so
//! that malformed input produces an `INVALID_REQUEST` body instead of axum's
//! plain-text rejection.

use serde::Deserialize;
use utoipa::IntoParams;

use crate::models::{DateRange, LocationSearch};
use crate::service::{parse_date_range, ServiceError};

/// Filters for the record number listing.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RecordsQuery {
    /// Count kind: `vehicle`, `bicycle`, `pedestrian` or `no data`
    pub count_type: Option<String>,
    /// Count sub type, e.g. `15 min Volume`; takes precedence over `count_type`
    pub sub_type: Option<String>,
}

#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct SuppressedQuery {
    /// Include rows on suppressed dates (default `false`)
    pub include_suppressed: Option<String>,
}

impl SuppressedQuery {
    pub fn include_suppressed(&self) -> Result<bool, ServiceError> {
        match self
            .include_suppressed
            .as_deref()
            .map(|raw| raw.trim().to_ascii_lowercase())
            .as_deref()
        {
            None | Some("") | Some("false") | Some("0") => Ok(false),
            Some("true") | Some("1") => Ok(true),
            Some(other) => Err(ServiceError::InvalidRequest(format!(
                "include_suppressed must be true or false, got '{other}'"
            ))),
        }
    }
}

/// Inclusive `YYYY-MM-DD` bounds; either may be omitted.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct DateRangeQuery {
    /// First day to include
    pub start_date: Option<String>,
    /// Last day to include
    pub end_date: Option<String>,
}

impl DateRangeQuery {
    pub fn range(&self) -> Result<DateRange, ServiceError> {
        parse_date_range(self.start_date.as_deref(), self.end_date.as_deref())
    }
}

/// Location search criteria. All given criteria must match.
#[derive(Debug, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct LocationSearchQuery {
    /// Case-insensitive substring of the road name
    pub road: Option<String>,
    /// Municipality (MCD) code
    pub mcd: Option<String>,
    /// Municipality name
    pub municipality: Option<String>,
    pub county: Option<String>,
    pub state: Option<String>,
}

impl LocationSearchQuery {
    pub fn criteria(&self) -> LocationSearch {
        LocationSearch {
            road: non_blank(&self.road),
            mcd: non_blank(&self.mcd),
            municipality: non_blank(&self.municipality),
            county: non_blank(&self.county),
            state: non_blank(&self.state),
        }
    }
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

/// Parse a record number path segment.
pub fn parse_record_num(raw: &str) -> Result<i64, ServiceError> {
    raw.trim()
        .parse::<i64>()
        .ok()
        .filter(|num| *num > 0)
        .ok_or_else(|| {
            ServiceError::InvalidRequest(format!(
                "record number must be a positive integer, got '{raw}'"
            ))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_include_suppressed_values() {
        let query = |v: Option<&str>| SuppressedQuery {
            include_suppressed: v.map(str::to_string),
        };

        assert!(!query(None).include_suppressed().unwrap());
        assert!(!query(Some("False")).include_suppressed().unwrap());
        assert!(query(Some("true")).include_suppressed().unwrap());
        assert!(query(Some("1")).include_suppressed().unwrap());
        assert!(query(Some("yes")).include_suppressed().is_err());
    }

    #[test]
    fn test_location_criteria_drops_blank_values() {
        let query = LocationSearchQuery {
            road: Some("  Main St ".to_string()),
            county: Some("".to_string()),
            ..Default::default()
        };
        let criteria = query.criteria();

        assert_eq!(criteria.road.as_deref(), Some("Main St"));
        assert_eq!(criteria.county, None);
    }

    #[test]
    fn test_parse_record_num() {
        assert_eq!(parse_record_num("168512").unwrap(), 168512);
        assert!(parse_record_num("abc").is_err());
        assert!(parse_record_num("0").is_err());
        assert!(parse_record_num("-4").is_err());
    }

    #[test]
    fn test_date_range_query() {
        let query = DateRangeQuery {
            start_date: Some("2023-01-02".to_string()),
            end_date: Some("2023-01-01".to_string()),
        };
        assert!(matches!(query.range(), Err(ServiceError::InvalidRequest(_))));
    }
}
