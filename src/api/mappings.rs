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

//! Conversions from store rows to API models.

use super::models::ReportRecord;
use crate::store::HeaderRow;

// The header table has no SEQ column; the legacy schema reports the segment.
impl From<HeaderRow> for ReportRecord {
    fn from(row: HeaderRow) -> Self {
        Self {
            record_num: row.recordnum,
            count_type: row.count_type,
            date: row.setdate,
            taken_by: row.takenby,
            counter_id: row.counterid,
            station_id: row.stationid,
            description: row.description,
            project: row.prj,
            program: row.program,
            group: row.bikepedgroup,
            facility: row.bikepedfacility,
            sr: row.sr,
            seq: row.seg,
            offset: row.offset,
            sri: row.sri,
            mp: row.mp,
            latitude: row.latitude,
            longitude: row.longitude,
            mcd: row.mcd,
            route: row.route,
            road: row.road,
            road_prefix: row.rdprefix,
            road_suffix: row.rdsuffix,
            is_urban: row.isurban,
            sidewalk: row.sidewalk,
            out_direction: row.outdir,
            in_direction: row.indir,
            counter_direction: row.cntdir,
            traffic_direction: row.trafdir,
            fc: row.fc,
            speed_limit: row.speedlimit,
            weather: row.weather,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn test_header_to_report_record_uses_legacy_keys() {
        let row = HeaderRow {
            recordnum: 101,
            count_type: Some("Bicycle 2".to_string()),
            setdate: NaiveDate::from_ymd_opt(2021, 6, 3),
            seg: Some("0040".to_string()),
            mcd: Some("4201704976".to_string()),
            fc: Some(14),
            rdprefix: Some("N".to_string()),
            ..Default::default()
        };

        let json = serde_json::to_value(ReportRecord::from(row)).unwrap();

        assert_eq!(json["record_num"], 101);
        assert_eq!(json["type"], "Bicycle 2");
        assert_eq!(json["date"], "2021-06-03");
        assert_eq!(json["SEQ"], "0040");
        assert_eq!(json["MCD"], "4201704976");
        assert_eq!(json["FC"], 14);
        assert_eq!(json["road_prefix"], "N");
        assert!(json.get("seg").is_none());
        assert!(json["weather"].is_null());
    }
}
