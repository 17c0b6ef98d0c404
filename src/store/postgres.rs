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

use async_trait::async_trait;
use chrono::{NaiveDate, NaiveDateTime};
use log::debug;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

use super::{CountStore, HeaderRow, LocationRow, MunicipalityRow, StoreError};
use crate::config::DatabaseConfig;
use crate::counts::{CountSubType, CountTable};
use crate::models::{DateRange, HourlyClass, HourlyCount, LocationSearch};

// Every column is cast so decoding does not depend on the exact column types.
const HEADER_COLUMNS: &str = r#"
    recordnum::int8 as recordnum,
    source::text as source,
    counterid::text as counterid,
    stationid::text as stationid,
    type::text as type,
    setdate::date as setdate,
    takenby::text as takenby,
    description::text as description,
    prj::text as prj,
    program::text as program,
    bikepedgroup::text as bikepedgroup,
    bikepedfacility::text as bikepedfacility,
    sr::text as sr,
    seg::text as seg,
    "offset"::text as "offset",
    sri::text as sri,
    mp::text as mp,
    latitude::float8 as latitude,
    longitude::float8 as longitude,
    mcd::text as mcd,
    route::int4 as route,
    road::text as road,
    rdprefix::text as rdprefix,
    rdsuffix::text as rdsuffix,
    isurban::text as isurban,
    sidewalk::text as sidewalk,
    cldir1::text as cldir1,
    cldir2::text as cldir2,
    cldir3::text as cldir3,
    outdir::text as outdir,
    indir::text as indir,
    cntdir::text as cntdir,
    trafdir::text as trafdir,
    fc::int4 as fc,
    speedlimit::int4 as speedlimit,
    aadv::int8 as aadv,
    am_peak_volume::int8 as am_peak_volume,
    avg_am_max_percent::float8 as avg_am_max_percent,
    pm_peak_volume::int8 as pm_peak_volume,
    avg_pm_max_percent::float8 as avg_pm_max_percent,
    weather::text as weather,
    comments::text as comments
"#;

const CLASS_QUERY: &str = r#"
    select
        date_trunc('hour', countdatetime)::timestamp as datetime,
        coalesce(sum(total), 0)::int8 as total,
        coalesce(sum(bikes), 0)::int8 as motorcycles,
        coalesce(sum(cars_and_tlrs), 0)::int8 as passenger_cars,
        coalesce(sum(ax2_long), 0)::int8 as other_four_tire_single_unit_vehicles,
        coalesce(sum(buses), 0)::int8 as buses,
        coalesce(sum(ax2_6_tire), 0)::int8 as two_axle_six_tire_single_unit_trucks,
        coalesce(sum(ax3_single), 0)::int8 as three_axle_single_unit_trucks,
        coalesce(sum(ax4_single), 0)::int8 as four_or_more_axle_single_unit_trucks,
        coalesce(sum(lt_5_ax_double), 0)::int8 as four_or_fewer_axle_single_trailer_trucks,
        coalesce(sum(ax5_double), 0)::int8 as five_axle_single_trailer_trucks,
        coalesce(sum(gt_5_ax_double), 0)::int8 as six_or_more_axle_single_trailer_trucks,
        coalesce(sum(lt_6_ax_multi), 0)::int8 as five_or_fewer_axle_multi_trailer_trucks,
        coalesce(sum(ax6_multi), 0)::int8 as six_axle_multi_trailer_trucks,
        coalesce(sum(gt_6_ax_multi), 0)::int8 as seven_or_more_axle_multi_trailer_trucks,
        sum(unclassified)::int8 as unclassified_vehicle
    from tc_clacount_new
    where recordnum = $1
    group by 1
    order by 1
"#;

const LOCATION_QUERY: &str = r#"
    select
        h.stationid::text as station_id,
        h.road::text as road,
        h.rdprefix::text as road_prefix,
        h.rdsuffix::text as road_suffix,
        h.route::int4 as route,
        h.fc::int4 as functional_class,
        h.latitude::float8 as latitude,
        h.longitude::float8 as longitude,
        h.mcd::text as mcd,
        m.mcdname::text as municipality,
        m.county::text as county,
        m.state::text as state,
        h.recordnum::int8 as record_num
    from tc_header h
    left join tc_mcd m on m.dvrpc = h.mcd
    where h.stationid is not null
      and ($1::text is null or h.stationid = $1)
      and ($2::text is null or h.road ilike '%' || $2 || '%' escape '\')
      and ($3::text is null or h.mcd = $3)
      and ($4::text is null or m.mcdname ilike $4 escape '\')
      and ($5::text is null or m.county ilike $5 escape '\')
      and ($6::text is null or m.state ilike $6 escape '\')
    order by h.stationid, h.recordnum desc
"#;

#[derive(sqlx::FromRow)]
struct HourlyVolumeRow {
    datetime: NaiveDateTime,
    volume: Option<i64>,
}

#[derive(sqlx::FromRow)]
struct HourlyClassRow {
    datetime: NaiveDateTime,
    total: i64,
    motorcycles: i64,
    passenger_cars: i64,
    other_four_tire_single_unit_vehicles: i64,
    buses: i64,
    two_axle_six_tire_single_unit_trucks: i64,
    three_axle_single_unit_trucks: i64,
    four_or_more_axle_single_unit_trucks: i64,
    four_or_fewer_axle_single_trailer_trucks: i64,
    five_axle_single_trailer_trucks: i64,
    six_or_more_axle_single_trailer_trucks: i64,
    five_or_fewer_axle_multi_trailer_trucks: i64,
    six_axle_multi_trailer_trucks: i64,
    seven_or_more_axle_multi_trailer_trucks: i64,
    unclassified_vehicle: Option<i64>,
}

impl From<HourlyClassRow> for HourlyClass {
    fn from(row: HourlyClassRow) -> Self {
        HourlyClass {
            datetime: row.datetime,
            total: row.total,
            motorcycles: row.motorcycles,
            passenger_cars: row.passenger_cars,
            other_four_tire_single_unit_vehicles: row.other_four_tire_single_unit_vehicles,
            buses: row.buses,
            two_axle_six_tire_single_unit_trucks: row.two_axle_six_tire_single_unit_trucks,
            three_axle_single_unit_trucks: row.three_axle_single_unit_trucks,
            four_or_more_axle_single_unit_trucks: row.four_or_more_axle_single_unit_trucks,
            four_or_fewer_axle_single_trailer_trucks: row.four_or_fewer_axle_single_trailer_trucks,
            five_axle_single_trailer_trucks: row.five_axle_single_trailer_trucks,
            six_or_more_axle_single_trailer_trucks: row.six_or_more_axle_single_trailer_trucks,
            five_or_fewer_axle_multi_trailer_trucks: row.five_or_fewer_axle_multi_trailer_trucks,
            six_axle_multi_trailer_trucks: row.six_axle_multi_trailer_trucks,
            seven_or_more_axle_multi_trailer_trucks: row.seven_or_more_axle_multi_trailer_trucks,
            unclassified_vehicle: row.unclassified_vehicle,
        }
    }
}

/// Escape `ILIKE` metacharacters so search terms match literally.
fn escape_like(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for c in value.chars() {
        if matches!(c, '\\' | '%' | '_') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::WorkerCrashed => StoreError::Unavailable(err.to_string()),
            sqlx::Error::ColumnDecode { .. }
            | sqlx::Error::Decode(_)
            | sqlx::Error::ColumnNotFound(_)
            | sqlx::Error::TypeNotFound { .. } => StoreError::Decode(err.to_string()),
            other => StoreError::Query(other.to_string()),
        }
    }
}

/// [`CountStore`] backed by a Postgres connection pool.
#[derive(Clone)]
pub struct PgCountStore {
    pool: PgPool,
}

impl PgCountStore {
    /// Build a pool for the configured database.
    ///
    /// Connections are opened lazily, so the server starts even while the
    /// database is down; requests fail as unavailable until it comes back.
    pub fn connect_lazy(config: &DatabaseConfig) -> Self {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(config.acquire_timeout_secs))
            .connect_lazy_with(config.connect_options());

        debug!(
            "Created connection pool for database '{}' at {}:{} (max {} connections)",
            config.name, config.host, config.port, config.max_connections
        );

        Self { pool }
    }

    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl CountStore for PgCountStore {
    async fn record_numbers(
        &self,
        sub_types: Option<&[CountSubType]>,
    ) -> Result<Vec<i64>, StoreError> {
        let rows: Vec<(i64,)> = match sub_types {
            Some(sub_types) => {
                let names: Vec<String> = sub_types.iter().map(|s| s.as_str().to_string()).collect();
                sqlx::query_as(
                    "select recordnum::int8 from tc_header where type = any($1) order by recordnum desc",
                )
                .bind(names)
                .fetch_all(&self.pool)
                .await?
            }
            None => {
                sqlx::query_as("select recordnum::int8 from tc_header order by recordnum desc")
                    .fetch_all(&self.pool)
                    .await?
            }
        };

        Ok(rows.into_iter().map(|(num,)| num).collect())
    }

    async fn header(&self, record_num: i64) -> Result<Option<HeaderRow>, StoreError> {
        let sql = format!("select {HEADER_COLUMNS} from tc_header where recordnum = $1");
        let row = sqlx::query_as::<_, HeaderRow>(&sql)
            .bind(record_num)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn municipality(&self, mcd: &str) -> Result<Option<MunicipalityRow>, StoreError> {
        let row = sqlx::query_as::<_, MunicipalityRow>(
            "select mcdname::text as mcdname, county::text as county, state::text as state \
             from tc_mcd where dvrpc = $1",
        )
        .bind(mcd)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn hourly_volume(
        &self,
        table: CountTable,
        record_num: i64,
        range: &DateRange,
    ) -> Result<Vec<HourlyCount>, StoreError> {
        // Table names come from a closed enum, never from request input.
        let sql = format!(
            "select date_trunc('hour', countdatetime)::timestamp as datetime, sum(volume)::int8 as volume \
             from {} \
             where recordnum = $1 \
               and ($2::date is null or countdatetime >= $2::date) \
               and ($3::date is null or countdatetime < $3::date + 1) \
             group by 1 \
             order by 1",
            table.table_name()
        );

        let rows = sqlx::query_as::<_, HourlyVolumeRow>(&sql)
            .bind(record_num)
            .bind(range.start)
            .bind(range.end)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| HourlyCount {
                datetime: row.datetime,
                volume: row.volume.unwrap_or(0),
            })
            .collect())
    }

    async fn hourly_class(&self, record_num: i64) -> Result<Vec<HourlyClass>, StoreError> {
        let rows = sqlx::query_as::<_, HourlyClassRow>(CLASS_QUERY)
            .bind(record_num)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows.into_iter().map(HourlyClass::from).collect())
    }

    async fn suppressed_dates(&self, record_num: i64) -> Result<Vec<NaiveDate>, StoreError> {
        let rows: Vec<(NaiveDate,)> = sqlx::query_as(
            "select distinct countdate::date from tc_suppressed_dates \
             where recordnum = $1 order by 1",
        )
        .bind(record_num)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows.into_iter().map(|(date,)| date).collect())
    }

    async fn latest_aadv_calculation(
        &self,
        record_num: i64,
    ) -> Result<Option<NaiveDateTime>, StoreError> {
        let row: Option<(Option<NaiveDateTime>,)> = sqlx::query_as(
            "select date_calculated::timestamp from aadv \
             where recordnum = $1 order by date_calculated desc nulls last limit 1",
        )
        .bind(record_num)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row.and_then(|(calculated,)| calculated))
    }

    async fn location_rows(
        &self,
        station_id: Option<&str>,
        criteria: &LocationSearch,
    ) -> Result<Vec<LocationRow>, StoreError> {
        let rows = sqlx::query_as::<_, LocationRow>(LOCATION_QUERY)
            .bind(station_id)
            .bind(criteria.road.as_deref().map(escape_like))
            .bind(criteria.mcd.as_deref())
            .bind(criteria.municipality.as_deref().map(escape_like))
            .bind(criteria.county.as_deref().map(escape_like))
            .bind(criteria.state.as_deref().map(escape_like))
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    fn unreachable_database() -> DatabaseConfig {
        DatabaseConfig {
            user: "reader".to_string(),
            password: String::new(),
            name: "traffic_counts".to_string(),
            host: "127.0.0.1".to_string(),
            port: 1,
            max_connections: 1,
            acquire_timeout_secs: 1,
            require_ssl: false,
        }
    }

    #[test]
    fn test_connectivity_errors_are_unavailable() {
        let errors = [
            sqlx::Error::PoolTimedOut,
            sqlx::Error::PoolClosed,
            sqlx::Error::WorkerCrashed,
            sqlx::Error::Io(io::Error::new(io::ErrorKind::ConnectionRefused, "refused")),
        ];

        for err in errors {
            assert!(
                matches!(StoreError::from(err), StoreError::Unavailable(_)),
                "expected Unavailable"
            );
        }
    }

    #[test]
    fn test_decode_errors_are_decode() {
        let column = StoreError::from(sqlx::Error::ColumnNotFound("recordnum".to_string()));
        assert!(matches!(column, StoreError::Decode(msg) if msg.contains("recordnum")));

        let value = StoreError::from(sqlx::Error::Decode("expected int8".into()));
        assert!(matches!(value, StoreError::Decode(_)));
    }

    #[test]
    fn test_other_errors_are_query_failures() {
        assert!(matches!(
            StoreError::from(sqlx::Error::RowNotFound),
            StoreError::Query(_)
        ));
        assert!(matches!(
            StoreError::from(sqlx::Error::Protocol("unexpected message".to_string())),
            StoreError::Query(_)
        ));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("Main St"), "Main St");
        assert_eq!(escape_like("100%"), "100\\%");
        assert_eq!(escape_like("US_1"), "US\\_1");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }

    #[tokio::test]
    async fn test_unreachable_database_is_unavailable() {
        let store = PgCountStore::connect_lazy(&unreachable_database());

        let result = store.record_numbers(None).await;

        assert!(matches!(result, Err(StoreError::Unavailable(_))));
    }
}
