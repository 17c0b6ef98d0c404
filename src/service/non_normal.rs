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

use chrono::{NaiveDate, Timelike};
use std::collections::BTreeMap;

use crate::models::{HourlyCount, NonNormalHourlyCount};

/// Pivot hourly volumes into one row per date.
///
/// Rows come out in date order. A row's `total` is only set when all 24 hours
/// of that date have a volume.
pub fn pivot_by_date(counts: &[HourlyCount]) -> Vec<NonNormalHourlyCount> {
    let mut days: BTreeMap<NaiveDate, NonNormalHourlyCount> = BTreeMap::new();

    for count in counts {
        let date = count.datetime.date();
        let day = days
            .entry(date)
            .or_insert_with(|| NonNormalHourlyCount::new(date));
        if let Some(slot) = day.hour_mut(count.datetime.hour()) {
            *slot = Some(slot.unwrap_or(0) + count.volume);
        }
    }

    days.into_values()
        .map(|mut day| {
            let hours = day.hours();
            day.total = if hours.iter().all(Option::is_some) {
                Some(hours.iter().flatten().sum())
            } else {
                None
            };
            day
        })
        .collect()
}
