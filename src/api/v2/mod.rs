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

//! API Version 2 (v2) implementation, the current version.
//!
//! ## Endpoint Structure
//!
//! - `GET {prefix}/v2/records` - Record numbers, filterable by `count_type` / `sub_type`
//! - `GET {prefix}/v2/records/{num}` - Count metadata
//! - `GET {prefix}/v2/volume/hourly/{num}` - Hourly volume, optionally limited by date
//! - `GET {prefix}/v2/volume/hourly/non-normal/{num}` - Hourly volume pivoted by day
//! - `GET {prefix}/v2/class/hourly/{num}` - Hourly vehicle class counts
//! - `GET {prefix}/v2/.../csv/{num}` - CSV downloads of the three views above
//! - `GET {prefix}/v2/locations` - Search count locations
//! - `GET {prefix}/v2/locations/{station_id}` - A count location
//! - `GET {prefix}/v2/locations/{station_id}/counts` - Hourly volume at a location

pub mod handlers;
pub mod openapi;
pub mod routes;

pub use openapi::ApiDocV2;
pub use routes::build_v2_router;
