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

//! Read-only HTTP API over DVRPC's traffic counts database.
//!
//! Counts are looked up by record number and served as metadata, hourly
//! volume, daily rows of hourly volume ("non-normal"), and hourly vehicle
//! class, as JSON or cached CSV. Count locations group the counts taken at a
//! station. See [`api`] for the route layout.

pub mod api;
pub mod config;
pub mod counts;
pub mod csv_export;
pub mod models;
pub mod server;
pub mod service;
pub mod store;

// Main exports for library users
pub use config::{load_config_file, ConfigError, DatabaseConfig, TrafficCountsConfig};
pub use counts::{CountKind, CountSubType, CountTable};
pub use csv_export::{CsvCache, CsvExportError, CsvView};
pub use server::TrafficCountsServer;
pub use service::{CountService, ServiceError};
pub use store::{CountStore, MemoryCountStore, PgCountStore, StoreError};
