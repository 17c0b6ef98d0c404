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

//! Server configuration.
//!
//! Settings come from a YAML (or JSON) file with camelCase keys. Environment
//! variables are interpolated before parsing, so credentials can stay out of
//! the file:
//!
//! ```yaml
//! port: 8080
//! urlPrefix: /api/traffic-counts
//! database:
//!   user: "${DB_USER}"
//!   password: "${DB_PASSWORD}"
//!   name: "${DB_NAME:-traffic_counts}"
//! ```

pub mod env_interpolation;
pub mod loader;
pub mod types;
pub mod validation;

pub use loader::{from_yaml_str, load_config_file, ConfigError};
pub use types::{DatabaseConfig, TrafficCountsConfig};
pub use validation::ValidationError;
