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

use serde::{Deserialize, Serialize};
use sqlx::postgres::{PgConnectOptions, PgSslMode};
use std::path::PathBuf;

use super::validation::ValidationError;

/// Top-level server configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct TrafficCountsConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Path every API version is mounted under, e.g. `/api/traffic-counts`
    #[serde(default = "default_url_prefix")]
    pub url_prefix: String,
    #[serde(default = "default_csv_cache_dir")]
    pub csv_cache_dir: PathBuf,
    #[serde(default = "default_static_pdf_base_url")]
    pub static_pdf_base_url: String,
    pub database: DatabaseConfig,
}

/// Connection settings for the traffic counts database.
#[derive(Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    pub user: String,
    #[serde(default)]
    pub password: String,
    pub name: String,
    #[serde(default = "default_db_host")]
    pub host: String,
    #[serde(default = "default_db_port")]
    pub port: u16,
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
    #[serde(default = "default_acquire_timeout_secs")]
    pub acquire_timeout_secs: u64,
    #[serde(default)]
    pub require_ssl: bool,
}

// Keeps the password out of logs.
impl std::fmt::Debug for DatabaseConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DatabaseConfig")
            .field("user", &self.user)
            .field("password", &"<redacted>")
            .field("name", &self.name)
            .field("host", &self.host)
            .field("port", &self.port)
            .field("max_connections", &self.max_connections)
            .field("acquire_timeout_secs", &self.acquire_timeout_secs)
            .field("require_ssl", &self.require_ssl)
            .finish()
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_url_prefix() -> String {
    "/api/traffic-counts".to_string()
}

fn default_csv_cache_dir() -> PathBuf {
    PathBuf::from("csv")
}

fn default_static_pdf_base_url() -> String {
    "https://www.dvrpc.org/asp/TrafficCountPDF".to_string()
}

fn default_db_host() -> String {
    "localhost".to_string()
}

fn default_db_port() -> u16 {
    5432
}

fn default_max_connections() -> u32 {
    10
}

fn default_acquire_timeout_secs() -> u64 {
    5
}

impl DatabaseConfig {
    pub fn connect_options(&self) -> PgConnectOptions {
        let ssl_mode = if self.require_ssl {
            PgSslMode::Require
        } else {
            PgSslMode::Prefer
        };

        PgConnectOptions::new()
            .host(&self.host)
            .port(self.port)
            .username(&self.user)
            .password(&self.password)
            .database(&self.name)
            .ssl_mode(ssl_mode)
    }
}

impl TrafficCountsConfig {
    /// Check value constraints that deserialization cannot express.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut errors = Vec::new();

        if self.port == 0 {
            errors.push("Invalid port: 0 (cannot be 0)".to_string());
        }
        if self.host.trim().is_empty() {
            errors.push("host cannot be empty".to_string());
        }
        if !self.url_prefix.starts_with('/') {
            errors.push(format!(
                "urlPrefix '{}' must start with '/'",
                self.url_prefix
            ));
        } else if self.url_prefix.len() > 1 && self.url_prefix.ends_with('/') {
            errors.push(format!(
                "urlPrefix '{}' must not end with '/'",
                self.url_prefix
            ));
        }
        if self.url_prefix == "/" {
            errors.push("urlPrefix cannot be '/'; omit trailing slashes".to_string());
        }
        if self.database.user.trim().is_empty() {
            errors.push("database.user cannot be empty".to_string());
        }
        if self.database.name.trim().is_empty() {
            errors.push("database.name cannot be empty".to_string());
        }
        if self.database.max_connections == 0 {
            errors.push("database.maxConnections must be greater than 0".to_string());
        }

        match errors.len() {
            0 => Ok(()),
            1 => Err(ValidationError::Invalid(errors.remove(0))),
            _ => Err(ValidationError::Multiple(errors)),
        }
    }
}
