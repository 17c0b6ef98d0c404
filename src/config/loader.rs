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

//! Configuration loading with environment variable interpolation.

use super::env_interpolation;
use super::types::TrafficCountsConfig;
use super::validation::{self, ValidationError};
use serde::de::DeserializeOwned;
use std::fs;
use std::path::Path;

/// Unified error type for configuration operations.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Failed to parse YAML: {0}")]
    YamlError(#[from] serde_yaml::Error),

    #[error("Environment variable interpolation failed: {0}")]
    InterpolationError(#[from] env_interpolation::InterpolationError),

    #[error("Failed to parse config file '{path}': YAML error: {yaml_err}, JSON error: {json_err}")]
    ParseError {
        path: String,
        yaml_err: String,
        json_err: String,
    },

    #[error("Validation error: {0}")]
    ValidationError(#[from] ValidationError),
}

/// Deserialize YAML after interpolating environment variables.
pub fn from_yaml_str<T: DeserializeOwned>(s: &str) -> Result<T, ConfigError> {
    let interpolated = env_interpolation::interpolate(s)?;
    Ok(serde_yaml::from_str(&interpolated)?)
}

/// Load and validate the server configuration.
///
/// The file is read, interpolated, parsed as YAML (falling back to JSON),
/// checked for unknown fields, deserialized and finally value-checked.
pub fn load_config_file<P: AsRef<Path>>(path: P) -> Result<TrafficCountsConfig, ConfigError> {
    let path_ref = path.as_ref();
    let content = fs::read_to_string(path_ref)?;
    let interpolated = env_interpolation::interpolate(&content)?;

    let value = match serde_yaml::from_str::<serde_yaml::Value>(&interpolated) {
        Ok(value) => value,
        Err(yaml_err) => match serde_json::from_str::<serde_yaml::Value>(&interpolated) {
            Ok(value) => value,
            Err(json_err) => {
                return Err(ConfigError::ParseError {
                    path: path_ref.display().to_string(),
                    yaml_err: yaml_err.to_string(),
                    json_err: json_err.to_string(),
                });
            }
        },
    };

    validation::validate_config(&value)?;

    let config: TrafficCountsConfig = serde_yaml::from_value(value)?;
    config.validate()?;

    Ok(config)
}
