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

//! Configuration field validation.
//!
//! Catches typos and unknown fields that would otherwise be silently ignored
//! because of serde defaults. Value constraints (ports, prefixes, pool sizes)
//! are checked by [`TrafficCountsConfig::validate`](super::TrafficCountsConfig::validate).

use std::collections::HashSet;

/// Validation error for configuration files.
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Unknown field '{field}' in {context}. Valid fields are: {valid_fields}")]
    UnknownField {
        field: String,
        context: String,
        valid_fields: String,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),

    #[error("Multiple validation errors:\n{}", .0.join("\n"))]
    Multiple(Vec<String>),
}

/// Known fields for server-level configuration.
const SERVER_FIELDS: &[&str] = &[
    "host",
    "port",
    "logLevel",
    "urlPrefix",
    "csvCacheDir",
    "staticPdfBaseUrl",
    "database",
];

/// Known fields for database configuration.
const DATABASE_FIELDS: &[&str] = &[
    "user",
    "password",
    "name",
    "host",
    "port",
    "maxConnections",
    "acquireTimeoutSecs",
    "requireSsl",
];

/// Validate a configuration value and return all unknown field errors.
pub fn validate_config(value: &serde_yaml::Value) -> Result<(), ValidationError> {
    let mut errors = Vec::new();

    if let Some(map) = value.as_mapping() {
        validate_fields(map, SERVER_FIELDS, "server configuration", &mut errors);

        if let Some(database) = map.get("database").and_then(|v| v.as_mapping()) {
            validate_fields(database, DATABASE_FIELDS, "database configuration", &mut errors);
        }
    }

    match errors.len() {
        0 => Ok(()),
        1 => Err(errors.remove(0)),
        _ => Err(ValidationError::Multiple(
            errors.iter().map(ToString::to_string).collect(),
        )),
    }
}

fn validate_fields(
    map: &serde_yaml::Mapping,
    valid_fields: &[&str],
    context: &str,
    errors: &mut Vec<ValidationError>,
) {
    let valid_set: HashSet<&str> = valid_fields.iter().copied().collect();

    for key in map.keys() {
        if let Some(key_str) = key.as_str() {
            if !valid_set.contains(key_str) {
                errors.push(ValidationError::UnknownField {
                    field: key_str.to_string(),
                    context: context.to_string(),
                    valid_fields: valid_fields.join(", "),
                });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> serde_yaml::Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_valid_config_passes() {
        let value = parse(
            r#"
host: 0.0.0.0
port: 8080
urlPrefix: /api/traffic-counts
database:
  user: reader
  name: traffic
  maxConnections: 4
"#,
        );
        assert!(validate_config(&value).is_ok());
    }

    #[test]
    fn test_unknown_server_field() {
        let value = parse("host: 0.0.0.0\nprot: 8080\n");
        let err = validate_config(&value).unwrap_err();
        assert!(err.to_string().contains("prot"));
    }

    #[test]
    fn test_single_unknown_field_is_reported_once() {
        let value = parse("prot: 8080\n");
        let err = validate_config(&value).unwrap_err();

        match &err {
            ValidationError::UnknownField {
                field,
                context,
                valid_fields,
            } => {
                assert_eq!(field, "prot");
                assert_eq!(context, "server configuration");
                assert!(valid_fields.contains("port"));
            }
            other => panic!("Expected UnknownField, got {other:?}"),
        }
        assert!(err
            .to_string()
            .starts_with("Unknown field 'prot' in server configuration. Valid fields are: host, port"));
        assert_eq!(err.to_string().matches("Unknown field").count(), 1);
    }

    #[test]
    fn test_snake_case_database_field_is_unknown() {
        let value = parse("database:\n  user: a\n  name: b\n  max_connections: 3\n");
        let err = validate_config(&value).unwrap_err();
        assert!(err.to_string().contains("max_connections"));
        assert!(err.to_string().contains("database configuration"));
    }

    #[test]
    fn test_multiple_unknown_fields() {
        let value = parse("foo: 1\nbar: 2\n");
        assert!(matches!(
            validate_config(&value),
            Err(ValidationError::Multiple(errors)) if errors.len() == 2
        ));
    }
}
