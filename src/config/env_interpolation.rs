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

//! Environment variable interpolation for configuration files.
//!
//! Database credentials are kept out of the config file by referencing
//! environment variables:
//! - `${DB_PASSWORD}` is replaced by the variable's value
//! - `${DB_HOST:-localhost}` falls back to `localhost` when unset or empty
//!
//! ```
//! use traffic_counts_api::config::env_interpolation::interpolate;
//!
//! std::env::set_var("TC_DOC_DB_USER", "reader");
//!
//! let resolved = interpolate("user: ${TC_DOC_DB_USER}\nname: ${TC_DOC_DB_NAME:-traffic}").unwrap();
//! assert_eq!(resolved, "user: reader\nname: traffic");
//! ```

use lazy_static::lazy_static;
use log::debug;
use regex::Regex;
use std::env;

/// Upper bound on the size of an interpolated config.
const MAX_INTERPOLATED_LENGTH: usize = 1_000_000;

lazy_static! {
    /// `${NAME}` or `${NAME:-default}`; names follow POSIX rules.
    static ref ENV_VAR_PATTERN: Regex =
        Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)(:-([^}]*))?\}").expect("Invalid regex pattern");
}

#[derive(Debug, thiserror::Error)]
pub enum InterpolationError {
    #[error("Environment variable '{name}' is not set and has no default value")]
    MissingVariable { name: String },

    #[error("Interpolated result exceeds maximum allowed length of {MAX_INTERPOLATED_LENGTH} bytes")]
    ResultTooLarge,
}

/// Replace every `${NAME}` / `${NAME:-default}` reference in `input`.
///
/// Expansion is not recursive. Only variable names are logged, never values.
pub fn interpolate(input: &str) -> Result<String, InterpolationError> {
    let mut output = String::with_capacity(input.len());
    let mut copied_up_to = 0;
    let mut resolved_names = Vec::new();

    for caps in ENV_VAR_PATTERN.captures_iter(input) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let name = name.as_str();
        let fallback = caps.get(3).map(|m| m.as_str());

        output.push_str(&input[copied_up_to..whole.start()]);

        let value = match env::var(name) {
            Ok(value) if !value.is_empty() => value,
            Ok(_) | Err(env::VarError::NotPresent) => match fallback {
                Some(fallback) => fallback.to_string(),
                None => {
                    return Err(InterpolationError::MissingVariable {
                        name: name.to_string(),
                    })
                }
            },
            Err(env::VarError::NotUnicode(_)) => {
                return Err(InterpolationError::MissingVariable {
                    name: format!("{name} (contains invalid Unicode)"),
                })
            }
        };

        output.push_str(&value);
        copied_up_to = whole.end();
        resolved_names.push(name);

        if output.len() > MAX_INTERPOLATED_LENGTH {
            return Err(InterpolationError::ResultTooLarge);
        }
    }

    output.push_str(&input[copied_up_to..]);

    if !resolved_names.is_empty() {
        debug!(
            "Interpolated environment variables: {}",
            resolved_names.join(", ")
        );
    }

    Ok(output)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_variables_are_substituted() {
        env::set_var("TC_INTERP_USER", "reader");
        env::set_var("TC_INTERP_PORT", "5433");

        let result = interpolate("user: ${TC_INTERP_USER}\nport: ${TC_INTERP_PORT}").unwrap();

        assert_eq!(result, "user: reader\nport: 5433");
    }

    #[test]
    fn test_default_used_when_unset_or_empty() {
        env::remove_var("TC_INTERP_UNSET");
        env::set_var("TC_INTERP_EMPTY", "");

        let result =
            interpolate("a: ${TC_INTERP_UNSET:-one}\nb: ${TC_INTERP_EMPTY:-two}\nc: ${TC_INTERP_UNSET:-}")
                .unwrap();

        assert_eq!(result, "a: one\nb: two\nc: ");
    }

    #[test]
    fn test_value_wins_over_default() {
        env::set_var("TC_INTERP_SET", "actual");
        assert_eq!(
            interpolate("${TC_INTERP_SET:-fallback}").unwrap(),
            "actual"
        );
    }

    #[test]
    fn test_missing_variable_is_an_error() {
        env::remove_var("TC_INTERP_MISSING");

        let result = interpolate("password: ${TC_INTERP_MISSING}");

        assert!(matches!(
            result,
            Err(InterpolationError::MissingVariable { name }) if name == "TC_INTERP_MISSING"
        ));
    }

    #[test]
    fn test_invalid_names_left_untouched() {
        let input = "value: ${NOT-A-NAME} and $PLAIN";
        assert_eq!(interpolate(input).unwrap(), input);
    }

    #[test]
    fn test_values_are_not_expanded_again() {
        env::set_var("TC_INTERP_LITERAL", "${TC_INTERP_USER}");
        assert_eq!(
            interpolate("x: ${TC_INTERP_LITERAL}").unwrap(),
            "x: ${TC_INTERP_USER}"
        );
    }

    #[test]
    fn test_result_size_is_bounded() {
        env::set_var("TC_INTERP_HUGE", "x".repeat(MAX_INTERPOLATED_LENGTH + 1));
        assert!(matches!(
            interpolate("${TC_INTERP_HUGE}"),
            Err(InterpolationError::ResultTooLarge)
        ));
    }
}
