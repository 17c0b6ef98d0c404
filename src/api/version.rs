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

//! API version definitions.
//!
//! Versions are URL roots under the configured prefix, e.g.
//! `/api/traffic-counts/v1` and `/api/traffic-counts/v2`. Both are served at
//! the same time; v1 keeps the legacy record endpoints for existing clients.

use std::fmt;

/// The current/latest API version.
pub const API_CURRENT_VERSION: ApiVersion = ApiVersion::V2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    /// Legacy record endpoints
    V1,
    /// Counts, CSV exports and locations
    V2,
}

impl ApiVersion {
    /// URL root of this version under `url_prefix`.
    pub fn path_prefix(&self, url_prefix: &str) -> String {
        format!("{url_prefix}/{}", self.as_str())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ApiVersion::V1 => "v1",
            ApiVersion::V2 => "v2",
        }
    }

    pub fn all() -> &'static [ApiVersion] {
        &[ApiVersion::V1, ApiVersion::V2]
    }

    pub fn all_strings() -> Vec<String> {
        Self::all().iter().map(|v| v.as_str().to_string()).collect()
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for ApiVersion {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "v1" | "1" => Ok(ApiVersion::V1),
            "v2" | "2" => Ok(ApiVersion::V2),
            _ => Err(format!("Unknown API version: {s}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_path_prefix() {
        assert_eq!(
            ApiVersion::V1.path_prefix("/api/traffic-counts"),
            "/api/traffic-counts/v1"
        );
        assert_eq!(ApiVersion::V2.path_prefix("/tc"), "/tc/v2");
    }

    #[test]
    fn test_version_from_str() {
        assert_eq!("V2".parse::<ApiVersion>().unwrap(), ApiVersion::V2);
        assert_eq!("1".parse::<ApiVersion>().unwrap(), ApiVersion::V1);
        assert!("v3".parse::<ApiVersion>().is_err());
    }

    #[test]
    fn test_all_versions() {
        assert_eq!(ApiVersion::all_strings(), vec!["v1", "v2"]);
        assert!(ApiVersion::all().contains(&API_CURRENT_VERSION));
    }
}
