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

//! HTTP API for the traffic counts database.
//!
//! The API uses URL-based versioning under a configurable prefix
//! (`/api/traffic-counts` by default). v1 and v2 are served side by side.
//!
//! ## API Structure
//!
//! ```text
//! /health                       - Health check (unversioned)
//! {prefix}/versions             - List available API versions
//! {prefix}/v1/records           - Legacy record endpoints
//! {prefix}/v1/report/record/:n
//! {prefix}/v2/records           - Records and metadata
//! {prefix}/v2/volume/...        - Hourly volume (JSON and CSV)
//! {prefix}/v2/class/...         - Hourly vehicle class (JSON and CSV)
//! {prefix}/v2/locations         - Count locations
//! {prefix}/{v}/docs             - Swagger UI per version
//! {prefix}/{v}/openapi.json     - OpenAPI document per version
//! ```
//!
//! ## Module Organization
//!
//! - `shared` - Error type, common responses and handler implementations
//! - `v1` / `v2` - Version-specific handlers, routes and OpenAPI documents
//! - `version` - Version constants and utilities
//! - `models` - Query parameters and the legacy record schema
//! - `mappings` - Conversion from store rows to API models

pub mod mappings;
pub mod models;
pub mod shared;
pub mod v1;
pub mod v2;
pub mod version;

use axum::{extract::Extension, http::Method, routing::get, Router};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::csv_export::CsvCache;
use crate::service::CountService;

pub use shared::error::*;
pub use shared::responses::*;

pub use v1::{build_v1_router, ApiDocV1};
pub use v2::{build_v2_router, ApiDocV2};

pub use version::{ApiVersion, API_CURRENT_VERSION};

/// Prefix the OpenAPI path annotations are written against.
pub const DOCUMENTED_URL_PREFIX: &str = "/api/traffic-counts";

/// Build the complete application router: both API versions, their docs,
/// the unversioned endpoints and CORS.
pub fn build_router(
    service: Arc<CountService>,
    csv_cache: Arc<CsvCache>,
    url_prefix: &str,
) -> Router {
    let v1_root = ApiVersion::V1.path_prefix(url_prefix);
    let v2_root = ApiVersion::V2.path_prefix(url_prefix);

    let openapi_v1 = openapi_for_prefix(ApiDocV1::openapi(), url_prefix);
    let openapi_v2 = openapi_for_prefix(ApiDocV2::openapi(), url_prefix);

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET])
        .allow_headers(Any);

    Router::new()
        .route("/health", get(shared::health_check))
        .route(
            &format!("{url_prefix}/versions"),
            get(shared::list_api_versions),
        )
        .nest(&v1_root, build_v1_router())
        .nest(&v2_root, build_v2_router())
        .merge(
            SwaggerUi::new(format!("{v1_root}/docs"))
                .url(format!("{v1_root}/openapi.json"), openapi_v1),
        )
        .merge(
            SwaggerUi::new(format!("{v2_root}/docs"))
                .url(format!("{v2_root}/openapi.json"), openapi_v2),
        )
        .layer(Extension(service))
        .layer(Extension(csv_cache))
        .layer(cors)
}

/// Rewrite documented paths onto the configured prefix.
pub fn openapi_for_prefix(
    mut doc: utoipa::openapi::OpenApi,
    url_prefix: &str,
) -> utoipa::openapi::OpenApi {
    if url_prefix == DOCUMENTED_URL_PREFIX {
        return doc;
    }

    let paths = std::mem::take(&mut doc.paths.paths);
    doc.paths.paths = paths
        .into_iter()
        .map(|(path, item)| match path.strip_prefix(DOCUMENTED_URL_PREFIX) {
            Some(rest) => (format!("{url_prefix}{rest}"), item),
            None => (path, item),
        })
        .collect();
    doc
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_openapi_paths_follow_prefix() {
        let doc = openapi_for_prefix(ApiDocV2::openapi(), "/tc");

        assert!(doc.paths.paths.contains_key("/tc/v2/records"));
        assert!(doc.paths.paths.contains_key("/tc/v2/locations/{station_id}/counts"));
        assert!(doc.paths.paths.contains_key("/health"));
        assert!(!doc
            .paths
            .paths
            .keys()
            .any(|path| path.starts_with(DOCUMENTED_URL_PREFIX)));
    }

    #[test]
    fn test_default_prefix_leaves_document_unchanged() {
        let doc = openapi_for_prefix(ApiDocV1::openapi(), DOCUMENTED_URL_PREFIX);
        assert!(doc
            .paths
            .paths
            .contains_key("/api/traffic-counts/v1/report/record/{num}"));
    }
}
