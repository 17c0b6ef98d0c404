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

//! Error types and error handling utilities shared across API versions.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use log::{debug, error, warn};
use serde::Serialize;
use utoipa::ToSchema;

use crate::csv_export::CsvExportError;
use crate::service::ServiceError;

/// Error codes for API responses
pub mod error_codes {
    pub const RECORD_NOT_FOUND: &str = "RECORD_NOT_FOUND";
    pub const LOCATION_NOT_FOUND: &str = "LOCATION_NOT_FOUND";
    pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
    pub const DATABASE_UNAVAILABLE: &str = "DATABASE_UNAVAILABLE";
    pub const UNEXPECTED_DATA: &str = "UNEXPECTED_DATA";
    pub const INTERNAL_ERROR: &str = "INTERNAL_ERROR";
}

/// API error response structure
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    /// Error code for programmatic handling
    pub code: String,
    /// Human-readable error message
    pub message: String,
    /// Additional error details
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<ErrorDetail>,
}

/// Additional error details
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorDetail {
    /// Kind of resource the request referred to
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_type: Option<String>,
    /// Identifier of that resource
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            code: code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(error_codes::INVALID_REQUEST, message)
    }

    pub fn with_details(mut self, details: ErrorDetail) -> Self {
        self.details = Some(details);
        self
    }

    fn with_resource(self, resource_type: &str, resource_id: impl ToString) -> Self {
        self.with_details(ErrorDetail {
            resource_type: Some(resource_type.to_string()),
            resource_id: Some(resource_id.to_string()),
        })
    }

    pub fn with_status(self) -> (StatusCode, axum::Json<Self>) {
        let status = status_from_code(&self.code);
        (status, axum::Json(self))
    }
}

impl IntoResponse for ErrorResponse {
    fn into_response(self) -> Response {
        self.with_status().into_response()
    }
}

/// Convert an error code to an HTTP status code
pub fn status_from_code(code: &str) -> StatusCode {
    match code {
        error_codes::RECORD_NOT_FOUND | error_codes::LOCATION_NOT_FOUND => StatusCode::NOT_FOUND,
        error_codes::INVALID_REQUEST => StatusCode::BAD_REQUEST,
        error_codes::DATABASE_UNAVAILABLE => StatusCode::SERVICE_UNAVAILABLE,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Server-side detail is logged here and never sent to clients.
impl From<ServiceError> for ErrorResponse {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::RecordNotFound(num) => {
                debug!("Record {num} not found");
                ErrorResponse::new(error_codes::RECORD_NOT_FOUND, "Record not found")
                    .with_resource("record", num)
            }
            ServiceError::LocationNotFound(station_id) => {
                debug!("Location '{station_id}' not found");
                ErrorResponse::new(
                    error_codes::LOCATION_NOT_FOUND,
                    format!("Location '{station_id}' not found"),
                )
                .with_resource("location", station_id)
            }
            ServiceError::InvalidRequest(message) => {
                debug!("Rejected request: {message}");
                ErrorResponse::invalid_request(message)
            }
            ServiceError::Unavailable(detail) => {
                warn!("Database unavailable: {detail}");
                ErrorResponse::new(
                    error_codes::DATABASE_UNAVAILABLE,
                    "The traffic counts database is unavailable. Please try again later.",
                )
            }
            ServiceError::UnexpectedData(detail) => {
                error!("Unexpected data: {detail}");
                ErrorResponse::new(error_codes::UNEXPECTED_DATA, "Unexpected data type found.")
            }
            ServiceError::Internal(detail) => {
                error!("Internal error: {detail}");
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Unhandled error occurred.")
            }
        }
    }
}

impl From<CsvExportError> for ErrorResponse {
    fn from(err: CsvExportError) -> Self {
        match err {
            CsvExportError::Service(err) => err.into(),
            other => {
                error!("CSV export failed: {other}");
                ErrorResponse::new(error_codes::INTERNAL_ERROR, "Unhandled error occurred.")
            }
        }
    }
}
