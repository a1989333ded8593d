//! Error types for landwatch-api

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use landwatch_core::error::ErrorDetails;
use landwatch_core::{CoreError, ErrorCode};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ApiError {
    #[error("Not found: {resource}")]
    NotFound { resource: String },

    #[error("Bad request: {message}")]
    BadRequest { message: String },

    #[error("Unauthorized")]
    Unauthorized,

    #[error(transparent)]
    Core(#[from] CoreError),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound { .. } => StatusCode::NOT_FOUND,
            ApiError::BadRequest { .. } => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Core(e) => status_for_code(e.code()),
        }
    }

    pub fn details(&self) -> ErrorDetails {
        match self {
            ApiError::NotFound { .. } | ApiError::BadRequest { .. } => {
                ErrorDetails::new(ErrorCode::InvalidInput, self.to_string())
            }
            ApiError::Unauthorized => ErrorDetails::new(ErrorCode::Unauthenticated, self.to_string()),
            ApiError::Core(e) => e.to_details(),
        }
    }
}

/// HTTP status for a core error code
pub fn status_for_code(code: ErrorCode) -> StatusCode {
    match code {
        ErrorCode::Unauthenticated => StatusCode::UNAUTHORIZED,
        ErrorCode::Busy => StatusCode::CONFLICT,
        ErrorCode::InvalidInput => StatusCode::BAD_REQUEST,
        ErrorCode::UpstreamUnavailable
        | ErrorCode::UpstreamStatus
        | ErrorCode::InvalidResponse
        | ErrorCode::StoreError => StatusCode::BAD_GATEWAY,
        ErrorCode::DatasetError => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            log::error!("{}", self);
        } else {
            log::debug!("{}", self);
        }
        (status, Json(self.details())).into_response()
    }
}
