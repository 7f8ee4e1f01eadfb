//! Error codes and the HTTP error envelope.
//!
//! DESIGN
//! ======
//! Every service error enum implements [`ErrorCode`] so failures carry a
//! grepable `E_*` code next to the human message. Route handlers pick the
//! HTTP status and wrap the error in [`ApiError`], which renders as
//! `{"error": <message>, "code": <code>}`.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

pub trait ErrorCode: std::fmt::Display {
    fn error_code(&self) -> &'static str;

    fn retryable(&self) -> bool {
        false
    }
}

/// JSON body of every error response.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ErrorBody {
    pub error: String,
    pub code: &'static str,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub retryable: bool,
}

#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    body: ErrorBody,
}

impl ApiError {
    pub fn new(status: StatusCode, err: &(impl ErrorCode + ?Sized)) -> Self {
        Self {
            status,
            body: ErrorBody { error: err.to_string(), code: err.error_code(), retryable: err.retryable() },
        }
    }

    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    #[must_use]
    pub fn code(&self) -> &'static str {
        self.body.code
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status().is_server_error() {
            tracing::warn!(status = %self.status(), code = self.code(), error = %self.body.error, "request failed");
        }
        (self.status, Json(self.body)).into_response()
    }
}
