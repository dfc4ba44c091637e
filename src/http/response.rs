//! Error responses.
//!
//! Every gateway failure becomes its fixed status code and a
//! `{"error": "<message>"}` body. Upstream detail stays in the logs.

use axum::{
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

use crate::quoting::GatewayError;

/// Body of every error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

impl IntoResponse for GatewayError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            error: self.to_string(),
        };
        (self.status_code(), Json(body)).into_response()
    }
}
