//! Translation of reset results into HTTP responses

use crate::core::ResetSession;
use crate::execution::ResetError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Body returned when a reset succeeds
pub const RESET_COMPLETE: &str = "Reset complete";

/// HTTP view of one reset request
#[derive(Debug)]
pub struct ResetResponse(pub Result<ResetSession, ResetError>);

impl ResetResponse {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            Ok(_) => StatusCode::OK,
            Err(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn body(&self) -> String {
        match &self.0 {
            Ok(_) => RESET_COMPLETE.to_string(),
            Err(e) => e.to_string(),
        }
    }
}

impl From<Result<ResetSession, ResetError>> for ResetResponse {
    fn from(result: Result<ResetSession, ResetError>) -> Self {
        Self(result)
    }
}

impl IntoResponse for ResetResponse {
    fn into_response(self) -> Response {
        (self.status(), self.body()).into_response()
    }
}
