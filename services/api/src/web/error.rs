//! services/api/src/web/error.rs
//!
//! Maps port errors onto HTTP statuses and JSON error bodies.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use skill_swap_core::ports::PortError;
use std::any::Any;
use tracing::{error, warn};

use crate::web::dto::{ErrorResponse, InterestFieldDetails};

/// Body sent for every failure whose detail must not leak to clients.
pub const INTERNAL_ERROR_MESSAGE: &str = "Something went wrong!";

/// An error ready to be rendered as an HTTP response.
#[derive(Debug)]
pub struct HttpError {
    status: StatusCode,
    body: ErrorResponse,
}

impl HttpError {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            body: ErrorResponse {
                message: message.into(),
                details: None,
            },
        }
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, message)
    }

    pub fn swap_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Skill swap not found")
    }

    pub fn interest_not_found() -> Self {
        Self::new(StatusCode::NOT_FOUND, "Interested user not found")
    }

    pub fn invalid_index() -> Self {
        Self::bad_request("Invalid user index")
    }

    pub fn internal() -> Self {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_ERROR_MESSAGE)
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<PortError> for HttpError {
    fn from(err: PortError) -> Self {
        match err {
            PortError::NotFound(_) => Self::swap_not_found(),
            PortError::InterestNotFound(_) => Self::interest_not_found(),
            PortError::InvalidIndex { .. } => Self::invalid_index(),
            PortError::Validation(v) => {
                let details = InterestFieldDetails::applies_to(&v)
                    .then(|| InterestFieldDetails::from_validation(&v));
                Self {
                    status: StatusCode::BAD_REQUEST,
                    body: ErrorResponse {
                        message: v.message,
                        details,
                    },
                }
            }
            PortError::Conflict(reason) => {
                warn!("Giving up on conflicting write: {}", reason);
                Self::new(
                    StatusCode::CONFLICT,
                    "Skill swap was modified concurrently, please retry",
                )
            }
            PortError::Unexpected(reason) => {
                error!("Unexpected store failure: {}", reason);
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for HttpError {
    fn from(rejection: JsonRejection) -> Self {
        match rejection {
            // Buffering failures carry their own status, e.g. 413 past the body limit.
            JsonRejection::BytesRejection(_) => Self::new(rejection.status(), rejection.body_text()),
            _ => Self::bad_request(rejection.body_text()),
        }
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        (self.status, Json(self.body)).into_response()
    }
}

/// Turns a handler panic into the generic 500 body; the listener keeps running.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!("Request handler panicked: {}", detail);
    HttpError::internal().into_response()
}
