// src/handlers/error.rs
use std::fmt;
use warp::http::StatusCode;
use warp::reject::Reject;

/// The headline source or the classifier failed while serving a request.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub message: String,
}

impl ApiError {
    pub fn upstream(message: impl Into<String>) -> Self {
        ApiError {
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_GATEWAY
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for ApiError {}
impl Reject for ApiError {}
