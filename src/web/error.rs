//! Web error types and response handling

use axum::{
    body::Body,
    http::{Response, StatusCode},
    response::IntoResponse,
};

/// Errors that can occur while serving a page
#[derive(Debug)]
pub enum WebError {
    NotFound(String),
    Internal(String),
}

impl IntoResponse for WebError {
    fn into_response(self) -> Response<Body> {
        let (status, message) = match self {
            WebError::NotFound(msg) => (StatusCode::NOT_FOUND, msg),
            WebError::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
        };

        if status.is_server_error() {
            tracing::error!("Web error: {} - {}", status, message);
        } else {
            tracing::debug!("Web error: {} - {}", status, message);
        }

        Response::builder()
            .status(status)
            .body(Body::from(message))
            .unwrap_or_else(|_| Response::new(Body::from("Internal error building error response")))
    }
}
