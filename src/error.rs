//! Request-level error type

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use thiserror::Error;

use crate::core::store::StoreError;

/// Failure while answering a request
#[derive(Debug, Error)]
pub enum WikiError {
    #[error("Entry store error: {0}")]
    Store(#[from] StoreError),

    #[error("Template error: {0}")]
    Render(#[from] askama::Error),

    #[error("Request worker failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl IntoResponse for WikiError {
    fn into_response(self) -> Response {
        tracing::error!("Request failed: {}", self);
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error, please try again later",
        )
            .into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn test_store_error_is_internal() {
        let err = WikiError::from(StoreError::Io {
            path: PathBuf::from("entries/Python.md"),
            source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        });
        assert!(err.to_string().contains("entries/Python.md"));
        assert_eq!(
            err.into_response().status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
