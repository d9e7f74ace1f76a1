//! Mapping from store errors and rejected request bodies to HTTP responses.
//!
//! Client mistakes come back with their message; anything on our side is
//! logged in full and answered with a generic 500.

use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;

use crate::error::StoreError;

#[derive(Debug)]
pub enum ApiError {
    Store(StoreError),
    /// The request body was not acceptable JSON for the operation.
    Body(JsonRejection),
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self::Store(e)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(e: JsonRejection) -> Self {
        Self::Body(e)
    }
}

fn store_status(e: &StoreError) -> StatusCode {
    match e {
        StoreError::InvalidIdentifier { .. } => StatusCode::BAD_REQUEST,
        StoreError::NotFound { .. } => StatusCode::NOT_FOUND,
        StoreError::Configuration(_)
        | StoreError::Connectivity { .. }
        | StoreError::Storage(_)
        | StoreError::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            Self::Store(e) => {
                let status = store_status(&e);
                if status.is_server_error() {
                    tracing::error!("Internal error: {}", e);
                    (status, "Internal server error".to_string())
                } else {
                    tracing::warn!("Rejected request: {}", e);
                    (status, e.to_string())
                }
            }
            Self::Body(rejection) => {
                tracing::warn!("Rejected request body: {}", rejection.body_text());
                (rejection.status(), rejection.body_text())
            }
        };

        (status, Json(json!({ "error": message }))).into_response()
    }
}
