use axum::{
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::Serialize;
use std::future::Future;

use crate::logic::ValidationError;
use crate::store::StoreError;

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl ErrorResponse {
    pub fn new(message: &str) -> Self {
        Self {
            error: message.to_string(),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    PayloadTooLarge(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn not_found(message: impl Into<String>) -> Self {
        ApiError::NotFound(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        match &self {
            ApiError::Validation(err) => log::warn!("Rejected request: {}", err),
            ApiError::NotFound(message) => log::debug!("Not found: {}", message),
            ApiError::PayloadTooLarge(message) => log::warn!("Rejected upload: {}", message),
            ApiError::Internal(err) => log::error!("Request failed: {:#}", err),
        }

        (status, Json(ErrorResponse::new(&self.to_string()))).into_response()
    }
}

/// Decides what a failed whole-record replace means for the client.
///
/// A [`StoreError::Conflict`] is followed by one existence check: if the row
/// is gone the request becomes a 404, otherwise the conflict is re-raised as a
/// fatal error. Any other failure is fatal as-is.
pub async fn resolve_conflict<F>(err: anyhow::Error, still_exists: F, missing: &str) -> ApiError
where
    F: Future<Output = anyhow::Result<bool>>,
{
    if !StoreError::is_conflict(&err) {
        return ApiError::Internal(err);
    }

    match still_exists.await {
        Ok(false) => ApiError::not_found(missing),
        Ok(true) => {
            log::error!("Concurrent update detected, row still present: {}", err);
            ApiError::Internal(err)
        }
        Err(check_err) => ApiError::Internal(check_err),
    }
}
