use axum::{
    http::{header, HeaderName, StatusCode},
    response::Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::model::Id;
use crate::store::ImageStore;

/// Everything a request handler can reach: the store and the image folder.
#[derive(Debug)]
pub struct AppContext<S> {
    pub store: S,
    pub images: ImageStore,
}

impl<S> AppContext<S> {
    pub fn new(store: S, images: ImageStore) -> Self {
        Self { store, images }
    }
}

pub type AppState<S> = Arc<AppContext<S>>;

/// 201 response with a `Location` header pointing at the new record.
pub type Created<T> = (StatusCode, [(HeaderName, String); 1], Json<T>);

pub fn created<T>(location: String, body: T) -> Created<T> {
    (StatusCode::CREATED, [(header::LOCATION, location)], Json(body))
}

/// Simple health check endpoint
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub timestamp: String,
}

pub async fn health_check() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
}

/// `?id=`; an absent id reads as 0, which never matches a row.
#[derive(Debug, Deserialize)]
pub struct IdQuery {
    #[serde(default)]
    pub id: Id,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageUploadResponse {
    pub image_path: String,
}
