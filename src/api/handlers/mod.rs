use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::json;

use super::{ApiError, JsonBody};
use crate::db::ConnectionManager;
use crate::models::*;

// ============================================================
// Health
// ============================================================

pub async fn health(State(store): State<ConnectionManager>) -> impl IntoResponse {
    match store.get_database().await.and_then(|db| db.ping()) {
        Ok(()) => (
            StatusCode::OK,
            Json(json!({ "status": "ok", "message": "FosterTrack API is running" })),
        ),
        Err(e) => {
            tracing::error!("Health check failed: {}", e);
            (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "status": "error", "message": "Database not reachable" })),
            )
        }
    }
}

// ============================================================
// Cats
// ============================================================

pub async fn list_cats(
    State(store): State<ConnectionManager>,
) -> Result<Json<Vec<Cat>>, ApiError> {
    let db = store.get_database().await?;
    Ok(Json(db.list_cats()?))
}

pub async fn create_cat(
    State(store): State<ConnectionManager>,
    JsonBody(input): JsonBody<CreateCatInput>,
) -> Result<(StatusCode, Json<Cat>), ApiError> {
    let db = store.get_database().await?;
    let cat = db.create_cat(input)?;
    Ok((StatusCode::CREATED, Json(cat)))
}

pub async fn delete_cat(
    State(store): State<ConnectionManager>,
    Path(id): Path<String>,
) -> Result<Json<DeleteCatResult>, ApiError> {
    let db = store.get_database().await?;
    Ok(Json(db.delete_cat(&id)?))
}

// ============================================================
// Care logs
// ============================================================

pub async fn list_logs_for_cat(
    State(store): State<ConnectionManager>,
    Path(cat_id): Path<String>,
) -> Result<Json<Vec<CareLog>>, ApiError> {
    let db = store.get_database().await?;
    Ok(Json(db.list_logs_for_cat(&cat_id)?))
}

pub async fn create_log(
    State(store): State<ConnectionManager>,
    Path(cat_id): Path<String>,
    JsonBody(input): JsonBody<CreateLogInput>,
) -> Result<(StatusCode, Json<CareLog>), ApiError> {
    let db = store.get_database().await?;
    let log = db.create_log(&cat_id, input)?;
    Ok((StatusCode::CREATED, Json(log)))
}

pub async fn update_log(
    State(store): State<ConnectionManager>,
    Path(id): Path<String>,
    JsonBody(input): JsonBody<UpdateLogInput>,
) -> Result<Json<UpdateAck>, ApiError> {
    let db = store.get_database().await?;
    Ok(Json(db.update_log(&id, input)?))
}
