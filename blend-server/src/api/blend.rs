//! Blend persistence endpoints
//!
//! - POST /api/blend          create, 201 `{message, id}`
//! - PUT  /api/blend/:id      update in place, 200 `{message, id}`
//! - GET  /api/blend/latest   full record with greatest `createdAt`

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    http::StatusCode,
    Json,
};
use blend_common::api::SaveResponse;
use blend_common::{BlendId, BlendPayload, BlendRecord};
use serde_json::Value;
use tracing::{debug, info};

use super::ApiError;
use crate::{db, AppState};

/// Turn the raw body (or its rejection) into a validated payload
fn validate(body: Result<Json<Value>, JsonRejection>) -> Result<BlendPayload, ApiError> {
    let Json(value) =
        body.map_err(|rejection| ApiError::Validation(format!("Invalid payload: {}", rejection.body_text())))?;
    Ok(BlendPayload::from_value(&value)?)
}

/// POST /api/blend
///
/// Inserts a new record; the server assigns id and `createdAt`.
pub async fn create_blend(
    State(state): State<AppState>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<(StatusCode, Json<SaveResponse>), ApiError> {
    let payload = validate(body)?;

    let record = db::insert_blend(&state.db, &payload).await?;
    info!(id = %record.id, rows = record.rows.len(), flows = record.flows.len(), "Blend created");

    Ok((StatusCode::CREATED, Json(SaveResponse::saved(record.id))))
}

/// PUT /api/blend/:id
///
/// Replaces rows/flows/generation of an existing record. `createdAt` is
/// not refreshed, so an update never changes which record is latest.
pub async fn update_blend(
    State(state): State<AppState>,
    Path(id): Path<String>,
    body: Result<Json<Value>, JsonRejection>,
) -> Result<Json<SaveResponse>, ApiError> {
    let payload = validate(body)?;
    let id = BlendId::new(id);

    match db::replace_blend(&state.db, &id, &payload).await? {
        Some(record) => {
            info!(id = %record.id, "Blend updated");
            Ok(Json(SaveResponse::updated(record.id)))
        }
        None => {
            debug!(id = %id, "Update target not found");
            Err(ApiError::NotFound("Blend not found".to_string()))
        }
    }
}

/// GET /api/blend/latest
pub async fn get_latest_blend(State(state): State<AppState>) -> Result<Json<BlendRecord>, ApiError> {
    db::latest_blend(&state.db)
        .await?
        .map(Json)
        .ok_or_else(|| ApiError::NotFound("No blends found".to_string()))
}
