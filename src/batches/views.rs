use super::models::{BatchStatusUpdate, Model as Batch};
use super::services;
use crate::common::auth::{CurrentUser, protect};
use crate::common::errors::{BusinessError, BusinessResult};
use crate::common::state::AppState;
use crate::trays::views::owned_tray;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_batch, delete_batch))
        .routes(routes!(set_batch_status))
        .with_state(state.clone());

    protect(router, state, vec![], "batches")
}

async fn owned_batch(
    state: &AppState,
    user: CurrentUser,
    batch_id: Uuid,
) -> BusinessResult<Batch> {
    let batch = services::get(&state.db, batch_id)
        .await?
        .ok_or_else(|| crate::not_found!("batch", batch_id))?;

    owned_tray(state, user, batch.tray_id)
        .await
        .map_err(|e| match e {
            BusinessError::NotFound { .. } => crate::not_found!("batch", batch_id),
            other => other,
        })?;
    Ok(batch)
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = OK, description = "Batch", body = Batch),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn get_batch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Batch>, BusinessError> {
    Ok(Json(owned_batch(&state, user, id).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Batch ID")),
    responses(
        (status = NO_CONTENT, description = "Batch deleted"),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches"
)]
pub async fn delete_batch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BusinessError> {
    owned_batch(&state, user, id).await?;
    services::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    put,
    path = "/{id}/status",
    params(("id" = Uuid, Path, description = "Batch ID")),
    request_body = BatchStatusUpdate,
    responses(
        (status = OK, description = "Batch with its new status", body = Batch),
        (status = NOT_FOUND, description = "Unknown batch")
    ),
    tag = "batches",
    summary = "Set the batch status",
    description = "Any status may follow any other: incubating, hatched, failed or archived"
)]
pub async fn set_batch_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<BatchStatusUpdate>,
) -> Result<Json<Batch>, BusinessError> {
    owned_batch(&state, user, id).await?;
    Ok(Json(services::set_status(&state.db, id, body.status).await?))
}
