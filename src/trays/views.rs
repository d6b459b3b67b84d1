use super::models::{Model as Tray, TrayUpdate};
use super::services;
use crate::batches::models::{BatchCreateBody, Model as Batch};
use crate::batches::services as batches;
use crate::common::auth::{CurrentUser, protect};
use crate::common::errors::{BusinessError, BusinessResult};
use crate::common::state::AppState;
use crate::incubators::services as incubators;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(get_tray, update_tray, delete_tray))
        .routes(routes!(list_tray_batches, create_tray_batch))
        .with_state(state.clone());

    protect(router, state, vec![], "trays")
}

/// The tray, if its incubator belongs to the caller
pub(crate) async fn owned_tray(
    state: &AppState,
    user: CurrentUser,
    tray_id: Uuid,
) -> BusinessResult<Tray> {
    let tray = services::get(&state.db, tray_id)
        .await?
        .ok_or_else(|| crate::not_found!("tray", tray_id))?;

    incubators::get_owned(&state.db, tray.incubator_id, user.0)
        .await
        .map_err(|e| match e {
            BusinessError::NotFound { .. } => crate::not_found!("tray", tray_id),
            other => other,
        })?;
    Ok(tray)
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Tray ID")),
    responses(
        (status = OK, description = "Tray", body = Tray),
        (status = NOT_FOUND, description = "Unknown tray")
    ),
    tag = "trays"
)]
pub async fn get_tray(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Tray>, BusinessError> {
    Ok(Json(owned_tray(&state, user, id).await?))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Tray ID")),
    request_body = TrayUpdate,
    responses(
        (status = OK, description = "Updated tray", body = Tray),
        (status = BAD_REQUEST, description = "Negative capacity"),
        (status = NOT_FOUND, description = "Unknown tray"),
        (status = CONFLICT, description = "The floor is already taken")
    ),
    tag = "trays"
)]
pub async fn update_tray(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<TrayUpdate>,
) -> Result<Json<Tray>, BusinessError> {
    owned_tray(&state, user, id).await?;
    Ok(Json(services::update(&state.db, id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Tray ID")),
    responses(
        (status = NO_CONTENT, description = "Tray deleted"),
        (status = NOT_FOUND, description = "Unknown tray"),
        (status = CONFLICT, description = "Batches still sit on the tray")
    ),
    tag = "trays"
)]
pub async fn delete_tray(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BusinessError> {
    owned_tray(&state, user, id).await?;
    services::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/batches",
    params(("id" = Uuid, Path, description = "Tray ID")),
    responses(
        (status = OK, description = "Batches on the tray, newest first", body = Vec<Batch>),
        (status = NOT_FOUND, description = "Unknown tray")
    ),
    tag = "batches"
)]
pub async fn list_tray_batches(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Batch>>, BusinessError> {
    owned_tray(&state, user, id).await?;
    Ok(Json(batches::list_by_tray(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/{id}/batches",
    params(("id" = Uuid, Path, description = "Tray ID")),
    request_body = BatchCreateBody,
    responses(
        (status = CREATED, description = "Batch started, status is incubating", body = Batch),
        (status = BAD_REQUEST, description = "Invalid egg count or dates"),
        (status = NOT_FOUND, description = "Unknown tray"),
        (status = CONFLICT, description = "Unknown species")
    ),
    tag = "batches"
)]
pub async fn create_tray_batch(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<BatchCreateBody>,
) -> Result<(StatusCode, Json<Batch>), BusinessError> {
    owned_tray(&state, user, id).await?;
    let batch = batches::create(&state.db, body.for_tray(id)).await?;
    Ok((StatusCode::CREATED, Json(batch)))
}
