use super::models::{IncubatorCreate, IncubatorUpdate, IncubatorWithTrays, Model as Incubator};
use super::services;
use crate::common::auth::{CurrentUser, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use crate::trays::models::{Model as Tray, TrayCreateBody};
use crate::trays::services as trays;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

pub fn router(state: &AppState) -> OpenApiRouter {
    let router = OpenApiRouter::new()
        .routes(routes!(list_incubators, create_incubator))
        .routes(routes!(get_incubator, update_incubator, delete_incubator))
        .routes(routes!(list_incubator_trays, create_incubator_tray))
        .with_state(state.clone());

    protect(router, state, vec![], "incubators")
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "Incubators of the caller", body = Vec<Incubator>),
        (status = UNAUTHORIZED, description = "No caller identity")
    ),
    tag = "incubators"
)]
pub async fn list_incubators(
    State(state): State<AppState>,
    user: CurrentUser,
) -> Result<Json<Vec<Incubator>>, BusinessError> {
    Ok(Json(services::list_by_user(&state.db, user.0).await?))
}

#[utoipa::path(
    post,
    path = "/",
    request_body = IncubatorCreate,
    responses(
        (status = CREATED, description = "Incubator and its trays", body = IncubatorWithTrays),
        (status = BAD_REQUEST, description = "Invalid tray count, capacity or floor base")
    ),
    tag = "incubators",
    summary = "Create an incubator with its trays"
)]
pub async fn create_incubator(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(payload): Json<IncubatorCreate>,
) -> Result<(StatusCode, Json<IncubatorWithTrays>), BusinessError> {
    let created = services::create_incubator_with_trays(&state.db, user.0, payload).await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Incubator ID")),
    responses(
        (status = OK, description = "Incubator with trays ordered by floor", body = IncubatorWithTrays),
        (status = NOT_FOUND, description = "Unknown incubator or owned by someone else")
    ),
    tag = "incubators"
)]
pub async fn get_incubator(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<IncubatorWithTrays>, BusinessError> {
    services::get_with_trays(&state.db, id)
        .await?
        .filter(|found| found.incubator.user_id == user.0)
        .map(Json)
        .ok_or_else(|| crate::not_found!("incubator", id))
}

#[utoipa::path(
    patch,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Incubator ID")),
    request_body = IncubatorUpdate,
    responses(
        (status = OK, description = "Updated incubator", body = Incubator),
        (status = NOT_FOUND, description = "Unknown incubator or owned by someone else")
    ),
    tag = "incubators"
)]
pub async fn update_incubator(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(patch): Json<IncubatorUpdate>,
) -> Result<Json<Incubator>, BusinessError> {
    services::get_owned(&state.db, id, user.0).await?;
    Ok(Json(services::update(&state.db, id, patch).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    params(("id" = Uuid, Path, description = "Incubator ID")),
    responses(
        (status = NO_CONTENT, description = "Incubator and its trays deleted"),
        (status = NOT_FOUND, description = "Unknown incubator or owned by someone else"),
        (status = CONFLICT, description = "A tray still holds batches")
    ),
    tag = "incubators"
)]
pub async fn delete_incubator(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, BusinessError> {
    services::get_owned(&state.db, id, user.0).await?;
    services::remove(&state.db, id).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/{id}/trays",
    params(("id" = Uuid, Path, description = "Incubator ID")),
    responses(
        (status = OK, description = "Trays ordered by floor", body = Vec<Tray>),
        (status = NOT_FOUND, description = "Unknown incubator or owned by someone else")
    ),
    tag = "trays"
)]
pub async fn list_incubator_trays(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> Result<Json<Vec<Tray>>, BusinessError> {
    services::get_owned(&state.db, id, user.0).await?;
    Ok(Json(trays::list_by_incubator(&state.db, id).await?))
}

#[utoipa::path(
    post,
    path = "/{id}/trays",
    params(("id" = Uuid, Path, description = "Incubator ID")),
    request_body = TrayCreateBody,
    responses(
        (status = CREATED, description = "Tray added", body = Tray),
        (status = NOT_FOUND, description = "Unknown incubator or owned by someone else"),
        (status = CONFLICT, description = "The floor is already taken")
    ),
    tag = "trays"
)]
pub async fn create_incubator_tray(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    Json(body): Json<TrayCreateBody>,
) -> Result<(StatusCode, Json<Tray>), BusinessError> {
    services::get_owned(&state.db, id, user.0).await?;
    let tray = trays::create(&state.db, body.for_incubator(id)).await?;
    Ok((StatusCode::CREATED, Json(tray)))
}
