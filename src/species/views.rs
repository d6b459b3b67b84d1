use super::models::{Model as Species, SpeciesUpsert};
use super::services;
use crate::common::auth::{Role, protect};
use crate::common::errors::BusinessError;
use crate::common::state::AppState;
use axum::extract::{Path, State};
use axum::response::Json;
use utoipa_axum::{router::OpenApiRouter, routes};

pub fn router(state: &AppState) -> OpenApiRouter {
    let read_router = OpenApiRouter::new()
        .routes(routes!(list_species))
        .routes(routes!(get_species))
        .with_state(state.clone());

    // Reference data is shared by every user, only administrators may change it
    let mutating_router = OpenApiRouter::new()
        .routes(routes!(upsert_species))
        .with_state(state.clone());

    protect(read_router, state, vec![], "species").merge(protect(
        mutating_router,
        state,
        vec![Role::Administrator],
        "species",
    ))
}

#[utoipa::path(
    get,
    path = "/",
    responses(
        (status = OK, description = "All species ordered by name", body = Vec<Species>)
    ),
    tag = "species"
)]
pub async fn list_species(
    State(state): State<AppState>,
) -> Result<Json<Vec<Species>>, BusinessError> {
    Ok(Json(services::list(&state.db).await?))
}

#[utoipa::path(
    get,
    path = "/{id}",
    params(("id" = String, Path, description = "Species ID, e.g. chicken")),
    responses(
        (status = OK, description = "Species", body = Species),
        (status = NOT_FOUND, description = "Unknown species")
    ),
    tag = "species"
)]
pub async fn get_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Species>, BusinessError> {
    services::get(&state.db, &id)
        .await?
        .map(Json)
        .ok_or_else(|| crate::not_found!("species", id))
}

#[utoipa::path(
    put,
    path = "/{id}",
    params(("id" = String, Path, description = "Species ID, e.g. chicken")),
    request_body = SpeciesUpsert,
    responses(
        (status = OK, description = "Stored species", body = Species),
        (status = BAD_REQUEST, description = "Empty name or inverted range")
    ),
    tag = "species",
    summary = "Create or replace a species"
)]
pub async fn upsert_species(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(body): Json<SpeciesUpsert>,
) -> Result<Json<Species>, BusinessError> {
    Ok(Json(services::upsert(&state.db, body.into_model(id)).await?))
}
