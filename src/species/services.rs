use super::models::{ActiveModel, Column, Entity, Model};
use crate::common::errors::{BusinessResult, DbErrorExt};
use sea_orm::sea_query::OnConflict;
use sea_orm::{DatabaseConnection, EntityTrait, IntoActiveModel, QueryOrder};

const RESOURCE: &str = "species";

fn validate_species(species: &Model) -> BusinessResult<()> {
    if species.id.trim().is_empty() {
        return Err(crate::validation_error!("id", "must not be empty"));
    }
    if species.name.trim().is_empty() {
        return Err(crate::validation_error!("name", "must not be empty"));
    }
    if species.incubation_days <= 0 {
        return Err(crate::validation_error!(
            "incubation_days",
            "must be a positive integer"
        ));
    }
    if species.temp_min > species.temp_max {
        return Err(crate::validation_error!(
            "temp_min",
            "must not exceed temp_max"
        ));
    }
    if species.humidity_min > species.humidity_max {
        return Err(crate::validation_error!(
            "humidity_min",
            "must not exceed humidity_max"
        ));
    }
    Ok(())
}

/// All species ordered by name
pub async fn list(db: &DatabaseConnection) -> BusinessResult<Vec<Model>> {
    Entity::find()
        .order_by_asc(Column::Name)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

pub async fn get(db: &DatabaseConnection, id: &str) -> BusinessResult<Option<Model>> {
    Entity::find_by_id(id.to_string())
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

/// Inserts the species, or overwrites every non-key field of the row with the same id
pub async fn upsert(db: &DatabaseConnection, species: Model) -> BusinessResult<Model> {
    validate_species(&species)?;
    let id = species.id.clone();

    let active: ActiveModel = species.into_active_model();
    Entity::insert(active)
        .on_conflict(
            OnConflict::column(Column::Id)
                .update_columns([
                    Column::Name,
                    Column::IncubationDays,
                    Column::TempMin,
                    Column::TempMax,
                    Column::HumidityMin,
                    Column::HumidityMax,
                ])
                .to_owned(),
        )
        .exec_without_returning(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(species_id = %id, "species upserted");

    get(db, &id)
        .await?
        .ok_or_else(|| crate::not_found!(RESOURCE, id))
}
