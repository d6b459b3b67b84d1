use super::models::{ActiveModel, Column, Entity, Model, TrayCreate, TrayUpdate};
use crate::common::errors::{BusinessResult, DbErrorExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

const RESOURCE: &str = "tray";

fn validate_capacity(capacity: i32) -> BusinessResult<()> {
    if capacity < 0 {
        return Err(crate::validation_error!(
            "capacity",
            "must be an integer >= 0"
        ));
    }
    Ok(())
}

/// Inserts one tray per entry of `floors` in a single statement, all with the
/// same capacity, and returns the incubator's trays ordered by floor.
pub(crate) async fn insert_floors<C: ConnectionTrait>(
    db: &C,
    incubator_id: Uuid,
    capacity: i32,
    floors: &[i32],
) -> BusinessResult<Vec<Model>> {
    let now = chrono::Utc::now();
    let rows = floors.iter().map(|&floor| ActiveModel {
        id: Set(Uuid::new_v4()),
        incubator_id: Set(incubator_id),
        capacity: Set(capacity),
        floor: Set(floor),
        created_at: Set(now),
    });

    Entity::insert_many(rows)
        .exec_without_returning(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    let mut trays = Entity::find()
        .filter(Column::IncubatorId.eq(incubator_id))
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;
    trays.sort_by_key(|tray| tray.floor);
    Ok(trays)
}

/// Trays of one incubator, lowest floor first
pub async fn list_by_incubator(
    db: &DatabaseConnection,
    incubator_id: Uuid,
) -> BusinessResult<Vec<Model>> {
    Entity::find()
        .filter(Column::IncubatorId.eq(incubator_id))
        .order_by_asc(Column::Floor)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

pub async fn get(db: &DatabaseConnection, tray_id: Uuid) -> BusinessResult<Option<Model>> {
    Entity::find_by_id(tray_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

/// Fails with `Duplicate` when the incubator already has a tray on that floor
pub async fn create(db: &DatabaseConnection, payload: TrayCreate) -> BusinessResult<Model> {
    validate_capacity(payload.capacity)?;

    let tray = ActiveModel {
        id: Set(Uuid::new_v4()),
        incubator_id: Set(payload.incubator_id),
        capacity: Set(payload.capacity),
        floor: Set(payload.floor),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(tray_id = %tray.id, incubator_id = %tray.incubator_id, floor = tray.floor, "tray created");
    Ok(tray)
}

pub async fn update(
    db: &DatabaseConnection,
    tray_id: Uuid,
    patch: TrayUpdate,
) -> BusinessResult<Model> {
    if let Some(capacity) = patch.capacity {
        validate_capacity(capacity)?;
    }

    let existing = get(db, tray_id)
        .await?
        .ok_or_else(|| crate::not_found!(RESOURCE, tray_id))?;

    let mut active = existing.clone().into_active_model();
    if let Some(capacity) = patch.capacity {
        active.capacity = Set(capacity);
    }
    if let Some(floor) = patch.floor {
        active.floor = Set(floor);
    }
    if !active.is_changed() {
        return Ok(existing);
    }

    let updated = active.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => crate::not_found!(RESOURCE, tray_id),
        other => other.to_business_error(RESOURCE),
    })?;

    tracing::info!(%tray_id, "tray updated");
    Ok(updated)
}

/// Fails with `ReferenceViolation` while batches still sit on the tray
pub async fn remove(db: &DatabaseConnection, tray_id: Uuid) -> BusinessResult<()> {
    let res = Entity::delete_by_id(tray_id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    match res.rows_affected {
        0 => Err(crate::not_found!(RESOURCE, tray_id)),
        _ => {
            tracing::info!(%tray_id, "tray removed");
            Ok(())
        }
    }
}
