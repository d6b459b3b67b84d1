use super::models::{
    ActiveModel, Column, Entity, IncubatorCreate, IncubatorUpdate, IncubatorWithTrays, Model,
};
use crate::common::errors::{BusinessResult, DbErrorExt};
use crate::common::transaction::with_transaction;
use crate::trays::models as trays;
use crate::trays::services::insert_floors;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    IntoActiveModel, ModelTrait, QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

const RESOURCE: &str = "incubator";

/// Upper bound on `trays_amt`. Keeps the tray insert of one incubator within
/// the bind parameter limits of every supported backend.
pub const MAX_TRAYS_PER_INCUBATOR: i32 = 1000;

/// Floor numbers of a freshly created incubator: `trays_amt` contiguous
/// values starting at `floor_base`.
fn floors_for(payload: &IncubatorCreate) -> BusinessResult<Vec<i32>> {
    if payload.trays_amt <= 0 {
        return Err(crate::validation_error!(
            "trays_amt",
            "must be a positive integer"
        ));
    }
    if payload.trays_amt > MAX_TRAYS_PER_INCUBATOR {
        return Err(crate::validation_error!(
            "trays_amt",
            format!("must not exceed {MAX_TRAYS_PER_INCUBATOR}")
        ));
    }
    if payload.capacity_per_tray < 0 {
        return Err(crate::validation_error!(
            "capacity_per_tray",
            "must be an integer >= 0"
        ));
    }

    let floor_base = payload.floor_base.unwrap_or(1);
    if !matches!(floor_base, 0 | 1) {
        return Err(crate::validation_error!("floor_base", "must be 0 or 1"));
    }

    let floor_end = floor_base
        .checked_add(payload.trays_amt)
        .ok_or_else(|| crate::validation_error!("trays_amt", "is too large"))?;
    Ok((floor_base..floor_end).collect())
}

pub(crate) async fn insert_incubator<C: ConnectionTrait>(
    db: &C,
    user_id: Uuid,
    payload: &IncubatorCreate,
) -> BusinessResult<Model> {
    ActiveModel {
        id: Set(Uuid::new_v4()),
        user_id: Set(user_id),
        model_name: Set(payload.model.clone()),
        trays_amt: Set(Some(payload.trays_amt)),
        position: Set(payload.position.unwrap_or(0)),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))
}

/// Creates an incubator for `user_id` and its `trays_amt` trays in one
/// transaction. Nothing is persisted if any insert fails.
pub async fn create_incubator_with_trays(
    db: &DatabaseConnection,
    user_id: Uuid,
    payload: IncubatorCreate,
) -> BusinessResult<IncubatorWithTrays> {
    let floors = floors_for(&payload)?;

    let created = with_transaction(db, move |txn| {
        Box::pin(async move {
            let incubator = insert_incubator(txn, user_id, &payload).await?;
            let trays =
                insert_floors(txn, incubator.id, payload.capacity_per_tray, &floors).await?;
            Ok(IncubatorWithTrays { incubator, trays })
        })
    })
    .await?;

    tracing::info!(
        incubator_id = %created.incubator.id,
        %user_id,
        trays = created.trays.len(),
        "incubator created"
    );
    Ok(created)
}

/// Incubators owned by `user_id`, by position then newest first
pub async fn list_by_user(db: &DatabaseConnection, user_id: Uuid) -> BusinessResult<Vec<Model>> {
    Entity::find()
        .filter(Column::UserId.eq(user_id))
        .order_by_asc(Column::Position)
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

pub async fn get_with_trays(
    db: &DatabaseConnection,
    incubator_id: Uuid,
) -> BusinessResult<Option<IncubatorWithTrays>> {
    let Some(incubator) = Entity::find_by_id(incubator_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
    else {
        tracing::debug!(%incubator_id, "incubator not found");
        return Ok(None);
    };

    let trays = incubator
        .find_related(trays::Entity)
        .order_by_asc(trays::Column::Floor)
        .all(db)
        .await
        .map_err(|e| e.to_business_error("tray"))?;

    Ok(Some(IncubatorWithTrays { incubator, trays }))
}

/// The incubator, provided it belongs to `user_id`. Someone else's incubator
/// is reported as missing.
pub async fn get_owned(
    db: &DatabaseConnection,
    incubator_id: Uuid,
    user_id: Uuid,
) -> BusinessResult<Model> {
    Entity::find_by_id(incubator_id)
        .filter(Column::UserId.eq(user_id))
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, incubator_id))
}

pub async fn update(
    db: &DatabaseConnection,
    incubator_id: Uuid,
    patch: IncubatorUpdate,
) -> BusinessResult<Model> {
    let existing = Entity::find_by_id(incubator_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?
        .ok_or_else(|| crate::not_found!(RESOURCE, incubator_id))?;

    let mut active = existing.clone().into_active_model();
    if let Some(model_name) = patch.model {
        active.model_name = Set(model_name);
    }
    if let Some(position) = patch.position {
        active.position = Set(position);
    }
    if !active.is_changed() {
        return Ok(existing);
    }

    let updated = active.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated => crate::not_found!(RESOURCE, incubator_id),
        other => other.to_business_error(RESOURCE),
    })?;

    tracing::info!(%incubator_id, "incubator updated");
    Ok(updated)
}

/// Deletes the incubator and, by cascade, its trays. Rejected with
/// `ReferenceViolation` while any of those trays holds batches.
pub async fn remove(db: &DatabaseConnection, incubator_id: Uuid) -> BusinessResult<()> {
    let res = Entity::delete_by_id(incubator_id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    if res.rows_affected == 0 {
        return Err(crate::not_found!(RESOURCE, incubator_id));
    }
    tracing::info!(%incubator_id, "incubator removed");
    Ok(())
}
