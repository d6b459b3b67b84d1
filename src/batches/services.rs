use super::models::{ActiveModel, BatchCreate, BatchStatus, Column, Entity, Model};
use crate::common::errors::{BusinessResult, DbErrorExt};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, DbErr, EntityTrait, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

const RESOURCE: &str = "batch";

fn validate_batch(payload: &BatchCreate) -> BusinessResult<()> {
    if payload.eggs_qty <= 0 {
        return Err(crate::validation_error!(
            "eggs_qty",
            "must be a positive integer"
        ));
    }
    if payload.expected_hatch_at < payload.start_at {
        return Err(crate::validation_error!(
            "expected_hatch_at",
            "must not precede start_at"
        ));
    }
    Ok(())
}

/// Batches on one tray, newest first
pub async fn list_by_tray(db: &DatabaseConnection, tray_id: Uuid) -> BusinessResult<Vec<Model>> {
    Entity::find()
        .filter(Column::TrayId.eq(tray_id))
        .order_by_desc(Column::CreatedAt)
        .all(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

pub async fn get(db: &DatabaseConnection, batch_id: Uuid) -> BusinessResult<Option<Model>> {
    Entity::find_by_id(batch_id)
        .one(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))
}

/// New batches always start out `incubating`
pub async fn create(db: &DatabaseConnection, payload: BatchCreate) -> BusinessResult<Model> {
    validate_batch(&payload)?;

    let batch = ActiveModel {
        id: Set(Uuid::new_v4()),
        tray_id: Set(payload.tray_id),
        species_id: Set(payload.species_id),
        eggs_qty: Set(payload.eggs_qty),
        start_at: Set(payload.start_at),
        expected_hatch_at: Set(payload.expected_hatch_at),
        status: Set(BatchStatus::Incubating),
        notes: Set(payload.notes),
        created_at: Set(chrono::Utc::now()),
    }
    .insert(db)
    .await
    .map_err(|e| e.to_business_error(RESOURCE))?;

    tracing::info!(batch_id = %batch.id, tray_id = %batch.tray_id, species_id = %batch.species_id, "batch created");
    Ok(batch)
}

/// Moves the batch to `status`. Any status may follow any other.
pub async fn set_status(
    db: &DatabaseConnection,
    batch_id: Uuid,
    status: BatchStatus,
) -> BusinessResult<Model> {
    let active = ActiveModel {
        id: Set(batch_id),
        status: Set(status),
        ..Default::default()
    };

    let updated = active.update(db).await.map_err(|e| match e {
        DbErr::RecordNotUpdated | DbErr::RecordNotFound(_) => crate::not_found!(RESOURCE, batch_id),
        other => other.to_business_error(RESOURCE),
    })?;

    tracing::info!(%batch_id, status = ?updated.status, "batch status changed");
    Ok(updated)
}

pub async fn remove(db: &DatabaseConnection, batch_id: Uuid) -> BusinessResult<()> {
    let res = Entity::delete_by_id(batch_id)
        .exec(db)
        .await
        .map_err(|e| e.to_business_error(RESOURCE))?;

    if res.rows_affected == 0 {
        return Err(crate::not_found!(RESOURCE, batch_id));
    }
    tracing::info!(%batch_id, "batch removed");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::BusinessError;
    use crate::config::test_helpers::setup_test_db;
    use crate::incubators::models::IncubatorCreate;
    use crate::incubators::services as incubators;
    use crate::species::models as species;
    use crate::species::services as species_services;
    use crate::trays::services as trays;
    use chrono::{Days, NaiveDate};
    use rust_decimal::Decimal;

    fn chicken() -> species::Model {
        species::Model {
            id: "chicken".to_string(),
            name: "Chicken".to_string(),
            incubation_days: 21,
            temp_min: Decimal::new(375, 1),
            temp_max: Decimal::new(380, 1),
            humidity_min: Decimal::from(45),
            humidity_max: Decimal::from(55),
        }
    }

    fn march_first() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 1).unwrap()
    }

    fn batch_on(tray_id: Uuid, eggs_qty: i32) -> BatchCreate {
        BatchCreate {
            tray_id,
            species_id: "chicken".to_string(),
            eggs_qty,
            start_at: march_first(),
            expected_hatch_at: march_first() + Days::new(21),
            notes: None,
        }
    }

    /// One incubator with two trays and the chicken species
    async fn seeded(db: &DatabaseConnection) -> Vec<Uuid> {
        species_services::upsert(db, chicken()).await.unwrap();
        incubators::create_incubator_with_trays(
            db,
            Uuid::new_v4(),
            IncubatorCreate {
                model: Some("Test".to_string()),
                trays_amt: 2,
                capacity_per_tray: 24,
                position: None,
                floor_base: None,
            },
        )
        .await
        .unwrap()
        .trays
        .iter()
        .map(|t| t.id)
        .collect()
    }

    #[tokio::test]
    async fn test_chicken_batch_lifecycle() {
        let db = setup_test_db().await;
        let tray_ids = seeded(&db).await;

        let mut payload = batch_on(tray_ids[0], 24);
        payload.notes = Some("first clutch".to_string());
        let batch = create(&db, payload).await.unwrap();
        assert_eq!(batch.status, BatchStatus::Incubating);
        assert_eq!(batch.eggs_qty, 24);
        assert_eq!(batch.expected_hatch_at, NaiveDate::from_ymd_opt(2025, 3, 22).unwrap());
        assert_eq!(batch.notes.as_deref(), Some("first clutch"));

        let listed = list_by_tray(&db, tray_ids[0]).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, batch.id);
        assert!(list_by_tray(&db, tray_ids[1]).await.unwrap().is_empty());

        let hatched = set_status(&db, batch.id, BatchStatus::Hatched).await.unwrap();
        assert_eq!(hatched.status, BatchStatus::Hatched);
        assert_eq!(hatched.eggs_qty, 24);

        let reopened = set_status(&db, batch.id, BatchStatus::Incubating).await.unwrap();
        assert_eq!(reopened.status, BatchStatus::Incubating);

        // Tray deletion is blocked until the batch goes away
        assert!(matches!(
            trays::remove(&db, tray_ids[0]).await.unwrap_err(),
            BusinessError::ReferenceViolation { .. }
        ));
        remove(&db, batch.id).await.unwrap();
        assert!(get(&db, batch.id).await.unwrap().is_none());
        trays::remove(&db, tray_ids[0]).await.unwrap();
    }

    #[tokio::test]
    async fn test_set_status_on_unknown_batch_is_not_found() {
        let db = setup_test_db().await;
        let missing = Uuid::new_v4();

        let err = set_status(&db, missing, BatchStatus::Failed).await.unwrap_err();
        assert_eq!(err, crate::not_found!("batch", missing));
    }

    #[tokio::test]
    async fn test_create_validates_quantity_and_dates() {
        let db = setup_test_db().await;
        let tray_ids = seeded(&db).await;

        let err = create(&db, batch_on(tray_ids[0], 0)).await.unwrap_err();
        assert!(matches!(err, BusinessError::ValidationError { ref field, .. } if field == "eggs_qty"));

        let mut backwards = batch_on(tray_ids[0], 5);
        backwards.expected_hatch_at = march_first() - Days::new(1);
        let err = create(&db, backwards).await.unwrap_err();
        assert!(
            matches!(err, BusinessError::ValidationError { ref field, .. } if field == "expected_hatch_at")
        );
    }

    #[tokio::test]
    async fn test_create_rejects_unknown_tray_or_species() {
        let db = setup_test_db().await;
        let tray_ids = seeded(&db).await;

        let err = create(&db, batch_on(Uuid::new_v4(), 5)).await.unwrap_err();
        assert!(matches!(err, BusinessError::ReferenceViolation { .. }));

        let mut unknown_species = batch_on(tray_ids[0], 5);
        unknown_species.species_id = "emu".to_string();
        let err = create(&db, unknown_species).await.unwrap_err();
        assert!(matches!(err, BusinessError::ReferenceViolation { .. }));
    }

    #[tokio::test]
    async fn test_remove_unknown_batch_is_not_found() {
        let db = setup_test_db().await;
        assert!(matches!(
            remove(&db, Uuid::new_v4()).await.unwrap_err(),
            BusinessError::NotFound { .. }
        ));
    }
}
