use crate::common::errors::{BusinessResult, DbErrorExt};
use sea_orm::{DatabaseTransaction, TransactionTrait};
use std::future::Future;
use std::pin::Pin;

/// Unit of work run by [`with_transaction`]. Borrows the transaction for the
/// duration of the returned future.
pub type TxFuture<'c, T> = Pin<Box<dyn Future<Output = BusinessResult<T>> + Send + 'c>>;

/// Runs `work` inside BEGIN/COMMIT on a single pooled connection.
///
/// Any error from `work` triggers an explicit ROLLBACK before it is returned
/// unchanged. The connection goes back to the pool on both paths; if the
/// rollback itself fails, dropping the transaction still rolls it back.
pub async fn with_transaction<C, T, F>(db: &C, work: F) -> BusinessResult<T>
where
    C: TransactionTrait,
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> TxFuture<'c, T>,
{
    let txn = db
        .begin()
        .await
        .map_err(|e| e.to_business_error("transaction"))?;

    match work(&txn).await {
        Ok(value) => {
            txn.commit()
                .await
                .map_err(|e| e.to_business_error("transaction"))?;
            Ok(value)
        }
        Err(err) => {
            tracing::warn!(error = %err, "rolling back transaction");
            if let Err(rollback_err) = txn.rollback().await {
                tracing::error!(error = %rollback_err, "rollback failed");
            }
            Err(err)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::errors::BusinessError;
    use crate::config::test_helpers::setup_test_db;
    use crate::species::models as species;
    use rust_decimal::Decimal;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    fn quail() -> species::ActiveModel {
        species::ActiveModel {
            id: Set("quail".to_string()),
            name: Set("Quail".to_string()),
            incubation_days: Set(17),
            temp_min: Set(Decimal::new(375, 1)),
            temp_max: Set(Decimal::new(380, 1)),
            humidity_min: Set(Decimal::from(45)),
            humidity_max: Set(Decimal::from(55)),
        }
    }

    #[tokio::test]
    async fn test_commit_persists_work() {
        let db = setup_test_db().await;

        let inserted = with_transaction(&db, |txn| {
            Box::pin(async move {
                quail()
                    .insert(txn)
                    .await
                    .map_err(|e| e.to_business_error("species"))
            })
        })
        .await
        .unwrap();

        assert_eq!(inserted.id, "quail");
        assert_eq!(species::Entity::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_error_rolls_back_and_is_returned_unchanged() {
        let db = setup_test_db().await;

        let result: BusinessResult<()> = with_transaction(&db, |txn| {
            Box::pin(async move {
                quail()
                    .insert(txn)
                    .await
                    .map_err(|e| e.to_business_error("species"))?;
                Err(crate::validation_error!("species", "forced failure"))
            })
        })
        .await;

        assert_eq!(
            result.unwrap_err(),
            BusinessError::ValidationError {
                field: "species".to_string(),
                message: "forced failure".to_string(),
            }
        );
        assert_eq!(species::Entity::find().count(&db).await.unwrap(), 0);
    }
}
