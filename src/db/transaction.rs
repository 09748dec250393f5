/*!
 * Transaction Helper Utilities
 *
 * Runs a unit of work inside a database transaction: commit on `Ok`, rollback on `Err`.
 */

use metrics::counter;
use sea_orm::{DatabaseConnection, DatabaseTransaction, TransactionError, TransactionTrait};
use std::future::Future;
use std::pin::Pin;
use tracing::warn;

use crate::errors::ServiceError;

/// Type alias for boxed future used in transactions
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Execute a function within a database transaction
///
/// The closure's error is returned unchanged, so `ConstraintViolation` and friends
/// survive the rollback.
///
/// # Example
///
/// ```rust,ignore
/// let brand = with_transaction(&db, move |txn| {
///     Box::pin(async move {
///         let repo = BrandRepository::new(txn);
///         upsert(&repo, &BrandName::new("Kiva"), BrandChanges::default()).await
///     })
/// })
/// .await?;
/// ```
pub async fn with_transaction<F, T>(db: &DatabaseConnection, f: F) -> Result<T, ServiceError>
where
    F: for<'c> FnOnce(&'c DatabaseTransaction) -> BoxFuture<'c, Result<T, ServiceError>> + Send,
    T: Send,
{
    db.transaction::<F, T, ServiceError>(f)
        .await
        .map_err(|e| match e {
            TransactionError::Connection(db_err) => {
                counter!("mint_cannabis.db.transaction.connection_errors", 1);
                ServiceError::from(db_err)
            }
            TransactionError::Transaction(err) => {
                counter!("mint_cannabis.db.transaction.rolled_back", 1);
                warn!(code = err.code(), "Transaction rolled back: {}", err);
                err
            }
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{establish_connection_with_config, run_migrations, DbConfig};
    use crate::entities::brand::{self, Entity as Brand};
    use assert_matches::assert_matches;
    use sea_orm::{ActiveModelTrait, EntityTrait, PaginatorTrait, Set};

    async fn setup() -> DatabaseConnection {
        let db = establish_connection_with_config(&DbConfig::in_memory())
            .await
            .unwrap();
        run_migrations(&db).await.unwrap();
        db
    }

    #[tokio::test]
    async fn commits_on_success() {
        let db = setup().await;

        let name = with_transaction(&db, |txn| {
            Box::pin(async move {
                let brand = brand::ActiveModel {
                    name: Set("Kiva".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                Ok(brand.name)
            })
        })
        .await
        .unwrap();

        assert_eq!(name, "Kiva");
        assert_eq!(Brand::find().count(&db).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn rolls_back_and_keeps_the_error() {
        let db = setup().await;

        let result: Result<(), _> = with_transaction(&db, |txn| {
            Box::pin(async move {
                brand::ActiveModel {
                    name: Set("Wyld".to_string()),
                    ..Default::default()
                }
                .insert(txn)
                .await?;
                Err(ServiceError::InvalidOperation("abort".into()))
            })
        })
        .await;

        assert_matches!(result, Err(ServiceError::InvalidOperation(msg)) if msg == "abort");
        assert_eq!(Brand::find().count(&db).await.unwrap(), 0);
    }
}
