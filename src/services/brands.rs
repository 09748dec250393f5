use std::sync::Arc;

use sea_orm::ConnectionTrait;
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{with_transaction, DbPool},
    dto::BrandChanges,
    entities::{BrandModel, ProductModel},
    errors::ServiceError,
    events::{Event, EventSender},
    repositories::{BrandRepository, ProductRepository},
    services::{
        publish,
        upsert::{upsert, BrandName, Upserted},
    },
};

/// Recounts the active products linked to a brand and stores the result.
pub(crate) async fn refresh_brand_product_count<C: ConnectionTrait>(
    db: &C,
    brand_id: Uuid,
) -> Result<i32, ServiceError> {
    let count = ProductRepository::new(db)
        .count_active_by_brand(brand_id)
        .await?;
    let count = i32::try_from(count).map_err(|_| {
        ServiceError::InternalError(format!("product count overflow for brand {}", brand_id))
    })?;
    BrandRepository::new(db)
        .set_product_count(brand_id, count)
        .await?;
    Ok(count)
}

/// Service for managing brands
#[derive(Clone)]
pub struct BrandService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
}

impl BrandService {
    /// Creates a new brand service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self {
            db_pool,
            event_sender,
        }
    }

    /// Creates a brand. An exact duplicate name fails with `ConstraintViolation`.
    #[instrument(skip(self))]
    pub async fn create_brand(&self, changes: BrandChanges) -> Result<BrandModel, ServiceError> {
        changes.validate()?;
        if changes.name.is_none() {
            return Err(ServiceError::ValidationError(
                "brand name is required".to_string(),
            ));
        }

        let brand = BrandRepository::new(&*self.db_pool)
            .insert(changes)
            .await
            .map_err(|e| {
                error!(error = %e, "Failed to create brand");
                e
            })?;

        publish(&self.event_sender, Event::BrandCreated(brand.id)).await?;
        info!(brand_id = %brand.id, name = %brand.name, "Brand created successfully");

        Ok(brand)
    }

    #[instrument(skip(self))]
    pub async fn update_brand(
        &self,
        id: Uuid,
        changes: BrandChanges,
    ) -> Result<BrandModel, ServiceError> {
        changes.validate()?;
        let repo = BrandRepository::new(&*self.db_pool);
        let brand = self.require(&repo, id).await?;
        let brand = repo.save_changes(brand, changes).await?;

        publish(&self.event_sender, Event::BrandUpdated(brand.id)).await?;
        info!(brand_id = %brand.id, "Brand updated successfully");

        Ok(brand)
    }

    #[instrument(skip(self))]
    pub async fn get_brand(&self, id: Uuid) -> Result<Option<BrandModel>, ServiceError> {
        BrandRepository::new(&*self.db_pool).find_by_id(id).await
    }

    /// Case-insensitive lookup by name
    #[instrument(skip(self))]
    pub async fn find_brand_by_name(&self, name: &str) -> Result<Option<BrandModel>, ServiceError> {
        BrandRepository::new(&*self.db_pool)
            .find_by_name_ci(name)
            .await
    }

    #[instrument(skip(self))]
    pub async fn list_brands(&self, active_only: bool) -> Result<Vec<BrandModel>, ServiceError> {
        BrandRepository::new(&*self.db_pool)
            .find_all(active_only)
            .await
    }

    #[instrument(skip(self))]
    pub async fn activate_brand(&self, id: Uuid) -> Result<BrandModel, ServiceError> {
        self.set_active(id, true).await
    }

    #[instrument(skip(self))]
    pub async fn deactivate_brand(&self, id: Uuid) -> Result<BrandModel, ServiceError> {
        self.set_active(id, false).await
    }

    /// Finds a brand by name ignoring case and applies `changes`, or creates it.
    #[instrument(skip(self, changes))]
    pub async fn find_or_create_brand_by_name(
        &self,
        name: &str,
        changes: BrandChanges,
    ) -> Result<Upserted<BrandModel>, ServiceError> {
        changes.validate()?;
        let key = BrandName::new(name);

        let upserted = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let repo = BrandRepository::new(txn);
                upsert(&repo, &key, changes).await
            })
        })
        .await?;

        let event = if upserted.created() {
            Event::BrandCreated(upserted.record.id)
        } else {
            Event::BrandUpdated(upserted.record.id)
        };
        publish(&self.event_sender, event).await?;
        info!(brand_id = %upserted.record.id, outcome = %upserted.outcome, "Brand resolved by name");

        Ok(upserted)
    }

    /// Products linked to the brand, ordered by name
    #[instrument(skip(self))]
    pub async fn brand_products(&self, id: Uuid) -> Result<Vec<ProductModel>, ServiceError> {
        self.require(&BrandRepository::new(&*self.db_pool), id)
            .await?;
        ProductRepository::new(&*self.db_pool)
            .find_by_brand(id)
            .await
    }

    #[instrument(skip(self))]
    pub async fn recompute_brand_product_count(&self, id: Uuid) -> Result<i32, ServiceError> {
        self.require(&BrandRepository::new(&*self.db_pool), id)
            .await?;
        refresh_brand_product_count(&*self.db_pool, id).await
    }

    async fn set_active(&self, id: Uuid, active: bool) -> Result<BrandModel, ServiceError> {
        let repo = BrandRepository::new(&*self.db_pool);
        let brand = self.require(&repo, id).await?;
        let brand = repo.set_active(brand, active).await?;

        publish(&self.event_sender, Event::BrandUpdated(brand.id)).await?;
        info!(brand_id = %brand.id, active, "Brand active flag changed");

        Ok(brand)
    }

    async fn require<C: ConnectionTrait>(
        &self,
        repo: &BrandRepository<'_, C>,
        id: Uuid,
    ) -> Result<BrandModel, ServiceError> {
        repo.find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::NotFound(format!("Brand with ID {} not found", id)))
    }
}
