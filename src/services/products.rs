use std::sync::Arc;

use sea_orm::ConnectionTrait;
use tracing::{error, info, instrument, warn};
use uuid::Uuid;
use validator::Validate;

use crate::{
    db::{with_transaction, DbPool},
    dto::{ProductChanges, VariantChanges},
    entities::{ProductModel, ProductVariantModel},
    errors::ServiceError,
    events::{Event, EventSender},
    repositories::{ProductRepository, VariantDefaults, VariantRepository},
    services::{
        brands::refresh_brand_product_count,
        publish,
        strains::refresh_strain_product_count,
        upsert::{
            upsert, upsert_with_previous, DutchieProductId, SkuLocation, UpsertOutcome, Upserted,
        },
    },
};

/// Refreshes the counters of every brand and strain a product was or is linked to.
pub(crate) async fn refresh_link_counts<C: ConnectionTrait>(
    db: &C,
    previous: Option<&ProductModel>,
    current: &ProductModel,
) -> Result<(), ServiceError> {
    let mut brand_ids: Vec<Uuid> = previous.and_then(|p| p.brand_id).into_iter().collect();
    let mut strain_ids: Vec<Uuid> = previous.and_then(|p| p.strain_id).into_iter().collect();
    brand_ids.extend(current.brand_id);
    strain_ids.extend(current.strain_id);
    brand_ids.dedup();
    strain_ids.dedup();

    for brand_id in brand_ids {
        refresh_brand_product_count(db, brand_id).await?;
    }
    for strain_id in strain_ids {
        refresh_strain_product_count(db, strain_id).await?;
    }
    Ok(())
}

/// Resolves a product by Dutchie id and keeps brand and strain counters in step.
pub(crate) async fn upsert_product<C: ConnectionTrait>(
    db: &C,
    key: &DutchieProductId,
    changes: ProductChanges,
) -> Result<Upserted<ProductModel>, ServiceError> {
    let repo = ProductRepository::new(db);
    let (upserted, previous) = upsert_with_previous(&repo, key, changes).await?;
    refresh_link_counts(db, previous.as_ref(), &upserted.record).await?;
    Ok(upserted)
}

pub(crate) fn product_event(product: &ProductModel, outcome: UpsertOutcome) -> Event {
    Event::ProductUpserted {
        product_id: product.id,
        dutchie_product_id: product.dutchie_product_id.clone(),
        outcome,
    }
}

pub(crate) fn variant_event(variant: &ProductVariantModel, outcome: UpsertOutcome) -> Event {
    Event::VariantUpserted {
        variant_id: variant.id,
        product_id: variant.product_id,
        outcome,
    }
}

/// Service for managing products and their variants
#[derive(Clone)]
pub struct ProductService {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    variant_defaults: VariantDefaults,
}

impl ProductService {
    /// Creates a new product service instance
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender) -> Self {
        Self::with_variant_defaults(db_pool, event_sender, VariantDefaults::default())
    }

    pub fn with_variant_defaults(
        db_pool: Arc<DbPool>,
        event_sender: EventSender,
        variant_defaults: VariantDefaults,
    ) -> Self {
        Self {
            db_pool,
            event_sender,
            variant_defaults,
        }
    }

    /// Finds a product by Dutchie id and applies `changes`, or creates it.
    #[instrument(skip(self, changes))]
    pub async fn find_or_create_product_by_dutchie_id(
        &self,
        dutchie_product_id: &str,
        changes: ProductChanges,
    ) -> Result<Upserted<ProductModel>, ServiceError> {
        changes.validate()?;
        let key = DutchieProductId::new(dutchie_product_id);

        let upserted = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move { upsert_product(txn, &key, changes).await })
        })
        .await?;

        publish(
            &self.event_sender,
            product_event(&upserted.record, upserted.outcome),
        )
        .await?;
        info!(product_id = %upserted.record.id, outcome = %upserted.outcome, "Product resolved by Dutchie id");

        Ok(upserted)
    }

    /// Creates a product directly. A name is required.
    #[instrument(skip(self, changes))]
    pub async fn create_product(&self, changes: ProductChanges) -> Result<ProductModel, ServiceError> {
        changes.validate()?;
        if changes.name.is_none() {
            return Err(ServiceError::ValidationError(
                "product name is required".to_string(),
            ));
        }

        let product = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let product = ProductRepository::new(txn).insert(changes).await?;
                refresh_link_counts(txn, None, &product).await?;
                Ok(product)
            })
        })
        .await
        .map_err(|e| {
            error!(error = %e, "Failed to create product");
            e
        })?;

        publish(&self.event_sender, product_event(&product, UpsertOutcome::Created)).await?;
        info!(product_id = %product.id, name = %product.name, "Product created successfully");

        Ok(product)
    }

    #[instrument(skip(self, changes))]
    pub async fn update_product(
        &self,
        id: Uuid,
        changes: ProductChanges,
    ) -> Result<ProductModel, ServiceError> {
        changes.validate()?;

        let product = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let repo = ProductRepository::new(txn);
                let previous = repo.find_by_id(id).await?.ok_or_else(|| {
                    ServiceError::NotFound(format!("Product with ID {} not found", id))
                })?;
                let product = repo.save_changes(previous.clone(), changes).await?;
                refresh_link_counts(txn, Some(&previous), &product).await?;
                Ok(product)
            })
        })
        .await?;

        publish(&self.event_sender, product_event(&product, UpsertOutcome::Updated)).await?;
        info!(product_id = %product.id, "Product updated successfully");

        Ok(product)
    }

    #[instrument(skip(self))]
    pub async fn get_product(&self, id: Uuid) -> Result<Option<ProductModel>, ServiceError> {
        ProductRepository::new(&*self.db_pool).find_by_id(id).await
    }

    #[instrument(skip(self))]
    pub async fn get_product_by_dutchie_id(
        &self,
        dutchie_product_id: &str,
    ) -> Result<Option<ProductModel>, ServiceError> {
        ProductRepository::new(&*self.db_pool)
            .find_by_dutchie_id(dutchie_product_id)
            .await
    }

    /// Finds a variant by (SKU, location) and applies `changes`, or creates it.
    #[instrument(skip(self, changes))]
    pub async fn find_or_create_variant_by_sku_location(
        &self,
        sku: &str,
        location_id: &str,
        changes: VariantChanges,
    ) -> Result<Upserted<ProductVariantModel>, ServiceError> {
        changes.validate()?;
        let key = SkuLocation::new(sku, location_id);
        let defaults = self.variant_defaults;

        let upserted = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let repo = VariantRepository::with_defaults(txn, defaults);
                upsert(&repo, &key, changes).await
            })
        })
        .await?;

        publish(
            &self.event_sender,
            variant_event(&upserted.record, upserted.outcome),
        )
        .await?;
        info!(variant_id = %upserted.record.id, outcome = %upserted.outcome, "Variant resolved by SKU and location");

        Ok(upserted)
    }

    /// Variants of a product, ordered by location then SKU
    #[instrument(skip(self))]
    pub async fn product_variants(
        &self,
        product_id: Uuid,
    ) -> Result<Vec<ProductVariantModel>, ServiceError> {
        if self.get_product(product_id).await?.is_none() {
            return Err(ServiceError::NotFound(format!(
                "Product with ID {} not found",
                product_id
            )));
        }
        VariantRepository::new(&*self.db_pool)
            .find_by_product(product_id)
            .await
    }

    #[instrument(skip(self))]
    pub async fn low_stock_variants(&self) -> Result<Vec<ProductVariantModel>, ServiceError> {
        VariantRepository::new(&*self.db_pool).find_low_stock().await
    }

    /// Publishes a `LowStockDetected` event for every low-stock variant and returns them.
    #[instrument(skip(self))]
    pub async fn mark_low_stock(&self) -> Result<Vec<ProductVariantModel>, ServiceError> {
        let variants = self.low_stock_variants().await?;

        for variant in &variants {
            let quantity_available = variant.quantity_available.unwrap_or_default();
            warn!(
                variant_id = %variant.id,
                %quantity_available,
                threshold = variant.low_stock_threshold,
                "Low stock detected"
            );
            publish(
                &self.event_sender,
                Event::LowStockDetected {
                    variant_id: variant.id,
                    dutchie_sku: variant.dutchie_sku.clone(),
                    dutchie_location_id: variant.dutchie_location_id.clone(),
                    quantity_available,
                    low_stock_threshold: variant.low_stock_threshold,
                },
            )
            .await?;
        }

        info!(count = variants.len(), "Low stock marking complete");
        Ok(variants)
    }
}
