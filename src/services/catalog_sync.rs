use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{error, info, instrument};
use uuid::Uuid;
use validator::Validate;

use crate::{
    config::SyncConfig,
    db::{with_transaction, DbPool},
    dto::{BrandChanges, ProductChanges, StrainChanges, VariantChanges},
    entities::product_template::SyncSource,
    errors::ServiceError,
    events::{Event, EventSender},
    repositories::{BrandRepository, StrainRepository, VariantDefaults, VariantRepository},
    services::{
        products::{product_event, upsert_product, variant_event},
        publish,
        upsert::{
            upsert, BrandName, DutchieProductId, NaturalKey, SkuLocation, StrainName, UpsertOutcome,
        },
    },
};

/// One inventory record from Dutchie, already mapped onto catalog payloads.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct InventoryItem {
    pub sku: String,
    pub location_id: String,
    /// Dutchie product id; variants without one are stored unlinked
    #[serde(default)]
    pub product_id: Option<String>,
    #[serde(default)]
    pub brand_name: Option<String>,
    #[serde(default)]
    pub strain_name: Option<String>,

    #[serde(default)]
    #[validate]
    pub brand: BrandChanges,
    #[serde(default)]
    #[validate]
    pub strain: StrainChanges,
    #[serde(default)]
    #[validate]
    pub product: ProductChanges,
    #[serde(default)]
    #[validate]
    pub variant: VariantChanges,
}

impl InventoryItem {
    /// Checks every natural key the item carries, so a bad key fails before any write.
    pub fn validate_keys(&self) -> Result<(), ServiceError> {
        SkuLocation::new(self.sku.as_str(), self.location_id.as_str()).validate()?;
        if let Some(id) = &self.product_id {
            DutchieProductId::new(id.as_str()).validate()?;
        }
        if let Some(name) = &self.brand_name {
            BrandName::new(name.as_str()).validate()?;
        }
        if let Some(name) = &self.strain_name {
            StrainName::new(name.as_str()).validate()?;
        }
        Ok(())
    }
}

/// Id of a record touched by a sync, and whether it was created.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct SyncedRecord {
    pub id: Uuid,
    pub outcome: UpsertOutcome,
}

/// Records touched while syncing one inventory item.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SyncOutcome {
    pub brand: Option<SyncedRecord>,
    pub strain: Option<SyncedRecord>,
    pub product: Option<SyncedRecord>,
    pub variant: SyncedRecord,
    #[serde(skip)]
    events: Vec<Event>,
}

impl SyncOutcome {
    /// Number of records created, out of all records touched
    pub fn created_count(&self) -> usize {
        [self.brand, self.strain, self.product, Some(self.variant)]
            .into_iter()
            .flatten()
            .filter(|r| r.outcome == UpsertOutcome::Created)
            .count()
    }
}

/// Upserts brand, strain, product and variant for one inventory record in one transaction.
#[derive(Clone)]
pub struct CatalogSync {
    db_pool: Arc<DbPool>,
    event_sender: EventSender,
    variant_defaults: VariantDefaults,
    source: SyncSource,
}

impl CatalogSync {
    pub fn new(db_pool: Arc<DbPool>, event_sender: EventSender, config: &SyncConfig) -> Self {
        Self {
            db_pool,
            event_sender,
            variant_defaults: VariantDefaults::from(config),
            source: config.source,
        }
    }

    /// Brand, then strain, then product, then variant; every link is resolved before use.
    #[instrument(skip(self, item), fields(sku = %item.sku, location = %item.location_id))]
    pub async fn upsert_inventory_item(
        &self,
        item: InventoryItem,
    ) -> Result<SyncOutcome, ServiceError> {
        item.validate()?;
        item.validate_keys()?;
        let defaults = self.variant_defaults;
        let source = self.source;

        let outcome = with_transaction(&self.db_pool, move |txn| {
            Box::pin(async move {
                let now = Utc::now();
                let InventoryItem {
                    sku,
                    location_id,
                    product_id,
                    brand_name,
                    strain_name,
                    brand,
                    strain,
                    mut product,
                    mut variant,
                } = item;
                let mut events = Vec::new();

                let brand = match brand_name {
                    Some(name) => {
                        let resolved =
                            upsert(&BrandRepository::new(txn), &BrandName::new(name), brand)
                                .await?;
                        events.push(if resolved.created() {
                            Event::BrandCreated(resolved.record.id)
                        } else {
                            Event::BrandUpdated(resolved.record.id)
                        });
                        Some(SyncedRecord {
                            id: resolved.record.id,
                            outcome: resolved.outcome,
                        })
                    }
                    None => None,
                };

                let strain = match strain_name {
                    Some(name) => {
                        let resolved =
                            upsert(&StrainRepository::new(txn), &StrainName::new(name), strain)
                                .await?;
                        events.push(if resolved.created() {
                            Event::StrainCreated(resolved.record.id)
                        } else {
                            Event::StrainUpdated(resolved.record.id)
                        });
                        Some(SyncedRecord {
                            id: resolved.record.id,
                            outcome: resolved.outcome,
                        })
                    }
                    None => None,
                };

                let product = match product_id {
                    Some(dutchie_id) => {
                        if let Some(brand) = &brand {
                            product.brand_id = Some(brand.id);
                        }
                        if let Some(strain) = &strain {
                            product.strain_id = Some(strain.id);
                        }
                        product.synced_at = Some(now);
                        product.sync_source.get_or_insert(source);

                        let resolved =
                            upsert_product(txn, &DutchieProductId::new(dutchie_id), product)
                                .await?;
                        events.push(product_event(&resolved.record, resolved.outcome));
                        Some(SyncedRecord {
                            id: resolved.record.id,
                            outcome: resolved.outcome,
                        })
                    }
                    None => None,
                };

                if let Some(product) = &product {
                    variant.product_id = Some(product.id);
                }
                variant.synced_at = Some(now);
                let resolved = upsert(
                    &VariantRepository::with_defaults(txn, defaults),
                    &SkuLocation::new(sku, location_id),
                    variant,
                )
                .await?;
                events.push(variant_event(&resolved.record, resolved.outcome));

                Ok(SyncOutcome {
                    brand,
                    strain,
                    product,
                    variant: SyncedRecord {
                        id: resolved.record.id,
                        outcome: resolved.outcome,
                    },
                    events,
                })
            })
        })
        .await
        .map_err(|e| {
            error!(error = %e, code = e.code(), "Inventory item sync failed");
            e
        })?;

        for event in outcome.events.iter().cloned() {
            publish(&self.event_sender, event).await?;
        }
        info!(
            variant_id = %outcome.variant.id,
            created = outcome.created_count(),
            "Inventory item synced"
        );

        Ok(outcome)
    }

    /// Syncs records one at a time, stopping at the first failure.
    #[instrument(skip(self, items))]
    pub async fn upsert_inventory_items(
        &self,
        items: Vec<InventoryItem>,
    ) -> Result<Vec<SyncOutcome>, ServiceError> {
        let mut outcomes = Vec::with_capacity(items.len());
        for item in items {
            outcomes.push(self.upsert_inventory_item(item).await?);
        }
        Ok(outcomes)
    }
}
