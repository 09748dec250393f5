use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::config::SyncConfig;
use crate::dto::VariantChanges;
use crate::entities::product_variant::{
    ActiveModel as VariantActiveModel, Column, Entity as ProductVariant, Model,
    DEFAULT_LOW_STOCK_THRESHOLD, DEFAULT_REORDER_POINT,
};
use crate::errors::ServiceError;
use crate::repositories::{Repository, UpsertRepository};
use crate::services::upsert::{ensure_key_field, SkuLocation};

/// Stock levels given to variants created through the resolver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VariantDefaults {
    pub low_stock_threshold: i32,
    pub reorder_point: i32,
}

impl Default for VariantDefaults {
    fn default() -> Self {
        Self {
            low_stock_threshold: DEFAULT_LOW_STOCK_THRESHOLD,
            reorder_point: DEFAULT_REORDER_POINT,
        }
    }
}

impl From<&SyncConfig> for VariantDefaults {
    fn from(cfg: &SyncConfig) -> Self {
        Self {
            low_stock_threshold: cfg.low_stock_threshold,
            reorder_point: cfg.reorder_point,
        }
    }
}

/// Repository for product variant operations
#[derive(Debug)]
pub struct VariantRepository<'c, C> {
    db: &'c C,
    defaults: VariantDefaults,
}

impl<'c, C: ConnectionTrait> VariantRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self::with_defaults(db, VariantDefaults::default())
    }

    pub fn with_defaults(db: &'c C, defaults: VariantDefaults) -> Self {
        Self { db, defaults }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ServiceError> {
        Ok(ProductVariant::find_by_id(id).one(self.get_db()).await?)
    }

    /// Find the oldest variant with this SKU at this location
    pub async fn find_by_sku_location(
        &self,
        sku: &str,
        location_id: &str,
    ) -> Result<Option<Model>, ServiceError> {
        Ok(ProductVariant::find()
            .filter(Column::DutchieSku.eq(sku))
            .filter(Column::DutchieLocationId.eq(location_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(self.get_db())
            .await?)
    }

    pub async fn find_by_product(&self, product_id: Uuid) -> Result<Vec<Model>, ServiceError> {
        Ok(ProductVariant::find()
            .filter(Column::ProductId.eq(product_id))
            .order_by_asc(Column::DutchieLocationId)
            .order_by_asc(Column::DutchieSku)
            .all(self.get_db())
            .await?)
    }

    /// Variants at or below their low-stock threshold; a missing quantity counts as zero
    pub async fn find_low_stock(&self) -> Result<Vec<Model>, ServiceError> {
        let variants = ProductVariant::find()
            .order_by_asc(Column::DutchieLocationId)
            .order_by_asc(Column::DutchieSku)
            .all(self.get_db())
            .await?;
        Ok(variants.into_iter().filter(Model::is_low_stock).collect())
    }

    pub async fn save_changes(
        &self,
        variant: Model,
        changes: VariantChanges,
    ) -> Result<Model, ServiceError> {
        let mut model = variant.into_active_model();
        changes.apply(&mut model)?;
        Ok(model.update(self.get_db()).await?)
    }
}

impl<'c, C: ConnectionTrait> Repository for VariantRepository<'c, C> {
    type Connection = C;

    fn get_db(&self) -> &C {
        self.db
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> UpsertRepository for VariantRepository<'c, C> {
    type Key = SkuLocation;
    type Changes = VariantChanges;
    type Record = Model;

    fn check_key_fields(&self, key: &SkuLocation, changes: &VariantChanges) -> Result<(), ServiceError> {
        ensure_key_field(
            "product_variant",
            "dutchie_sku",
            &key.sku,
            changes.dutchie_sku.as_deref(),
        )?;
        ensure_key_field(
            "product_variant",
            "dutchie_location_id",
            &key.location_id,
            changes.dutchie_location_id.as_deref(),
        )
    }

    async fn find_by_key(&self, key: &SkuLocation) -> Result<Option<Model>, ServiceError> {
        self.find_by_sku_location(&key.sku, &key.location_id).await
    }

    async fn create(&self, key: &SkuLocation, changes: VariantChanges) -> Result<Model, ServiceError> {
        let mut model = VariantActiveModel {
            low_stock_threshold: Set(self.defaults.low_stock_threshold),
            reorder_point: Set(self.defaults.reorder_point),
            ..Default::default()
        };
        changes.apply(&mut model)?;
        model.dutchie_sku = Set(Some(key.sku.clone()));
        model.dutchie_location_id = Set(Some(key.location_id.clone()));
        Ok(model.insert(self.get_db()).await?)
    }

    async fn update(&self, record: Model, changes: VariantChanges) -> Result<Model, ServiceError> {
        self.save_changes(record, changes).await
    }
}
