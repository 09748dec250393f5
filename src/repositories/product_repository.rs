use async_trait::async_trait;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, PaginatorTrait,
    QueryFilter, QueryOrder, Set,
};
use uuid::Uuid;

use crate::dto::ProductChanges;
use crate::entities::product_template::{
    ActiveModel as ProductActiveModel, Column, Entity as Product, Model,
};
use crate::errors::ServiceError;
use crate::repositories::{Repository, UpsertRepository};
use crate::services::upsert::{ensure_key_field, DutchieProductId};

/// Repository for product template operations
#[derive(Debug)]
pub struct ProductRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> ProductRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ServiceError> {
        Ok(Product::find_by_id(id).one(self.get_db()).await?)
    }

    /// Find the oldest product carrying this Dutchie product id
    pub async fn find_by_dutchie_id(&self, dutchie_id: &str) -> Result<Option<Model>, ServiceError> {
        Ok(Product::find()
            .filter(Column::DutchieProductId.eq(dutchie_id))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(self.get_db())
            .await?)
    }

    /// Products linked to a brand, ordered by name
    pub async fn find_by_brand(&self, brand_id: Uuid) -> Result<Vec<Model>, ServiceError> {
        Ok(Product::find()
            .filter(Column::BrandId.eq(brand_id))
            .order_by_asc(Column::Name)
            .all(self.get_db())
            .await?)
    }

    /// Products linked to a strain, ordered by name
    pub async fn find_by_strain(&self, strain_id: Uuid) -> Result<Vec<Model>, ServiceError> {
        Ok(Product::find()
            .filter(Column::StrainId.eq(strain_id))
            .order_by_asc(Column::Name)
            .all(self.get_db())
            .await?)
    }

    pub async fn count_active_by_brand(&self, brand_id: Uuid) -> Result<u64, ServiceError> {
        Ok(Product::find()
            .filter(Column::BrandId.eq(brand_id))
            .filter(Column::Active.eq(true))
            .count(self.get_db())
            .await?)
    }

    pub async fn count_active_by_strain(&self, strain_id: Uuid) -> Result<u64, ServiceError> {
        Ok(Product::find()
            .filter(Column::StrainId.eq(strain_id))
            .filter(Column::Active.eq(true))
            .count(self.get_db())
            .await?)
    }

    pub async fn insert(&self, changes: ProductChanges) -> Result<Model, ServiceError> {
        let mut model = <ProductActiveModel as Default>::default();
        changes.apply(&mut model)?;
        Ok(model.insert(self.get_db()).await?)
    }

    pub async fn save_changes(
        &self,
        product: Model,
        changes: ProductChanges,
    ) -> Result<Model, ServiceError> {
        let mut model = product.into_active_model();
        changes.apply(&mut model)?;
        Ok(model.update(self.get_db()).await?)
    }
}

impl<'c, C: ConnectionTrait> Repository for ProductRepository<'c, C> {
    type Connection = C;

    fn get_db(&self) -> &C {
        self.db
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> UpsertRepository for ProductRepository<'c, C> {
    type Key = DutchieProductId;
    type Changes = ProductChanges;
    type Record = Model;

    fn check_key_fields(
        &self,
        key: &DutchieProductId,
        changes: &ProductChanges,
    ) -> Result<(), ServiceError> {
        ensure_key_field(
            "product",
            "dutchie_product_id",
            key.as_str(),
            changes.dutchie_product_id.as_deref(),
        )
    }

    async fn find_by_key(&self, key: &DutchieProductId) -> Result<Option<Model>, ServiceError> {
        self.find_by_dutchie_id(key.as_str()).await
    }

    /// Products created without a name are named after their Dutchie id.
    async fn create(
        &self,
        key: &DutchieProductId,
        changes: ProductChanges,
    ) -> Result<Model, ServiceError> {
        let mut model = ProductActiveModel {
            name: Set(key.as_str().to_string()),
            ..Default::default()
        };
        changes.apply(&mut model)?;
        model.dutchie_product_id = Set(Some(key.as_str().to_string()));
        Ok(model.insert(self.get_db()).await?)
    }

    async fn update(&self, record: Model, changes: ProductChanges) -> Result<Model, ServiceError> {
        self.save_changes(record, changes).await
    }
}
