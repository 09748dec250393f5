use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::dto::BrandChanges;
use crate::entities::brand::{ActiveModel as BrandActiveModel, Column, Entity as Brand, Model};
use crate::entities::fold_name;
use crate::errors::ServiceError;
use crate::repositories::{Repository, UpsertRepository};
use crate::services::upsert::{ensure_key_field, BrandName};

/// Repository for brand operations
#[derive(Debug)]
pub struct BrandRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> BrandRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    /// Find a brand by ID
    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ServiceError> {
        Ok(Brand::find_by_id(id).one(self.get_db()).await?)
    }

    /// Find the oldest brand whose name matches ignoring case
    pub async fn find_by_name_ci(&self, name: &str) -> Result<Option<Model>, ServiceError> {
        Ok(Brand::find()
            .filter(Column::NameKey.eq(fold_name(name)))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(self.get_db())
            .await?)
    }

    /// All brands ordered by name
    pub async fn find_all(&self, active_only: bool) -> Result<Vec<Model>, ServiceError> {
        let mut query = Brand::find();
        if active_only {
            query = query.filter(Column::Active.eq(true));
        }
        Ok(query
            .order_by_asc(Column::Name)
            .all(self.get_db())
            .await?)
    }

    /// Insert a brand exactly as given
    pub async fn insert(&self, changes: BrandChanges) -> Result<Model, ServiceError> {
        let mut model = <BrandActiveModel as Default>::default();
        changes.apply(&mut model);
        Ok(model.insert(self.get_db()).await?)
    }

    /// Apply a partial update to a loaded brand
    pub async fn save_changes(
        &self,
        brand: Model,
        changes: BrandChanges,
    ) -> Result<Model, ServiceError> {
        let mut model = brand.into_active_model();
        changes.apply(&mut model);
        Ok(model.update(self.get_db()).await?)
    }

    pub async fn set_active(&self, brand: Model, active: bool) -> Result<Model, ServiceError> {
        let mut model = brand.into_active_model();
        model.active = Set(active);
        Ok(model.update(self.get_db()).await?)
    }

    /// Stores a recomputed product count without touching `updated_at`
    pub async fn set_product_count(&self, id: Uuid, count: i32) -> Result<(), ServiceError> {
        Brand::update_many()
            .col_expr(Column::ProductCount, Expr::value(count))
            .filter(Column::Id.eq(id))
            .exec(self.get_db())
            .await?;
        Ok(())
    }
}

impl<'c, C: ConnectionTrait> Repository for BrandRepository<'c, C> {
    type Connection = C;

    fn get_db(&self) -> &C {
        self.db
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> UpsertRepository for BrandRepository<'c, C> {
    type Key = BrandName;
    type Changes = BrandChanges;
    type Record = Model;

    /// A payload name may differ from the key in case only.
    fn check_key_fields(&self, key: &BrandName, changes: &BrandChanges) -> Result<(), ServiceError> {
        let given = changes.name.as_deref().map(fold_name);
        ensure_key_field("brand", "name", &fold_name(key.as_str()), given.as_deref())
    }

    async fn find_by_key(&self, key: &BrandName) -> Result<Option<Model>, ServiceError> {
        self.find_by_name_ci(key.as_str()).await
    }

    async fn create(&self, key: &BrandName, changes: BrandChanges) -> Result<Model, ServiceError> {
        let mut model = BrandActiveModel {
            name: Set(key.as_str().to_string()),
            ..Default::default()
        };
        changes.apply(&mut model);
        Ok(model.insert(self.get_db()).await?)
    }

    async fn update(&self, record: Model, changes: BrandChanges) -> Result<Model, ServiceError> {
        self.save_changes(record, changes).await
    }
}
