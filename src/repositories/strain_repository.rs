use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, IntoActiveModel, QueryFilter,
    QueryOrder, Set,
};
use uuid::Uuid;

use crate::dto::StrainChanges;
use crate::entities::strain::{ActiveModel as StrainActiveModel, Column, Entity as Strain, Model};
use crate::entities::fold_name;
use crate::errors::ServiceError;
use crate::repositories::{Repository, UpsertRepository};
use crate::services::upsert::{ensure_key_field, StrainName};

/// Repository for strain operations
#[derive(Debug)]
pub struct StrainRepository<'c, C> {
    db: &'c C,
}

impl<'c, C: ConnectionTrait> StrainRepository<'c, C> {
    pub fn new(db: &'c C) -> Self {
        Self { db }
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Model>, ServiceError> {
        Ok(Strain::find_by_id(id).one(self.get_db()).await?)
    }

    /// Find several strains at once; missing ids are skipped
    pub async fn find_by_ids(&self, ids: Vec<Uuid>) -> Result<Vec<Model>, ServiceError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        Ok(Strain::find()
            .filter(Column::Id.is_in(ids))
            .all(self.get_db())
            .await?)
    }

    /// Find the oldest strain whose name matches ignoring case
    pub async fn find_by_name_ci(&self, name: &str) -> Result<Option<Model>, ServiceError> {
        Ok(Strain::find()
            .filter(Column::NameKey.eq(fold_name(name)))
            .order_by_asc(Column::CreatedAt)
            .order_by_asc(Column::Id)
            .one(self.get_db())
            .await?)
    }

    pub async fn find_all(&self, active_only: bool) -> Result<Vec<Model>, ServiceError> {
        let mut query = Strain::find();
        if active_only {
            query = query.filter(Column::Active.eq(true));
        }
        Ok(query
            .order_by_asc(Column::Name)
            .all(self.get_db())
            .await?)
    }

    pub async fn insert(&self, changes: StrainChanges) -> Result<Model, ServiceError> {
        let mut model = <StrainActiveModel as Default>::default();
        changes.apply(&mut model)?;
        Ok(model.insert(self.get_db()).await?)
    }

    pub async fn save_changes(
        &self,
        strain: Model,
        changes: StrainChanges,
    ) -> Result<Model, ServiceError> {
        let mut model = strain.into_active_model();
        changes.apply(&mut model)?;
        Ok(model.update(self.get_db()).await?)
    }

    pub async fn set_active(&self, strain: Model, active: bool) -> Result<Model, ServiceError> {
        let mut model = strain.into_active_model();
        model.active = Set(active);
        Ok(model.update(self.get_db()).await?)
    }

    pub async fn set_parents(
        &self,
        strain: Model,
        parent_1: Option<Uuid>,
        parent_2: Option<Uuid>,
    ) -> Result<Model, ServiceError> {
        let mut model = strain.into_active_model();
        model.parent_strain_1_id = Set(parent_1);
        model.parent_strain_2_id = Set(parent_2);
        Ok(model.update(self.get_db()).await?)
    }

    /// Stores a recomputed product count without touching `updated_at`
    pub async fn set_product_count(&self, id: Uuid, count: i32) -> Result<(), ServiceError> {
        Strain::update_many()
            .col_expr(Column::ProductCount, Expr::value(count))
            .filter(Column::Id.eq(id))
            .exec(self.get_db())
            .await?;
        Ok(())
    }
}

impl<'c, C: ConnectionTrait> Repository for StrainRepository<'c, C> {
    type Connection = C;

    fn get_db(&self) -> &C {
        self.db
    }
}

#[async_trait]
impl<'c, C: ConnectionTrait> UpsertRepository for StrainRepository<'c, C> {
    type Key = StrainName;
    type Changes = StrainChanges;
    type Record = Model;

    /// A payload name may differ from the key in case only.
    fn check_key_fields(&self, key: &StrainName, changes: &StrainChanges) -> Result<(), ServiceError> {
        let given = changes.name.as_deref().map(fold_name);
        ensure_key_field("strain", "name", &fold_name(key.as_str()), given.as_deref())
    }

    async fn find_by_key(&self, key: &StrainName) -> Result<Option<Model>, ServiceError> {
        self.find_by_name_ci(key.as_str()).await
    }

    async fn create(&self, key: &StrainName, changes: StrainChanges) -> Result<Model, ServiceError> {
        let mut model = StrainActiveModel {
            name: Set(key.as_str().to_string()),
            ..Default::default()
        };
        changes.apply(&mut model)?;
        Ok(model.insert(self.get_db()).await?)
    }

    async fn update(&self, record: Model, changes: StrainChanges) -> Result<Model, ServiceError> {
        self.save_changes(record, changes).await
    }
}
