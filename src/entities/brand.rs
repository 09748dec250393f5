use chrono::{DateTime, NaiveDate, Utc};
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Kind of business behind a brand.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BrandType {
    #[sea_orm(string_value = "cultivator")]
    Cultivator,
    #[sea_orm(string_value = "processor")]
    Processor,
    #[sea_orm(string_value = "dispensary")]
    Dispensary,
    #[sea_orm(string_value = "manufacturer")]
    Manufacturer,
    #[sea_orm(string_value = "distributor")]
    Distributor,
}

impl Default for BrandType {
    fn default() -> Self {
        Self::Manufacturer
    }
}

/// State license category held by a brand.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum LicenseType {
    #[sea_orm(string_value = "cultivation")]
    Cultivation,
    #[sea_orm(string_value = "processing")]
    Processing,
    #[sea_orm(string_value = "manufacturing")]
    Manufacturing,
    #[sea_orm(string_value = "distribution")]
    Distribution,
    #[sea_orm(string_value = "retail")]
    Retail,
}

/// Primary product category a brand is known for.
#[derive(
    Clone,
    Copy,
    Debug,
    PartialEq,
    Eq,
    EnumIter,
    DeriveActiveEnum,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::N(32))")]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum BrandSpecialty {
    #[sea_orm(string_value = "flower")]
    Flower,
    #[sea_orm(string_value = "concentrates")]
    Concentrates,
    #[sea_orm(string_value = "edibles")]
    Edibles,
    #[sea_orm(string_value = "vapes")]
    Vapes,
    #[sea_orm(string_value = "topicals")]
    Topicals,
    #[sea_orm(string_value = "tinctures")]
    Tinctures,
    #[sea_orm(string_value = "accessories")]
    Accessories,
    #[sea_orm(string_value = "multiple")]
    Multiple,
}

/// Cannabis brand / manufacturer master data.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cannabis_brands")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    /// Brand name, unique (case-sensitive at the storage layer)
    #[sea_orm(unique)]
    pub name: String,

    /// Lowercased `name`, kept in step by `before_save`
    #[sea_orm(indexed)]
    pub name_key: String,

    pub active: bool,

    /// Brand identifier in Dutchie
    pub dutchie_brand_id: Option<String>,

    /// Public-facing name if different from `name`
    pub display_name: Option<String>,
    pub code: Option<String>,
    pub brand_type: BrandType,

    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub zip: Option<String>,
    pub country_code: Option<String>,

    /// State cannabis license number
    pub license_number: Option<String>,
    pub license_type: Option<LicenseType>,
    pub license_expiry: Option<NaiveDate>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description: Option<String>,
    pub featured: bool,
    pub specialty: Option<BrandSpecialty>,

    #[sea_orm(column_type = "Text", nullable)]
    pub notes: Option<String>,

    /// Number of active products linked to this brand; maintained by the catalog services
    pub product_count: i32,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::product_template::Entity")]
    Products,
}

impl Related<super::product_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Products.def()
    }
}

#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, _db: &C, insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let mut active_model = self;
        let now = Utc::now();

        if insert {
            if let ActiveValue::NotSet = active_model.id {
                active_model.id = Set(Uuid::new_v4());
            }
            if let ActiveValue::NotSet = active_model.active {
                active_model.active = Set(true);
            }
            if let ActiveValue::NotSet = active_model.brand_type {
                active_model.brand_type = Set(BrandType::default());
            }
            if let ActiveValue::NotSet = active_model.featured {
                active_model.featured = Set(false);
            }
            if let ActiveValue::NotSet = active_model.product_count {
                active_model.product_count = Set(0);
            }
            active_model.created_at = Set(now);
        }

        if let ActiveValue::Set(ref name) = active_model.name {
            active_model.name_key = Set(super::fold_name(name));
        }
        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}
