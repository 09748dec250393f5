use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lab testing state of a batch.
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
pub enum LabTestStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "in_progress")]
    InProgress,
    #[sea_orm(string_value = "passed")]
    Passed,
    #[sea_orm(string_value = "failed")]
    Failed,
    #[sea_orm(string_value = "expired")]
    Expired,
}

impl Default for LabTestStatus {
    fn default() -> Self {
        Self::Pending
    }
}

pub const DEFAULT_LOW_STOCK_THRESHOLD: i32 = 10;
pub const DEFAULT_REORDER_POINT: i32 = 5;

/// Product variant: one Dutchie inventory item (size/potency combination) at one location.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cannabis_product_variants")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub product_id: Option<Uuid>,

    pub dutchie_inventory_id: Option<String>,
    /// Natural key, together with `dutchie_location_id`
    pub dutchie_sku: Option<String>,
    pub dutchie_location_id: Option<String>,
    pub dutchie_pos_inventory_id: Option<String>,
    pub store_name: Option<String>,

    // Potency
    pub thc_percentage: Option<f64>,
    pub thc_percentage_min: Option<f64>,
    pub thc_percentage_max: Option<f64>,
    pub cbd_percentage: Option<f64>,
    pub cbd_percentage_min: Option<f64>,
    pub cbd_percentage_max: Option<f64>,
    pub thc_mg: Option<f64>,
    pub cbd_mg: Option<f64>,
    pub thc_mg_per_serving: Option<f64>,
    pub cbd_mg_per_serving: Option<f64>,
    pub potency_thc_formatted: Option<String>,
    pub potency_cbd_formatted: Option<String>,

    // Terpenes
    pub terpene_myrcene: Option<f64>,
    pub terpene_limonene: Option<f64>,
    pub terpene_caryophyllene: Option<f64>,
    pub terpene_pinene: Option<f64>,
    pub terpene_linalool: Option<f64>,
    pub terpene_humulene: Option<f64>,
    pub total_terpenes: Option<f64>,

    // Batch / lab
    pub batch_id: Option<String>,
    /// METRC package tag
    pub package_id: Option<String>,
    pub lab_test_status: LabTestStatus,
    pub tested_date: Option<NaiveDate>,
    pub harvest_date: Option<NaiveDate>,
    pub package_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,

    // Pricing
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub unit_cost: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub special_price: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub special_price_rec: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub special_price_med: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price_rec: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub price_med: Option<Decimal>,

    // Size
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub net_weight: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 3)))", nullable)]
    pub net_weight_grams: Option<Decimal>,
    pub weight_unit: Option<String>,
    pub size: Option<String>,
    pub servings: Option<i32>,

    // Quantities
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub quantity_available: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub quantity_reserved: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub quantity_on_floor: Option<Decimal>,
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub quantity_in_back: Option<Decimal>,
    pub low_stock_threshold: i32,
    pub reorder_point: i32,

    pub image_url: Option<String>,
    /// JSON array of image URLs
    #[sea_orm(column_type = "Text", nullable)]
    pub images: Option<String>,

    pub synced_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    /// A missing available quantity counts as zero.
    pub fn is_low_stock(&self) -> bool {
        let available = self.quantity_available.unwrap_or(Decimal::ZERO);
        available <= Decimal::from(self.low_stock_threshold)
    }

    pub fn needs_reorder(&self) -> bool {
        let available = self.quantity_available.unwrap_or(Decimal::ZERO);
        available <= Decimal::from(self.reorder_point)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::product_template::Entity",
        from = "Column::ProductId",
        to = "super::product_template::Column::Id",
        on_delete = "Cascade"
    )]
    Product,
}

impl Related<super::product_template::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Product.def()
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
            if let ActiveValue::NotSet = active_model.lab_test_status {
                active_model.lab_test_status = Set(LabTestStatus::default());
            }
            if let ActiveValue::NotSet = active_model.low_stock_threshold {
                active_model.low_stock_threshold = Set(DEFAULT_LOW_STOCK_THRESHOLD);
            }
            if let ActiveValue::NotSet = active_model.reorder_point {
                active_model.reorder_point = Set(DEFAULT_REORDER_POINT);
            }
            active_model.created_at = Set(now);
        }

        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}
