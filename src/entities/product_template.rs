use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::entity::prelude::*;
use sea_orm::{ActiveValue, ActiveValue::Set, ConnectionTrait};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::strain::StrainType;

/// Where a product's data came from.
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
pub enum SyncSource {
    #[sea_orm(string_value = "dutchie_pos")]
    DutchiePos,
    #[sea_orm(string_value = "dutchie_plus")]
    DutchiePlus,
    #[sea_orm(string_value = "manual")]
    Manual,
}

impl Default for SyncSource {
    fn default() -> Self {
        Self::DutchiePos
    }
}

/// Product template: Dutchie product-level data shared by all variants.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "cannabis_products")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,

    pub name: String,
    pub active: bool,

    /// Natural key for the sync path
    pub dutchie_product_id: Option<String>,
    pub dutchie_pos_id: Option<String>,

    pub is_cannabis: bool,
    pub strain_id: Option<Uuid>,
    pub strain_type: Option<StrainType>,
    pub brand_id: Option<Uuid>,

    pub product_category: Option<String>,
    pub product_subcategory: Option<String>,
    pub dosage_form: Option<String>,

    /// JSON array of effect names
    #[sea_orm(column_type = "Text", nullable)]
    pub effects: Option<String>,
    /// JSON object of terpene profiles
    #[sea_orm(column_type = "Text", nullable)]
    pub terpenes: Option<String>,
    pub medical_only: bool,
    pub special_sale: bool,

    pub regulatory_category: Option<String>,
    /// Flower equivalent in grams
    #[sea_orm(column_type = "Decimal(Some((10, 2)))", nullable)]
    pub flower_equivalent: Option<Decimal>,
    pub product_type: Option<String>,

    #[sea_orm(column_type = "Text", nullable)]
    pub description_html: Option<String>,
    pub slug: Option<String>,

    /// JSON array of tags
    #[sea_orm(column_type = "Text", nullable)]
    pub tags: Option<String>,
    pub staff_pick: bool,
    pub featured: bool,

    pub synced_at: Option<DateTime<Utc>>,
    pub sync_source: SyncSource,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Model {
    pub fn effects_list(&self) -> Result<Vec<String>, serde_json::Error> {
        parse_string_list(self.effects.as_deref())
    }

    pub fn tags_list(&self) -> Result<Vec<String>, serde_json::Error> {
        parse_string_list(self.tags.as_deref())
    }

    pub fn terpenes_value(&self) -> Result<Option<serde_json::Value>, serde_json::Error> {
        self.terpenes.as_deref().map(serde_json::from_str).transpose()
    }
}

/// Parses a JSON array of strings stored as text. Empty columns read as an empty list.
pub(crate) fn parse_string_list(raw: Option<&str>) -> Result<Vec<String>, serde_json::Error> {
    match raw {
        Some(text) if !text.trim().is_empty() => serde_json::from_str(text),
        _ => Ok(Vec::new()),
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::brand::Entity",
        from = "Column::BrandId",
        to = "super::brand::Column::Id",
        on_delete = "SetNull"
    )]
    Brand,
    #[sea_orm(
        belongs_to = "super::strain::Entity",
        from = "Column::StrainId",
        to = "super::strain::Column::Id",
        on_delete = "SetNull"
    )]
    Strain,
    #[sea_orm(has_many = "super::product_variant::Entity")]
    Variants,
}

impl Related<super::brand::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Brand.def()
    }
}

impl Related<super::strain::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Strain.def()
    }
}

impl Related<super::product_variant::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Variants.def()
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
            if let ActiveValue::NotSet = active_model.is_cannabis {
                active_model.is_cannabis = Set(true);
            }
            for flag in [
                &mut active_model.medical_only,
                &mut active_model.special_sale,
                &mut active_model.staff_pick,
                &mut active_model.featured,
            ] {
                if let ActiveValue::NotSet = flag {
                    *flag = Set(false);
                }
            }
            if let ActiveValue::NotSet = active_model.sync_source {
                active_model.sync_source = Set(SyncSource::default());
            }
            active_model.created_at = Set(now);
        }

        active_model.updated_at = Set(now);

        Ok(active_model)
    }
}
