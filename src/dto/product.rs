use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{json_list, validate_not_blank};
use crate::entities::product_template::{ActiveModel, SyncSource};
use crate::entities::strain::StrainType;

/// Partial update for a product template.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct ProductChanges {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: Option<String>,
    pub active: Option<bool>,

    pub dutchie_product_id: Option<String>,
    pub dutchie_pos_id: Option<String>,

    pub is_cannabis: Option<bool>,
    pub strain_id: Option<Uuid>,
    pub strain_type: Option<StrainType>,
    pub brand_id: Option<Uuid>,

    pub product_category: Option<String>,
    pub product_subcategory: Option<String>,
    pub dosage_form: Option<String>,

    pub effects: Option<Vec<String>>,
    pub terpenes: Option<serde_json::Value>,
    pub medical_only: Option<bool>,
    pub special_sale: Option<bool>,

    pub regulatory_category: Option<String>,
    pub flower_equivalent: Option<Decimal>,
    pub product_type: Option<String>,

    pub description_html: Option<String>,
    pub slug: Option<String>,
    pub tags: Option<Vec<String>>,
    pub staff_pick: Option<bool>,
    pub featured: Option<bool>,

    pub synced_at: Option<DateTime<Utc>>,
    pub sync_source: Option<SyncSource>,
}

impl ProductChanges {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn apply(self, model: &mut ActiveModel) -> Result<(), serde_json::Error> {
        if let Some(effects) = &self.effects {
            model.effects = Set(Some(json_list(effects)?));
        }
        if let Some(tags) = &self.tags {
            model.tags = Set(Some(json_list(tags)?));
        }
        if let Some(terpenes) = &self.terpenes {
            model.terpenes = Set(Some(serde_json::to_string(terpenes)?));
        }

        let changes = self;
        set_present!(changes => model:
            name,
            active,
            dutchie_product_id,
            dutchie_pos_id,
            is_cannabis,
            strain_id,
            strain_type,
            brand_id,
            product_category,
            product_subcategory,
            dosage_form,
            medical_only,
            special_sale,
            regulatory_category,
            flower_equivalent,
            product_type,
            description_html,
            slug,
            staff_pick,
            featured,
            synced_at,
            sync_source,
        );
        Ok(())
    }
}
