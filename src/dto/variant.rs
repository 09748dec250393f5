use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use sea_orm::ActiveValue::Set;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::json_list;
use crate::entities::product_variant::{ActiveModel, LabTestStatus};

/// Partial update for a product variant.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct VariantChanges {
    pub product_id: Option<Uuid>,

    pub dutchie_inventory_id: Option<String>,
    pub dutchie_sku: Option<String>,
    pub dutchie_location_id: Option<String>,
    pub dutchie_pos_inventory_id: Option<String>,
    pub store_name: Option<String>,

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

    pub terpene_myrcene: Option<f64>,
    pub terpene_limonene: Option<f64>,
    pub terpene_caryophyllene: Option<f64>,
    pub terpene_pinene: Option<f64>,
    pub terpene_linalool: Option<f64>,
    pub terpene_humulene: Option<f64>,
    pub total_terpenes: Option<f64>,

    pub batch_id: Option<String>,
    pub package_id: Option<String>,
    pub lab_test_status: Option<LabTestStatus>,
    pub tested_date: Option<NaiveDate>,
    pub harvest_date: Option<NaiveDate>,
    pub package_date: Option<NaiveDate>,
    pub expiration_date: Option<NaiveDate>,

    pub unit_cost: Option<Decimal>,
    pub special_price: Option<Decimal>,
    pub special_price_rec: Option<Decimal>,
    pub special_price_med: Option<Decimal>,
    pub price_rec: Option<Decimal>,
    pub price_med: Option<Decimal>,

    pub net_weight: Option<Decimal>,
    pub net_weight_grams: Option<Decimal>,
    pub weight_unit: Option<String>,
    pub size: Option<String>,
    pub servings: Option<i32>,

    pub quantity_available: Option<Decimal>,
    pub quantity_reserved: Option<Decimal>,
    pub quantity_on_floor: Option<Decimal>,
    pub quantity_in_back: Option<Decimal>,
    #[validate(range(min = 0))]
    pub low_stock_threshold: Option<i32>,
    #[validate(range(min = 0))]
    pub reorder_point: Option<i32>,

    pub image_url: Option<String>,
    pub images: Option<Vec<String>>,

    pub synced_at: Option<DateTime<Utc>>,
}

impl VariantChanges {
    pub fn apply(self, model: &mut ActiveModel) -> Result<(), serde_json::Error> {
        if let Some(images) = &self.images {
            model.images = Set(Some(json_list(images)?));
        }

        let changes = self;
        set_present!(changes => model:
            product_id,
            dutchie_inventory_id,
            dutchie_sku,
            dutchie_location_id,
            dutchie_pos_inventory_id,
            store_name,
            thc_percentage,
            thc_percentage_min,
            thc_percentage_max,
            cbd_percentage,
            cbd_percentage_min,
            cbd_percentage_max,
            thc_mg,
            cbd_mg,
            thc_mg_per_serving,
            cbd_mg_per_serving,
            potency_thc_formatted,
            potency_cbd_formatted,
            terpene_myrcene,
            terpene_limonene,
            terpene_caryophyllene,
            terpene_pinene,
            terpene_linalool,
            terpene_humulene,
            total_terpenes,
            batch_id,
            package_id,
            lab_test_status,
            tested_date,
            harvest_date,
            package_date,
            expiration_date,
            unit_cost,
            special_price,
            special_price_rec,
            special_price_med,
            price_rec,
            price_med,
            net_weight,
            net_weight_grams,
            weight_unit,
            size,
            servings,
            quantity_available,
            quantity_reserved,
            quantity_on_floor,
            quantity_in_back,
            low_stock_threshold,
            reorder_point,
            image_url,
            synced_at,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sea_orm::ActiveValue;

    #[test]
    fn quantities_and_images_apply_independently() {
        let mut model = <ActiveModel as Default>::default();
        VariantChanges {
            quantity_available: Some(dec!(5)),
            images: Some(vec!["https://cdn.example/a.png".into()]),
            low_stock_threshold: Some(3),
            ..Default::default()
        }
        .apply(&mut model)
        .unwrap();

        assert_eq!(model.quantity_available, ActiveValue::Set(Some(dec!(5))));
        assert_eq!(model.low_stock_threshold, ActiveValue::Set(3));
        assert_eq!(
            model.images,
            ActiveValue::Set(Some(r#"["https://cdn.example/a.png"]"#.to_string()))
        );
        assert!(matches!(model.price_rec, ActiveValue::NotSet));
    }

    #[test]
    fn negative_thresholds_are_rejected() {
        let changes = VariantChanges {
            reorder_point: Some(-2),
            ..Default::default()
        };
        assert!(changes.validate().is_err());
    }
}
