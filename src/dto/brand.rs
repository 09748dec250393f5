use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::validate_not_blank;
use crate::entities::brand::{ActiveModel, BrandSpecialty, BrandType, LicenseType};

/// Partial update for a brand.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(default, deny_unknown_fields)]
pub struct BrandChanges {
    #[validate(length(min = 1, max = 255), custom = "validate_not_blank")]
    pub name: Option<String>,
    pub active: Option<bool>,
    #[validate(length(max = 128))]
    pub dutchie_brand_id: Option<String>,
    #[validate(length(max = 255))]
    pub display_name: Option<String>,
    #[validate(length(max = 64))]
    pub code: Option<String>,
    pub brand_type: Option<BrandType>,

    pub website: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub street: Option<String>,
    pub street2: Option<String>,
    pub city: Option<String>,
    pub state_code: Option<String>,
    pub zip: Option<String>,
    pub country_code: Option<String>,

    pub license_number: Option<String>,
    pub license_type: Option<LicenseType>,
    pub license_expiry: Option<NaiveDate>,

    pub description: Option<String>,
    pub featured: Option<bool>,
    pub specialty: Option<BrandSpecialty>,
    pub notes: Option<String>,
}

impl BrandChanges {
    pub fn named(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }

    pub fn apply(self, model: &mut ActiveModel) {
        let changes = self;
        set_present!(changes => model:
            name,
            active,
            dutchie_brand_id,
            display_name,
            code,
            brand_type,
            website,
            email,
            phone,
            street,
            street2,
            city,
            state_code,
            zip,
            country_code,
            license_number,
            license_type,
            license_expiry,
            description,
            featured,
            specialty,
            notes,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::ActiveValue;

    #[test]
    fn absent_fields_stay_unset() {
        let mut model = <ActiveModel as Default>::default();
        BrandChanges {
            website: Some("https://kivaconfections.com".into()),
            featured: Some(true),
            ..Default::default()
        }
        .apply(&mut model);

        assert_eq!(
            model.website,
            ActiveValue::Set(Some("https://kivaconfections.com".to_string()))
        );
        assert_eq!(model.featured, ActiveValue::Set(true));
        assert!(matches!(model.name, ActiveValue::NotSet));
        assert!(matches!(model.city, ActiveValue::NotSet));
    }

    #[test]
    fn blank_names_fail_validation() {
        assert!(BrandChanges::named("   ").validate().is_err());
        assert!(BrandChanges::named("").validate().is_err());
        assert!(BrandChanges::named("Kiva").validate().is_ok());
        assert!(BrandChanges::default().validate().is_ok());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        let parsed = serde_json::from_str::<BrandChanges>(r#"{"name":"Kiva","colour":"red"}"#);
        assert!(parsed.is_err());

        let parsed: BrandChanges =
            serde_json::from_str(r#"{"name":"Kiva","brand_type":"cultivator"}"#).unwrap();
        assert_eq!(parsed.brand_type, Some(BrandType::Cultivator));
    }
}
