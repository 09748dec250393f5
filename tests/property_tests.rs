//! Property-based tests for natural keys and payload validation.

use mint_cannabis::{
    dto::{BrandChanges, StrainChanges},
    errors::ServiceError,
    services::upsert::{BrandName, DutchieProductId, NaturalKey, SkuLocation, StrainName},
};
use proptest::prelude::*;
use validator::Validate;

fn blank_strategy() -> impl Strategy<Value = String> {
    "[ \t\n]{0,8}"
}

fn key_strategy() -> impl Strategy<Value = String> {
    ("[ ]{0,2}", "[A-Za-z0-9][A-Za-z0-9 #._-]{0,30}").prop_map(|(pad, key)| format!("{pad}{key}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(500))]

    #[test]
    fn keys_with_visible_characters_are_accepted(key in key_strategy()) {
        prop_assert!(BrandName::new(key.clone()).validate().is_ok());
        prop_assert!(StrainName::new(key.clone()).validate().is_ok());
        prop_assert!(DutchieProductId::new(key.clone()).validate().is_ok());
        prop_assert!(SkuLocation::new(key.clone(), key).validate().is_ok());
    }

    #[test]
    fn blank_keys_are_rejected(blank in blank_strategy()) {
        let rejected = matches!(
            BrandName::new(blank.clone()).validate(),
            Err(ServiceError::InvalidKey(_))
        );
        prop_assert!(rejected);
        prop_assert!(DutchieProductId::new(blank).validate().is_err());
    }

    #[test]
    fn a_blank_part_rejects_the_whole_variant_key(key in key_strategy(), blank in blank_strategy(), sku_blank in any::<bool>()) {
        let location = if sku_blank { SkuLocation::new(blank, key) } else { SkuLocation::new(key, blank) };
        let err = location.validate().unwrap_err();
        let field = if sku_blank { "dutchie_sku" } else { "dutchie_location_id" };
        prop_assert!(err.to_string().contains(field), "{} does not name {}", err, field);
    }

    #[test]
    fn variant_keys_display_as_sku_at_location(sku in key_strategy(), location in key_strategy()) {
        let key = SkuLocation::new(sku.clone(), location.clone());
        prop_assert_eq!(key.to_string(), format!("{}@{}", sku, location));
    }

    #[test]
    fn brand_names_must_hold_visible_characters(name in key_strategy(), blank in "[ \t]{1,8}") {
        prop_assert!(BrandChanges::named(name).validate().is_ok());
        prop_assert!(BrandChanges::named(blank).validate().is_err());
    }

    #[test]
    fn strain_potency_stays_within_percent(thc in -50.0f64..150.0) {
        let changes = StrainChanges {
            typical_thc_max: Some(thc),
            ..StrainChanges::named("Gelato")
        };
        prop_assert_eq!(changes.validate().is_ok(), (0.0..=100.0).contains(&thc));
    }
}
