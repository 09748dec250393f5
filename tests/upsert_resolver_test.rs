mod common;

use assert_matches::assert_matches;
use common::TestApp;
use mint_cannabis::{
    dto::{BrandChanges, ProductChanges, StrainChanges, VariantChanges},
    entities::{Brand, Product, ProductVariant},
    errors::ServiceError,
    events::Event,
    repositories::{ProductRepository, UpsertRepository, VariantRepository},
    services::{DutchieProductId, SkuLocation, UpsertOutcome},
};
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use std::time::Duration;

fn priced(price: rust_decimal::Decimal) -> VariantChanges {
    VariantChanges {
        price_rec: Some(price),
        ..Default::default()
    }
}

#[tokio::test]
async fn repeated_variant_upsert_resolves_to_one_record() {
    let app = TestApp::new().await;
    let products = &app.state.services.products;

    let first = products
        .find_or_create_variant_by_sku_location("SKU-1", "LOC-A", priced(dec!(10)))
        .await
        .unwrap();
    let second = products
        .find_or_create_variant_by_sku_location("SKU-1", "LOC-A", priced(dec!(10)))
        .await
        .unwrap();

    assert_eq!(first.outcome, UpsertOutcome::Created);
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(first.record.id, second.record.id);
    assert_eq!(second.record.price_rec, Some(dec!(10)));
    assert_eq!(ProductVariant::find().count(&*app.state.db).await.unwrap(), 1);
}

#[tokio::test]
async fn same_sku_at_another_location_is_a_distinct_variant() {
    let app = TestApp::new().await;
    let products = &app.state.services.products;

    let north = products
        .find_or_create_variant_by_sku_location("SKU-1", "NORTH", VariantChanges::default())
        .await
        .unwrap();
    let south = products
        .find_or_create_variant_by_sku_location("SKU-1", "SOUTH", VariantChanges::default())
        .await
        .unwrap();

    assert!(north.created());
    assert!(south.created());
    assert_ne!(north.record.id, south.record.id);
    assert_eq!(south.record.dutchie_sku.as_deref(), Some("SKU-1"));
    assert_eq!(south.record.dutchie_location_id.as_deref(), Some("SOUTH"));
}

#[tokio::test]
async fn blank_keys_are_rejected_without_writing() {
    let mut app = TestApp::new().await;
    let services = &app.state.services;

    let err = services
        .products
        .find_or_create_variant_by_sku_location("", "LOC-A", priced(dec!(5)))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    let err = services
        .products
        .find_or_create_variant_by_sku_location("SKU-1", "   ", priced(dec!(5)))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    let err = services
        .brands
        .find_or_create_brand_by_name(" ", BrandChanges::default())
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    let err = services
        .products
        .find_or_create_product_by_dutchie_id(
            "",
            ProductChanges {
                brand_id: Some(uuid::Uuid::new_v4()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    let db = &*app.state.db;
    assert_eq!(ProductVariant::find().count(db).await.unwrap(), 0);
    assert_eq!(Brand::find().count(db).await.unwrap(), 0);
    assert_eq!(Product::find().count(db).await.unwrap(), 0);
    assert!(app.drain_events().is_empty());
}

#[tokio::test]
async fn partial_update_keeps_fields_it_does_not_name() {
    let app = TestApp::new().await;
    let products = &app.state.services.products;

    products
        .find_or_create_variant_by_sku_location("SKU-7", "LOC-A", priced(dec!(10)))
        .await
        .unwrap();
    let updated = products
        .find_or_create_variant_by_sku_location(
            "SKU-7",
            "LOC-A",
            VariantChanges {
                quantity_available: Some(dec!(5)),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.outcome, UpsertOutcome::Updated);
    assert_eq!(updated.record.price_rec, Some(dec!(10)));
    assert_eq!(updated.record.quantity_available, Some(dec!(5)));
}

#[tokio::test]
async fn new_variants_take_configured_stock_defaults() {
    let app = TestApp::new().await;

    let variant = app
        .state
        .services
        .products
        .find_or_create_variant_by_sku_location("SKU-9", "LOC-A", VariantChanges::default())
        .await
        .unwrap()
        .into_record();

    assert_eq!(variant.low_stock_threshold, 10);
    assert_eq!(variant.reorder_point, 5);
    assert_eq!(variant.product_id, None);
}

#[tokio::test]
async fn brand_lookup_ignores_case_and_keeps_stored_name() {
    let mut app = TestApp::new().await;
    let brands = &app.state.services.brands;

    let created = brands
        .find_or_create_brand_by_name(
            "Kiva",
            BrandChanges {
                website: Some("https://kivaconfections.com".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    let matched = brands
        .find_or_create_brand_by_name(
            "KIVA",
            BrandChanges {
                display_name: Some("Kiva Confections".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(created.created());
    assert_eq!(matched.outcome, UpsertOutcome::Updated);
    assert_eq!(matched.record.id, created.record.id);
    assert_eq!(matched.record.name, "Kiva");
    assert_eq!(matched.record.display_name.as_deref(), Some("Kiva Confections"));
    assert_eq!(
        matched.record.website.as_deref(),
        Some("https://kivaconfections.com")
    );
    assert_eq!(Brand::find().count(&*app.state.db).await.unwrap(), 1);

    assert_eq!(
        app.drain_events(),
        vec![
            Event::BrandCreated(created.record.id),
            Event::BrandUpdated(created.record.id)
        ]
    );
}

#[tokio::test]
async fn oldest_brand_wins_when_names_differ_only_in_case() {
    let app = TestApp::new().await;
    let brands = &app.state.services.brands;

    let first = brands.create_brand(BrandChanges::named("Wyld")).await.unwrap();
    tokio::time::sleep(Duration::from_millis(5)).await;
    let second = brands.create_brand(BrandChanges::named("WYLD")).await.unwrap();
    assert_ne!(first.id, second.id);

    let resolved = brands
        .find_or_create_brand_by_name("wyld", BrandChanges::default())
        .await
        .unwrap();
    assert_eq!(resolved.outcome, UpsertOutcome::Updated);
    assert_eq!(resolved.record.id, first.id);
}

#[tokio::test]
async fn duplicate_brand_name_is_a_constraint_violation() {
    let app = TestApp::new().await;
    let brands = &app.state.services.brands;

    brands.create_brand(BrandChanges::named("Stiiizy")).await.unwrap();
    let err = brands
        .create_brand(BrandChanges::named("Stiiizy"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ConstraintViolation(_));
    assert_eq!(err.code(), "constraint_violation");
    assert!(err.is_caller_error());
}

#[tokio::test]
async fn strain_lookup_ignores_case() {
    let app = TestApp::new().await;
    let strains = &app.state.services.strains;

    let created = strains
        .find_or_create_strain_by_name("Blue Dream", StrainChanges::default())
        .await
        .unwrap();
    let matched = strains
        .find_or_create_strain_by_name(
            "blue dream",
            StrainChanges {
                breeder: Some("DJ Short".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(matched.record.id, created.record.id);
    assert_eq!(matched.record.name, "Blue Dream");
    assert_eq!(matched.record.breeder.as_deref(), Some("DJ Short"));
}

#[tokio::test]
async fn product_without_name_is_named_after_dutchie_id() {
    let mut app = TestApp::new().await;
    let products = &app.state.services.products;

    let created = products
        .find_or_create_product_by_dutchie_id("dtc-100", ProductChanges::default())
        .await
        .unwrap();
    assert!(created.created());
    assert_eq!(created.record.name, "dtc-100");
    assert_eq!(created.record.dutchie_product_id.as_deref(), Some("dtc-100"));

    let renamed = products
        .find_or_create_product_by_dutchie_id("dtc-100", ProductChanges::named("Midnight Blueberry"))
        .await
        .unwrap();
    assert_eq!(renamed.outcome, UpsertOutcome::Updated);
    assert_eq!(renamed.record.id, created.record.id);
    assert_eq!(renamed.record.name, "Midnight Blueberry");

    // Dutchie ids are matched exactly
    let other = products
        .find_or_create_product_by_dutchie_id("DTC-100", ProductChanges::default())
        .await
        .unwrap();
    assert!(other.created());

    let events = app.drain_events();
    assert_eq!(events.len(), 3);
    assert_matches!(
        &events[1],
        Event::ProductUpserted { outcome: UpsertOutcome::Updated, dutchie_product_id: Some(id), .. } if id == "dtc-100"
    );
}

#[tokio::test]
async fn invalid_changes_fail_validation_before_lookup() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .products
        .find_or_create_variant_by_sku_location(
            "SKU-1",
            "LOC-A",
            VariantChanges {
                low_stock_threshold: Some(-1),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ValidationError(_));
    assert_eq!(
        ProductVariant::find().count(&*app.state.db).await.unwrap(),
        0
    );
}

#[tokio::test]
async fn payload_key_fields_cannot_rekey_a_variant() {
    let app = TestApp::new().await;
    let products = &app.state.services.products;
    let conflicting = || VariantChanges {
        dutchie_sku: Some("OTHER".into()),
        ..priced(dec!(12))
    };

    for _ in 0..2 {
        let err = products
            .find_or_create_variant_by_sku_location("SKU-1", "LOC-A", conflicting())
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::InvalidKey(msg) if msg.contains("dutchie_sku"));
    }
    assert_eq!(ProductVariant::find().count(&*app.state.db).await.unwrap(), 0);

    let matching = || VariantChanges {
        dutchie_sku: Some("SKU-1".into()),
        dutchie_location_id: Some("LOC-A".into()),
        ..priced(dec!(12))
    };
    let first = products
        .find_or_create_variant_by_sku_location("SKU-1", "LOC-A", matching())
        .await
        .unwrap();
    let second = products
        .find_or_create_variant_by_sku_location("SKU-1", "LOC-A", matching())
        .await
        .unwrap();
    assert!(first.created());
    assert_eq!(second.outcome, UpsertOutcome::Updated);
    assert_eq!(second.record.id, first.record.id);

    let err = products
        .find_or_create_variant_by_sku_location(
            "SKU-1",
            "LOC-A",
            VariantChanges {
                dutchie_location_id: Some("LOC-B".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(msg) if msg.contains("dutchie_location_id"));

    let stored = ProductVariant::find_by_id(first.record.id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.dutchie_sku.as_deref(), Some("SKU-1"));
    assert_eq!(stored.dutchie_location_id.as_deref(), Some("LOC-A"));
}

#[tokio::test]
async fn payload_key_fields_cannot_rekey_a_product_or_brand() {
    let mut app = TestApp::new().await;
    let services = &app.state.services;

    let created = services
        .products
        .find_or_create_product_by_dutchie_id("prod-1", ProductChanges::named("Camino Sours"))
        .await
        .unwrap();

    for _ in 0..2 {
        let err = services
            .products
            .find_or_create_product_by_dutchie_id(
                "prod-1",
                ProductChanges {
                    dutchie_product_id: Some("other".into()),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert_matches!(err, ServiceError::InvalidKey(_));
    }
    let stored = services
        .products
        .get_product(created.record.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.dutchie_product_id.as_deref(), Some("prod-1"));

    let err = services
        .brands
        .find_or_create_brand_by_name("Kiva", BrandChanges::named("Camino"))
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    // A name that differs only in case is the same key
    let brand = services
        .brands
        .find_or_create_brand_by_name("kiva", BrandChanges::named("Kiva"))
        .await
        .unwrap();
    assert!(brand.created());
    assert_eq!(brand.record.name, "Kiva");

    let db = &*app.state.db;
    assert_eq!(Product::find().count(db).await.unwrap(), 1);
    assert_eq!(Brand::find().count(db).await.unwrap(), 1);
    assert_eq!(app.drain_events().len(), 2);
}

#[tokio::test]
async fn non_ascii_names_match_ignoring_case() {
    let app = TestApp::new().await;
    let services = &app.state.services;

    let created = services
        .brands
        .find_or_create_brand_by_name("Élan", BrandChanges::default())
        .await
        .unwrap();
    let matched = services
        .brands
        .find_or_create_brand_by_name("élan", BrandChanges::default())
        .await
        .unwrap();
    assert!(created.created());
    assert_eq!(matched.outcome, UpsertOutcome::Updated);
    assert_eq!(matched.record.id, created.record.id);
    assert_eq!(matched.record.name, "Élan");
    assert_eq!(Brand::find().count(&*app.state.db).await.unwrap(), 1);

    let found = services.brands.find_brand_by_name("ÉLAN").await.unwrap();
    assert_eq!(found.map(|b| b.id), Some(created.record.id));

    let strain = services
        .strains
        .find_or_create_strain_by_name("Ñoño Kush", StrainChanges::default())
        .await
        .unwrap();
    let again = services
        .strains
        .find_or_create_strain_by_name("ñoño kush", StrainChanges::default())
        .await
        .unwrap();
    assert_eq!(again.outcome, UpsertOutcome::Updated);
    assert_eq!(again.record.id, strain.record.id);
}

#[tokio::test]
async fn duplicate_strain_name_is_a_constraint_violation() {
    let app = TestApp::new().await;
    let strains = &app.state.services.strains;

    strains.create_strain(StrainChanges::named("Gelato")).await.unwrap();
    let err = strains
        .create_strain(StrainChanges::named("Gelato"))
        .await
        .unwrap_err();

    assert_matches!(err, ServiceError::ConstraintViolation(_));
    assert!(err.is_caller_error());
}

#[tokio::test]
async fn racing_creates_for_one_key_hit_the_unique_index() {
    let app = TestApp::new().await;
    let db = &*app.state.db;

    // Both writers missed the lookup and go straight to insert
    let variants = VariantRepository::new(db);
    let key = SkuLocation::new("SKU-1", "LOC-A");
    variants.create(&key, VariantChanges::default()).await.unwrap();
    assert_matches!(
        variants.create(&key, VariantChanges::default()).await,
        Err(ServiceError::ConstraintViolation(_))
    );
    variants
        .create(&SkuLocation::new("SKU-1", "LOC-B"), VariantChanges::default())
        .await
        .unwrap();

    let products = ProductRepository::new(db);
    let key = DutchieProductId::new("prod-1");
    products.create(&key, ProductChanges::default()).await.unwrap();
    assert_matches!(
        products.create(&key, ProductChanges::default()).await,
        Err(ServiceError::ConstraintViolation(_))
    );

    assert_eq!(ProductVariant::find().count(db).await.unwrap(), 2);
    assert_eq!(Product::find().count(db).await.unwrap(), 1);
}
