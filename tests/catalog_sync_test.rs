mod common;

use assert_matches::assert_matches;
use common::TestApp;
use mint_cannabis::{
    config::SyncConfig,
    dto::{ProductChanges, VariantChanges},
    entities::{product_template::SyncSource, Brand, Product, ProductVariant},
    errors::ServiceError,
    events::Event,
    services::{InventoryItem, UpsertOutcome},
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sea_orm::{EntityTrait, PaginatorTrait};
use serde_json::json;

fn item(sku: &str, product_id: &str, brand: &str) -> InventoryItem {
    InventoryItem {
        sku: sku.to_string(),
        location_id: "store-1".to_string(),
        product_id: Some(product_id.to_string()),
        brand_name: Some(brand.to_string()),
        ..Default::default()
    }
}

fn with_quantity(mut item: InventoryItem, quantity: Decimal) -> InventoryItem {
    item.variant.quantity_available = Some(quantity);
    item
}

#[tokio::test]
async fn products_of_one_brand_share_a_single_brand_record() {
    let app = TestApp::new().await;
    let sync = &app.state.services.sync;

    let outcomes = sync
        .upsert_inventory_items(vec![
            item("KV-1", "prod-1", "Kiva"),
            item("KV-2", "prod-2", "kiva"),
            item("KV-3", "prod-3", "KIVA"),
        ])
        .await
        .unwrap();

    assert_eq!(outcomes.len(), 3);
    assert_eq!(outcomes[0].brand.unwrap().outcome, UpsertOutcome::Created);
    assert_eq!(outcomes[1].brand.unwrap().outcome, UpsertOutcome::Updated);
    assert_eq!(outcomes[0].brand.unwrap().id, outcomes[2].brand.unwrap().id);

    let brands = Brand::find().all(&*app.state.db).await.unwrap();
    assert_eq!(brands.len(), 1);
    assert_eq!(brands[0].name, "Kiva");
    assert_eq!(brands[0].product_count, 3);
}

#[tokio::test]
async fn resyncing_an_item_updates_every_record() {
    let app = TestApp::new().await;
    let sync = &app.state.services.sync;

    let first = sync
        .upsert_inventory_item(with_quantity(item("SKU-1", "prod-1", "Wyld"), dec!(40)))
        .await
        .unwrap();
    assert_eq!(first.created_count(), 3);

    let second = sync
        .upsert_inventory_item(with_quantity(item("SKU-1", "prod-1", "Wyld"), dec!(35)))
        .await
        .unwrap();
    assert_eq!(second.created_count(), 0);
    assert_eq!(second.variant.id, first.variant.id);
    assert_eq!(second.product.unwrap().id, first.product.unwrap().id);
    assert_eq!(second.product.unwrap().outcome, UpsertOutcome::Updated);

    let db = &*app.state.db;
    assert_eq!(Product::find().count(db).await.unwrap(), 1);
    assert_eq!(ProductVariant::find().count(db).await.unwrap(), 1);

    let variant = ProductVariant::find_by_id(first.variant.id)
        .one(db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(variant.quantity_available, Some(dec!(35)));
    assert!(variant.synced_at.is_some());
}

#[tokio::test]
async fn synced_records_are_linked_together() {
    let app = TestApp::new().await;
    let services = &app.state.services;

    let mut inventory = item("SKU-1", "prod-1", "Jeeter");
    inventory.strain_name = Some("Blue Zkittlez".to_string());
    inventory.product = ProductChanges::named("Blue Zkittlez Baby Jeeter");
    inventory.variant.price_rec = Some(dec!(35.00));

    let outcome = services.sync.upsert_inventory_item(inventory).await.unwrap();
    let product_id = outcome.product.unwrap().id;

    let product = services.products.get_product(product_id).await.unwrap().unwrap();
    assert_eq!(product.name, "Blue Zkittlez Baby Jeeter");
    assert_eq!(product.brand_id, Some(outcome.brand.unwrap().id));
    assert_eq!(product.strain_id, Some(outcome.strain.unwrap().id));
    assert_eq!(product.sync_source, SyncSource::DutchiePos);
    assert!(product.synced_at.is_some());

    let variants = services.products.product_variants(product_id).await.unwrap();
    assert_eq!(variants.len(), 1);
    assert_eq!(variants[0].id, outcome.variant.id);
    assert_eq!(variants[0].price_rec, Some(dec!(35.00)));

    let strain = services
        .strains
        .get_strain(outcome.strain.unwrap().id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(strain.product_count, 1);
}

#[tokio::test]
async fn moving_a_product_to_another_brand_moves_its_count() {
    let app = TestApp::new().await;
    let services = &app.state.services;

    let before = services
        .sync
        .upsert_inventory_item(item("SKU-1", "prod-1", "Old Pal"))
        .await
        .unwrap();
    let after = services
        .sync
        .upsert_inventory_item(item("SKU-1", "prod-1", "Lowell Farms"))
        .await
        .unwrap();

    let old_brand = services
        .brands
        .get_brand(before.brand.unwrap().id)
        .await
        .unwrap()
        .unwrap();
    let new_brand = services
        .brands
        .get_brand(after.brand.unwrap().id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(old_brand.product_count, 0);
    assert_eq!(new_brand.product_count, 1);
    assert_eq!(after.product.unwrap().outcome, UpsertOutcome::Updated);
}

#[tokio::test]
async fn variants_without_product_id_are_stored_unlinked() {
    let app = TestApp::new().await;

    let outcome = app
        .state
        .services
        .sync
        .upsert_inventory_item(InventoryItem {
            sku: "LOOSE-1".to_string(),
            location_id: "store-1".to_string(),
            ..Default::default()
        })
        .await
        .unwrap();

    assert!(outcome.brand.is_none());
    assert!(outcome.product.is_none());
    let variant = ProductVariant::find_by_id(outcome.variant.id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(variant.product_id, None);
}

#[tokio::test]
async fn low_stock_uses_quantity_and_threshold() {
    let mut app = TestApp::new().await;
    let services = &app.state.services;

    services
        .sync
        .upsert_inventory_items(vec![
            with_quantity(item("LOW-1", "prod-1", "Kiva"), dec!(2)),
            with_quantity(item("EDGE-1", "prod-2", "Kiva"), dec!(10)),
            with_quantity(item("OK-1", "prod-3", "Kiva"), dec!(50)),
            item("NONE-1", "prod-4", "Kiva"),
        ])
        .await
        .unwrap();
    app.drain_events();

    let services = &app.state.services;
    let low: Vec<String> = services
        .products
        .low_stock_variants()
        .await
        .unwrap()
        .into_iter()
        .filter_map(|v| v.dutchie_sku)
        .collect();
    assert_eq!(low.len(), 3);
    assert!(low.contains(&"LOW-1".to_string()));
    assert!(low.contains(&"EDGE-1".to_string()));
    assert!(low.contains(&"NONE-1".to_string()));

    let marked = services.products.mark_low_stock().await.unwrap();
    assert_eq!(marked.len(), 3);

    let events = app.drain_events();
    assert_eq!(events.len(), 3);
    assert!(events.iter().any(|e| matches!(
        e,
        Event::LowStockDetected { dutchie_sku: Some(sku), quantity_available, low_stock_threshold: 10, .. }
            if sku == "NONE-1" && quantity_available.is_zero()
    )));
}

#[tokio::test]
async fn configured_sync_defaults_apply_to_new_records() {
    let app = TestApp::with_sync(SyncConfig {
        low_stock_threshold: 25,
        reorder_point: 12,
        source: SyncSource::DutchiePlus,
    })
    .await;
    let services = &app.state.services;

    let mut inventory = item("SKU-1", "prod-1", "Kiva");
    inventory.variant = VariantChanges {
        reorder_point: Some(3),
        ..Default::default()
    };
    let outcome = services.sync.upsert_inventory_item(inventory).await.unwrap();

    let variant = ProductVariant::find_by_id(outcome.variant.id)
        .one(&*app.state.db)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(variant.low_stock_threshold, 25);
    assert_eq!(variant.reorder_point, 3);

    let product = services
        .products
        .get_product(outcome.product.unwrap().id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(product.sync_source, SyncSource::DutchiePlus);
}

#[tokio::test]
async fn bad_key_in_an_item_writes_nothing() {
    let mut app = TestApp::new().await;

    let mut inventory = item("SKU-1", " ", "Kiva");
    inventory.strain_name = Some("Gelato".to_string());
    let err = app
        .state
        .services
        .sync
        .upsert_inventory_item(inventory)
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    let db = &*app.state.db;
    assert_eq!(Brand::find().count(db).await.unwrap(), 0);
    assert_eq!(ProductVariant::find().count(db).await.unwrap(), 0);
    assert!(app.drain_events().is_empty());
}

#[tokio::test]
async fn batch_stops_at_first_failure_and_keeps_earlier_items() {
    let app = TestApp::new().await;

    let err = app
        .state
        .services
        .sync
        .upsert_inventory_items(vec![
            item("SKU-1", "prod-1", "Kiva"),
            item("", "prod-2", "Kiva"),
            item("SKU-3", "prod-3", "Kiva"),
        ])
        .await
        .unwrap_err();
    assert_matches!(err, ServiceError::InvalidKey(_));

    let db = &*app.state.db;
    assert_eq!(Product::find().count(db).await.unwrap(), 1);
    assert_eq!(ProductVariant::find().count(db).await.unwrap(), 1);
}

#[test]
fn inventory_items_parse_from_json() {
    let parsed: Vec<InventoryItem> = serde_json::from_value(json!([
        {
            "sku": "KV-100",
            "location_id": "store-1",
            "product_id": "prod-100",
            "brand_name": "Kiva",
            "product": { "name": "Camino Midnight Blueberry", "effects": ["sleepy", "relaxed"] },
            "variant": { "price_rec": "20.00", "quantity_available": "14", "images": [] }
        }
    ]))
    .unwrap();

    assert_eq!(parsed.len(), 1);
    assert_eq!(parsed[0].product.effects.as_deref().map(<[String]>::len), Some(2));
    assert_eq!(parsed[0].variant.price_rec, Some(dec!(20.00)));

    let unknown = serde_json::from_value::<InventoryItem>(json!({
        "sku": "KV-100",
        "location_id": "store-1",
        "colour": "green"
    }));
    assert!(unknown.is_err());
}
