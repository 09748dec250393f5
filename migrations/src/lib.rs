pub use sea_orm_migration::prelude::*;

mod m20250301_000001_create_cannabis_brands_table;
mod m20250301_000002_create_cannabis_strains_table;
mod m20250301_000003_create_cannabis_products_table;
mod m20250301_000004_create_cannabis_product_variants_table;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250301_000001_create_cannabis_brands_table::Migration),
            Box::new(m20250301_000002_create_cannabis_strains_table::Migration),
            Box::new(m20250301_000003_create_cannabis_products_table::Migration),
            Box::new(m20250301_000004_create_cannabis_product_variants_table::Migration),
        ]
    }
}
