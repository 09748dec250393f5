use sea_orm_migration::prelude::*;

use super::m20250301_000001_create_cannabis_brands_table::CannabisBrands;
use super::m20250301_000002_create_cannabis_strains_table::CannabisStrains;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000003_create_cannabis_products_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CannabisProducts::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CannabisProducts::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CannabisProducts::Name).string_len(255).not_null())
                    .col(
                        ColumnDef::new(CannabisProducts::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::DutchieProductId)
                            .string_len(128)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProducts::DutchiePosId).string_len(128).null())
                    .col(
                        ColumnDef::new(CannabisProducts::IsCannabis)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(CannabisProducts::StrainId).uuid().null())
                    .col(ColumnDef::new(CannabisProducts::StrainType).string_len(32).null())
                    .col(ColumnDef::new(CannabisProducts::BrandId).uuid().null())
                    .col(
                        ColumnDef::new(CannabisProducts::ProductCategory)
                            .string_len(128)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::ProductSubcategory)
                            .string_len(128)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProducts::DosageForm).string_len(128).null())
                    .col(ColumnDef::new(CannabisProducts::Effects).text().null())
                    .col(ColumnDef::new(CannabisProducts::Terpenes).text().null())
                    .col(
                        ColumnDef::new(CannabisProducts::MedicalOnly)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::SpecialSale)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::RegulatoryCategory)
                            .string_len(128)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::FlowerEquivalent)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProducts::ProductType).string_len(128).null())
                    .col(ColumnDef::new(CannabisProducts::DescriptionHtml).text().null())
                    .col(ColumnDef::new(CannabisProducts::Slug).string_len(255).null())
                    .col(ColumnDef::new(CannabisProducts::Tags).text().null())
                    .col(
                        ColumnDef::new(CannabisProducts::StaffPick)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::SyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::SyncSource)
                            .string_len(32)
                            .not_null()
                            .default("dutchie_pos"),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CannabisProducts::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cannabis_products_brand")
                            .from(CannabisProducts::Table, CannabisProducts::BrandId)
                            .to(CannabisBrands::Table, CannabisBrands::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cannabis_products_strain")
                            .from(CannabisProducts::Table, CannabisProducts::StrainId)
                            .to(CannabisStrains::Table, CannabisStrains::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        // NULLs stay distinct, so manually created products without a Dutchie id are unaffected.
        manager
            .create_index(
                Index::create()
                    .name("uq_cannabis_products_dutchie_product_id")
                    .table(CannabisProducts::Table)
                    .col(CannabisProducts::DutchieProductId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_products_dutchie_pos_id")
                    .table(CannabisProducts::Table)
                    .col(CannabisProducts::DutchiePosId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_products_brand_id")
                    .table(CannabisProducts::Table)
                    .col(CannabisProducts::BrandId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_products_strain_id")
                    .table(CannabisProducts::Table)
                    .col(CannabisProducts::StrainId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CannabisProducts::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CannabisProducts {
    Table,
    Id,
    Name,
    Active,
    DutchieProductId,
    DutchiePosId,
    IsCannabis,
    StrainId,
    StrainType,
    BrandId,
    ProductCategory,
    ProductSubcategory,
    DosageForm,
    Effects,
    Terpenes,
    MedicalOnly,
    SpecialSale,
    RegulatoryCategory,
    FlowerEquivalent,
    ProductType,
    DescriptionHtml,
    Slug,
    Tags,
    StaffPick,
    Featured,
    SyncedAt,
    SyncSource,
    CreatedAt,
    UpdatedAt,
}
