use sea_orm_migration::prelude::*;

use super::m20250301_000003_create_cannabis_products_table::CannabisProducts;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000004_create_cannabis_product_variants_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CannabisProductVariants::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CannabisProductVariants::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::ProductId).uuid().null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::DutchieInventoryId)
                            .string_len(128)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::DutchieSku).string_len(128).null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::DutchieLocationId)
                            .string_len(128)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::DutchiePosInventoryId)
                            .string_len(128)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::StoreName).string_len(255).null())
                    .col(ColumnDef::new(CannabisProductVariants::ThcPercentage).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::ThcPercentageMin).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::ThcPercentageMax).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::CbdPercentage).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::CbdPercentageMin).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::CbdPercentageMax).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::ThcMg).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::CbdMg).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::ThcMgPerServing).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::CbdMgPerServing).double().null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::PotencyThcFormatted)
                            .string_len(64)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::PotencyCbdFormatted)
                            .string_len(64)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::TerpeneMyrcene).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::TerpeneLimonene).double().null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::TerpeneCaryophyllene)
                            .double()
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::TerpenePinene).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::TerpeneLinalool).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::TerpeneHumulene).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::TotalTerpenes).double().null())
                    .col(ColumnDef::new(CannabisProductVariants::BatchId).string_len(128).null())
                    .col(ColumnDef::new(CannabisProductVariants::PackageId).string_len(128).null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::LabTestStatus)
                            .string_len(32)
                            .not_null()
                            .default("pending"),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::TestedDate).date().null())
                    .col(ColumnDef::new(CannabisProductVariants::HarvestDate).date().null())
                    .col(ColumnDef::new(CannabisProductVariants::PackageDate).date().null())
                    .col(ColumnDef::new(CannabisProductVariants::ExpirationDate).date().null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::UnitCost)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::SpecialPrice)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::SpecialPriceRec)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::SpecialPriceMed)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::PriceRec)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::PriceMed)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::NetWeight)
                            .decimal_len(10, 3)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::NetWeightGrams)
                            .decimal_len(10, 3)
                            .null(),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::WeightUnit).string_len(16).null())
                    .col(ColumnDef::new(CannabisProductVariants::Size).string_len(64).null())
                    .col(ColumnDef::new(CannabisProductVariants::Servings).integer().null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::QuantityAvailable)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::QuantityReserved)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::QuantityOnFloor)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::QuantityInBack)
                            .decimal_len(10, 2)
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::LowStockThreshold)
                            .integer()
                            .not_null()
                            .default(10),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::ReorderPoint)
                            .integer()
                            .not_null()
                            .default(5),
                    )
                    .col(ColumnDef::new(CannabisProductVariants::ImageUrl).string_len(1024).null())
                    .col(ColumnDef::new(CannabisProductVariants::Images).text().null())
                    .col(
                        ColumnDef::new(CannabisProductVariants::SyncedAt)
                            .timestamp_with_time_zone()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CannabisProductVariants::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cannabis_product_variants_product")
                            .from(CannabisProductVariants::Table, CannabisProductVariants::ProductId)
                            .to(CannabisProducts::Table, CannabisProducts::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_cannabis_product_variants_sku_location")
                    .table(CannabisProductVariants::Table)
                    .col(CannabisProductVariants::DutchieSku)
                    .col(CannabisProductVariants::DutchieLocationId)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_product_variants_inventory_id")
                    .table(CannabisProductVariants::Table)
                    .col(CannabisProductVariants::DutchieInventoryId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_product_variants_product_id")
                    .table(CannabisProductVariants::Table)
                    .col(CannabisProductVariants::ProductId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CannabisProductVariants::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CannabisProductVariants {
    Table,
    Id,
    ProductId,
    DutchieInventoryId,
    DutchieSku,
    DutchieLocationId,
    DutchiePosInventoryId,
    StoreName,
    ThcPercentage,
    ThcPercentageMin,
    ThcPercentageMax,
    CbdPercentage,
    CbdPercentageMin,
    CbdPercentageMax,
    ThcMg,
    CbdMg,
    ThcMgPerServing,
    CbdMgPerServing,
    PotencyThcFormatted,
    PotencyCbdFormatted,
    TerpeneMyrcene,
    TerpeneLimonene,
    TerpeneCaryophyllene,
    TerpenePinene,
    TerpeneLinalool,
    TerpeneHumulene,
    TotalTerpenes,
    BatchId,
    PackageId,
    LabTestStatus,
    TestedDate,
    HarvestDate,
    PackageDate,
    ExpirationDate,
    UnitCost,
    SpecialPrice,
    SpecialPriceRec,
    SpecialPriceMed,
    PriceRec,
    PriceMed,
    NetWeight,
    NetWeightGrams,
    WeightUnit,
    Size,
    Servings,
    QuantityAvailable,
    QuantityReserved,
    QuantityOnFloor,
    QuantityInBack,
    LowStockThreshold,
    ReorderPoint,
    ImageUrl,
    Images,
    SyncedAt,
    CreatedAt,
    UpdatedAt,
}
