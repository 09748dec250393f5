use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000001_create_cannabis_brands_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CannabisBrands::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CannabisBrands::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CannabisBrands::Name).string_len(255).not_null())
                    .col(ColumnDef::new(CannabisBrands::NameKey).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(CannabisBrands::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(ColumnDef::new(CannabisBrands::DutchieBrandId).string_len(128).null())
                    .col(ColumnDef::new(CannabisBrands::DisplayName).string_len(255).null())
                    .col(ColumnDef::new(CannabisBrands::Code).string_len(64).null())
                    .col(
                        ColumnDef::new(CannabisBrands::BrandType)
                            .string_len(32)
                            .not_null()
                            .default("manufacturer"),
                    )
                    .col(ColumnDef::new(CannabisBrands::Website).string_len(1024).null())
                    .col(ColumnDef::new(CannabisBrands::Email).string_len(255).null())
                    .col(ColumnDef::new(CannabisBrands::Phone).string_len(64).null())
                    .col(ColumnDef::new(CannabisBrands::Street).string_len(255).null())
                    .col(ColumnDef::new(CannabisBrands::Street2).string_len(255).null())
                    .col(ColumnDef::new(CannabisBrands::City).string_len(128).null())
                    .col(ColumnDef::new(CannabisBrands::StateCode).string_len(16).null())
                    .col(ColumnDef::new(CannabisBrands::Zip).string_len(16).null())
                    .col(ColumnDef::new(CannabisBrands::CountryCode).string_len(8).null())
                    .col(ColumnDef::new(CannabisBrands::LicenseNumber).string_len(128).null())
                    .col(ColumnDef::new(CannabisBrands::LicenseType).string_len(32).null())
                    .col(ColumnDef::new(CannabisBrands::LicenseExpiry).date().null())
                    .col(ColumnDef::new(CannabisBrands::Description).text().null())
                    .col(
                        ColumnDef::new(CannabisBrands::Featured)
                            .boolean()
                            .not_null()
                            .default(false),
                    )
                    .col(ColumnDef::new(CannabisBrands::Specialty).string_len(32).null())
                    .col(ColumnDef::new(CannabisBrands::Notes).text().null())
                    .col(
                        ColumnDef::new(CannabisBrands::ProductCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CannabisBrands::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CannabisBrands::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_cannabis_brands_name")
                    .table(CannabisBrands::Table)
                    .col(CannabisBrands::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_brands_name_key")
                    .table(CannabisBrands::Table)
                    .col(CannabisBrands::NameKey)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_brands_dutchie_brand_id")
                    .table(CannabisBrands::Table)
                    .col(CannabisBrands::DutchieBrandId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CannabisBrands::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CannabisBrands {
    Table,
    Id,
    Name,
    NameKey,
    Active,
    DutchieBrandId,
    DisplayName,
    Code,
    BrandType,
    Website,
    Email,
    Phone,
    Street,
    Street2,
    City,
    StateCode,
    Zip,
    CountryCode,
    LicenseNumber,
    LicenseType,
    LicenseExpiry,
    Description,
    Featured,
    Specialty,
    Notes,
    ProductCount,
    CreatedAt,
    UpdatedAt,
}
