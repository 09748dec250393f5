use sea_orm_migration::prelude::*;

pub struct Migration;

impl MigrationName for Migration {
    fn name(&self) -> &str {
        "m20250301_000002_create_cannabis_strains_table"
    }
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(CannabisStrains::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(CannabisStrains::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(ColumnDef::new(CannabisStrains::Name).string_len(255).not_null())
                    .col(ColumnDef::new(CannabisStrains::NameKey).string_len(1024).not_null())
                    .col(
                        ColumnDef::new(CannabisStrains::Active)
                            .boolean()
                            .not_null()
                            .default(true),
                    )
                    .col(
                        ColumnDef::new(CannabisStrains::StrainType)
                            .string_len(32)
                            .not_null()
                            .default("hybrid"),
                    )
                    .col(ColumnDef::new(CannabisStrains::ParentStrain1Id).uuid().null())
                    .col(ColumnDef::new(CannabisStrains::ParentStrain2Id).uuid().null())
                    .col(ColumnDef::new(CannabisStrains::Genetics).string_len(255).null())
                    .col(ColumnDef::new(CannabisStrains::Breeder).string_len(255).null())
                    .col(ColumnDef::new(CannabisStrains::Effects).text().null())
                    .col(ColumnDef::new(CannabisStrains::MedicalUses).text().null())
                    .col(ColumnDef::new(CannabisStrains::Flavors).text().null())
                    .col(ColumnDef::new(CannabisStrains::Aromas).text().null())
                    .col(ColumnDef::new(CannabisStrains::TypicalThcMin).double().null())
                    .col(ColumnDef::new(CannabisStrains::TypicalThcMax).double().null())
                    .col(ColumnDef::new(CannabisStrains::TypicalCbdMin).double().null())
                    .col(ColumnDef::new(CannabisStrains::TypicalCbdMax).double().null())
                    .col(ColumnDef::new(CannabisStrains::DominantTerpene).string_len(32).null())
                    .col(ColumnDef::new(CannabisStrains::TerpeneProfile).text().null())
                    .col(ColumnDef::new(CannabisStrains::Description).text().null())
                    .col(ColumnDef::new(CannabisStrains::Notes).text().null())
                    .col(
                        ColumnDef::new(CannabisStrains::ProductCount)
                            .integer()
                            .not_null()
                            .default(0),
                    )
                    .col(
                        ColumnDef::new(CannabisStrains::CreatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .col(
                        ColumnDef::new(CannabisStrains::UpdatedAt)
                            .timestamp_with_time_zone()
                            .not_null()
                            .default(Expr::current_timestamp()),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cannabis_strains_parent_1")
                            .from(CannabisStrains::Table, CannabisStrains::ParentStrain1Id)
                            .to(CannabisStrains::Table, CannabisStrains::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .name("fk_cannabis_strains_parent_2")
                            .from(CannabisStrains::Table, CannabisStrains::ParentStrain2Id)
                            .to(CannabisStrains::Table, CannabisStrains::Id)
                            .on_delete(ForeignKeyAction::SetNull),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("uq_cannabis_strains_name")
                    .table(CannabisStrains::Table)
                    .col(CannabisStrains::Name)
                    .unique()
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name("idx_cannabis_strains_name_key")
                    .table(CannabisStrains::Table)
                    .col(CannabisStrains::NameKey)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(CannabisStrains::Table).to_owned())
            .await
    }
}

#[derive(DeriveIden)]
pub enum CannabisStrains {
    Table,
    Id,
    Name,
    NameKey,
    Active,
    StrainType,
    #[sea_orm(iden = "parent_strain_1_id")]
    ParentStrain1Id,
    #[sea_orm(iden = "parent_strain_2_id")]
    ParentStrain2Id,
    Genetics,
    Breeder,
    Effects,
    MedicalUses,
    Flavors,
    Aromas,
    TypicalThcMin,
    TypicalThcMax,
    TypicalCbdMin,
    TypicalCbdMax,
    DominantTerpene,
    TerpeneProfile,
    Description,
    Notes,
    ProductCount,
    CreatedAt,
    UpdatedAt,
}
