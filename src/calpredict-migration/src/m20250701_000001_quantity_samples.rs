use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .create_table(
                Table::create()
                    .table(QuantitySamples::Table)
                    .if_not_exists()
                    .col(
                        ColumnDef::new(QuantitySamples::Id)
                            .uuid()
                            .not_null()
                            .primary_key(),
                    )
                    .col(
                        ColumnDef::new(QuantitySamples::QuantityType)
                            .string_len(32)
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuantitySamples::Value).double().not_null())
                    .col(
                        ColumnDef::new(QuantitySamples::Unit)
                            .string_len(16)
                            .not_null(),
                    )
                    .col(ColumnDef::new(QuantitySamples::Start).date_time().not_null())
                    .col(ColumnDef::new(QuantitySamples::End).date_time().not_null())
                    .to_owned(),
            )
            .await?;

        // Re-importing the same export must not duplicate samples
        manager
            .create_index(
                Index::create()
                    .name("idx_quantity_samples_type_start_end")
                    .table(QuantitySamples::Table)
                    .col(QuantitySamples::QuantityType)
                    .col(QuantitySamples::Start)
                    .col(QuantitySamples::End)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(QuantitySamples::Table).to_owned())
            .await
    }
}

#[derive(Iden)]
pub enum QuantitySamples {
    Table,
    Id,
    QuantityType,
    Value,
    Unit,
    Start,
    End,
}
