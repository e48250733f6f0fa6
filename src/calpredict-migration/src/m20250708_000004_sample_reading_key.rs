use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

const OLD_INDEX: &str = "idx_quantity_samples_type_start_end";
const READING_INDEX: &str = "idx_quantity_samples_reading";

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(OLD_INDEX)
                    .table(QuantitySamples::Table)
                    .to_owned(),
            )
            .await?;

        // Two sources may record different values over the same span
        manager
            .create_index(
                Index::create()
                    .name(READING_INDEX)
                    .table(QuantitySamples::Table)
                    .col(QuantitySamples::QuantityType)
                    .col(QuantitySamples::Start)
                    .col(QuantitySamples::End)
                    .col(QuantitySamples::Value)
                    .col(QuantitySamples::Unit)
                    .unique()
                    .to_owned(),
            )
            .await
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_index(
                Index::drop()
                    .name(READING_INDEX)
                    .table(QuantitySamples::Table)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .name(OLD_INDEX)
                    .table(QuantitySamples::Table)
                    .col(QuantitySamples::QuantityType)
                    .col(QuantitySamples::Start)
                    .col(QuantitySamples::End)
                    .unique()
                    .to_owned(),
            )
            .await
    }
}

#[derive(Iden)]
enum QuantitySamples {
    Table,
    QuantityType,
    Value,
    Unit,
    Start,
    End,
}
