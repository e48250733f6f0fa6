pub use sea_orm_migration::prelude::*;

mod m20250701_000001_quantity_samples;
mod m20250701_000002_workouts;
mod m20250701_000003_authorizations;
mod m20250708_000004_sample_reading_key;

pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![
            Box::new(m20250701_000001_quantity_samples::Migration),
            Box::new(m20250701_000002_workouts::Migration),
            Box::new(m20250701_000003_authorizations::Migration),
            Box::new(m20250708_000004_sample_reading_key::Migration),
        ]
    }
}
