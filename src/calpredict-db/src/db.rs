use async_trait::async_trait;
use calpredict_entities::authorizations;
use calpredict_migration::{Migrator, MigratorTrait, OnConflict};
use calpredict_types::{DataType, QuantitySample, QuantityType, WorkoutRecord, WorkoutWindow};
use sea_orm::{ColumnTrait, ConnectOptions, Database, DatabaseConnection, EntityTrait, QueryFilter, Set};

use crate::{HealthStore, SearchSamples, StoreError};

#[derive(Clone)]
pub struct DatabaseHandler {
    pub(crate) db: DatabaseConnection,
}

impl DatabaseHandler {
    /// Connects and brings the schema up to date.
    pub async fn new<C>(path: C) -> anyhow::Result<Self>
    where
        C: Into<ConnectOptions>,
    {
        let db = Database::connect(path).await?;
        Migrator::up(&db, None).await?;

        Ok(Self { db })
    }

    pub async fn set_authorization(&self, data_types: &[DataType], granted: bool) -> anyhow::Result<()> {
        if data_types.is_empty() {
            return Ok(());
        }

        let models = data_types.iter().map(|data_type| authorizations::ActiveModel {
            data_type: Set(data_type.to_string()),
            granted: Set(granted),
        });

        authorizations::Entity::insert_many(models)
            .on_conflict(
                OnConflict::column(authorizations::Column::DataType)
                    .update_column(authorizations::Column::Granted)
                    .to_owned(),
            )
            .exec(&self.db)
            .await?;

        Ok(())
    }

    pub async fn granted_types(&self) -> anyhow::Result<Vec<DataType>> {
        let granted = authorizations::Entity::find()
            .filter(authorizations::Column::Granted.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .filter_map(|model| match model.data_type.parse() {
                Ok(data_type) => Some(data_type),
                Err(_) => {
                    log::warn!("ignoring grant for unknown data type `{}`", model.data_type);
                    None
                }
            })
            .collect();

        Ok(granted)
    }
}

#[async_trait]
impl HealthStore for DatabaseHandler {
    async fn request_authorization(&self, read_types: &[DataType]) -> Result<(), StoreError> {
        let granted = authorizations::Entity::find()
            .filter(authorizations::Column::Granted.eq(true))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|model| model.data_type)
            .collect::<Vec<_>>();

        let denied = read_types
            .iter()
            .filter(|data_type| !granted.contains(&data_type.to_string()))
            .copied()
            .collect::<Vec<_>>();

        if denied.is_empty() {
            Ok(())
        } else {
            Err(StoreError::AuthorizationDenied(denied))
        }
    }

    async fn latest_quantity_sample(
        &self,
        quantity_type: QuantityType,
    ) -> Result<Option<QuantitySample>, StoreError> {
        self.get_latest_sample(quantity_type).await
    }

    async fn latest_workout(&self) -> Result<Option<WorkoutRecord>, StoreError> {
        self.get_latest_workout().await
    }

    async fn heart_rate_samples(
        &self,
        window: WorkoutWindow,
    ) -> Result<Vec<QuantitySample>, StoreError> {
        self.search_samples(SearchSamples {
            quantity_type: Some(QuantityType::HeartRate),
            from: Some(window.start),
            to: Some(window.end),
        })
        .await
    }
}
