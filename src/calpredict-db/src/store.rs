use async_trait::async_trait;
use calpredict_types::{DataType, QuantitySample, QuantityType, WorkoutRecord, WorkoutWindow};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("health data is not available")]
    Unavailable,
    #[error("read access denied for {0:?}")]
    AuthorizationDenied(Vec<DataType>),
    #[error("database error: {0}")]
    Database(#[from] sea_orm::DbErr),
    #[error("corrupt row: {0}")]
    CorruptRow(String),
}

/// Source of health measurements.
///
/// Every query is a single round trip and is never retried here. Results come
/// back in the unit they were recorded in; normalization is up to the caller.
#[async_trait]
pub trait HealthStore: Send + Sync {
    fn is_available(&self) -> bool {
        true
    }

    /// Succeeds only if read access is granted for every type in `read_types`.
    async fn request_authorization(&self, read_types: &[DataType]) -> Result<(), StoreError>;

    /// Most recent sample of `quantity_type` by end time.
    async fn latest_quantity_sample(
        &self,
        quantity_type: QuantityType,
    ) -> Result<Option<QuantitySample>, StoreError>;

    /// Most recent workout by end time.
    async fn latest_workout(&self) -> Result<Option<WorkoutRecord>, StoreError>;

    /// All heart-rate samples starting inside `window` (start inclusive).
    async fn heart_rate_samples(
        &self,
        window: WorkoutWindow,
    ) -> Result<Vec<QuantitySample>, StoreError>;
}
