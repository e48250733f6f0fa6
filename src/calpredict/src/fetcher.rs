use std::sync::Arc;

use calpredict_db::{HealthStore, StoreError};
use calpredict_types::{DataType, Metric, MetricUpdate, QuantityType};
use thiserror::Error;
use tokio::task::JoinHandle;

use crate::{SampleQueryEngine, UpdateSink, WorkoutAggregator};

const SINGLE_SAMPLE_METRICS: [(Metric, QuantityType); 3] = [
    (Metric::Height, QuantityType::Height),
    (Metric::Weight, QuantityType::BodyMass),
    (Metric::BodyTemperature, QuantityType::BodyTemperature),
];

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("health data is not available")]
    Unavailable,
    #[error("read access denied for {0:?}")]
    AuthorizationDenied(Vec<DataType>),
    #[error("authorization request failed: {0}")]
    Store(StoreError),
}

impl From<StoreError> for FetchError {
    fn from(value: StoreError) -> Self {
        match value {
            StoreError::Unavailable => FetchError::Unavailable,
            StoreError::AuthorizationDenied(denied) => FetchError::AuthorizationDenied(denied),
            other => FetchError::Store(other),
        }
    }
}

/// Outstanding fetch queries. Dropping this detaches them; they still publish.
#[must_use]
pub struct FetchTasks {
    handles: Vec<JoinHandle<()>>,
}

impl FetchTasks {
    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    /// Waits until every query has resolved and published.
    pub async fn join(self) {
        for handle in self.handles {
            if let Err(error) = handle.await {
                error!("fetch task failed: {}", error);
            }
        }
    }
}

/// Pulls every metric out of a [`HealthStore`] and publishes what it finds.
pub struct HealthDataFetcher<S> {
    store: Arc<S>,
    sink: UpdateSink,
}

impl<S: HealthStore + 'static> HealthDataFetcher<S> {
    pub fn new(store: Arc<S>, sink: UpdateSink) -> Self {
        Self { store, sink }
    }

    /// Asks for read access to every data type and, once granted, starts a
    /// full fetch. On denial nothing is fetched and published state is left
    /// alone.
    pub async fn request_authorization(&self) -> Result<FetchTasks, FetchError> {
        if !self.store.is_available() {
            warn!("health store is not available");
            return Err(FetchError::Unavailable);
        }

        if let Err(error) = self.store.request_authorization(&DataType::READ_TYPES).await {
            let error = FetchError::from(error);
            info!("not fetching: {}", error);
            return Err(error);
        }

        Ok(self.fetch_all())
    }

    /// Starts one independent task per metric. Each publishes as soon as its
    /// own query resolves, in no particular order. Calling this again while
    /// earlier tasks are outstanding is fine: the last result to arrive wins.
    pub fn fetch_all(&self) -> FetchTasks {
        let mut handles = Vec::with_capacity(SINGLE_SAMPLE_METRICS.len() + 2);

        for (metric, quantity_type) in SINGLE_SAMPLE_METRICS {
            let query = SampleQueryEngine::new(Arc::clone(&self.store));
            let sink = self.sink.clone();
            handles.push(tokio::spawn(async move {
                publish(&sink, metric, query.latest_sample(quantity_type).await);
            }));
        }

        let workouts = WorkoutAggregator::new(Arc::clone(&self.store));
        let sink = self.sink.clone();
        handles.push(tokio::spawn(async move {
            publish(
                &sink,
                Metric::WorkoutDuration,
                workouts.latest_duration_minutes().await,
            );
        }));

        let workouts = WorkoutAggregator::new(Arc::clone(&self.store));
        let sink = self.sink.clone();
        handles.push(tokio::spawn(async move {
            publish(
                &sink,
                Metric::HeartRate,
                workouts.latest_average_heart_rate().await,
            );
        }));

        FetchTasks { handles }
    }
}

fn publish(sink: &UpdateSink, metric: Metric, value: Option<f64>) {
    let Some(value) = value else {
        debug!("{} unavailable, keeping previous value", metric);
        return;
    };

    if sink.send(MetricUpdate::new(metric, value)).is_err() {
        warn!("metric publisher dropped, discarding {}", metric);
    }
}
