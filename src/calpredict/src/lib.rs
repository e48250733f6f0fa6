#[macro_use]
extern crate log;

pub use calpredict_algos as algo;
pub use calpredict_db::{DatabaseHandler, HealthExport, HealthStore, ImportReport, StoreError};
pub use calpredict_types as types;

mod query;
pub use query::SampleQueryEngine;

mod workout;
pub use workout::WorkoutAggregator;

mod state;
pub use state::{MetricPublisher, UpdateSink};

mod fetcher;
pub use fetcher::{FetchError, FetchTasks, HealthDataFetcher};

mod predictor;
pub use predictor::{ModelLoader, ModelSource, PredictionInvoker};

#[cfg(test)]
mod mock;
