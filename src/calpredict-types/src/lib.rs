#[macro_use]
extern crate serde;

pub mod units;
pub use units::{Dimension, Quantity, Unit};

pub mod metrics;
pub use metrics::{DataType, Metric, MetricState, MetricUpdate, QuantityType};

pub mod samples;
pub use samples::{QuantitySample, WorkoutRecord, WorkoutWindow};

pub mod prediction;
pub use prediction::{Gender, Prediction, PredictionError, PredictionResult};
