pub(crate) mod units;
pub use units::{UnitConverter, UnitError};

pub(crate) mod workout;
pub use workout::{HeartRateReadings, WorkoutCalculator};

pub(crate) mod validation;
pub use validation::{Bound, FeatureForm, FeatureValidator, FieldBounds, PredictionInput};

pub mod model;
pub use model::{
    FeatureVector, LinearRegressionModel, ModelDocument, ModelError, RegressionModel, TreeEnsemble,
};

pub mod helpers;
