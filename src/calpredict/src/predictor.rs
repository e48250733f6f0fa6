use std::path::PathBuf;

use calpredict_algos::{FeatureVector, ModelDocument, ModelError, PredictionInput, RegressionModel};
use calpredict_types::{Prediction, PredictionError, PredictionResult};

const BUNDLED_MODEL: &str = include_str!("../models/calories_linear.json");

pub trait ModelLoader: Send + Sync {
    fn load(&self) -> Result<Box<dyn RegressionModel>, ModelError>;
}

/// Where the regression model comes from.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum ModelSource {
    /// Model compiled into the binary.
    #[default]
    Bundled,
    File(PathBuf),
}

impl From<Option<PathBuf>> for ModelSource {
    fn from(value: Option<PathBuf>) -> Self {
        value.map_or(ModelSource::Bundled, ModelSource::File)
    }
}

impl ModelLoader for ModelSource {
    fn load(&self) -> Result<Box<dyn RegressionModel>, ModelError> {
        let document = match self {
            ModelSource::Bundled => ModelDocument::from_json(BUNDLED_MODEL)?,
            ModelSource::File(path) => ModelDocument::from_path(path)?,
        };
        document.into_model()
    }
}

pub struct PredictionInvoker<L = ModelSource> {
    loader: L,
}

impl PredictionInvoker<ModelSource> {
    pub fn bundled() -> Self {
        Self::new(ModelSource::Bundled)
    }
}

impl<L: ModelLoader> PredictionInvoker<L> {
    pub fn new(loader: L) -> Self {
        Self { loader }
    }

    /// Loads the model, runs one inference and reads the named output back.
    /// Every failure is final for this request.
    pub fn predict(&self, input: &PredictionInput) -> PredictionResult {
        let model = self.loader.load().map_err(|error| {
            error!("failed to load model: {}", error);
            PredictionError::ModelInvocation(error.to_string())
        })?;

        let features = FeatureVector::from(input);
        for (name, value) in features.named() {
            trace!("{} = {}", name, value);
        }
        let output = model.predict(&features).map_err(|error| {
            error!("model prediction failed: {}", error);
            PredictionError::ModelInvocation(error.to_string())
        })?;

        let Some(value) = output.feature(model.output_name()) else {
            error!(
                "model output has no `{}` feature, got {:?}",
                model.output_name(),
                output.feature_names().collect::<Vec<_>>()
            );
            return Err(PredictionError::NoOutput);
        };

        match value.as_f64().filter(|kcal| kcal.is_finite()) {
            Some(kcal) => Ok(Prediction::new(kcal)),
            None => {
                error!("model output `{}` is not a number: {:?}", model.output_name(), value);
                Err(PredictionError::NoOutput)
            }
        }
    }
}
