//! Regression model surface.
//!
//! The pipeline treats the model as a black box: it hands over a
//! [`FeatureVector`] and reads one named feature back out of the
//! [`ModelOutput`]. [`ModelDocument`] is the on-disk form of the models this
//! crate knows how to evaluate: a linear fit, or a random forest or boosted
//! tree ensemble.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::validation::PredictionInput;

mod ensemble;
pub use ensemble::{Aggregation, EnsembleModel, RegressionTree, TreeEnsemble, TreeNode};

/// Input feature names, in the order the model consumes them.
pub const FEATURE_NAMES: [&str; 7] = [
    "Gender",
    "Age",
    "Height",
    "Weight",
    "Duration",
    "Heart_Rate",
    "Body_Temp",
];

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FeatureVector([f64; 7]);

impl FeatureVector {
    pub fn values(&self) -> &[f64; 7] {
        &self.0
    }

    pub fn named(&self) -> impl Iterator<Item = (&'static str, f64)> + '_ {
        FEATURE_NAMES.iter().copied().zip(self.0.iter().copied())
    }
}

impl From<&PredictionInput> for FeatureVector {
    fn from(input: &PredictionInput) -> Self {
        Self([
            input.gender().encoded(),
            f64::from(input.age()),
            input.height(),
            input.weight(),
            input.duration(),
            input.heart_rate(),
            input.body_temp(),
        ])
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FeatureValue {
    Double(f64),
    Int(i64),
    Text(String),
}

impl FeatureValue {
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            FeatureValue::Double(v) => Some(*v),
            FeatureValue::Int(v) => Some(*v as f64),
            FeatureValue::Text(_) => None,
        }
    }
}

/// Named outputs of one inference call, in the order the model produced them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ModelOutput {
    features: Vec<(String, FeatureValue)>,
}

impl ModelOutput {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_feature(mut self, name: impl Into<String>, value: FeatureValue) -> Self {
        self.features.push((name.into(), value));
        self
    }

    pub fn feature(&self, name: &str) -> Option<&FeatureValue> {
        self.features
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, value)| value)
    }

    pub fn feature_names(&self) -> impl Iterator<Item = &str> {
        self.features.iter().map(|(n, _)| n.as_str())
    }
}

#[derive(Debug, Error)]
pub enum ModelError {
    #[error("unable to read model file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("malformed model document: {0}")]
    Format(#[from] serde_json::Error),
    #[error("model inputs {found:?} do not match the feature order {:?}", FEATURE_NAMES)]
    InputMismatch { found: Vec<String> },
    #[error("expected {expected} coefficients, found {found}")]
    CoefficientCount { expected: usize, found: usize },
    #[error("model parameters must be finite")]
    NonFiniteParameter,
    #[error("tree ensemble has no trees")]
    EmptyEnsemble,
    #[error("tree {tree}, node {node}: {reason}")]
    MalformedTree {
        tree: usize,
        node: usize,
        reason: &'static str,
    },
    #[error("inference failed: {0}")]
    Inference(String),
}

fn check_inputs(inputs: &[String]) -> Result<(), ModelError> {
    if inputs.iter().map(String::as_str).ne(FEATURE_NAMES) {
        return Err(ModelError::InputMismatch {
            found: inputs.to_vec(),
        });
    }
    Ok(())
}

pub trait RegressionModel: Send + Sync {
    /// Feature the prediction is reported under.
    fn output_name(&self) -> &str;

    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, ModelError>;
}

/// Ordinary least squares fit: `intercept + Σ coefficient_i · feature_i`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LinearRegressionModel {
    pub inputs: Vec<String>,
    pub output: String,
    pub intercept: f64,
    pub coefficients: Vec<f64>,
}

impl LinearRegressionModel {
    fn check(&self) -> Result<(), ModelError> {
        check_inputs(&self.inputs)?;

        if self.coefficients.len() != FEATURE_NAMES.len() {
            return Err(ModelError::CoefficientCount {
                expected: FEATURE_NAMES.len(),
                found: self.coefficients.len(),
            });
        }

        if !self.intercept.is_finite() || self.coefficients.iter().any(|c| !c.is_finite()) {
            return Err(ModelError::NonFiniteParameter);
        }

        Ok(())
    }
}

impl RegressionModel for LinearRegressionModel {
    fn output_name(&self) -> &str {
        &self.output
    }

    fn predict(&self, features: &FeatureVector) -> Result<ModelOutput, ModelError> {
        if self.coefficients.len() != features.values().len() {
            return Err(ModelError::Inference(format!(
                "model has {} coefficients for {} features",
                self.coefficients.len(),
                features.values().len()
            )));
        }

        let value = self
            .coefficients
            .iter()
            .zip(features.values())
            .map(|(c, x)| c * x)
            .sum::<f64>()
            + self.intercept;

        Ok(ModelOutput::new().with_feature(self.output.clone(), FeatureValue::Double(value)))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ModelDocument {
    LinearRegression(LinearRegressionModel),
    RandomForest(TreeEnsemble),
    #[serde(alias = "xgboost")]
    GradientBoostedTrees(TreeEnsemble),
}

impl ModelDocument {
    pub fn from_json(json: &str) -> Result<Self, ModelError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_path(path: &Path) -> Result<Self, ModelError> {
        let json = std::fs::read_to_string(path).map_err(|source| ModelError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Checks the parameters and hands back an evaluable model.
    pub fn into_model(self) -> Result<Box<dyn RegressionModel>, ModelError> {
        match self {
            ModelDocument::LinearRegression(model) => {
                model.check()?;
                Ok(Box::new(model))
            }
            ModelDocument::RandomForest(ensemble) => {
                Ok(Box::new(EnsembleModel::new(ensemble, Aggregation::Mean)?))
            }
            ModelDocument::GradientBoostedTrees(ensemble) => {
                Ok(Box::new(EnsembleModel::new(ensemble, Aggregation::Sum)?))
            }
        }
    }
}
