use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male = 0,
    Female = 1,
}

impl Gender {
    /// Binary mapping: `"male"` in any letter case is [`Gender::Male`],
    /// every other string is [`Gender::Female`].
    pub fn from_text(text: &str) -> Self {
        if text.eq_ignore_ascii_case("male") {
            Gender::Male
        } else {
            Gender::Female
        }
    }

    /// Numeric encoding fed to the model.
    pub fn encoded(self) -> f64 {
        f64::from(self as u8)
    }
}

/// Predicted energy expenditure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    kcal: f64,
}

impl Prediction {
    pub fn new(kcal: f64) -> Self {
        Self { kcal }
    }

    pub fn kcal(&self) -> f64 {
        self.kcal
    }
}

impl std::fmt::Display for Prediction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:.1}", self.kcal)
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum PredictionError {
    #[error("missing or invalid input in field `{field}`")]
    MissingOrInvalidInput { field: &'static str },
    #[error("model invocation failed: {0}")]
    ModelInvocation(String),
    #[error("model returned no usable output")]
    NoOutput,
}

impl PredictionError {
    /// Short text shown in place of a prediction.
    pub fn user_message(&self) -> &'static str {
        match self {
            PredictionError::MissingOrInvalidInput { .. } => "Missing or invalid input",
            PredictionError::ModelInvocation(_) => "Error",
            PredictionError::NoOutput => "No output",
        }
    }
}

pub type PredictionResult = Result<Prediction, PredictionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn male_in_any_case() {
        for text in ["male", "Male", "MALE", "mAlE"] {
            assert_eq!(Gender::from_text(text), Gender::Male);
            assert_eq!(Gender::from_text(text).encoded(), 0.0);
        }
    }

    #[test]
    fn anything_else_is_female() {
        for text in ["female", "Female", "other", "m", "males", " male"] {
            assert_eq!(Gender::from_text(text), Gender::Female);
            assert_eq!(Gender::from_text(text).encoded(), 1.0);
        }
    }

    #[test]
    fn prediction_renders_one_decimal() {
        assert_eq!(Prediction::new(231.04).to_string(), "231.0");
        assert_eq!(Prediction::new(99.96).to_string(), "100.0");
    }

    #[test]
    fn user_messages() {
        let missing = PredictionError::MissingOrInvalidInput { field: "height" };
        assert_eq!(missing.user_message(), "Missing or invalid input");
        assert_eq!(
            PredictionError::ModelInvocation("boom".into()).user_message(),
            "Error"
        );
        assert_eq!(PredictionError::NoOutput.user_message(), "No output");
        assert!(missing.to_string().contains("height"));
    }
}
