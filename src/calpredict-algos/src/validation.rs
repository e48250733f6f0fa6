use std::ops::RangeInclusive;

use calpredict_types::{Gender, Metric, MetricState, PredictionError};

use crate::helpers::stats::finite;

const FORM_METRICS: [Metric; 5] = [
    Metric::Height,
    Metric::Weight,
    Metric::WorkoutDuration,
    Metric::HeartRate,
    Metric::BodyTemperature,
];

/// Editable form values as the user currently sees them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureForm {
    pub gender: String,
    pub age: u32,
    pub height: String,
    pub weight: String,
    pub duration: String,
    pub heart_rate: String,
    pub body_temp: String,
}

impl Default for FeatureForm {
    fn default() -> Self {
        Self {
            gender: "male".to_owned(),
            age: 25,
            height: String::new(),
            weight: String::new(),
            duration: String::new(),
            heart_rate: String::new(),
            body_temp: "37.5".to_owned(),
        }
    }
}

impl FeatureForm {
    pub fn field_mut(&mut self, metric: Metric) -> &mut String {
        match metric {
            Metric::Height => &mut self.height,
            Metric::Weight => &mut self.weight,
            Metric::HeartRate => &mut self.heart_rate,
            Metric::BodyTemperature => &mut self.body_temp,
            Metric::WorkoutDuration => &mut self.duration,
        }
    }

    /// Replaces the text of every field that has a fetched value with its
    /// display rendering. Fields without a value keep what the user typed.
    pub fn prefill(&mut self, state: &MetricState) {
        for metric in FORM_METRICS {
            if let Some(text) = state.formatted(metric) {
                *self.field_mut(metric) = text;
            }
        }
    }
}

/// A complete, parsed feature set. Only [`FeatureValidator::validate`] builds one.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PredictionInput {
    gender: Gender,
    age: u32,
    height: f64,
    weight: f64,
    duration: f64,
    heart_rate: f64,
    body_temp: f64,
}

impl PredictionInput {
    pub fn gender(&self) -> Gender {
        self.gender
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn height(&self) -> f64 {
        self.height
    }

    pub fn weight(&self) -> f64 {
        self.weight
    }

    pub fn duration(&self) -> f64 {
        self.duration
    }

    pub fn heart_rate(&self) -> f64 {
        self.heart_rate
    }

    pub fn body_temp(&self) -> f64 {
        self.body_temp
    }
}

/// Optional inclusive limits for one numeric field.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Bound {
    pub min: Option<f64>,
    pub max: Option<f64>,
}

impl Bound {
    pub fn at_least(min: f64) -> Self {
        Self {
            min: Some(min),
            max: None,
        }
    }

    pub fn between(min: f64, max: f64) -> Self {
        Self {
            min: Some(min),
            max: Some(max),
        }
    }

    fn allows(&self, value: f64) -> bool {
        self.min.is_none_or(|min| value >= min) && self.max.is_none_or(|max| value <= max)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct FieldBounds {
    pub height: Bound,
    pub weight: Bound,
    pub duration: Bound,
    pub heart_rate: Bound,
    pub body_temp: Bound,
}

impl FieldBounds {
    /// Plausibility limits used by the web form: cm, kg, min, bpm and °C.
    pub fn form_defaults() -> Self {
        Self {
            height: Bound::at_least(30.0),
            weight: Bound::at_least(10.0),
            duration: Bound::at_least(1.0),
            heart_rate: Bound::at_least(10.0),
            body_temp: Bound::between(30.0, 45.0),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct FeatureValidator {
    bounds: FieldBounds,
}

impl FeatureValidator {
    pub const AGE_RANGE: RangeInclusive<u32> = 1..=120;

    /// Parse-only validation: every numeric field must be a finite number.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_bounds(bounds: FieldBounds) -> Self {
        Self { bounds }
    }

    pub fn validate(&self, form: &FeatureForm) -> Result<PredictionInput, PredictionError> {
        let height = number_field("height", &form.height, self.bounds.height)?;
        let weight = number_field("weight", &form.weight, self.bounds.weight)?;
        let duration = number_field("duration", &form.duration, self.bounds.duration)?;
        let heart_rate = number_field("heart_rate", &form.heart_rate, self.bounds.heart_rate)?;
        let body_temp = number_field("body_temp", &form.body_temp, self.bounds.body_temp)?;

        if !Self::AGE_RANGE.contains(&form.age) {
            return Err(PredictionError::MissingOrInvalidInput { field: "age" });
        }

        Ok(PredictionInput {
            gender: Gender::from_text(&form.gender),
            age: form.age,
            height,
            weight,
            duration,
            heart_rate,
            body_temp,
        })
    }
}

fn number_field(field: &'static str, text: &str, bound: Bound) -> Result<f64, PredictionError> {
    text.trim()
        .parse::<f64>()
        .ok()
        .and_then(finite)
        .filter(|value| bound.allows(*value))
        .ok_or(PredictionError::MissingOrInvalidInput { field })
}

#[cfg(test)]
mod tests {
    use calpredict_types::MetricUpdate;

    use super::*;

    fn valid_form() -> FeatureForm {
        FeatureForm {
            gender: "female".to_owned(),
            age: 30,
            height: "165".to_owned(),
            weight: "60.0".to_owned(),
            duration: "45".to_owned(),
            heart_rate: "130".to_owned(),
            body_temp: "37.0".to_owned(),
        }
    }

    fn numeric_fields() -> [(&'static str, Metric); 5] {
        [
            ("height", Metric::Height),
            ("weight", Metric::Weight),
            ("duration", Metric::WorkoutDuration),
            ("heart_rate", Metric::HeartRate),
            ("body_temp", Metric::BodyTemperature),
        ]
    }

    #[test]
    fn valid_form_builds_input() {
        let input = FeatureValidator::new().validate(&valid_form()).unwrap();

        assert_eq!(input.gender(), Gender::Female);
        assert_eq!(input.gender().encoded(), 1.0);
        assert_eq!(input.age(), 30);
        assert_eq!(input.height(), 165.0);
        assert_eq!(input.weight(), 60.0);
        assert_eq!(input.duration(), 45.0);
        assert_eq!(input.heart_rate(), 130.0);
        assert_eq!(input.body_temp(), 37.0);
    }

    #[test]
    fn each_empty_field_is_rejected() {
        for (name, field) in numeric_fields() {
            let mut form = valid_form();
            form.field_mut(field).clear();

            assert_eq!(
                FeatureValidator::new().validate(&form),
                Err(PredictionError::MissingOrInvalidInput { field: name }),
                "empty {name} should be rejected"
            );
        }
    }

    #[test]
    fn each_non_numeric_field_is_rejected() {
        for (name, field) in numeric_fields() {
            for garbage in ["abc", "12a", "1,5", "NaN", "inf"] {
                let mut form = valid_form();
                *form.field_mut(field) = garbage.to_owned();

                assert_eq!(
                    FeatureValidator::new().validate(&form),
                    Err(PredictionError::MissingOrInvalidInput { field: name }),
                    "{name} = {garbage:?} should be rejected"
                );
            }
        }
    }

    #[test]
    fn age_outside_selector_range_is_rejected() {
        for age in [0, 121] {
            let mut form = valid_form();
            form.age = age;
            assert_eq!(
                FeatureValidator::new().validate(&form),
                Err(PredictionError::MissingOrInvalidInput { field: "age" })
            );
        }

        let mut form = valid_form();
        form.age = 120;
        assert!(FeatureValidator::new().validate(&form).is_ok());
    }

    #[test]
    fn surrounding_whitespace_is_ignored() {
        let mut form = valid_form();
        form.height = " 165 ".to_owned();
        assert_eq!(FeatureValidator::new().validate(&form).unwrap().height(), 165.0);
    }

    #[test]
    fn unrecognized_gender_maps_to_female() {
        let mut form = valid_form();
        form.gender = "unknown".to_owned();
        assert_eq!(
            FeatureValidator::new().validate(&form).unwrap().gender(),
            Gender::Female
        );

        form.gender = "MALE".to_owned();
        assert_eq!(
            FeatureValidator::new().validate(&form).unwrap().gender(),
            Gender::Male
        );
    }

    #[test]
    fn bounds_are_only_checked_when_configured() {
        let mut form = valid_form();
        form.body_temp = "50".to_owned();

        assert!(FeatureValidator::new().validate(&form).is_ok());
        assert_eq!(
            FeatureValidator::with_bounds(FieldBounds::form_defaults()).validate(&form),
            Err(PredictionError::MissingOrInvalidInput { field: "body_temp" })
        );
    }

    #[test]
    fn form_defaults_accept_typical_values() {
        let validator = FeatureValidator::with_bounds(FieldBounds::form_defaults());
        assert!(validator.validate(&valid_form()).is_ok());

        let mut form = valid_form();
        form.height = "29.9".to_owned();
        assert_eq!(
            validator.validate(&form),
            Err(PredictionError::MissingOrInvalidInput { field: "height" })
        );
    }

    #[test]
    fn prefill_uses_display_precision_and_keeps_unfetched_fields() {
        let mut state = MetricState::default();
        state.apply(MetricUpdate::new(Metric::Height, 175.4));
        state.apply(MetricUpdate::new(Metric::Weight, 70.04));
        state.apply(MetricUpdate::new(Metric::HeartRate, 128.6));

        let mut form = FeatureForm::default();
        form.duration = "40".to_owned();
        form.prefill(&state);

        assert_eq!(form.height, "175");
        assert_eq!(form.weight, "70.0");
        assert_eq!(form.heart_rate, "129");
        assert_eq!(form.duration, "40");
        assert_eq!(form.body_temp, "37.5");
    }

    #[test]
    fn default_form() {
        let form = FeatureForm::default();
        assert_eq!(form.gender, "male");
        assert_eq!(form.age, 25);
        assert_eq!(form.body_temp, "37.5");
        assert!(form.height.is_empty());
    }
}
