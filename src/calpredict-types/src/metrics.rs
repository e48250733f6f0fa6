use strum::{Display, EnumIter, EnumString};

use crate::units::Unit;

/// Sampled quantity kinds the health store keeps.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum QuantityType {
    Height,
    BodyMass,
    HeartRate,
    BodyTemperature,
}

impl QuantityType {
    /// Unit the regression model expects this quantity in.
    pub fn canonical_unit(self) -> Unit {
        match self {
            QuantityType::Height => Unit::Centimeter,
            QuantityType::BodyMass => Unit::Kilogram,
            QuantityType::HeartRate => Unit::CountPerMinute,
            QuantityType::BodyTemperature => Unit::Celsius,
        }
    }
}

/// Everything read access can be requested for.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum DataType {
    Height,
    BodyMass,
    HeartRate,
    BodyTemperature,
    Workout,
}

impl DataType {
    /// The read set needed to populate every metric.
    pub const READ_TYPES: [DataType; 5] = [
        DataType::Height,
        DataType::BodyMass,
        DataType::HeartRate,
        DataType::BodyTemperature,
        DataType::Workout,
    ];
}

impl From<QuantityType> for DataType {
    fn from(value: QuantityType) -> Self {
        match value {
            QuantityType::Height => DataType::Height,
            QuantityType::BodyMass => DataType::BodyMass,
            QuantityType::HeartRate => DataType::HeartRate,
            QuantityType::BodyTemperature => DataType::BodyTemperature,
        }
    }
}

/// The five published measurements, each in its canonical unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum Metric {
    #[strum(serialize = "Height (cm)")]
    Height,
    #[strum(serialize = "Weight (kg)")]
    Weight,
    #[strum(serialize = "Heart Rate (bpm)")]
    HeartRate,
    #[strum(serialize = "Body Temp (°C)")]
    BodyTemperature,
    #[strum(serialize = "Duration (min)")]
    WorkoutDuration,
}

impl Metric {
    /// Decimal places used when a value is rendered for editing.
    pub fn display_precision(self) -> usize {
        match self {
            Metric::Height | Metric::HeartRate | Metric::WorkoutDuration => 0,
            Metric::Weight | Metric::BodyTemperature => 1,
        }
    }

    /// Cosmetic rendering only. The model never sees this rounding unless the
    /// rendered text is fed back through validation.
    pub fn format_value(self, value: f64) -> String {
        format!("{:.*}", self.display_precision(), value)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MetricUpdate {
    pub metric: Metric,
    pub value: f64,
}

impl MetricUpdate {
    pub fn new(metric: Metric, value: f64) -> Self {
        Self { metric, value }
    }
}

/// Latest known value of every metric. `None` until a fetch produced one.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct MetricState {
    pub height: Option<f64>,
    pub weight: Option<f64>,
    pub heart_rate: Option<f64>,
    pub body_temperature: Option<f64>,
    pub workout_duration: Option<f64>,
}

impl MetricState {
    pub fn get(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Height => self.height,
            Metric::Weight => self.weight,
            Metric::HeartRate => self.heart_rate,
            Metric::BodyTemperature => self.body_temperature,
            Metric::WorkoutDuration => self.workout_duration,
        }
    }

    pub fn apply(&mut self, update: MetricUpdate) {
        let slot = match update.metric {
            Metric::Height => &mut self.height,
            Metric::Weight => &mut self.weight,
            Metric::HeartRate => &mut self.heart_rate,
            Metric::BodyTemperature => &mut self.body_temperature,
            Metric::WorkoutDuration => &mut self.workout_duration,
        };
        *slot = Some(update.value);
    }

    pub fn formatted(&self, metric: Metric) -> Option<String> {
        self.get(metric).map(|v| metric.format_value(v))
    }
}

impl std::fmt::Display for MetricState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        use strum::IntoEnumIterator;

        let mut first = true;
        for metric in Metric::iter() {
            if !first {
                writeln!(f)?;
            }
            first = false;
            let value = self.formatted(metric).unwrap_or_else(|| "-".to_owned());
            write!(f, "{metric}: {value}")?;
        }
        Ok(())
    }
}
