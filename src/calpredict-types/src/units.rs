use strum::{Display, EnumIter, EnumString};

/// Physical dimension a [`Unit`] measures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Dimension {
    Length,
    Mass,
    Frequency,
    Temperature,
}

/// Units a stored measurement may carry.
///
/// The string forms are what the store persists in its `unit` column and
/// what export files use.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, EnumIter,
)]
pub enum Unit {
    #[serde(rename = "m")]
    #[strum(serialize = "m")]
    Meter,
    #[serde(rename = "cm")]
    #[strum(serialize = "cm")]
    Centimeter,
    #[serde(rename = "mm")]
    #[strum(serialize = "mm")]
    Millimeter,
    #[serde(rename = "in")]
    #[strum(serialize = "in")]
    Inch,
    #[serde(rename = "ft")]
    #[strum(serialize = "ft")]
    Foot,
    #[serde(rename = "kg")]
    #[strum(serialize = "kg")]
    Kilogram,
    #[serde(rename = "g")]
    #[strum(serialize = "g")]
    Gram,
    #[serde(rename = "lb")]
    #[strum(serialize = "lb")]
    Pound,
    #[serde(rename = "count/min", alias = "bpm")]
    #[strum(to_string = "count/min", serialize = "bpm")]
    CountPerMinute,
    #[serde(rename = "count/s")]
    #[strum(serialize = "count/s")]
    CountPerSecond,
    #[serde(rename = "degC")]
    #[strum(serialize = "degC")]
    Celsius,
    #[serde(rename = "degF")]
    #[strum(serialize = "degF")]
    Fahrenheit,
    #[serde(rename = "K")]
    #[strum(serialize = "K")]
    Kelvin,
}

impl Unit {
    pub fn dimension(self) -> Dimension {
        match self {
            Unit::Meter | Unit::Centimeter | Unit::Millimeter | Unit::Inch | Unit::Foot => {
                Dimension::Length
            }
            Unit::Kilogram | Unit::Gram | Unit::Pound => Dimension::Mass,
            Unit::CountPerMinute | Unit::CountPerSecond => Dimension::Frequency,
            Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => Dimension::Temperature,
        }
    }
}

/// A raw value together with the unit it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Quantity {
    pub value: f64,
    pub unit: Unit,
}

impl Quantity {
    pub fn new(value: f64, unit: Unit) -> Self {
        Self { value, unit }
    }
}

impl std::fmt::Display for Quantity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.value, self.unit)
    }
}
