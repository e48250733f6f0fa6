use calpredict_types::{Dimension, Quantity, QuantityType, Unit};
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum UnitError {
    #[error("cannot convert {from} ({from_dimension}) to {to} ({to_dimension})")]
    Incompatible {
        from: Unit,
        from_dimension: Dimension,
        to: Unit,
        to_dimension: Dimension,
    },
}

pub struct UnitConverter;

impl UnitConverter {
    /// Brings a stored quantity into the unit the model expects for its type.
    pub fn to_canonical(quantity_type: QuantityType, quantity: Quantity) -> Result<f64, UnitError> {
        Self::convert(quantity, quantity_type.canonical_unit())
    }

    /// Converts between two units of the same dimension. No rounding.
    pub fn convert(quantity: Quantity, target: Unit) -> Result<f64, UnitError> {
        let from = quantity.unit;
        if from.dimension() != target.dimension() {
            return Err(UnitError::Incompatible {
                from,
                from_dimension: from.dimension(),
                to: target,
                to_dimension: target.dimension(),
            });
        }

        if from == target {
            return Ok(quantity.value);
        }

        match from.dimension() {
            Dimension::Temperature => Ok(from_celsius(to_celsius(quantity.value, from), target)),
            _ => Ok(quantity.value * scale(from) / scale(target)),
        }
    }
}

/// Size of one `unit` in the smallest unit of its dimension (mm, g, count/min),
/// so the common conversions stay exact in floating point.
fn scale(unit: Unit) -> f64 {
    match unit {
        Unit::Millimeter => 1.0,
        Unit::Centimeter => 10.0,
        Unit::Meter => 1_000.0,
        Unit::Inch => 25.4,
        Unit::Foot => 304.8,
        Unit::Gram => 1.0,
        Unit::Kilogram => 1_000.0,
        Unit::Pound => 453.592_37,
        Unit::CountPerMinute => 1.0,
        Unit::CountPerSecond => 60.0,
        Unit::Celsius | Unit::Fahrenheit | Unit::Kelvin => 1.0,
    }
}

fn to_celsius(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Fahrenheit => (value - 32.0) * 5.0 / 9.0,
        Unit::Kelvin => value - 273.15,
        _ => value,
    }
}

fn from_celsius(value: f64, unit: Unit) -> f64 {
    match unit {
        Unit::Fahrenheit => value * 9.0 / 5.0 + 32.0,
        Unit::Kelvin => value + 273.15,
        _ => value,
    }
}
