use calpredict_types::{QuantitySample, QuantityType, WorkoutWindow};

use crate::{
    helpers::stats::mean,
    units::{UnitConverter, UnitError},
};

/// Heart-rate samples of one window after conversion to bpm.
#[derive(Debug, Default)]
pub struct HeartRateReadings {
    pub bpm: Vec<f64>,
    /// Samples whose unit has no bpm equivalent.
    pub skipped: Vec<(QuantitySample, UnitError)>,
}

impl HeartRateReadings {
    pub fn mean(&self) -> Option<f64> {
        mean(&self.bpm)
    }
}

pub struct WorkoutCalculator;

impl WorkoutCalculator {
    /// Length of the window in minutes. Both ends share one clock, so this is
    /// a plain subtraction.
    pub fn duration_minutes(window: &WorkoutWindow) -> f64 {
        window.duration().num_milliseconds() as f64 / 60_000.0
    }

    /// Converts the heart-rate samples that start inside `window` to bpm,
    /// setting aside those whose unit cannot be converted. Samples of another
    /// quantity type are dropped.
    pub fn heart_rate_readings(window: &WorkoutWindow, samples: &[QuantitySample]) -> HeartRateReadings {
        let mut readings = HeartRateReadings::default();
        let in_window = samples
            .iter()
            .filter(|s| s.quantity_type == QuantityType::HeartRate)
            .filter(|s| window.contains(s.start));

        for sample in in_window {
            match UnitConverter::to_canonical(QuantityType::HeartRate, sample.quantity) {
                Ok(bpm) => readings.bpm.push(bpm),
                Err(error) => readings.skipped.push((*sample, error)),
            }
        }
        readings
    }

    /// Mean heart rate in bpm over the samples that start inside `window`.
    /// Returns `None` when nothing is left to average.
    pub fn average_heart_rate(window: &WorkoutWindow, samples: &[QuantitySample]) -> Option<f64> {
        Self::heart_rate_readings(window, samples).mean()
    }
}
