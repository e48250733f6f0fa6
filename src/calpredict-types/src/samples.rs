use chrono::{NaiveDateTime, TimeDelta};

use crate::{metrics::QuantityType, units::Quantity};

/// One stored measurement, still in the unit it was recorded in.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QuantitySample {
    #[serde(rename = "type")]
    pub quantity_type: QuantityType,
    #[serde(flatten)]
    pub quantity: Quantity,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl QuantitySample {
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorkoutRecord {
    pub activity: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WorkoutRecord {
    pub fn window(&self) -> WorkoutWindow {
        WorkoutWindow {
            start: self.start,
            end: self.end,
        }
    }
}

/// Time span of a workout, used to scope heart-rate aggregation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WorkoutWindow {
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

impl WorkoutWindow {
    pub fn new(start: NaiveDateTime, end: NaiveDateTime) -> Self {
        Self { start, end }
    }

    /// `false` when the window ends before it starts.
    pub fn is_ordered(&self) -> bool {
        self.start <= self.end
    }

    pub fn duration(&self) -> TimeDelta {
        self.end - self.start
    }

    /// Closed-interval containment on the sample start: samples starting
    /// exactly at `start` or exactly at `end` both belong to the window.
    pub fn contains(&self, time: NaiveDateTime) -> bool {
        self.start <= time && time <= self.end
    }
}
