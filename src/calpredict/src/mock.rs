use std::{
    collections::{HashMap, VecDeque},
    sync::{
        Mutex,
        atomic::{AtomicUsize, Ordering},
    },
    time::Duration,
};

use async_trait::async_trait;
use calpredict_db::{HealthStore, StoreError};
use calpredict_types::{
    DataType, Quantity, QuantitySample, QuantityType, Unit, WorkoutRecord, WorkoutWindow,
};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta};

pub fn base_time() -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2025, 1, 1)
        .unwrap()
        .and_hms_opt(8, 0, 0)
        .unwrap()
}

/// In-memory store with call counters. Scripted heights are handed out one
/// per query, each resolving after its own delay.
#[derive(Default)]
pub struct MockStore {
    unavailable: bool,
    denied: bool,
    failing_samples: bool,
    samples: HashMap<QuantityType, Quantity>,
    scripted_heights: Mutex<VecDeque<(f64, Duration)>>,
    workout: Option<WorkoutRecord>,
    heart_rate: Vec<QuantitySample>,
    authorization_requests: AtomicUsize,
    sample_queries: AtomicUsize,
    heart_rate_queries: AtomicUsize,
}

impl MockStore {
    pub fn granted() -> Self {
        Self::default()
    }

    pub fn denied(mut self) -> Self {
        self.denied = true;
        self
    }

    pub fn unavailable(mut self) -> Self {
        self.unavailable = true;
        self
    }

    pub fn failing_samples(mut self) -> Self {
        self.failing_samples = true;
        self
    }

    pub fn with_sample(mut self, quantity_type: QuantityType, value: f64, unit: Unit) -> Self {
        self.samples.insert(quantity_type, Quantity::new(value, unit));
        self
    }

    pub fn with_scripted_height(self, centimeters: f64, delay: Duration) -> Self {
        self.scripted_heights
            .lock()
            .unwrap()
            .push_back((centimeters, delay));
        self
    }

    /// Workout starting at [`base_time`].
    pub fn with_workout(mut self, length: TimeDelta) -> Self {
        self.workout = Some(WorkoutRecord {
            activity: "running".to_owned(),
            start: base_time(),
            end: base_time() + length,
        });
        self
    }

    pub fn with_heart_rate(mut self, offset_secs: i64, value: f64, unit: Unit) -> Self {
        let start = base_time() + TimeDelta::seconds(offset_secs);
        self.heart_rate.push(QuantitySample {
            quantity_type: QuantityType::HeartRate,
            quantity: Quantity::new(value, unit),
            start,
            end: start,
        });
        self
    }

    fn next_scripted_height(&self) -> Option<(f64, Duration)> {
        self.scripted_heights.lock().unwrap().pop_front()
    }

    pub fn authorization_requests(&self) -> usize {
        self.authorization_requests.load(Ordering::SeqCst)
    }

    pub fn sample_queries(&self) -> usize {
        self.sample_queries.load(Ordering::SeqCst)
    }

    pub fn heart_rate_queries(&self) -> usize {
        self.heart_rate_queries.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl HealthStore for MockStore {
    fn is_available(&self) -> bool {
        !self.unavailable
    }

    async fn request_authorization(&self, read_types: &[DataType]) -> Result<(), StoreError> {
        self.authorization_requests.fetch_add(1, Ordering::SeqCst);
        if self.denied {
            return Err(StoreError::AuthorizationDenied(read_types.to_vec()));
        }
        Ok(())
    }

    async fn latest_quantity_sample(
        &self,
        quantity_type: QuantityType,
    ) -> Result<Option<QuantitySample>, StoreError> {
        self.sample_queries.fetch_add(1, Ordering::SeqCst);
        if self.failing_samples {
            return Err(StoreError::CorruptRow("broken".to_owned()));
        }

        let scripted = match quantity_type {
            QuantityType::Height => self.next_scripted_height(),
            _ => None,
        };
        let quantity = match scripted {
            Some((centimeters, delay)) => {
                tokio::time::sleep(delay).await;
                Some(Quantity::new(centimeters, Unit::Centimeter))
            }
            None => self.samples.get(&quantity_type).copied(),
        };

        Ok(quantity.map(|quantity| QuantitySample {
            quantity_type,
            quantity,
            start: base_time(),
            end: base_time(),
        }))
    }

    async fn latest_workout(&self) -> Result<Option<WorkoutRecord>, StoreError> {
        Ok(self.workout.clone())
    }

    async fn heart_rate_samples(
        &self,
        window: WorkoutWindow,
    ) -> Result<Vec<QuantitySample>, StoreError> {
        self.heart_rate_queries.fetch_add(1, Ordering::SeqCst);
        Ok(self
            .heart_rate
            .iter()
            .filter(|sample| window.contains(sample.start))
            .copied()
            .collect())
    }
}
