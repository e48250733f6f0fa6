use std::sync::Arc;

use calpredict_algos::WorkoutCalculator;
use calpredict_db::HealthStore;
use calpredict_types::WorkoutWindow;

/// Workout-scoped metrics: duration of the most recent workout and the mean
/// heart rate recorded during it.
pub struct WorkoutAggregator<S> {
    store: Arc<S>,
}

impl<S> Clone for WorkoutAggregator<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: HealthStore> WorkoutAggregator<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    pub async fn latest_workout(&self) -> Option<WorkoutWindow> {
        match self.store.latest_workout().await {
            Ok(Some(workout)) if !workout.window().is_ordered() => {
                warn!(
                    "ignoring {} workout ending before it starts ({} > {})",
                    workout.activity, workout.start, workout.end
                );
                None
            }
            Ok(Some(workout)) => Some(workout.window()),
            Ok(None) => {
                debug!("no workouts stored");
                None
            }
            Err(error) => {
                warn!("workout query failed: {}", error);
                None
            }
        }
    }

    pub fn workout_duration_minutes(window: &WorkoutWindow) -> f64 {
        WorkoutCalculator::duration_minutes(window)
    }

    pub async fn average_heart_rate(&self, window: WorkoutWindow) -> Option<f64> {
        let samples = match self.store.heart_rate_samples(window).await {
            Ok(samples) => samples,
            Err(error) => {
                warn!("heart rate query failed: {}", error);
                return None;
            }
        };

        let readings = WorkoutCalculator::heart_rate_readings(&window, &samples);
        for (sample, error) in &readings.skipped {
            warn!("skipping heart rate sample at {}: {}", sample.start, error);
        }
        readings.mean()
    }

    pub async fn latest_duration_minutes(&self) -> Option<f64> {
        let window = self.latest_workout().await?;
        Some(Self::workout_duration_minutes(&window))
    }

    /// Looks up the latest workout, then averages the heart rate inside it.
    pub async fn latest_average_heart_rate(&self) -> Option<f64> {
        let window = self.latest_workout().await?;
        self.average_heart_rate(window).await
    }
}

#[cfg(test)]
mod tests {
    use calpredict_types::Unit;
    use chrono::TimeDelta;

    use super::*;
    use crate::mock::{MockStore, base_time};

    #[tokio::test]
    async fn no_workout_skips_heart_rate_query() {
        let store = Arc::new(MockStore::granted().with_heart_rate(60, 120.0, Unit::CountPerMinute));
        let aggregator = WorkoutAggregator::new(store.clone());

        assert_eq!(aggregator.latest_duration_minutes().await, None);
        assert_eq!(aggregator.latest_average_heart_rate().await, None);
        assert_eq!(store.heart_rate_queries(), 0);
    }

    #[tokio::test]
    async fn duration_of_latest_workout() {
        let store = Arc::new(MockStore::granted().with_workout(TimeDelta::seconds(1800)));
        let aggregator = WorkoutAggregator::new(store);

        assert_eq!(aggregator.latest_duration_minutes().await, Some(30.0));
    }

    #[tokio::test]
    async fn heart_rate_mean_in_bpm() {
        let store = Arc::new(
            MockStore::granted()
                .with_workout(TimeDelta::minutes(30))
                .with_heart_rate(0, 60.0, Unit::CountPerMinute)
                .with_heart_rate(600, 80.0, Unit::CountPerMinute)
                .with_heart_rate(1200, 100.0 / 60.0, Unit::CountPerSecond),
        );
        let aggregator = WorkoutAggregator::new(store.clone());

        let mean = aggregator.latest_average_heart_rate().await.unwrap();
        assert!((mean - 80.0).abs() < 1e-9);
        assert_eq!(store.heart_rate_queries(), 1);
    }

    #[tokio::test]
    async fn empty_window_has_no_heart_rate() {
        let store = Arc::new(MockStore::granted().with_workout(TimeDelta::minutes(30)));
        let aggregator = WorkoutAggregator::new(store.clone());

        assert_eq!(aggregator.latest_average_heart_rate().await, None);
        assert_eq!(store.heart_rate_queries(), 1);
    }

    #[tokio::test]
    async fn incompatible_heart_rate_samples_are_skipped() {
        let store = Arc::new(
            MockStore::granted()
                .with_workout(TimeDelta::minutes(30))
                .with_heart_rate(0, 90.0, Unit::CountPerMinute)
                .with_heart_rate(60, 36.6, Unit::Celsius),
        );
        let aggregator = WorkoutAggregator::new(store);

        let window = WorkoutWindow::new(base_time(), base_time() + TimeDelta::minutes(30));
        assert_eq!(aggregator.average_heart_rate(window).await, Some(90.0));
    }

    #[tokio::test]
    async fn inverted_workout_is_unavailable() {
        let store = Arc::new(
            MockStore::granted()
                .with_workout(TimeDelta::minutes(-30))
                .with_heart_rate(0, 90.0, Unit::CountPerMinute),
        );
        let aggregator = WorkoutAggregator::new(store.clone());

        assert_eq!(aggregator.latest_duration_minutes().await, None);
        assert_eq!(aggregator.latest_average_heart_rate().await, None);
        assert_eq!(store.heart_rate_queries(), 0);
    }
}
