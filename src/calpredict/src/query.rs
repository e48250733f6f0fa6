use std::sync::Arc;

use calpredict_algos::UnitConverter;
use calpredict_db::HealthStore;
use calpredict_types::QuantityType;

/// Answers "most recent value of X" in canonical units.
pub struct SampleQueryEngine<S> {
    store: Arc<S>,
}

impl<S> Clone for SampleQueryEngine<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: HealthStore> SampleQueryEngine<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// One store round trip, no retry. `None` covers an empty store, a failed
    /// query and a unit that cannot be normalized alike.
    pub async fn latest_sample(&self, quantity_type: QuantityType) -> Option<f64> {
        let sample = match self.store.latest_quantity_sample(quantity_type).await {
            Ok(Some(sample)) => sample,
            Ok(None) => {
                debug!("no {} samples stored", quantity_type);
                return None;
            }
            Err(error) => {
                warn!("{} query failed: {}", quantity_type, error);
                return None;
            }
        };

        match UnitConverter::to_canonical(quantity_type, sample.quantity) {
            Ok(value) => Some(value),
            Err(error) => {
                warn!("skipping {} sample: {}", quantity_type, error);
                None
            }
        }
    }
}
