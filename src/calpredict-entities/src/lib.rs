pub mod authorizations;
pub mod quantity_samples;
pub mod workouts;
