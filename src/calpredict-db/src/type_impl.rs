pub mod import;
pub mod quantity;
pub mod workouts;
