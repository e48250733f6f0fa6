mod db;
pub use db::DatabaseHandler;

mod store;
pub use store::{HealthStore, StoreError};

mod type_impl;
pub use type_impl::import::{HealthExport, ImportReport};
pub use type_impl::quantity::SearchSamples;
