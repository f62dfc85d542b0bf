//! Data loading.

pub mod csv_loader;

pub use csv_loader::{load_bars, DataError};
