//! Series layer
//!
//! The in-memory time-series table and its shared-access wrapper:
//! - [`types`]: `Sample`, `TimeRange`, display profiles
//! - [`frame`]: sorted, deduplicated sample table with nearest-time and
//!   per-day lookups
//! - [`store`]: async façade shared between the watcher and API handlers

pub mod frame;
pub mod store;
pub mod types;

pub use frame::SeriesFrame;
pub use store::SeriesStore;
pub use types::{Sample, SeriesProfile, TimeRange, ValueFormat};
