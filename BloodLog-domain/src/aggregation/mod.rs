//! Pure aggregation and classification over cached readings.
//!
//! Nothing here does I/O or holds state: every function takes the readings it
//! needs and returns fresh values, so the views can be recomputed on each
//! request.

pub mod batch;
pub mod classify;
pub mod normalize;
pub mod series;
pub mod views;

pub use batch::batch;
pub use classify::classify;
pub use normalize::normalize;
pub use series::aggregate_series;
pub use views::{filter_month, history_years, recent};
