pub mod bar_buffer;
pub mod series;

// Re-export the Bar struct for convenient access (e.g. `use crate::market_data::Bar`).
pub use bar_buffer::{Bar, BarBuffer, BarKey};
pub use series::{trailing, PriceSeries};
