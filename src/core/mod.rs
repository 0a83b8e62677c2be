//! Core conversion logic and abstractions

pub mod config;
pub mod conversion;
pub mod log;
pub mod rates;
pub mod region;

// Re-export main types for cleaner imports
pub use conversion::{ConversionRequest, ConversionState, DerivedResult};
pub use rates::{RateFetcher, RateSnapshot};
