//! Numeric helpers: NaN-aware aggregates and percentiles.

pub mod aggregate;
pub mod percentile;

pub use aggregate::*;
pub use percentile::*;
