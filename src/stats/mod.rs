//! Stats module - geographic aggregations

mod calculator;
mod distribution;
mod installment;

pub use calculator::{Centroid, GeoAccumulator, GeoAggregator};
pub use distribution::GeoDistribution;
pub use installment::{InstallmentStats, TendencyBasis};
