//! Stats module - Impact aggregation and decade counts

mod calculator;
mod decades;

pub use calculator::{EconomicImpact, HealthImpact, ImpactCalculator, StatsError};
pub use decades::{DecadeBucket, DecadeHistogram};
