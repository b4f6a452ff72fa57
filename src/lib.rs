//! Storm Impact - health and economic consequences of storm events
//!
//! Loads the storm event CSV, decodes the damage magnitude codes into
//! dollars and ranks event types by harm and cost.

pub mod charts;
pub mod config;
pub mod data;
pub mod pipeline;
pub mod report;
pub mod stats;

pub use pipeline::{ImpactReport, PipelineError, StormPipeline};
