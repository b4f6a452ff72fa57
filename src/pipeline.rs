//! End-to-end run: load, type, decode, aggregate.

use polars::prelude::DataFrame;
use serde::Serialize;
use std::path::Path;
use thiserror::Error;
use tracing::info;

use crate::data::{
    DamageKind, DataLoader, DataProcessor, DatasetCache, LoaderError, ProcessorError,
    SuffixCount, BGN_DATE,
};
use crate::stats::{DecadeHistogram, EconomicImpact, HealthImpact, ImpactCalculator, StatsError};

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error(transparent)]
    Loader(#[from] LoaderError),
    #[error(transparent)]
    Processor(#[from] ProcessorError),
    #[error(transparent)]
    Stats(#[from] StatsError),
}

/// Row counts and raw code frequencies observed while typing and decoding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataQuality {
    pub rows: usize,
    pub undated_rows: usize,
    pub property_suffixes: Vec<SuffixCount>,
    pub crop_suffixes: Vec<SuffixCount>,
}

/// Everything the report prints or exports.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImpactReport {
    pub health: Vec<HealthImpact>,
    pub economic: Vec<EconomicImpact>,
    pub decades: DecadeHistogram,
    pub quality: DataQuality,
}

/// Owns the dataset cache so repeated runs in one process skip the CSV read.
#[derive(Default)]
pub struct StormPipeline {
    cache: DatasetCache,
}

impl StormPipeline {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_cache(cache: DatasetCache) -> Self {
        Self { cache }
    }

    pub fn cache_mut(&mut self) -> &mut DatasetCache {
        &mut self.cache
    }

    /// Load `path` (through the cache) and analyze it.
    pub fn run(&mut self, path: &Path) -> Result<ImpactReport, PipelineError> {
        let raw = self.cache.get_or_load(path, DataLoader::load_csv)?;
        Self::analyze(raw)
    }

    /// Run every stage over an already-read raw table. Each stage builds a
    /// new table; `raw` is never modified.
    pub fn analyze(raw: &DataFrame) -> Result<ImpactReport, PipelineError> {
        let typed = DataLoader::select_typed(raw)?;
        let quality = DataQuality {
            rows: typed.height(),
            undated_rows: typed.column(BGN_DATE).map_err(LoaderError::from)?.null_count(),
            property_suffixes: DataProcessor::suffix_counts(&typed, DamageKind::Property)?,
            crop_suffixes: DataProcessor::suffix_counts(&typed, DamageKind::Crop)?,
        };

        let decoded = DataProcessor::decode_damage(&typed)?;
        let health = ImpactCalculator::health_impact(&decoded)?;
        let economic = ImpactCalculator::economic_impact(&decoded)?;
        let decades = DecadeHistogram::from_frame(&decoded)?;

        info!(
            rows = quality.rows,
            health_groups = health.len(),
            economic_groups = economic.len(),
            "analysis complete"
        );

        Ok(ImpactReport {
            health,
            economic,
            decades,
            quality,
        })
    }
}
