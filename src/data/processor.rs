//! Data Processor Module
//! Replaces the raw damage magnitude/suffix column pairs with decoded dollar
//! amounts.

use polars::prelude::*;
use serde::Serialize;
use std::collections::BTreeMap;
use thiserror::Error;
use tracing::{debug, info};

use super::loader::{
    BGN_DATE, CROPDMG, CROPDMGEXP, EVTYPE, FATALITIES, INJURIES, PROPDMG, PROPDMGEXP, REFNUM,
};
use super::magnitude::MagnitudeSuffix;

pub const PROPERTY_DAMAGE: &str = "property_damage";
pub const CROP_DAMAGE: &str = "crop_damage";

#[derive(Error, Debug)]
pub enum ProcessorError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// The two damage kinds carried by every event record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DamageKind {
    Property,
    Crop,
}

impl DamageKind {
    fn columns(self) -> (&'static str, &'static str, &'static str) {
        match self {
            DamageKind::Property => (PROPDMG, PROPDMGEXP, PROPERTY_DAMAGE),
            DamageKind::Crop => (CROPDMG, CROPDMGEXP, CROP_DAMAGE),
        }
    }
}

/// How often a raw suffix code appears and what it was decoded as.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SuffixCount {
    pub code: String,
    pub decoded_as: String,
    pub rows: usize,
}

/// Handles damage decoding over a typed event table.
pub struct DataProcessor;

impl DataProcessor {
    /// Decode both damage pairs and drop the four raw columns.
    ///
    /// Output columns: [REFNUM, EVTYPE, BGN_DATE, FATALITIES, INJURIES,
    /// "property_damage", "crop_damage"]
    pub fn decode_damage(df: &DataFrame) -> Result<DataFrame, ProcessorError> {
        let property = Self::decode_pair(df, DamageKind::Property)?;
        let crop = Self::decode_pair(df, DamageKind::Crop)?;

        let mut decoded = df.select([REFNUM, EVTYPE, BGN_DATE, FATALITIES, INJURIES])?;
        decoded.with_column(property)?;
        decoded.with_column(crop)?;

        info!(rows = decoded.height(), "decoded damage magnitudes");
        Ok(decoded)
    }

    /// Decode one (mantissa, suffix) column pair into a Float64 column.
    /// A null mantissa is read as 0.0 and a null suffix as the empty code.
    fn decode_pair(df: &DataFrame, kind: DamageKind) -> Result<Column, ProcessorError> {
        let (mantissa_col, suffix_col, output) = kind.columns();

        let mantissas = df.column(mantissa_col)?.cast(&DataType::Float64)?;
        let suffixes = df.column(suffix_col)?.cast(&DataType::String)?;

        let values: Vec<f64> = mantissas
            .f64()?
            .into_iter()
            .zip(suffixes.str()?.into_iter())
            .map(|(m, s)| MagnitudeSuffix::parse(s.unwrap_or("")).apply(m.unwrap_or(0.0)))
            .collect();

        debug!(column = output, rows = values.len(), "decoded column");
        Ok(Column::new(output.into(), values))
    }

    /// Frequency of every raw suffix code for one damage kind, ordered by
    /// code. Null suffixes are reported as the empty code.
    pub fn suffix_counts(df: &DataFrame, kind: DamageKind) -> Result<Vec<SuffixCount>, ProcessorError> {
        let (_, suffix_col, _) = kind.columns();
        let suffixes = df.column(suffix_col)?.cast(&DataType::String)?;

        let mut counts: BTreeMap<String, usize> = BTreeMap::new();
        for code in suffixes.str()?.into_iter() {
            *counts.entry(code.unwrap_or("").to_string()).or_insert(0) += 1;
        }

        Ok(counts
            .into_iter()
            .map(|(code, rows)| SuffixCount {
                decoded_as: MagnitudeSuffix::parse(&code).to_string(),
                code,
                rows,
            })
            .collect())
    }
}
