//! Impact Calculator Module
//! Groups decoded events by event type and ranks the groups by total
//! human harm and total economic cost.

use polars::prelude::*;
use serde::Serialize;
use thiserror::Error;
use tracing::info;

use crate::data::{CROP_DAMAGE, EVTYPE, FATALITIES, INJURIES, PROPERTY_DAMAGE};

const EVENT_TYPE: &str = "event_type";
const DEATHS_TOTAL: &str = "deaths_total";
const INJURIES_TOTAL: &str = "injuries_total";
const TOTAL_HARM: &str = "total_harm";
const PROPERTY_DAMAGE_TOTAL: &str = "property_damage_total";
const CROP_DAMAGE_TOTAL: &str = "crop_damage_total";
const TOTAL_COST: &str = "total_cost";

#[derive(Error, Debug)]
pub enum StatsError {
    #[error("Polars error: {0}")]
    PolarsError(#[from] PolarsError),
}

/// Fatalities and injuries summed for one event type.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HealthImpact {
    pub event_type: String,
    pub deaths_total: i64,
    pub injuries_total: i64,
    pub total_harm: i64,
}

/// Decoded property and crop damage summed for one event type, in dollars.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EconomicImpact {
    pub event_type: String,
    pub property_damage_total: f64,
    pub crop_damage_total: f64,
    pub total_cost: f64,
}

/// Handles the grouped aggregations over a decoded event table.
pub struct ImpactCalculator;

impl ImpactCalculator {
    /// Sum fatalities and injuries per exact event type label, keep groups
    /// with harm above zero, highest harm first. Ties keep first-seen order.
    pub fn health_table(df: &DataFrame) -> Result<DataFrame, StatsError> {
        let table = Self::ranked(
            df,
            [(FATALITIES, DEATHS_TOTAL), (INJURIES, INJURIES_TOTAL)],
            TOTAL_HARM,
            lit(0),
        )?;
        info!(groups = table.height(), "health impact aggregated");
        Ok(table)
    }

    /// Sum decoded property and crop damage per exact event type label,
    /// keep groups with cost above zero, highest cost first.
    pub fn economic_table(df: &DataFrame) -> Result<DataFrame, StatsError> {
        let table = Self::ranked(
            df,
            [
                (PROPERTY_DAMAGE, PROPERTY_DAMAGE_TOTAL),
                (CROP_DAMAGE, CROP_DAMAGE_TOTAL),
            ],
            TOTAL_COST,
            lit(0.0),
        )?;
        info!(groups = table.height(), "economic impact aggregated");
        Ok(table)
    }

    /// Group by event type, sum each `(source, total)` column pair, add the
    /// two sums as `total_name`, drop groups whose total is not above `zero`
    /// and sort descending.
    fn ranked(
        df: &DataFrame,
        sums: [(&str, &str); 2],
        total_name: &str,
        zero: Expr,
    ) -> Result<DataFrame, StatsError> {
        let [(first_src, first), (second_src, second)] = sums;

        let table = df
            .clone()
            .lazy()
            .group_by_stable([col(EVTYPE)])
            .agg([
                col(first_src).sum().alias(first),
                col(second_src).sum().alias(second),
            ])
            .with_column((col(first) + col(second)).alias(total_name))
            .filter(col(total_name).gt(zero))
            .sort_by_exprs(
                [col(total_name)],
                SortMultipleOptions {
                    descending: vec![true],
                    maintain_order: true,
                    ..Default::default()
                },
            )
            .select([
                col(EVTYPE).alias(EVENT_TYPE),
                col(first),
                col(second),
                col(total_name),
            ])
            .collect()?;

        Ok(table)
    }

    /// Typed rows of a table built by [`ImpactCalculator::health_table`].
    pub fn health_rows(table: &DataFrame) -> Result<Vec<HealthImpact>, StatsError> {
        let event_types = table.column(EVENT_TYPE)?.str()?;
        let deaths = table.column(DEATHS_TOTAL)?.i64()?;
        let injuries = table.column(INJURIES_TOTAL)?.i64()?;
        let totals = table.column(TOTAL_HARM)?.i64()?;

        Ok((0..table.height())
            .map(|i| HealthImpact {
                event_type: event_types.get(i).unwrap_or_default().to_string(),
                deaths_total: deaths.get(i).unwrap_or(0),
                injuries_total: injuries.get(i).unwrap_or(0),
                total_harm: totals.get(i).unwrap_or(0),
            })
            .collect())
    }

    /// Typed rows of a table built by [`ImpactCalculator::economic_table`].
    pub fn economic_rows(table: &DataFrame) -> Result<Vec<EconomicImpact>, StatsError> {
        let event_types = table.column(EVENT_TYPE)?.str()?;
        let property = table.column(PROPERTY_DAMAGE_TOTAL)?.f64()?;
        let crop = table.column(CROP_DAMAGE_TOTAL)?.f64()?;
        let totals = table.column(TOTAL_COST)?.f64()?;

        Ok((0..table.height())
            .map(|i| EconomicImpact {
                event_type: event_types.get(i).unwrap_or_default().to_string(),
                property_damage_total: property.get(i).unwrap_or(0.0),
                crop_damage_total: crop.get(i).unwrap_or(0.0),
                total_cost: totals.get(i).unwrap_or(0.0),
            })
            .collect())
    }

    pub fn health_impact(df: &DataFrame) -> Result<Vec<HealthImpact>, StatsError> {
        Self::health_rows(&Self::health_table(df)?)
    }

    pub fn economic_impact(df: &DataFrame) -> Result<Vec<EconomicImpact>, StatsError> {
        Self::economic_rows(&Self::economic_table(df)?)
    }
}
