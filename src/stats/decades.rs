//! Decade Histogram Module
//! Counts event records per decade of `BGN_DATE`.

use chrono::NaiveDate;
use polars::prelude::*;
use serde::Serialize;
use tracing::debug;

use super::StatsError;
use crate::data::{date_from_epoch_days, BGN_DATE};

/// First decade break; earlier dates fall outside the histogram.
pub const FIRST_DECADE: i32 = 1950;
/// Last decade break before the final (max date) break.
pub const LAST_DECADE: i32 = 2010;

/// Record count for `[start, end)`, or `[start, end]` for the final bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DecadeBucket {
    pub start: NaiveDate,
    pub end: NaiveDate,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct DecadeHistogram {
    pub buckets: Vec<DecadeBucket>,
    /// Rows whose date failed to parse.
    pub undated: usize,
    pub before_range: usize,
}

impl DecadeHistogram {
    /// Build the histogram from the `BGN_DATE` column of a typed table.
    pub fn from_frame(df: &DataFrame) -> Result<Self, StatsError> {
        let days = df.column(BGN_DATE)?.cast(&DataType::Int32)?;
        let dates: Vec<Option<NaiveDate>> = days
            .i32()?
            .into_iter()
            .map(|d| d.and_then(date_from_epoch_days))
            .collect();

        Ok(Self::from_dates(&dates))
    }

    /// Breaks are Jan 1 of 1950, 1960, ... 2010 that fall strictly before
    /// the latest date, followed by the latest date itself.
    pub fn from_dates(dates: &[Option<NaiveDate>]) -> Self {
        let undated = dates.iter().filter(|d| d.is_none()).count();
        let Some(max_date) = dates.iter().flatten().max().copied() else {
            return Self {
                undated,
                ..Default::default()
            };
        };

        let breaks = decade_breaks(max_date);
        let mut buckets: Vec<DecadeBucket> = breaks
            .windows(2)
            .map(|w| DecadeBucket {
                start: w[0],
                end: w[1],
                count: 0,
            })
            .collect();

        let mut before_range = 0;
        for date in dates.iter().flatten() {
            match bucket_index(&breaks, *date) {
                Some(i) => buckets[i].count += 1,
                None => before_range += 1,
            }
        }

        debug!(buckets = buckets.len(), undated, before_range, "decade histogram built");
        Self {
            buckets,
            undated,
            before_range,
        }
    }

    pub fn total(&self) -> usize {
        self.buckets.iter().map(|b| b.count).sum()
    }
}

fn decade_breaks(max_date: NaiveDate) -> Vec<NaiveDate> {
    let mut breaks: Vec<NaiveDate> = (FIRST_DECADE..=LAST_DECADE)
        .step_by(10)
        .filter_map(|year| NaiveDate::from_ymd_opt(year, 1, 1))
        .filter(|start| *start < max_date)
        .collect();
    breaks.push(max_date);
    breaks
}

/// Index of the bucket containing `date`; `None` before the first break.
/// Dates never exceed the final break since it is the maximum.
fn bucket_index(breaks: &[NaiveDate], date: NaiveDate) -> Option<usize> {
    if breaks.len() < 2 || date < breaks[0] {
        return None;
    }
    let last = breaks.len() - 2;
    Some(
        breaks[1..]
            .iter()
            .position(|end| date < *end)
            .unwrap_or(last)
            .min(last),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn buckets_follow_decade_breaks() {
        let dates = vec![
            Some(ymd(1950, 1, 3)),
            Some(ymd(1959, 12, 31)),
            Some(ymd(1960, 1, 1)),
            Some(ymd(1995, 6, 1)),
            Some(ymd(2011, 11, 30)),
            None,
        ];
        let hist = DecadeHistogram::from_dates(&dates);

        assert_eq!(hist.buckets.len(), 7);
        assert_eq!(hist.buckets[0].start, ymd(1950, 1, 1));
        assert_eq!(hist.buckets[6].end, ymd(2011, 11, 30));
        let counts: Vec<usize> = hist.buckets.iter().map(|b| b.count).collect();
        assert_eq!(counts, vec![2, 1, 0, 0, 1, 0, 1]);
        assert_eq!(hist.undated, 1);
        assert_eq!(hist.before_range, 0);
        assert_eq!(hist.total(), 5);
    }

    #[test]
    fn max_date_lands_in_final_bucket() {
        let dates = vec![Some(ymd(1975, 3, 3)), Some(ymd(1975, 3, 3))];
        let hist = DecadeHistogram::from_dates(&dates);

        assert_eq!(hist.buckets.len(), 3);
        assert_eq!(hist.buckets[2].start, ymd(1970, 1, 1));
        assert_eq!(hist.buckets[2].count, 2);
    }

    #[test]
    fn early_and_missing_dates_are_counted_apart() {
        let dates = vec![Some(ymd(1949, 12, 31)), None, Some(ymd(1955, 1, 1))];
        let hist = DecadeHistogram::from_dates(&dates);
        assert_eq!(hist.before_range, 1);
        assert_eq!(hist.undated, 1);
        assert_eq!(hist.total(), 1);
    }

    #[test]
    fn no_dates_gives_no_buckets() {
        let hist = DecadeHistogram::from_dates(&[None, None]);
        assert!(hist.buckets.is_empty());
        assert_eq!(hist.undated, 2);
    }

    #[test]
    fn reads_date_column_from_frame() {
        let days = Column::new(BGN_DATE.into(), [Some(-7303i32), None, Some(15_000)])
            .cast(&DataType::Date)
            .unwrap();
        let df = DataFrame::new(vec![days]).unwrap();

        let hist = DecadeHistogram::from_frame(&df).unwrap();
        assert_eq!(hist.total(), 2);
        assert_eq!(hist.undated, 1);
    }
}
