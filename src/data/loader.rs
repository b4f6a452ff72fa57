//! CSV Data Loader Module
//! Reads the storm event CSV with Polars, keeps the nine analysis columns and
//! gives the date and count columns their real types.

use chrono::{Datelike, NaiveDate};
use polars::prelude::*;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

pub const REFNUM: &str = "REFNUM";
pub const EVTYPE: &str = "EVTYPE";
pub const BGN_DATE: &str = "BGN_DATE";
pub const FATALITIES: &str = "FATALITIES";
pub const INJURIES: &str = "INJURIES";
pub const PROPDMG: &str = "PROPDMG";
pub const PROPDMGEXP: &str = "PROPDMGEXP";
pub const CROPDMG: &str = "CROPDMG";
pub const CROPDMGEXP: &str = "CROPDMGEXP";

/// Columns the analysis needs, in output order.
pub const REQUIRED_COLUMNS: [&str; 9] = [
    REFNUM, EVTYPE, BGN_DATE, FATALITIES, INJURIES, PROPDMG, PROPDMGEXP, CROPDMG, CROPDMGEXP,
];

/// `NaiveDate::num_days_from_ce` of 1970-01-01; Polars dates count from there.
const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

#[derive(Error, Debug)]
pub enum LoaderError {
    #[error("Failed to load CSV: {0}")]
    CsvError(#[from] PolarsError),
    #[error("Input is missing required columns: {}", .0.join(", "))]
    MissingColumns(Vec<String>),
    #[error("Cannot read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Reads the raw dataset and produces the trimmed, typed table.
pub struct DataLoader;

impl DataLoader {
    /// Load a CSV file using Polars. Every column is read as text.
    pub fn load_csv(file_path: &Path) -> Result<DataFrame, LoaderError> {
        if !file_path.is_file() {
            return Err(LoaderError::Io {
                path: file_path.to_path_buf(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "no such file"),
            });
        }

        let df = LazyCsvReader::new(file_path)
            .with_has_header(true)
            .with_infer_schema_length(Some(0))
            .with_ignore_errors(true)
            .finish()?
            .collect()?;

        info!(
            rows = df.height(),
            columns = df.width(),
            "loaded {}",
            file_path.display()
        );
        Ok(df)
    }

    /// Names of required columns absent from `df`.
    pub fn missing_columns(df: &DataFrame) -> Vec<String> {
        let present: Vec<String> = df
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();

        REQUIRED_COLUMNS
            .iter()
            .filter(|name| !present.iter().any(|p| p == *name))
            .map(|name| name.to_string())
            .collect()
    }

    /// Keep exactly the required columns, parse `BGN_DATE` into a date and
    /// coerce the counts to integers. Never drops a row.
    pub fn select_typed(raw: &DataFrame) -> Result<DataFrame, LoaderError> {
        let missing = Self::missing_columns(raw);
        if !missing.is_empty() {
            return Err(LoaderError::MissingColumns(missing));
        }

        let begin_dates = Self::parse_date_column(raw.column(BGN_DATE)?)?;

        let mut typed = raw
            .clone()
            .lazy()
            .select([
                col(REFNUM),
                col(EVTYPE).cast(DataType::String),
                col(FATALITIES)
                    .cast(DataType::Float64)
                    .cast(DataType::Int64),
                col(INJURIES).cast(DataType::Float64).cast(DataType::Int64),
                col(PROPDMG).cast(DataType::Float64),
                col(PROPDMGEXP).cast(DataType::String),
                col(CROPDMG).cast(DataType::Float64),
                col(CROPDMGEXP).cast(DataType::String),
            ])
            .collect()?;
        typed.with_column(begin_dates)?;

        let typed = typed.select(REQUIRED_COLUMNS)?;
        debug!(rows = typed.height(), "selected and typed columns");
        Ok(typed)
    }

    /// Parse a text column of `M/D/YYYY[ time]` values into a Polars date
    /// column. Unparseable values become null.
    fn parse_date_column(column: &Column) -> Result<Column, LoaderError> {
        let text = column.cast(&DataType::String)?;
        let days: Vec<Option<i32>> = text
            .str()?
            .into_iter()
            .map(|v| v.and_then(parse_begin_date).map(days_since_epoch))
            .collect();

        let unparsed = days.iter().filter(|d| d.is_none()).count();
        if unparsed > 0 {
            warn!(rows = unparsed, "{} values could not be parsed as dates", BGN_DATE);
        }

        Ok(Column::new(BGN_DATE.into(), days).cast(&DataType::Date)?)
    }
}

/// Parse the leading `month/day/year` token of `value`. The year must have
/// four digits; anything after the first whitespace (a time part) is ignored.
pub fn parse_begin_date(value: &str) -> Option<NaiveDate> {
    let token = value.split_whitespace().next()?;
    let mut parts = token.split('/');
    let (month, day, year) = (parts.next()?, parts.next()?, parts.next()?);
    if parts.next().is_some() || year.len() != 4 {
        return None;
    }

    NaiveDate::from_ymd_opt(year.parse().ok()?, month.parse().ok()?, day.parse().ok()?)
}

pub fn days_since_epoch(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub fn date_from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn raw_frame() -> DataFrame {
        df!(
            "STATE__" => ["1.00", "1.00", "1.00"],
            REFNUM => ["1", "2", "3"],
            EVTYPE => ["TORNADO", "TSTM WIND", "HAIL"],
            BGN_DATE => ["4/18/1950 0:00:00", "not a date", "11/15/1951 0:00:00"],
            FATALITIES => ["0.00", "2.00", "1.00"],
            INJURIES => ["15.00", "0.00", "2.00"],
            PROPDMG => ["25.00", "2.50", "0.00"],
            PROPDMGEXP => ["K", "M", ""],
            CROPDMG => ["0.00", "0.00", "5.00"],
            CROPDMGEXP => ["", "", "K"],
            "REMARKS" => ["", "", "large hail"]
        )
        .unwrap()
    }

    #[test]
    fn parses_month_day_year() {
        assert_eq!(
            parse_begin_date("4/18/1950 0:00:00"),
            NaiveDate::from_ymd_opt(1950, 4, 18)
        );
        assert_eq!(
            parse_begin_date("12/01/2011"),
            NaiveDate::from_ymd_opt(2011, 12, 1)
        );
    }

    #[test]
    fn rejects_malformed_dates() {
        assert_eq!(parse_begin_date(""), None);
        assert_eq!(parse_begin_date("4/18/50"), None);
        assert_eq!(parse_begin_date("1950-04-18"), None);
        assert_eq!(parse_begin_date("13/01/1990"), None);
        assert_eq!(parse_begin_date("2/30/1990"), None);
    }

    #[test]
    fn epoch_days_round_trip_known_dates() {
        let epoch = NaiveDate::from_ymd_opt(1970, 1, 1).unwrap();
        assert_eq!(days_since_epoch(epoch), 0);
        let d = NaiveDate::from_ymd_opt(1950, 1, 3).unwrap();
        assert_eq!(days_since_epoch(d), -7303);
        assert_eq!(date_from_epoch_days(-7303), Some(d));
    }

    #[test]
    fn select_typed_keeps_nine_columns_and_every_row() {
        let raw = raw_frame();
        let typed = DataLoader::select_typed(&raw).unwrap();

        assert_eq!(typed.height(), raw.height());
        let names: Vec<String> = typed
            .get_column_names()
            .iter()
            .map(|s| s.to_string())
            .collect();
        assert_eq!(names, REQUIRED_COLUMNS.map(String::from).to_vec());
        assert_eq!(typed.column(BGN_DATE).unwrap().dtype(), &DataType::Date);
        assert_eq!(typed.column(FATALITIES).unwrap().dtype(), &DataType::Int64);
    }

    #[test]
    fn unparseable_date_becomes_null() {
        let typed = DataLoader::select_typed(&raw_frame()).unwrap();
        let dates = typed.column(BGN_DATE).unwrap();
        assert_eq!(dates.null_count(), 1);

        let injuries: Vec<Option<i64>> = typed
            .column(INJURIES)
            .unwrap()
            .i64()
            .unwrap()
            .into_iter()
            .collect();
        assert_eq!(injuries, vec![Some(15), Some(0), Some(2)]);
    }

    #[test]
    fn missing_columns_are_fatal() {
        let raw = raw_frame().drop("CROPDMGEXP").unwrap().drop("INJURIES").unwrap();
        match DataLoader::select_typed(&raw) {
            Err(LoaderError::MissingColumns(cols)) => {
                assert_eq!(cols, vec!["INJURIES".to_string(), "CROPDMGEXP".to_string()]);
            }
            other => panic!("expected missing columns, got {:?}", other.map(|d| d.shape())),
        }
    }

    #[test]
    fn loads_csv_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "REFNUM,EVTYPE,BGN_DATE,FATALITIES,INJURIES,PROPDMG,PROPDMGEXP,CROPDMG,CROPDMGEXP"
        )
        .unwrap();
        writeln!(file, "1,TORNADO,4/18/1950 0:00:00,0.00,15.00,25.00,K,0.00,").unwrap();
        writeln!(file, "2,FLOOD,1/5/1996 0:00:00,1.00,0.00,3.00,M,1.50,K").unwrap();
        file.flush().unwrap();

        let raw = DataLoader::load_csv(file.path()).unwrap();
        assert_eq!(raw.height(), 2);
        let typed = DataLoader::select_typed(&raw).unwrap();
        assert_eq!(typed.column(BGN_DATE).unwrap().null_count(), 0);
    }

    #[test]
    fn missing_file_is_an_io_error() {
        let err = DataLoader::load_csv(Path::new("/nonexistent/storm.csv")).unwrap_err();
        assert!(matches!(err, LoaderError::Io { .. }));
    }
}
