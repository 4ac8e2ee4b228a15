use std::collections::HashSet;
use std::fmt;
use std::path::Path;

use chrono::NaiveDate;
use doublemass_parser::{
    RawRainfallTable, DAY_COLUMN, MONTH_COLUMN, RAINFALL_COLUMN, YEAR_COLUMN,
};
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::dates::{column_dates, date_series};
use crate::error::{DoubleMassError, Result};

pub const DATE_COLUMN: &str = "date";
/// Rainfall column of a [`StationTable`]. The station id stays on the struct and never names a column.
pub const VALUE_COLUMN: &str = "value";

/// Station number taken from an export's filename.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StationId(String);

impl StationId {
    /// Extracts the second underscore-delimited segment of the filename, so
    /// `IDCJAC0009_086338_1800_Data.csv` yields `086338`. Directory components are ignored.
    pub fn from_filename(filename: &str) -> Result<Self> {
        let base = Path::new(filename)
            .file_name()
            .and_then(|name| name.to_str())
            .unwrap_or(filename);

        match base.split('_').nth(1) {
            Some(segment) if !segment.trim().is_empty() => Ok(Self(segment.trim().to_string())),
            _ => Err(DoubleMassError::MalformedFilename {
                filename: filename.to_string(),
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// One station's daily record: a `date` column and a `value` column.
#[derive(Debug, Clone)]
pub struct StationTable {
    pub station_id: StationId,
    pub df: DataFrame,
}

impl StationTable {
    pub fn height(&self) -> usize {
        self.df.height()
    }

    pub fn missing_values(&self) -> usize {
        self.df
            .column(VALUE_COLUMN)
            .map(|col| col.null_count())
            .unwrap_or(0)
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(column_dates(&self.df, DATE_COLUMN)?)
    }

    /// First and last date present, if the table has any rows.
    pub fn date_range(&self) -> Result<Option<(NaiveDate, NaiveDate)>> {
        let dates = self.dates()?;
        Ok(dates.iter().min().copied().zip(dates.iter().max().copied()))
    }
}

/// Reduces a raw export to `date` plus the station's `value` column.
///
/// Columns are selected by name; anything besides year, month, day and rainfall
/// is discarded. A NaN rainfall value is stored as missing.
pub fn normalize(raw: &RawRainfallTable, filename: &str) -> Result<StationTable> {
    let station_id = StationId::from_filename(filename)?;

    for column in [YEAR_COLUMN, MONTH_COLUMN, DAY_COLUMN, RAINFALL_COLUMN] {
        if raw.df.column(column).is_err() {
            return Err(DoubleMassError::MissingColumn {
                column: column.to_string(),
            });
        }
    }

    let year = raw.df.column(YEAR_COLUMN)?.cast(&DataType::Int32)?;
    let month = raw.df.column(MONTH_COLUMN)?.cast(&DataType::Int32)?;
    let day = raw.df.column(DAY_COLUMN)?.cast(&DataType::Int32)?;
    let rainfall = raw.df.column(RAINFALL_COLUMN)?.cast(&DataType::Float64)?;

    let year = year.i32()?;
    let month = month.i32()?;
    let day = day.i32()?;
    let rainfall = rainfall.f64()?;

    let len = raw.df.height();
    let mut dates = Vec::with_capacity(len);
    let mut values: Vec<Option<f64>> = Vec::with_capacity(len);
    let mut seen = HashSet::with_capacity(len);

    for idx in 0..len {
        let (y, m, d) = (
            year.get(idx).unwrap_or(0),
            month.get(idx).unwrap_or(0),
            day.get(idx).unwrap_or(0),
        );
        let date = calendar_date(y, m, d).ok_or(DoubleMassError::InvalidDate {
            row: idx + 1,
            year: y,
            month: m,
            day: d,
        })?;

        if !seen.insert(date) {
            return Err(DoubleMassError::DuplicateDate {
                station: station_id.to_string(),
                date,
            });
        }

        dates.push(date);
        values.push(rainfall.get(idx).filter(|v| !v.is_nan()));
    }

    let df = DataFrame::new(vec![
        date_series(DATE_COLUMN, &dates)?.into(),
        Series::new(VALUE_COLUMN.into(), values).into(),
    ])?;

    debug!(
        station = %station_id,
        rows = df.height(),
        "normalized station table"
    );

    Ok(StationTable { station_id, df })
}

fn calendar_date(year: i32, month: i32, day: i32) -> Option<NaiveDate> {
    let month = u32::try_from(month).ok()?;
    let day = u32::try_from(day).ok()?;
    NaiveDate::from_ymd_opt(year, month, day)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn station_id_is_second_segment() {
        let id = StationId::from_filename("IDCJAC0009_086338_1800_Data.csv").unwrap();
        assert_eq!(id.as_str(), "086338");

        let id = StationId::from_filename("uploads/2024_runs/IDCJAC0009_040004_1800_Data.csv")
            .unwrap();
        assert_eq!(id.as_str(), "040004");

        let id = StationId::from_filename("prefix_station").unwrap();
        assert_eq!(id.as_str(), "station");
    }

    #[test]
    fn filename_without_station_segment_is_malformed() {
        for name in ["rainfall.csv", "IDCJAC0009__1800.csv", ""] {
            let err = StationId::from_filename(name).unwrap_err();
            assert!(
                matches!(err, DoubleMassError::MalformedFilename { .. }),
                "{name}: {err:?}"
            );
        }
    }

    #[test]
    fn calendar_date_rejects_impossible_triples() {
        assert!(calendar_date(2020, 2, 29).is_some());
        assert!(calendar_date(2021, 2, 29).is_none());
        assert!(calendar_date(2020, 2, 30).is_none());
        assert!(calendar_date(2020, 13, 1).is_none());
        assert!(calendar_date(2020, -1, 1).is_none());
    }
}
