use chrono::NaiveDate;
use polars::prelude::*;

use crate::align::{column_values, AlignedSeries, VALUE_A_COLUMN, VALUE_B_COLUMN};
use crate::dates::column_dates;
use crate::error::Result;
use crate::station::{StationId, DATE_COLUMN};

pub const CUMULATIVE_A_COLUMN: &str = "Cumulative value_a";
pub const CUMULATIVE_B_COLUMN: &str = "Cumulative value_b";

pub fn cumulative_column_name(column: &str) -> String {
    format!("Cumulative {column}")
}

/// Returns a copy of `df` with a `Cumulative <column>` running sum appended.
///
/// Rows are summed in their current order, so callers sort by date first. A
/// missing value contributes nothing and leaves its running-sum cell missing.
pub fn add_cumulative_column(df: &DataFrame, column: &str) -> PolarsResult<DataFrame> {
    let values = df.column(column)?.f64()?;

    let mut running = 0.0;
    let mut sums: Vec<Option<f64>> = Vec::with_capacity(df.height());
    for value in values.into_iter() {
        sums.push(value.map(|v| {
            running += v;
            running
        }));
    }

    let mut output = df.clone();
    output.with_column(Series::new(cumulative_column_name(column).into(), sums))?;
    Ok(output)
}

/// Aligned series extended with `Cumulative value_a` and `Cumulative value_b`.
#[derive(Debug, Clone)]
pub struct CumulativeSeries {
    pub station_a: StationId,
    pub station_b: StationId,
    pub df: DataFrame,
}

impl AlignedSeries {
    pub fn into_cumulative(self) -> Result<CumulativeSeries> {
        let df = add_cumulative_column(&self.df, VALUE_A_COLUMN)?;
        let df = add_cumulative_column(&df, VALUE_B_COLUMN)?;
        Ok(CumulativeSeries {
            station_a: self.station_a,
            station_b: self.station_b,
            df,
        })
    }
}

impl CumulativeSeries {
    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(column_dates(&self.df, DATE_COLUMN)?)
    }

    pub fn cumulative_a(&self) -> Result<Vec<f64>> {
        column_values(&self.df, CUMULATIVE_A_COLUMN)
    }

    pub fn cumulative_b(&self) -> Result<Vec<f64>> {
        column_values(&self.df, CUMULATIVE_B_COLUMN)
    }
}
