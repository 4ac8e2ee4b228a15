use chrono::{Datelike, NaiveDate};
use polars::prelude::*;

const UNIX_EPOCH_DAYS_FROM_CE: i32 = 719_163;

pub(crate) fn to_epoch_days(date: NaiveDate) -> i32 {
    date.num_days_from_ce() - UNIX_EPOCH_DAYS_FROM_CE
}

pub(crate) fn from_epoch_days(days: i32) -> Option<NaiveDate> {
    NaiveDate::from_num_days_from_ce_opt(days.checked_add(UNIX_EPOCH_DAYS_FROM_CE)?)
}

/// Builds a polars `Date` series from calendar dates.
pub(crate) fn date_series(name: &str, dates: &[NaiveDate]) -> PolarsResult<Series> {
    let days: Vec<i32> = dates.iter().copied().map(to_epoch_days).collect();
    Series::new(name.into(), days).cast(&DataType::Date)
}

/// Reads a `Date` column back into calendar dates; nulls are skipped.
pub(crate) fn column_dates(df: &DataFrame, name: &str) -> PolarsResult<Vec<NaiveDate>> {
    let physical = df.column(name)?.cast(&DataType::Int32)?;
    let days = physical.i32()?;
    Ok(days
        .into_iter()
        .flatten()
        .filter_map(from_epoch_days)
        .collect())
}
