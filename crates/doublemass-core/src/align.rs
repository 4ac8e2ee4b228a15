use chrono::NaiveDate;
use polars::prelude::*;
use tracing::{debug, info};

use crate::dates::column_dates;
use crate::error::{DoubleMassError, Result};
use crate::station::{StationId, StationTable, DATE_COLUMN, VALUE_COLUMN};

pub const VALUE_A_COLUMN: &str = "value_a";
pub const VALUE_B_COLUMN: &str = "value_b";

/// Two stations joined on date, ascending, with no missing `value_a` or `value_b`.
#[derive(Debug, Clone)]
pub struct AlignedSeries {
    pub station_a: StationId,
    pub station_b: StationId,
    pub df: DataFrame,
}

impl AlignedSeries {
    pub fn len(&self) -> usize {
        self.df.height()
    }

    pub fn is_empty(&self) -> bool {
        self.df.height() == 0
    }

    pub fn dates(&self) -> Result<Vec<NaiveDate>> {
        Ok(column_dates(&self.df, DATE_COLUMN)?)
    }

    pub fn values_a(&self) -> Result<Vec<f64>> {
        column_values(&self.df, VALUE_A_COLUMN)
    }

    pub fn values_b(&self) -> Result<Vec<f64>> {
        column_values(&self.df, VALUE_B_COLUMN)
    }
}

/// Inner-joins two station tables on `date`, drops rows missing either value and sorts by date.
pub fn join(table_a: &StationTable, table_b: &StationTable) -> Result<AlignedSeries> {
    if table_a.station_id == table_b.station_id {
        return Err(DoubleMassError::DuplicateStation {
            station: table_a.station_id.to_string(),
        });
    }

    let station_a = &table_a.station_id;
    let station_b = &table_b.station_id;

    let joined = table_a
        .df
        .clone()
        .lazy()
        .select([col(DATE_COLUMN), col(VALUE_COLUMN).alias(VALUE_A_COLUMN)])
        .inner_join(
            table_b
                .df
                .clone()
                .lazy()
                .select([col(DATE_COLUMN), col(VALUE_COLUMN).alias(VALUE_B_COLUMN)]),
            col(DATE_COLUMN),
            col(DATE_COLUMN),
        )
        .collect()?;
    let overlapping = joined.height();

    let df = joined
        .lazy()
        .filter(
            col(VALUE_A_COLUMN)
                .is_not_null()
                .and(col(VALUE_B_COLUMN).is_not_null()),
        )
        .sort([DATE_COLUMN], SortMultipleOptions::default())
        .collect()?;

    debug!(
        station_a = %station_a,
        station_b = %station_b,
        overlapping,
        complete = df.height(),
        "joined station tables"
    );

    if df.height() == 0 {
        return Err(DoubleMassError::EmptyIntersection {
            station_a: station_a.to_string(),
            station_b: station_b.to_string(),
        });
    }

    info!(
        station_a = %station_a,
        station_b = %station_b,
        rows = df.height(),
        dropped_incomplete = overlapping - df.height(),
        "aligned station records"
    );

    Ok(AlignedSeries {
        station_a: station_a.clone(),
        station_b: station_b.clone(),
        df,
    })
}

pub(crate) fn column_values(df: &DataFrame, name: &str) -> Result<Vec<f64>> {
    let values = df.column(name)?.f64()?;
    Ok(values.into_iter().flatten().collect())
}
