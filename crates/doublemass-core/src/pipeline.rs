use chrono::NaiveDate;
use polars::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::align::{join, VALUE_A_COLUMN, VALUE_B_COLUMN};
use crate::cumulative::{
    cumulative_column_name, CumulativeSeries, CUMULATIVE_A_COLUMN, CUMULATIVE_B_COLUMN,
};
use crate::error::Result;
use crate::regression::{regress, RegressionResult};
use crate::station::{StationId, StationTable};

pub const FITTED_COLUMN: &str = "Fitted";

/// Presentation strings for whoever draws the curve.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartLabels {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    pub file_name: String,
}

impl ChartLabels {
    pub fn for_stations(station_a: &StationId, station_b: &StationId) -> Self {
        Self {
            title: format!("Station {station_a} v.s Station {station_b}"),
            x_label: format!("Station {station_a}"),
            y_label: format!("Station {station_b}"),
            file_name: format!("{}.png", file_stem(station_a, station_b)),
        }
    }
}

/// Output header for a station's value column, e.g. `Station 086338`.
pub fn station_header(station: &StationId) -> String {
    format!("Station {station}")
}

pub(crate) fn file_stem(station_a: &StationId, station_b: &StationId) -> String {
    format!("Station_{station_a}_vs_Station_{station_b}")
}

#[derive(Debug, Clone)]
pub struct DoubleMassCurve {
    pub series: CumulativeSeries,
    pub regression: RegressionResult,
    pub labels: ChartLabels,
}

/// Runs join, both running sums and the fit of station B's totals against station A's.
pub fn double_mass_curve(table_a: &StationTable, table_b: &StationTable) -> Result<DoubleMassCurve> {
    let series = join(table_a, table_b)?.into_cumulative()?;
    let regression = regress(&series.df, CUMULATIVE_A_COLUMN, CUMULATIVE_B_COLUMN)?;
    let labels = ChartLabels::for_stations(&series.station_a, &series.station_b);

    info!(
        station_a = %series.station_a,
        station_b = %series.station_b,
        points = series.len(),
        slope = regression.slope,
        intercept = regression.intercept,
        r_squared = regression.r_squared,
        "fitted double mass curve"
    );

    Ok(DoubleMassCurve {
        series,
        regression,
        labels,
    })
}

impl DoubleMassCurve {
    pub fn station_a(&self) -> &StationId {
        &self.series.station_a
    }

    pub fn station_b(&self) -> &StationId {
        &self.series.station_b
    }

    pub fn file_stem(&self) -> String {
        file_stem(self.station_a(), self.station_b())
    }

    /// The cumulative series plus the fitted line, with value columns headed by station.
    pub fn series_frame(&self) -> Result<DataFrame> {
        let header_a = station_header(self.station_a());
        let header_b = station_header(self.station_b());

        let mut df = self.series.df.clone();
        df.with_column(Series::new(
            FITTED_COLUMN.into(),
            self.regression.fitted_values.clone(),
        ))?;

        let existing = [
            CUMULATIVE_A_COLUMN,
            CUMULATIVE_B_COLUMN,
            VALUE_A_COLUMN,
            VALUE_B_COLUMN,
        ];
        let new_names = [
            cumulative_column_name(&header_a),
            cumulative_column_name(&header_b),
            header_a,
            header_b,
        ];
        Ok(df.lazy().rename(existing, new_names, true).collect()?)
    }

    pub fn summary(&self) -> Result<CurveSummary> {
        let dates = self.series.dates()?;
        Ok(CurveSummary {
            station_a: self.station_a().clone(),
            station_b: self.station_b().clone(),
            points: self.series.len(),
            first_date: dates.first().copied(),
            last_date: dates.last().copied(),
            slope: self.regression.slope,
            intercept: self.regression.intercept,
            r_squared: self.regression.r_squared,
            equation: self.regression.equation(),
            labels: self.labels.clone(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CurveSummary {
    pub station_a: StationId,
    pub station_b: StationId,
    pub points: usize,
    pub first_date: Option<NaiveDate>,
    pub last_date: Option<NaiveDate>,
    pub slope: f64,
    pub intercept: f64,
    pub r_squared: f64,
    pub equation: String,
    pub labels: ChartLabels,
}
