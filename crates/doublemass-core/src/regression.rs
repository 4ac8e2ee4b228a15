//! Ordinary least-squares line fit, `y = slope * x + intercept`.

use polars::prelude::*;
use serde::{Deserialize, Serialize};

use crate::error::{DoubleMassError, Result};

const MIN_POINTS: usize = 2;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RegressionResult {
    pub slope: f64,
    pub intercept: f64,
    /// Coefficient of determination; 1.0 when every y value is identical.
    pub r_squared: f64,
    /// Predicted y at each observed x, in input order.
    pub fitted_values: Vec<f64>,
}

impl RegressionResult {
    /// Display form with three decimals, e.g. `y = 1.020x - 3.500`.
    pub fn equation(&self) -> String {
        if self.intercept >= 0.0 {
            format!("y = {:.3}x + {:.3}", self.slope, self.intercept.abs())
        } else {
            format!("y = {:.3}x - {:.3}", self.slope, self.intercept.abs())
        }
    }
}

pub fn fit_linear(x: &[f64], y: &[f64]) -> Result<RegressionResult> {
    if x.len() != y.len() {
        return Err(DoubleMassError::LengthMismatch {
            x_len: x.len(),
            y_len: y.len(),
        });
    }
    if x.len() < MIN_POINTS {
        return Err(DoubleMassError::InsufficientData {
            required: MIN_POINTS,
            actual: x.len(),
        });
    }

    let first = x[0];
    if x.iter().all(|&v| v == first) {
        return Err(DoubleMassError::DegenerateInput { value: first });
    }

    let n = x.len() as f64;
    let mean_x = x.iter().sum::<f64>() / n;
    let mean_y = y.iter().sum::<f64>() / n;

    let (sxx, sxy) = x
        .iter()
        .zip(y)
        .fold((0.0, 0.0), |(sxx, sxy), (&xi, &yi)| {
            let dx = xi - mean_x;
            (sxx + dx * dx, sxy + dx * (yi - mean_y))
        });

    if sxx == 0.0 {
        return Err(DoubleMassError::DegenerateInput { value: first });
    }

    let slope = sxy / sxx;
    let intercept = mean_y - slope * mean_x;
    let fitted_values: Vec<f64> = x.iter().map(|&xi| slope * xi + intercept).collect();

    let ss_tot: f64 = y.iter().map(|&yi| (yi - mean_y).powi(2)).sum();
    let ss_res: f64 = y
        .iter()
        .zip(&fitted_values)
        .map(|(&yi, &fi)| (yi - fi).powi(2))
        .sum();
    let r_squared = if ss_tot > 0.0 {
        1.0 - ss_res / ss_tot
    } else {
        1.0
    };

    Ok(RegressionResult {
        slope,
        intercept,
        r_squared,
        fitted_values,
    })
}

/// Fits `y_column` against `x_column`. Rows where either value is missing are ignored.
pub fn regress(df: &DataFrame, x_column: &str, y_column: &str) -> Result<RegressionResult> {
    let xs = df.column(x_column)?.f64()?;
    let ys = df.column(y_column)?.f64()?;

    let (x, y): (Vec<f64>, Vec<f64>) = xs
        .into_iter()
        .zip(ys.into_iter())
        .filter_map(|pair| match pair {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .unzip();

    fit_linear(&x, &y)
}
