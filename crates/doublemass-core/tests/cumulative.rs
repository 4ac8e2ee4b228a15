mod common;

use common::{assert_close, station};
use doublemass_core::{
    add_cumulative_column, cumulative_column_name, join, CUMULATIVE_A_COLUMN, CUMULATIVE_B_COLUMN,
    VALUE_A_COLUMN, VALUE_B_COLUMN,
};
use polars::prelude::*;

#[test]
fn cumulative_is_a_prefix_sum() {
    let values = [0.5f64, 0.0, 12.25, 3.0, 7.75];
    let df = df!("rain" => values).unwrap();

    let out = add_cumulative_column(&df, "rain").expect("cumulative");
    assert_eq!(out.get_column_names(), ["rain", "Cumulative rain"]);

    let cum: Vec<f64> = out
        .column("Cumulative rain")
        .unwrap()
        .f64()
        .unwrap()
        .into_no_null_iter()
        .collect();

    assert_close(cum[0], values[0]);
    for i in 1..values.len() {
        assert_close(cum[i], cum[i - 1] + values[i]);
    }
}

#[test]
fn cumulative_of_empty_and_single_rows() {
    let empty = df!("rain" => Vec::<f64>::new()).unwrap();
    let out = add_cumulative_column(&empty, "rain").unwrap();
    assert_eq!(out.height(), 0);

    let single = df!("rain" => [4.5f64]).unwrap();
    let out = add_cumulative_column(&single, "rain").unwrap();
    let cum = out.column("Cumulative rain").unwrap().f64().unwrap();
    assert_eq!(cum.get(0), Some(4.5));
}

#[test]
fn cumulative_missing_column_is_an_error() {
    let df = df!("rain" => [1.0f64]).unwrap();
    assert!(add_cumulative_column(&df, "snow").is_err());
}

#[test]
fn aligned_series_gains_both_running_totals() {
    let a = station(
        "IDCJAC0009_086338_1800_Data.csv",
        &[(2020, 1, 1, Some(1.0)), (2020, 1, 2, Some(2.0)), (2020, 1, 3, Some(3.0))],
    );
    let b = station(
        "IDCJAC0009_086071_1800_Data.csv",
        &[(2020, 1, 1, Some(2.0)), (2020, 1, 2, Some(4.0)), (2020, 1, 3, Some(6.0))],
    );

    let series = join(&a, &b).unwrap().into_cumulative().unwrap();

    assert_eq!(CUMULATIVE_A_COLUMN, cumulative_column_name(VALUE_A_COLUMN));
    assert_eq!(CUMULATIVE_B_COLUMN, cumulative_column_name(VALUE_B_COLUMN));
    assert_eq!(series.cumulative_a().unwrap(), vec![1.0, 3.0, 6.0]);
    assert_eq!(series.cumulative_b().unwrap(), vec![2.0, 6.0, 12.0]);
    assert_eq!(
        series.df.get_column_names(),
        [
            "date",
            "value_a",
            "value_b",
            "Cumulative value_a",
            "Cumulative value_b"
        ]
    );
}
