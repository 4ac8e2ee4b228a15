#![allow(dead_code)]

use std::path::PathBuf;

use chrono::NaiveDate;
use doublemass_core::{normalize, StationTable};
use doublemass_parser::RawRainfallTable;
use polars::prelude::*;

pub type Row = (i32, i32, i32, Option<f64>);

pub fn raw_table(rows: &[Row]) -> RawRainfallTable {
    let years: Vec<i32> = rows.iter().map(|r| r.0).collect();
    let months: Vec<i32> = rows.iter().map(|r| r.1).collect();
    let days: Vec<i32> = rows.iter().map(|r| r.2).collect();
    let rainfall: Vec<Option<f64>> = rows.iter().map(|r| r.3).collect();

    let df = df!(
        "year" => years,
        "month" => months,
        "day" => days,
        "rainfall_mm" => rainfall,
    )
    .expect("raw dataframe");
    RawRainfallTable::from_dataframe(df)
}

pub fn station(filename: &str, rows: &[Row]) -> StationTable {
    normalize(&raw_table(rows), filename).expect("normalize")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("../doublemass-parser/tests/data")
        .join(name)
}

pub fn fixture_bytes(name: &str) -> Vec<u8> {
    std::fs::read(fixture_path(name)).expect("read fixture")
}

pub fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {expected}, got {actual}"
    );
}
