// crates/doublemass-core/src/error.rs

use chrono::NaiveDate;
use doublemass_parser::ParserError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DoubleMassError {
    #[error("filename '{filename}' does not contain a station number (expected <prefix>_<station>_...)")]
    MalformedFilename { filename: String },

    #[error("row {row}: {year}-{month}-{day} is not a valid calendar date")]
    InvalidDate {
        row: usize,
        year: i32,
        month: i32,
        day: i32,
    },

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("station {station} has more than one row for {date}")]
    DuplicateDate { station: String, date: NaiveDate },

    #[error("both tables belong to station {station}")]
    DuplicateStation { station: String },

    #[error("stations {station_a} and {station_b} share no dates with complete data")]
    EmptyIntersection {
        station_a: String,
        station_b: String,
    },

    #[error("regression needs at least {required} points, found {actual}")]
    InsufficientData { required: usize, actual: usize },

    #[error("x has {x_len} values but y has {y_len}")]
    LengthMismatch { x_len: usize, y_len: usize },

    #[error("every x value equals {value}; the slope is undefined")]
    DegenerateInput { value: f64 },

    #[error("failed to read rainfall file: {0}")]
    Parser(ParserError),

    #[error("Polars operation failed: {0}")]
    Polars(#[from] polars::error::PolarsError),
}

impl From<ParserError> for DoubleMassError {
    fn from(err: ParserError) -> Self {
        match err {
            ParserError::MissingColumn { column } => DoubleMassError::MissingColumn { column },
            other => DoubleMassError::Parser(other),
        }
    }
}

pub type Result<T> = std::result::Result<T, DoubleMassError>;
