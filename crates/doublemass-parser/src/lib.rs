pub mod columns;
pub mod errors;
pub mod model;
mod reader;

pub use columns::{
    ColumnMapping, ColumnRole, DAY_COLUMN, MONTH_COLUMN, PERIOD_COLUMN, QUALITY_COLUMN,
    RAINFALL_COLUMN, YEAR_COLUMN,
};
pub use errors::ParserError;
pub use model::{FileMetadata, RawRainfallTable};
pub use reader::{parse_rainfall_csv, parse_rainfall_csv_with};
