use polars::prelude::*;

use crate::columns::{
    ColumnMapping, ColumnRole, DAY_COLUMN, MONTH_COLUMN, PERIOD_COLUMN, QUALITY_COLUMN,
    RAINFALL_COLUMN, YEAR_COLUMN,
};
use crate::errors::ParserError;
use crate::model::{FileMetadata, RawRainfallTable};

#[derive(Debug, Default)]
struct RainfallColumns {
    year: Vec<i32>,
    month: Vec<i32>,
    day: Vec<i32>,
    rainfall: Vec<Option<f64>>,
    period: Option<Vec<Option<f64>>>,
    quality: Option<Vec<Option<String>>>,
}

impl RainfallColumns {
    fn new(roles: &[ColumnRole]) -> Self {
        Self {
            period: roles.contains(&ColumnRole::Period).then(Vec::new),
            quality: roles.contains(&ColumnRole::Quality).then(Vec::new),
            ..Self::default()
        }
    }

    fn into_dataframe(self) -> Result<DataFrame, ParserError> {
        let mut cols: Vec<Column> = vec![
            Series::new(YEAR_COLUMN.into(), self.year).into(),
            Series::new(MONTH_COLUMN.into(), self.month).into(),
            Series::new(DAY_COLUMN.into(), self.day).into(),
            Series::new(RAINFALL_COLUMN.into(), self.rainfall).into(),
        ];

        if let Some(values) = self.period {
            cols.push(Series::new(PERIOD_COLUMN.into(), values).into());
        }

        if let Some(values) = self.quality {
            let utf8: Vec<Option<&str>> = values.iter().map(|v| v.as_deref()).collect();
            cols.push(Series::new(QUALITY_COLUMN.into(), utf8).into());
        }

        DataFrame::new(cols).map_err(|err| ParserError::Validation {
            message: format!("failed to build rainfall dataframe: {err}"),
        })
    }
}

/// Parses a daily rainfall export using the default Bureau of Meteorology headers.
pub fn parse_rainfall_csv(content: &str) -> Result<RawRainfallTable, ParserError> {
    parse_rainfall_csv_with(content, &ColumnMapping::default())
}

pub fn parse_rainfall_csv_with(
    content: &str,
    mapping: &ColumnMapping,
) -> Result<RawRainfallTable, ParserError> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(content.as_bytes());

    let mut records = reader.records();

    let headers = records.next().ok_or(ParserError::EmptyData)??;
    let roles = mapping.classify_headers(&headers)?;

    let mut metadata = FileMetadata {
        source_columns: headers.iter().map(|h| h.trim().to_string()).collect(),
        ..FileMetadata::default()
    };
    let mut columns = RainfallColumns::new(&roles);
    let mut row_count = 0usize;

    for (row_idx, record) in records.enumerate() {
        let record = record?;
        // 1-based line in the file; the reader skips blank lines.
        let line_index = record
            .position()
            .map(|pos| pos.line() as usize)
            .unwrap_or(row_idx + 2);

        if record.len() != roles.len() {
            return Err(ParserError::DataRow {
                line_index,
                message: format!(
                    "expected {} columns but found {}",
                    roles.len(),
                    record.len()
                ),
            });
        }

        for (idx, role) in roles.iter().enumerate() {
            let header_name = headers.get(idx).unwrap_or("").trim();
            let value = record.get(idx).unwrap_or("");
            match role {
                ColumnRole::Year => columns
                    .year
                    .push(parse_required_i32(value, line_index, header_name)?),
                ColumnRole::Month => columns
                    .month
                    .push(parse_required_i32(value, line_index, header_name)?),
                ColumnRole::Day => columns
                    .day
                    .push(parse_required_i32(value, line_index, header_name)?),
                ColumnRole::Rainfall => columns
                    .rainfall
                    .push(parse_optional_f64(value, line_index, header_name)?),
                ColumnRole::Period => {
                    let parsed = parse_optional_f64(value, line_index, header_name)?;
                    if let Some(period) = columns.period.as_mut() {
                        period.push(parsed);
                    }
                }
                ColumnRole::Quality => {
                    if let Some(quality) = columns.quality.as_mut() {
                        quality.push(clean_optional(Some(value)));
                    }
                }
                ColumnRole::ProductCode => {
                    if metadata.product_code.is_none() {
                        metadata.product_code = clean_optional(Some(value));
                    }
                }
                ColumnRole::StationNumber => {
                    if metadata.station_number.is_none() {
                        metadata.station_number = clean_optional(Some(value));
                    }
                }
                ColumnRole::Other => {}
            }
        }

        row_count += 1;
    }

    if row_count == 0 {
        return Err(ParserError::EmptyData);
    }

    let df = columns.into_dataframe()?;
    Ok(RawRainfallTable::new(metadata, df))
}

fn clean_optional(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(|v| v.to_string())
}

fn parse_required_i32(value: &str, line_index: usize, column: &str) -> Result<i32, ParserError> {
    value
        .trim()
        .parse::<i32>()
        .map_err(|err| ParserError::DataRow {
            line_index,
            message: format!("failed to parse column '{column}' as integer: {err}"),
        })
}

fn parse_optional_f64(
    value: &str,
    line_index: usize,
    column: &str,
) -> Result<Option<f64>, ParserError> {
    let trimmed = value.trim();
    if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("nan") {
        return Ok(None);
    }

    match trimmed.parse::<f64>() {
        Ok(parsed) if parsed.is_finite() => Ok(Some(parsed)),
        Ok(_) => Ok(None),
        Err(err) => Err(ParserError::DataRow {
            line_index,
            message: format!("failed to parse column '{column}' as float: {err}"),
        }),
    }
}
