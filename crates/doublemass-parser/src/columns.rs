use serde::{Deserialize, Serialize};

use crate::errors::ParserError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ColumnRole {
    ProductCode,
    StationNumber,
    Year,
    Month,
    Day,
    Rainfall,
    Period,
    Quality,
    Other,
}

/// Column names of a [`crate::RawRainfallTable`] frame.
pub const YEAR_COLUMN: &str = "year";
pub const MONTH_COLUMN: &str = "month";
pub const DAY_COLUMN: &str = "day";
pub const RAINFALL_COLUMN: &str = "rainfall_mm";
pub const PERIOD_COLUMN: &str = "period_days";
pub const QUALITY_COLUMN: &str = "quality";

pub(crate) const REQUIRED_ROLES: [ColumnRole; 4] = [
    ColumnRole::Year,
    ColumnRole::Month,
    ColumnRole::Day,
    ColumnRole::Rainfall,
];

const PRODUCT_CODE_HEADER: &str = "Product code";
const STATION_NUMBER_HEADER: &str = "Bureau of Meteorology station number";
const PERIOD_HEADER: &str = "Period over which rainfall was measured (days)";
const QUALITY_HEADER: &str = "Quality";

/// Header names for the columns a daily rainfall export must carry.
///
/// Columns are located by name, so exports with extra or reordered columns
/// still parse correctly.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnMapping {
    pub year: String,
    pub month: String,
    pub day: String,
    pub rainfall: String,
}

impl Default for ColumnMapping {
    fn default() -> Self {
        Self {
            year: "Year".to_string(),
            month: "Month".to_string(),
            day: "Day".to_string(),
            rainfall: "Rainfall amount (millimetres)".to_string(),
        }
    }
}

impl ColumnMapping {
    pub fn classify(&self, header: &str) -> ColumnRole {
        let trimmed = header.trim();
        let matches = |expected: &str| trimmed.eq_ignore_ascii_case(expected.trim());

        if matches(&self.year) {
            ColumnRole::Year
        } else if matches(&self.month) {
            ColumnRole::Month
        } else if matches(&self.day) {
            ColumnRole::Day
        } else if matches(&self.rainfall) {
            ColumnRole::Rainfall
        } else if matches(PRODUCT_CODE_HEADER) {
            ColumnRole::ProductCode
        } else if matches(STATION_NUMBER_HEADER) {
            ColumnRole::StationNumber
        } else if matches(PERIOD_HEADER) {
            ColumnRole::Period
        } else if matches(QUALITY_HEADER) {
            ColumnRole::Quality
        } else {
            ColumnRole::Other
        }
    }

    pub fn header_for(&self, role: ColumnRole) -> &str {
        match role {
            ColumnRole::Year => &self.year,
            ColumnRole::Month => &self.month,
            ColumnRole::Day => &self.day,
            ColumnRole::Rainfall => &self.rainfall,
            ColumnRole::ProductCode => PRODUCT_CODE_HEADER,
            ColumnRole::StationNumber => STATION_NUMBER_HEADER,
            ColumnRole::Period => PERIOD_HEADER,
            ColumnRole::Quality => QUALITY_HEADER,
            ColumnRole::Other => "",
        }
    }

    /// Classifies every header, rejecting repeated roles and absent required columns.
    pub(crate) fn classify_headers(
        &self,
        headers: &csv::StringRecord,
    ) -> Result<Vec<ColumnRole>, ParserError> {
        let roles: Vec<ColumnRole> = headers.iter().map(|h| self.classify(h)).collect();

        for (idx, role) in roles.iter().enumerate() {
            if *role == ColumnRole::Other {
                continue;
            }
            if roles[..idx].contains(role) {
                return Err(ParserError::DuplicateColumn {
                    column: headers.get(idx).unwrap_or_default().trim().to_string(),
                });
            }
        }

        for required in REQUIRED_ROLES {
            if !roles.contains(&required) {
                return Err(ParserError::MissingColumn {
                    column: self.header_for(required).to_string(),
                });
            }
        }

        Ok(roles)
    }
}
