use polars::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileMetadata {
    pub product_code: Option<String>,
    pub station_number: Option<String>,
    pub source_columns: Vec<String>,
}

/// One station's export with the recognised columns typed and renamed.
///
/// The frame always holds `year`, `month`, `day` (Int32) and `rainfall_mm`
/// (nullable Float64); `period_days` and `quality` are present only when the
/// export carried them.
#[derive(Debug, Clone)]
pub struct RawRainfallTable {
    pub metadata: FileMetadata,
    pub df: DataFrame,
}

impl RawRainfallTable {
    pub fn new(metadata: FileMetadata, df: DataFrame) -> Self {
        Self { metadata, df }
    }

    /// Wraps a frame built elsewhere; column checks happen when it is normalized.
    pub fn from_dataframe(df: DataFrame) -> Self {
        let source_columns = df
            .get_column_names()
            .into_iter()
            .map(|name| name.to_string())
            .collect();
        Self {
            metadata: FileMetadata {
                source_columns,
                ..FileMetadata::default()
            },
            df,
        }
    }

    pub fn height(&self) -> usize {
        self.df.height()
    }
}
