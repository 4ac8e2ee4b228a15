use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("CSV error: {source}")]
    Csv {
        #[source]
        source: csv::Error,
    },

    #[error("required column '{column}' is missing")]
    MissingColumn { column: String },

    #[error("column '{column}' appears more than once in the header")]
    DuplicateColumn { column: String },

    #[error("data row {line_index} invalid: {message}")]
    DataRow { line_index: usize, message: String },

    #[error("failed to build table: {message}")]
    Validation { message: String },

    #[error("file did not contain any data rows")]
    EmptyData,
}

impl From<csv::Error> for ParserError {
    fn from(source: csv::Error) -> Self {
        ParserError::Csv { source }
    }
}
