pub mod align;
pub mod config;
pub mod cumulative;
mod dates;
pub mod error;
pub mod outputs;
pub mod pipeline;
pub mod regression;
pub mod session;
pub mod station;

pub use align::{join, AlignedSeries, VALUE_A_COLUMN, VALUE_B_COLUMN};
pub use cumulative::{
    add_cumulative_column, cumulative_column_name, CumulativeSeries, CUMULATIVE_A_COLUMN,
    CUMULATIVE_B_COLUMN,
};
pub use error::{DoubleMassError, Result};
pub use pipeline::{
    double_mass_curve, station_header, ChartLabels, CurveSummary, DoubleMassCurve,
};
pub use regression::{fit_linear, regress, RegressionResult};
pub use session::{
    ingest_upload, load_station, UploadInput, UploadReport, UploadSession, UploadStatus,
};
pub use station::{normalize, StationId, StationTable, DATE_COLUMN, VALUE_COLUMN};
