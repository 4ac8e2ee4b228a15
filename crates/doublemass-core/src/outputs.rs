use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use polars::io::parquet::write::{ParquetCompression, ParquetWriter, StatisticsOptions};
use polars::prelude::*;
use tracing::info;

use crate::config::{OutputConfig, OutputFormat};
use crate::pipeline::DoubleMassCurve;

/// Writes date, both station values, both running totals and the fitted line as CSV.
pub fn write_series_csv(curve: &DoubleMassCurve, path: &Path) -> Result<()> {
    let mut df = curve.series_frame()?;
    let mut file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    CsvWriter::new(&mut file)
        .include_header(true)
        .finish(&mut df)
        .with_context(|| format!("failed to write CSV {}", path.display()))?;
    Ok(())
}

pub fn write_series_parquet(curve: &DoubleMassCurve, path: &Path) -> Result<()> {
    let mut df = curve.series_frame()?;
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    ParquetWriter::new(file)
        .with_compression(ParquetCompression::Zstd(None))
        .with_statistics(StatisticsOptions::default())
        .finish(&mut df)
        .with_context(|| format!("failed to write parquet {}", path.display()))?;
    Ok(())
}

pub fn write_summary_json(curve: &DoubleMassCurve, path: &Path) -> Result<()> {
    let summary = curve.summary()?;
    let file = File::create(path)
        .with_context(|| format!("failed to create {}", path.display()))?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer_pretty(&mut writer, &summary)
        .context("failed to serialize curve summary")?;
    writer.write_all(b"\n")?;
    writer.flush()?;
    Ok(())
}

/// Writes every configured format into the output directory, creating it if needed.
pub fn write_outputs(curve: &DoubleMassCurve, config: &OutputConfig) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(&config.directory).with_context(|| {
        format!(
            "failed to create output directory {}",
            config.directory.display()
        )
    })?;

    let stem = curve.file_stem();
    let mut written = Vec::with_capacity(config.formats.len());

    for format in &config.formats {
        let path = config
            .directory
            .join(format!("{stem}.{}", format.extension()));
        match format {
            OutputFormat::Json => write_summary_json(curve, &path)?,
            OutputFormat::Csv => write_series_csv(curve, &path)?,
            OutputFormat::Parquet => write_series_parquet(curve, &path)?,
        }
        info!(path = %path.display(), %format, "wrote output");
        written.push(path);
    }

    Ok(written)
}
