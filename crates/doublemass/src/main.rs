use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use comfy_table::presets::UTF8_FULL;
use comfy_table::Table;
use doublemass_core::config::{resolve_config, AppConfig, OutputFormat};
use doublemass_core::outputs::write_outputs;
use doublemass_core::{
    double_mass_curve, ingest_upload, load_station, DoubleMassCurve, StationTable, UploadInput,
    UploadSession, UploadStatus,
};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about = "Double mass curve analysis for daily rainfall exports", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fit the double mass curve of two station exports and write the results
    Run(RunArgs),
    /// Summarize a single station export
    Inspect(InspectArgs),
}

#[derive(Args, Debug)]
struct RunArgs {
    /// Export for station A (x axis)
    file_a: PathBuf,
    /// Export for station B (y axis)
    file_b: PathBuf,
    /// TOML config file (defaults to $DOUBLEMASS_CONFIG)
    #[arg(long)]
    config: Option<PathBuf>,
    /// Directory for written outputs
    #[arg(short, long)]
    output_dir: Option<PathBuf>,
    /// Output formats to write; repeat the flag for several
    #[arg(short, long = "format")]
    formats: Vec<OutputFormat>,
}

#[derive(Args, Debug)]
struct InspectArgs {
    file: PathBuf,
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Run(args) => run(args),
        Command::Inspect(args) => inspect(args),
    }
}

fn run(args: RunArgs) -> Result<()> {
    let mut config = resolve_config(args.config.as_deref())?;
    if let Some(dir) = args.output_dir {
        config.output.directory = dir;
    }
    if !args.formats.is_empty() {
        config.output.formats = args.formats;
    }

    let mut session = UploadSession::new();
    let table_a = upload(&mut session, &args.file_a, &config)?;
    let table_b = upload(&mut session, &args.file_b, &config)?;

    let curve = double_mass_curve(&table_a, &table_b)?;
    println!("{}", summary_table(&curve)?);

    let written = write_outputs(&curve, &config.output)?;
    for path in &written {
        println!("wrote {}", path.display());
    }
    info!(outputs = written.len(), "double mass run finished");
    Ok(())
}

fn inspect(args: InspectArgs) -> Result<()> {
    let config = resolve_config(args.config.as_deref())?;
    let (filename, contents) = read_upload(&args.file)?;
    let table = load_station(&filename, &contents, &config.columns)
        .with_context(|| format!("failed to load {}", args.file.display()))?;

    let mut out = Table::new();
    out.load_preset(UTF8_FULL);
    out.set_header(vec!["Station", "Rows", "Missing", "First date", "Last date"]);
    let (first, last) = match table.date_range()? {
        Some((first, last)) => (first.to_string(), last.to_string()),
        None => ("-".to_string(), "-".to_string()),
    };
    out.add_row(vec![
        table.station_id.to_string(),
        table.height().to_string(),
        table.missing_values().to_string(),
        first,
        last,
    ]);
    println!("{out}");
    Ok(())
}

fn upload(session: &mut UploadSession, path: &Path, config: &AppConfig) -> Result<StationTable> {
    let (filename, contents) = read_upload(path)?;
    let (report, table) = ingest_upload(
        session,
        UploadInput {
            filename: &filename,
            contents: &contents,
        },
        &config.columns,
    );

    match (report.status, table) {
        (UploadStatus::Accepted, Some(table)) => Ok(table),
        (status, _) => {
            let message = report
                .message
                .unwrap_or_else(|| format!("upload of {filename} was not accepted"));
            warn!(filename = %filename, ?status, hash = %report.hash, "upload not accepted");
            bail!("{message}")
        }
    }
}

fn read_upload(path: &Path) -> Result<(String, Vec<u8>)> {
    let filename = path
        .file_name()
        .and_then(|name| name.to_str())
        .with_context(|| format!("{} has no usable file name", path.display()))?
        .to_string();
    let contents =
        std::fs::read(path).with_context(|| format!("failed to read {}", path.display()))?;
    Ok((filename, contents))
}

fn summary_table(curve: &DoubleMassCurve) -> Result<Table> {
    let summary = curve.summary()?;
    let mut table = Table::new();
    table.load_preset(UTF8_FULL);
    table.set_header(vec!["Field", "Value"]);

    let span = match (summary.first_date, summary.last_date) {
        (Some(first), Some(last)) => format!("{first} to {last}"),
        _ => "-".to_string(),
    };
    let rows = [
        ("Title", summary.labels.title.clone()),
        ("Station A (x)", summary.station_a.to_string()),
        ("Station B (y)", summary.station_b.to_string()),
        ("Common dates", summary.points.to_string()),
        ("Date span", span),
        ("Slope", format!("{:.6}", summary.slope)),
        ("Intercept", format!("{:.6}", summary.intercept)),
        ("R²", format!("{:.6}", summary.r_squared)),
        ("Equation", summary.equation.clone()),
    ];
    for (field, value) in rows {
        table.add_row(vec![field.to_string(), value]);
    }
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn run_accepts_repeated_formats() {
        let cli = Cli::try_parse_from([
            "doublemass",
            "run",
            "a.csv",
            "b.csv",
            "--format",
            "csv",
            "--format",
            "parquet",
            "-o",
            "out",
        ])
        .expect("parse args");
        let Command::Run(args) = cli.command else {
            panic!("expected run command");
        };
        assert_eq!(args.formats, vec![OutputFormat::Csv, OutputFormat::Parquet]);
        assert_eq!(args.output_dir, Some(PathBuf::from("out")));
    }

    #[test]
    fn unknown_format_is_a_usage_error() {
        let result = Cli::try_parse_from(["doublemass", "run", "a.csv", "b.csv", "--format", "png"]);
        assert!(result.is_err());
    }
}
