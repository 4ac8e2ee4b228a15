use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use anyhow::{bail, Context, Result};
use doublemass_parser::ColumnMapping;
use serde::{Deserialize, Serialize};

pub const CONFIG_ENV_VAR: &str = "DOUBLEMASS_CONFIG";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    Json,
    Csv,
    Parquet,
}

impl OutputFormat {
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Json => "json",
            OutputFormat::Csv => "csv",
            OutputFormat::Parquet => "parquet",
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for OutputFormat {
    type Err = anyhow::Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(OutputFormat::Json),
            "csv" => Ok(OutputFormat::Csv),
            "parquet" | "pq" => Ok(OutputFormat::Parquet),
            other => bail!("unknown output format '{other}' (expected json, csv or parquet)"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    pub directory: PathBuf,
    pub formats: Vec<OutputFormat>,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("."),
            formats: vec![OutputFormat::Json, OutputFormat::Csv],
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub columns: ColumnMapping,
    pub output: OutputConfig,
}

pub fn parse_config(toml_str: &str) -> Result<AppConfig> {
    toml::from_str::<AppConfig>(toml_str).context("failed to parse doublemass config TOML")
}

pub fn load_config_file(path: &Path) -> Result<AppConfig> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read config file {}", path.display()))?;
    parse_config(&contents).with_context(|| format!("invalid config file {}", path.display()))
}

/// Loads `explicit` if given, else the file named by `DOUBLEMASS_CONFIG`, else defaults.
pub fn resolve_config(explicit: Option<&Path>) -> Result<AppConfig> {
    if let Some(path) = explicit {
        return load_config_file(path);
    }
    match std::env::var_os(CONFIG_ENV_VAR) {
        Some(path) if !path.is_empty() => load_config_file(Path::new(&path)),
        _ => Ok(AppConfig::default()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_config_defaults() {
        let config = parse_config("").expect("parse empty config");
        assert_eq!(config, AppConfig::default());
        assert_eq!(config.columns.rainfall, "Rainfall amount (millimetres)");
        assert_eq!(
            config.output.formats,
            vec![OutputFormat::Json, OutputFormat::Csv]
        );
    }

    #[test]
    fn parse_config_overrides() {
        let toml = r#"
            [columns]
            rainfall = "Precipitation (mm)"

            [output]
            directory = "results"
            formats = ["parquet"]
        "#;
        let config = parse_config(toml).expect("parse config");
        assert_eq!(config.columns.rainfall, "Precipitation (mm)");
        assert_eq!(config.columns.year, "Year");
        assert_eq!(config.output.directory, PathBuf::from("results"));
        assert_eq!(config.output.formats, vec![OutputFormat::Parquet]);
    }

    #[test]
    fn unknown_format_is_rejected() {
        assert!(parse_config("[output]\nformats = [\"png\"]\n").is_err());
        assert!("png".parse::<OutputFormat>().is_err());
        assert_eq!("CSV".parse::<OutputFormat>().unwrap(), OutputFormat::Csv);
    }
}
