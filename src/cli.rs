//! CLI argument parsing for simt-report

use crate::config::ReportConfig;
use crate::palette::UnknownWorkloadPolicy;
use anyhow::Result;
use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Format of the summary printed after generation
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// `Saved:` followed by one file name per line (default)
    #[default]
    Text,
    /// JSON for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "simt-report")]
#[command(version)]
#[command(
    about = "Divergence, utilization and memory-intensity charts from SIMT warp simulator results",
    long_about = None
)]
pub struct Cli {
    /// Simulator results file [default: results.csv]
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory for the rendered figures [default: .]
    #[arg(short, long = "output-dir", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// TOML configuration file (paths, figure sizes, palette)
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// What to do with workloads that have no palette color
    #[arg(long = "unknown-workloads", value_enum, value_name = "POLICY")]
    pub unknown_workloads: Option<UnknownWorkloadPolicy>,

    /// Summary format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Enable debug tracing output to stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

impl Cli {
    /// Resolve the effective configuration: file values, then flag overrides
    pub fn report_config(&self) -> Result<ReportConfig> {
        let mut config = match &self.config {
            Some(path) => ReportConfig::from_file(path)?,
            None => ReportConfig::default(),
        };

        if let Some(input) = &self.input {
            config.input = input.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output_dir = dir.clone();
        }
        if let Some(policy) = self.unknown_workloads {
            config.unknown_workloads = policy;
        }

        Ok(config)
    }
}
