//! Report configuration
//!
//! Defaults reproduce the fixed paths the simulator's analysis step uses:
//! `results.csv` in, three SVG files into the working directory. A TOML file
//! can override any of them:
//!
//! ```toml
//! input = "runs/results.csv"
//! output_dir = "reports"
//! combined_size = [1800, 2400]
//! scaling_size = [1800, 1000]
//! unknown_workloads = "warn"
//!
//! [[palette]]
//! label = "branch_div"
//! color = "#1f77b4"
//! ```

use crate::palette::{Palette, UnknownWorkloadPolicy};
use anyhow::{bail, Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Default input file written by the simulator
pub const DEFAULT_INPUT: &str = "results.csv";

/// Settings for one report run
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReportConfig {
    /// Simulator result file
    pub input: PathBuf,
    /// Directory receiving the rendered figures
    pub output_dir: PathBuf,
    /// Pixel size of the three-panel summary
    pub combined_size: (u32, u32),
    /// Pixel size of each scaling figure
    pub scaling_size: (u32, u32),
    pub palette: Palette,
    pub unknown_workloads: UnknownWorkloadPolicy,
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from(DEFAULT_INPUT),
            output_dir: PathBuf::from("."),
            combined_size: (1800, 2400),
            scaling_size: (1800, 1000),
            palette: Palette::default(),
            unknown_workloads: UnknownWorkloadPolicy::default(),
        }
    }
}

impl ReportConfig {
    /// Load configuration from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    /// Load configuration from a TOML string
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).context("Failed to parse TOML")?;
        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        for (name, (w, h)) in [
            ("combined_size", self.combined_size),
            ("scaling_size", self.scaling_size),
        ] {
            if w == 0 || h == 0 {
                bail!("{} must be non-zero, got {}x{}", name, w, h);
            }
        }

        let mut seen = HashSet::new();
        for entry in self.palette.entries() {
            if !seen.insert(entry.label.as_str()) {
                bail!("Duplicate palette label '{}'", entry.label);
            }
        }

        Ok(())
    }
}
