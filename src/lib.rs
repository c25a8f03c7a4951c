//! simt-report - comparative charts for GPU SIMT warp simulator results
//!
//! The pipeline runs once per invocation, strictly in order:
//! load the simulator's result file into typed records, group them by
//! workload, then render the combined summary and whichever scaling figures
//! have data.

pub mod cli;
pub mod config;
pub mod figure;
pub mod grouper;
pub mod palette;
pub mod record;
pub mod render;
pub mod report;
pub mod schema;

use anyhow::{Context, Result};
use config::ReportConfig;
use grouper::WorkloadGroups;
use render::SvgRenderer;
use report::{ReportGenerator, ReportSummary};

/// Load, group and report
///
/// A load failure aborts before anything is written.
pub fn run(config: &ReportConfig) -> Result<ReportSummary> {
    let records = record::load_records(&config.input)
        .with_context(|| format!("Failed to load {}", config.input.display()))?;

    let groups = WorkloadGroups::from_records(records);
    tracing::info!(
        "Grouped {} records into {} workloads",
        groups.record_count(),
        groups.len()
    );
    for (label, members) in groups.iter() {
        tracing::debug!("  {:?}: {} records", label, members.len());
    }

    ReportGenerator::new(config, SvgRenderer).generate(&groups)
}
