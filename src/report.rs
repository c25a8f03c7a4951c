//! Report Generator
//!
//! Turns grouped simulator records into three figures:
//!
//! - **Combined summary** (always): divergence cost for `branch_div`, then
//!   utilization and memory intensity against cycles per warp for every
//!   palette workload.
//! - **Compute scaling** (only with `compute_heavy` records): cycles per
//!   thread against VADD repetitions, one line per thread count.
//! - **Memory scaling** (only with `memory_heavy` records): cycles per thread
//!   against LD/ST pairs, one line per thread count.
//!
//! Figures are built and rendered one at a time, in that order.

use crate::config::ReportConfig;
use crate::figure::{Figure, FigureBuilder, Panel, Series, SeriesStyle};
use crate::grouper::WorkloadGroups;
use crate::palette::{cycle_color, Palette, Rgb, UnknownWorkloadPolicy};
use crate::record::Record;
use crate::render::Renderer;
use anyhow::{Context, Result};
use serde::Serialize;
use std::cmp::Ordering;
use std::fmt;
use std::fs;
use std::path::PathBuf;

pub const BRANCH_DIV: &str = "branch_div";
pub const COMPUTE_HEAVY: &str = "compute_heavy";
pub const MEMORY_HEAVY: &str = "memory_heavy";

pub const COMBINED_TITLE: &str = "SIMT Analysis (All Workloads)";
pub const NO_BRANCH_DATA: &str = "No branch_div data found";
const CYCLES_PER_WARP: &str = "cycles_per_warp";
const CYCLES_PER_THREAD: &str = "cycles_per_thread";

/// The three report artifacts, in emission order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ArtifactKind {
    Combined,
    ComputeScaling,
    MemoryScaling,
}

impl ArtifactKind {
    pub const ALL: [ArtifactKind; 3] = [
        ArtifactKind::Combined,
        ArtifactKind::ComputeScaling,
        ArtifactKind::MemoryScaling,
    ];

    /// Fixed output file name
    pub fn file_name(self) -> &'static str {
        match self {
            ArtifactKind::Combined => "simt_all_in_one.svg",
            ArtifactKind::ComputeScaling => "compute_scaling.svg",
            ArtifactKind::MemoryScaling => "memory_scaling.svg",
        }
    }
}

/// An artifact that was written
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Artifact {
    pub kind: ArtifactKind,
    pub path: PathBuf,
}

/// Artifacts written by one report pass, in emission order
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReportSummary {
    pub artifacts: Vec<Artifact>,
}

impl ReportSummary {
    pub fn kinds(&self) -> Vec<ArtifactKind> {
        self.artifacts.iter().map(|a| a.kind).collect()
    }

    pub fn contains(&self, kind: ArtifactKind) -> bool {
        self.artifacts.iter().any(|a| a.kind == kind)
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("Failed to serialize report summary")
    }
}

impl fmt::Display for ReportSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Saved:")?;
        for artifact in &self.artifacts {
            writeln!(f, " - {}", artifact.kind.file_name())?;
        }
        Ok(())
    }
}

/// Axis definitions of a scaling figure
#[derive(Debug, Clone, Copy)]
pub struct ScalingLayout {
    pub kind: ArtifactKind,
    pub workload: &'static str,
    pub title: &'static str,
    pub x_desc: &'static str,
}

pub const COMPUTE_SCALING: ScalingLayout = ScalingLayout {
    kind: ArtifactKind::ComputeScaling,
    workload: COMPUTE_HEAVY,
    title: "Compute-heavy: cost per thread vs VADD repetitions",
    x_desc: "VADD repetitions (param)",
};

pub const MEMORY_SCALING: ScalingLayout = ScalingLayout {
    kind: ArtifactKind::MemoryScaling,
    workload: MEMORY_HEAVY,
    title: "Memory-heavy: cost per thread vs LD/ST pairs",
    x_desc: "LD/ST pairs (param)",
};

/// Sort records by thread count, then by a secondary real-valued key
///
/// The sort is stable, so records with equal keys keep their source order.
pub fn sort_by_n_then<'r, F>(records: &'r [Record], secondary: F) -> Vec<&'r Record>
where
    F: Fn(&Record) -> f64,
{
    let mut sorted: Vec<&Record> = records.iter().collect();
    sorted.sort_by(|a, b| match a.n.cmp(&b.n) {
        Ordering::Equal => secondary(*a).total_cmp(&secondary(*b)),
        other => other,
    });
    sorted
}

/// One line series per distinct thread count, in ascending `N` order
///
/// `sorted` must already be ordered by `N`.
pub fn series_per_n<X, Y>(sorted: &[&Record], x: X, y: Y) -> Vec<Series>
where
    X: Fn(&Record) -> f64,
    Y: Fn(&Record) -> f64,
{
    let mut series: Vec<Series> = Vec::new();
    let mut current: Option<i64> = None;

    for &record in sorted {
        if current != Some(record.n) {
            current = Some(record.n);
            series.push(Series {
                label: format!("N={}", record.n),
                color: cycle_color(series.len()),
                style: SeriesStyle::Line,
                points: Vec::new(),
            });
        }
        if let Some(last) = series.last_mut() {
            last.points.push((x(record), y(record)));
        }
    }

    series
}

/// A workload drawn in the scatter panels: label, records, color
pub type PlottedWorkload<'g> = (&'g str, &'g [Record], Rgb);

/// Workloads drawn by palette-driven panels, with their colors
///
/// Palette entries come first in declaration order; labels outside the
/// palette are handled according to `policy`.
pub fn palette_workloads<'g>(
    groups: &'g WorkloadGroups,
    palette: &Palette,
    policy: UnknownWorkloadPolicy,
) -> Vec<PlottedWorkload<'g>> {
    let mut selected = Vec::new();

    for entry in palette.entries() {
        if let Some((label, records)) = groups.iter().find(|(label, _)| *label == entry.label) {
            selected.push((label, records, entry.color));
        }
    }

    let unknown = groups.iter().filter(|(label, _)| !palette.contains(label));
    match policy {
        UnknownWorkloadPolicy::Exclude => {
            for (label, _) in unknown {
                tracing::debug!("Workload '{}' has no palette color, not plotted", label);
            }
        }
        UnknownWorkloadPolicy::Warn => {
            for (label, _) in unknown {
                tracing::warn!("Workload '{}' has no palette color, not plotted", label);
            }
        }
        UnknownWorkloadPolicy::Fallback => {
            for (i, (label, records)) in unknown.enumerate() {
                selected.push((label, records, cycle_color(i)));
            }
        }
    }

    selected
}

fn scatter_panel<X>(
    title: &str,
    x_desc: &str,
    workloads: &[PlottedWorkload<'_>],
    x: X,
) -> Panel
where
    X: Fn(&Record) -> f64,
{
    let mut panel = Panel::plot(title, x_desc, CYCLES_PER_WARP);
    for &(label, records, color) in workloads {
        panel.push_series(Series {
            label: label.to_string(),
            color,
            style: SeriesStyle::Scatter,
            points: records.iter().map(|r| (x(r), r.cycles_per_warp)).collect(),
        });
    }
    panel
}

fn divergence_panel(groups: &WorkloadGroups) -> Panel {
    let Some(branch) = groups.get(BRANCH_DIV) else {
        return Panel::placeholder(NO_BRANCH_DATA);
    };

    let sorted = sort_by_n_then(branch, |r| r.div_ratio);
    let mut panel = Panel::plot(
        "Branch Divergence vs Cost (cycles per warp)",
        "divergence ratio",
        CYCLES_PER_WARP,
    );
    for series in series_per_n(&sorted, |r| r.div_ratio, |r| r.cycles_per_warp) {
        panel.push_series(series);
    }
    panel
}

/// Build the three-panel combined summary figure
pub fn build_combined(groups: &WorkloadGroups, config: &ReportConfig) -> Figure {
    let workloads = palette_workloads(groups, &config.palette, config.unknown_workloads);

    FigureBuilder::new(config.combined_size)
        .title(COMBINED_TITLE)
        .panel(divergence_panel(groups))
        .panel(scatter_panel(
            "Utilization vs Cost (cycles per warp)",
            "utilization",
            &workloads,
            |r| r.utilization,
        ))
        .panel(scatter_panel(
            "Memory Intensity vs Cost (cycles per warp)",
            "memops_per_cycle (avg active mem ops per issued instr)",
            &workloads,
            |r| r.memops_per_cycle,
        ))
        .build()
}

/// Build a scaling figure, or `None` when its workload has no records
pub fn build_scaling(
    groups: &WorkloadGroups,
    layout: &ScalingLayout,
    config: &ReportConfig,
) -> Option<Figure> {
    let records = groups.get(layout.workload).filter(|r| !r.is_empty())?;

    let sorted = sort_by_n_then(records, |r| r.param);
    let mut panel = Panel::plot(layout.title, layout.x_desc, CYCLES_PER_THREAD);
    for series in series_per_n(&sorted, |r| r.param, |r| r.cycles_per_thread) {
        panel.push_series(series);
    }

    Some(FigureBuilder::new(config.scaling_size).panel(panel).build())
}

/// Builds and renders every available artifact
pub struct ReportGenerator<'c, R: Renderer> {
    config: &'c ReportConfig,
    renderer: R,
}

impl<'c, R: Renderer> ReportGenerator<'c, R> {
    pub fn new(config: &'c ReportConfig, renderer: R) -> Self {
        Self { config, renderer }
    }

    /// Write the combined figure, then each scaling figure whose workload is present
    pub fn generate(&self, groups: &WorkloadGroups) -> Result<ReportSummary> {
        let out_dir = &self.config.output_dir;
        fs::create_dir_all(out_dir)
            .with_context(|| format!("Failed to create output directory {}", out_dir.display()))?;

        let mut summary = ReportSummary::default();

        let combined = build_combined(groups, self.config);
        self.emit(ArtifactKind::Combined, combined, &mut summary)?;

        for layout in [&COMPUTE_SCALING, &MEMORY_SCALING] {
            match build_scaling(groups, layout, self.config) {
                Some(figure) => self.emit(layout.kind, figure, &mut summary)?,
                None => tracing::info!(
                    "No {} records, skipping {}",
                    layout.workload,
                    layout.kind.file_name()
                ),
            }
        }

        Ok(summary)
    }

    fn emit(&self, kind: ArtifactKind, figure: Figure, summary: &mut ReportSummary) -> Result<()> {
        let path = self.config.output_dir.join(kind.file_name());
        self.renderer
            .render(figure, &path)
            .with_context(|| format!("Failed to render {}", path.display()))?;
        tracing::info!("Wrote {}", path.display());
        summary.artifacts.push(Artifact { kind, path });
        Ok(())
    }
}
