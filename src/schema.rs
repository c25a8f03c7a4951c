//! Column schema for simulator result files
//!
//! The simulator writes one row per (workload, configuration) run. Every
//! column the report relies on is declared here once, together with the
//! rule used to parse it, so that nothing downstream depends on header text.

use crate::record::ParseError;

/// How a column's text is interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free-form label, kept verbatim
    Categorical,
    /// Whole number, parsed as a real and truncated toward zero
    Integer,
    /// Floating point value
    Real,
}

/// Schema entry for one required column
///
/// `kind` documents the column; the loader's per-field accessors apply the
/// matching parse rule and are checked against it in tests.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
}

const fn field(name: &'static str, kind: FieldKind) -> FieldSpec {
    FieldSpec { name, kind }
}

/// Position of each field in [`SCHEMA`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(usize)]
pub enum Field {
    Workload = 0,
    N,
    NWarps,
    WarpCycles,
    ActiveLaneCycles,
    MemLaneOps,
    DivergentBranches,
    Reconverges,
    DivRatio,
    Param,
    Utilization,
    CyclesPerWarp,
    CyclesPerThread,
    MemopsPerCycle,
}

impl Field {
    /// Every field, in [`SCHEMA`] order
    pub const ALL: [Field; FIELD_COUNT] = [
        Field::Workload,
        Field::N,
        Field::NWarps,
        Field::WarpCycles,
        Field::ActiveLaneCycles,
        Field::MemLaneOps,
        Field::DivergentBranches,
        Field::Reconverges,
        Field::DivRatio,
        Field::Param,
        Field::Utilization,
        Field::CyclesPerWarp,
        Field::CyclesPerThread,
        Field::MemopsPerCycle,
    ];

    pub fn spec(self) -> &'static FieldSpec {
        &SCHEMA[self as usize]
    }

    pub fn name(self) -> &'static str {
        self.spec().name
    }
}

/// Number of required columns
pub const FIELD_COUNT: usize = 14;

/// All required columns, in canonical order
pub static SCHEMA: [FieldSpec; FIELD_COUNT] = [
    field("workload", FieldKind::Categorical),
    field("N", FieldKind::Integer),
    field("n_warps", FieldKind::Integer),
    field("warp_cycles", FieldKind::Integer),
    field("active_lane_cycles", FieldKind::Integer),
    field("mem_lane_ops", FieldKind::Integer),
    field("divergent_branches", FieldKind::Integer),
    field("reconverges", FieldKind::Integer),
    field("div_ratio", FieldKind::Real),
    field("param", FieldKind::Real),
    field("utilization", FieldKind::Real),
    field("cycles_per_warp", FieldKind::Real),
    field("cycles_per_thread", FieldKind::Real),
    field("memops_per_cycle", FieldKind::Real),
];

/// Header columns resolved against [`SCHEMA`]
///
/// Column order in the file is irrelevant; extra columns are ignored. When a
/// name repeats, the last occurrence wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnIndex {
    positions: [usize; FIELD_COUNT],
}

impl ColumnIndex {
    /// Resolve header names to positions, failing on the first missing column
    pub fn resolve<'a, I>(headers: I) -> Result<Self, ParseError>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let headers: Vec<&str> = headers.into_iter().collect();
        let mut positions = [0usize; FIELD_COUNT];

        for (slot, spec) in positions.iter_mut().zip(SCHEMA.iter()) {
            *slot = headers
                .iter()
                .rposition(|h| *h == spec.name)
                .ok_or(ParseError::MissingColumn { column: spec.name })?;
        }

        Ok(Self { positions })
    }

    /// Column position of a field in the source file
    pub fn position(&self, field: Field) -> usize {
        self.positions[field as usize]
    }
}
