//! Record Loader: typed rows from simulator result files
//!
//! Integer-valued columns go through a two-stage parse (real number first,
//! then truncation toward zero) so that values written as `3.0e1` or `64.0`
//! are accepted. Any missing column or unparseable cell fails the whole load.

use crate::schema::{ColumnIndex, Field};
use csv::StringRecord;
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors raised while loading a result file
#[derive(Error, Debug)]
pub enum ParseError {
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Missing required column '{column}'")]
    MissingColumn { column: &'static str },

    #[error("Line {line}: field '{field}' is not numeric: {value:?}")]
    InvalidNumber {
        line: u64,
        field: &'static str,
        value: String,
    },

    #[error("Line {line}: malformed row: {message}")]
    Malformed { line: u64, message: String },
}

/// One measurement row emitted by the warp simulator
#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub workload: String,
    /// Thread count of the launch
    pub n: i64,
    pub n_warps: i64,
    pub warp_cycles: i64,
    pub active_lane_cycles: i64,
    pub mem_lane_ops: i64,
    pub divergent_branches: i64,
    pub reconverges: i64,
    pub div_ratio: f64,
    /// Workload-specific knob (VADD repetitions, LD/ST pairs, ...)
    pub param: f64,
    pub utilization: f64,
    pub cycles_per_warp: f64,
    pub cycles_per_thread: f64,
    pub memops_per_cycle: f64,
}

/// Parse a real-valued cell
pub fn parse_real(text: &str) -> Option<f64> {
    text.trim().parse::<f64>().ok()
}

/// Parse an integer-valued cell: read as a real, then truncate toward zero
///
/// Non-finite values and values outside the `i64` range are rejected.
pub fn parse_integer(text: &str) -> Option<i64> {
    let value = parse_real(text)?.trunc();
    // -2^63 and 2^63 are both exact in f64
    if !value.is_finite() || value < i64::MIN as f64 || value >= i64::MAX as f64 {
        return None;
    }
    Some(value as i64)
}

struct RowReader<'r> {
    row: &'r StringRecord,
    index: &'r ColumnIndex,
    line: u64,
}

impl RowReader<'_> {
    /// Cell text for a field; rows shorter than the header lack trailing cells
    fn text(&self, field: Field) -> Result<&str, ParseError> {
        self.row
            .get(self.index.position(field))
            .ok_or_else(|| ParseError::Malformed {
                line: self.line,
                message: format!("no value for column '{}'", field.name()),
            })
    }

    fn invalid(&self, field: Field, text: &str) -> ParseError {
        ParseError::InvalidNumber {
            line: self.line,
            field: field.name(),
            value: text.to_string(),
        }
    }

    fn integer(&self, field: Field) -> Result<i64, ParseError> {
        let text = self.text(field)?;
        parse_integer(text).ok_or_else(|| self.invalid(field, text))
    }

    fn real(&self, field: Field) -> Result<f64, ParseError> {
        let text = self.text(field)?;
        parse_real(text).ok_or_else(|| self.invalid(field, text))
    }
}

impl Record {
    fn from_row(row: &StringRecord, index: &ColumnIndex, line: u64) -> Result<Self, ParseError> {
        let r = RowReader { row, index, line };

        Ok(Self {
            workload: r.text(Field::Workload)?.to_string(),
            n: r.integer(Field::N)?,
            n_warps: r.integer(Field::NWarps)?,
            warp_cycles: r.integer(Field::WarpCycles)?,
            active_lane_cycles: r.integer(Field::ActiveLaneCycles)?,
            mem_lane_ops: r.integer(Field::MemLaneOps)?,
            divergent_branches: r.integer(Field::DivergentBranches)?,
            reconverges: r.integer(Field::Reconverges)?,
            div_ratio: r.real(Field::DivRatio)?,
            param: r.real(Field::Param)?,
            utilization: r.real(Field::Utilization)?,
            cycles_per_warp: r.real(Field::CyclesPerWarp)?,
            cycles_per_thread: r.real(Field::CyclesPerThread)?,
            memops_per_cycle: r.real(Field::MemopsPerCycle)?,
        })
    }
}

fn malformed(err: &csv::Error, fallback_line: u64) -> ParseError {
    ParseError::Malformed {
        line: err.position().map_or(fallback_line, |p| p.line()),
        message: err.to_string(),
    }
}

/// Read records from any CSV source with a header row
///
/// Records are returned in source order. The first failure aborts the read.
/// Rows may carry more or fewer cells than the header as long as every
/// schema column has a value.
pub fn read_records<R: Read>(source: R) -> Result<Vec<Record>, ParseError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(source);

    let headers = reader.headers().map_err(|e| malformed(&e, 1))?.clone();
    let index = ColumnIndex::resolve(headers.iter())?;

    let mut records = Vec::new();
    for (i, row) in reader.records().enumerate() {
        // header occupies line 1
        let fallback_line = i as u64 + 2;
        let row = row.map_err(|e| malformed(&e, fallback_line))?;
        let line = row.position().map_or(fallback_line, |p| p.line());
        records.push(Record::from_row(&row, &index, line)?);
    }

    Ok(records)
}

/// Load all records from a result file
///
/// The file is opened once and closed on every exit path.
pub fn load_records<P: AsRef<Path>>(path: P) -> Result<Vec<Record>, ParseError> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| ParseError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let records = read_records(file)?;
    tracing::debug!("Loaded {} records from {}", records.len(), path.display());
    Ok(records)
}

#[cfg(test)]
impl Record {
    /// All-zero record for the given workload
    pub(crate) fn fixture(workload: &str) -> Self {
        Self {
            workload: workload.to_string(),
            n: 0,
            n_warps: 0,
            warp_cycles: 0,
            active_lane_cycles: 0,
            mem_lane_ops: 0,
            divergent_branches: 0,
            reconverges: 0,
            div_ratio: 0.0,
            param: 0.0,
            utilization: 0.0,
            cycles_per_warp: 0.0,
            cycles_per_thread: 0.0,
            memops_per_cycle: 0.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::{FieldKind, SCHEMA};
    use std::io::Write;
    use tempfile::NamedTempFile;

    // Column order as written by the simulator's analysis driver
    const HEADER: &str = "workload,N,n_warps,div_ratio,param,warp_cycles,active_lane_cycles,\
utilization,cycles_per_warp,cycles_per_thread,mem_lane_ops,memops_per_cycle,\
divergent_branches,reconverges";

    fn csv_with(rows: &[&str]) -> String {
        let mut text = String::from(HEADER);
        text.push('\n');
        for row in rows {
            text.push_str(row);
            text.push('\n');
        }
        text
    }

    #[test]
    fn test_parse_integer_two_stage() {
        assert_eq!(parse_integer("30"), Some(30));
        assert_eq!(parse_integer("3.0e1"), Some(30));
        assert_eq!(parse_integer("64.0"), Some(64));
        assert_eq!(parse_integer(" 12 "), Some(12));
    }

    #[test]
    fn test_parse_integer_truncates_toward_zero() {
        assert_eq!(parse_integer("2.9"), Some(2));
        assert_eq!(parse_integer("-2.9"), Some(-2));
        assert_eq!(parse_integer("0.999"), Some(0));
    }

    #[test]
    fn test_parse_integer_rejects_non_numeric() {
        assert_eq!(parse_integer(""), None);
        assert_eq!(parse_integer("abc"), None);
        assert_eq!(parse_integer("nan"), None);
        assert_eq!(parse_integer("inf"), None);
        assert_eq!(parse_integer("1e30"), None);
    }

    #[test]
    fn test_parse_real() {
        assert_eq!(parse_real("0.25"), Some(0.25));
        assert_eq!(parse_real("2.5e-1"), Some(0.25));
        assert_eq!(parse_real("7"), Some(7.0));
        assert_eq!(parse_real("x1"), None);
    }

    #[test]
    fn test_read_single_row() {
        let text = csv_with(&[
            "branch_div,64,2,0.50,0,240,5760,0.750000,120.000000,3.75000000,128,0.533333,2,2",
        ]);
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);

        let r = &records[0];
        assert_eq!(r.workload, "branch_div");
        assert_eq!(r.n, 64);
        assert_eq!(r.n_warps, 2);
        assert_eq!(r.div_ratio, 0.5);
        assert_eq!(r.param, 0.0);
        assert_eq!(r.warp_cycles, 240);
        assert_eq!(r.active_lane_cycles, 5760);
        assert_eq!(r.utilization, 0.75);
        assert_eq!(r.cycles_per_warp, 120.0);
        assert_eq!(r.cycles_per_thread, 3.75);
        assert_eq!(r.mem_lane_ops, 128);
        assert_eq!(r.memops_per_cycle, 0.533333);
        assert_eq!(r.divergent_branches, 2);
        assert_eq!(r.reconverges, 2);
    }

    #[test]
    fn test_read_scientific_integer_cells() {
        let text = csv_with(&["compute_heavy,3.2e1,1.0,0,8,3.0e1,960,1,30,0.9375,64,2.1,0,0"]);
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records[0].n, 32);
        assert_eq!(records[0].n_warps, 1);
        assert_eq!(records[0].warp_cycles, 30);
    }

    #[test]
    fn test_read_preserves_file_order() {
        let text = csv_with(&[
            "memory_heavy,32,1,0,1,10,320,1,10,0.3,64,6.4,0,0",
            "branch_div,32,1,0.5,0,12,320,0.8,12,0.3,64,5.3,1,1",
            "memory_heavy,32,1,0,2,20,640,1,20,0.6,128,6.4,0,0",
        ]);
        let records = read_records(text.as_bytes()).unwrap();
        let order: Vec<(&str, f64)> = records
            .iter()
            .map(|r| (r.workload.as_str(), r.param))
            .collect();
        assert_eq!(
            order,
            vec![("memory_heavy", 1.0), ("branch_div", 0.0), ("memory_heavy", 2.0)]
        );
    }

    #[test]
    fn test_read_keeps_workload_verbatim() {
        let text = csv_with(&[
            "Branch_Div,32,1,0,0,1,1,1,1,1,1,1,0,0",
            ",32,1,0,0,1,1,1,1,1,1,1,0,0",
        ]);
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records[0].workload, "Branch_Div");
        assert_eq!(records[1].workload, "");
    }

    #[test]
    fn test_read_header_only_is_empty() {
        let records = read_records(csv_with(&[]).as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn test_read_missing_column_fails() {
        let text = "workload,N,n_warps,param,warp_cycles,active_lane_cycles,utilization,\
cycles_per_warp,cycles_per_thread,mem_lane_ops,memops_per_cycle,divergent_branches,reconverges\n\
branch_div,32,1,0,12,320,0.8,12,0.3,64,5.3,1,1\n";
        let err = read_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::MissingColumn { column: "div_ratio" }));
        assert!(err.to_string().contains("div_ratio"));
    }

    #[test]
    fn test_read_invalid_cell_reports_line_and_field() {
        let text = csv_with(&[
            "branch_div,32,1,0.5,0,12,320,0.8,12,0.3,64,5.3,1,1",
            "branch_div,32,1,half,0,12,320,0.8,12,0.3,64,5.3,1,1",
        ]);
        let err = read_records(text.as_bytes()).unwrap_err();
        match err {
            ParseError::InvalidNumber { line, field, value } => {
                assert_eq!(line, 3);
                assert_eq!(field, "div_ratio");
                assert_eq!(value, "half");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_empty_integer_cell_fails() {
        let text = csv_with(&["branch_div,,1,0.5,0,12,320,0.8,12,0.3,64,5.3,1,1"]);
        let err = read_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::InvalidNumber { field: "N", .. }));
    }

    #[test]
    fn test_read_short_row_is_malformed() {
        let text = csv_with(&["branch_div,32,1,0.5"]);
        let err = read_records(text.as_bytes()).unwrap_err();
        assert!(matches!(err, ParseError::Malformed { line: 2, .. }));
        assert!(err.to_string().contains("warp_cycles"));
    }

    #[test]
    fn test_read_row_missing_workload_cell() {
        // header puts workload last; the row stops one cell short
        let text = "N,n_warps,div_ratio,param,warp_cycles,active_lane_cycles,utilization,\
cycles_per_warp,cycles_per_thread,mem_lane_ops,memops_per_cycle,divergent_branches,reconverges,workload\n\
32,1,0.5,0,12,320,0.8,12,0.3,64,5.3,1,1\n";
        let err = read_records(text.as_bytes()).unwrap_err();
        match err {
            ParseError::Malformed { line, message } => {
                assert_eq!(line, 2);
                assert!(message.contains("workload"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_read_row_with_trailing_extra_cell() {
        let text = csv_with(&["branch_div,32,1,0.5,0,12,320,0.8,12,0.3,64,5.3,1,1,"]);
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].reconverges, 1);
    }

    #[test]
    fn test_read_row_without_trailing_extra_column() {
        let text = format!(
            "{HEADER},notes\n\
branch_div,32,1,0.5,0,12,320,0.8,12,0.3,64,5.3,1,1,first run\n\
branch_div,64,2,0.25,0,40,900,0.7,20,0.6,128,3.2,2,2\n"
        );
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[1].n, 64);
        assert_eq!(records[1].reconverges, 2);
    }

    #[test]
    fn test_read_duplicate_column_takes_last_value() {
        let text = format!(
            "{HEADER},cycles_per_warp\n\
branch_div,32,1,0.5,0,12,320,0.8,120,0.3,64,5.3,1,1,999\n"
        );
        let records = read_records(text.as_bytes()).unwrap();
        assert_eq!(records[0].cycles_per_warp, 999.0);
    }

    fn numeric(record: &Record, field: Field) -> f64 {
        match field {
            Field::Workload => f64::NAN,
            Field::N => record.n as f64,
            Field::NWarps => record.n_warps as f64,
            Field::WarpCycles => record.warp_cycles as f64,
            Field::ActiveLaneCycles => record.active_lane_cycles as f64,
            Field::MemLaneOps => record.mem_lane_ops as f64,
            Field::DivergentBranches => record.divergent_branches as f64,
            Field::Reconverges => record.reconverges as f64,
            Field::DivRatio => record.div_ratio,
            Field::Param => record.param,
            Field::Utilization => record.utilization,
            Field::CyclesPerWarp => record.cycles_per_warp,
            Field::CyclesPerThread => record.cycles_per_thread,
            Field::MemopsPerCycle => record.memops_per_cycle,
        }
    }

    #[test]
    fn test_parse_rule_follows_schema_kind() {
        // Canonical order, every numeric cell 2.5
        let header: Vec<&str> = SCHEMA.iter().map(|f| f.name).collect();
        let row: Vec<&str> = SCHEMA
            .iter()
            .map(|f| if f.kind == FieldKind::Categorical { "w" } else { "2.5" })
            .collect();
        let text = format!("{}\n{}\n", header.join(","), row.join(","));
        let record = &read_records(text.as_bytes()).unwrap()[0];

        for (i, spec) in SCHEMA.iter().enumerate() {
            let field = Field::ALL[i];
            assert_eq!(field.spec(), spec);
            match spec.kind {
                FieldKind::Categorical => assert_eq!(record.workload, "w"),
                FieldKind::Integer => assert_eq!(numeric(record, field), 2.0, "{}", spec.name),
                FieldKind::Real => assert_eq!(numeric(record, field), 2.5, "{}", spec.name),
            }
        }
    }

    #[test]
    fn test_load_records_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(
            csv_with(&["nested_div,96,3,0,0,300,7200,0.75,100,3.125,0,0,6,6"]).as_bytes(),
        )
        .unwrap();
        file.flush().unwrap();

        let records = load_records(file.path()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].workload, "nested_div");
        assert_eq!(records[0].n_warps, 3);
    }

    #[test]
    fn test_load_records_missing_file() {
        let err = load_records("/nonexistent/results.csv").unwrap_err();
        assert!(matches!(err, ParseError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/results.csv"));
    }
}
