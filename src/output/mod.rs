//! Presentation of profiles: tables for the latest run and an overlay chart
//! of the runs kept in the history.

pub mod chart;
pub mod table;

use std::io::Write;

use crate::error::Result;
use crate::integrator::Trajectory;

/// Decimal places used for CSV output.
pub const CSV_PRECISION: usize = 6;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Table,
    Csv,
    Json,
}

/// Writes `trajectory` to `out` in `format`.
pub fn write_trajectory<W: Write>(
    trajectory: &Trajectory,
    format: OutputFormat,
    out: &mut W,
) -> Result<()> {
    match format {
        OutputFormat::Table => table::write_text_table(trajectory, out),
        OutputFormat::Csv => table::write_csv(trajectory, CSV_PRECISION, out),
        OutputFormat::Json => {
            writeln!(out, "{}", table::to_json(trajectory)?)?;
            Ok(())
        }
    }
}
