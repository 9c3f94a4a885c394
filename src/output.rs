//! Report rendering.
//!
//! Writes to any `io::Write` so tests capture output in a buffer and the
//! binary streams it to stdout.

use std::io::Write;

use anyhow::Result;
use itertools::Itertools;

use crate::analyzer::Categories;
use crate::stop::{ErrorTally, LineCounts};

/// Writes the error total followed by one line per observed field.
pub fn write_validation_summary<W: Write>(out: &mut W, tally: &ErrorTally) -> Result<()> {
    writeln!(out, "Type and field validation: {} errors", tally.total())?;
    for (field, count) in tally.iter() {
        writeln!(out, "{field}: {count}")?;
    }
    Ok(())
}

/// Writes per-line stop counts in first-seen line order.
pub fn write_line_counts<W: Write>(out: &mut W, counts: &LineCounts) -> Result<()> {
    writeln!(out, "Line names and number of stops:")?;
    for (bus_id, count) in counts.iter() {
        writeln!(out, "bus_id: {bus_id} stops: {count}")?;
    }
    Ok(())
}

/// Writes the terminal-completeness failure notice for one line.
pub fn write_missing_terminals<W: Write>(out: &mut W, bus_id: i64) -> Result<()> {
    writeln!(out, "There is no start or end stop for the line: {bus_id}")?;
    Ok(())
}

/// Writes the four categorized name lists. The on-demand list prints under
/// a second `Finish stops:` label; downstream consumers rely on the exact
/// label sequence.
pub fn write_categories<W: Write>(out: &mut W, categories: &Categories) -> Result<()> {
    writeln!(
        out,
        "Start stops: {} {}",
        categories.start.len(),
        format_names(&categories.start)
    )?;
    writeln!(
        out,
        "Transfer stops: {} {}",
        categories.transfer.len(),
        format_names(&categories.transfer)
    )?;
    writeln!(
        out,
        "Finish stops: {} {}",
        categories.finish.len(),
        format_names(&categories.finish)
    )?;
    writeln!(
        out,
        "Finish stops: {} {}",
        categories.on_demand.len(),
        format_names(&categories.on_demand)
    )?;
    Ok(())
}

/// Renders a name list as `['A', 'B']`, or `[]` when empty.
fn format_names(names: &[String]) -> String {
    format!("[{}]", names.iter().map(|n| format!("'{n}'")).join(", "))
}
