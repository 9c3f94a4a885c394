pub mod analyzer;
pub mod output;
pub mod parser;
pub mod stop;
pub mod validator;

use std::io::Write;

use anyhow::Result;
use tracing::info;

/// Runs the full audit over one JSON dataset: decode, validate fields,
/// check route ordering and terminals, render the report.
#[tracing::instrument(skip_all, fields(bytes = input.len()))]
pub fn run_audit<W: Write>(input: &str, out: &mut W) -> Result<()> {
    let records = parser::parse_records(input)?;
    info!(records = records.len(), "dataset decoded");

    let mut validation = validator::validate(&records);
    analyzer::check_arrival_times(&validation.stops, &mut validation.tally);

    output::write_validation_summary(out, &validation.tally)?;
    output::write_line_counts(out, &validation.line_counts)?;

    match analyzer::check_terminals(&validation.stops) {
        Err(bus_id) => output::write_missing_terminals(out, bus_id)?,
        Ok(()) => {
            let categories = analyzer::categorize(&validation.stops);
            output::write_categories(out, &categories)?;
        }
    }

    Ok(())
}
