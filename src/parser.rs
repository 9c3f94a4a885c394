//! JSON decoder for the raw stop dataset.

use anyhow::{Context, Result};
use serde_json::{Map, Value};

/// One record as decoded from JSON, before any field validation.
/// Values may be of any JSON type; the validator sorts that out.
pub type RawRecord = Map<String, Value>;

/// Decodes the input blob as a JSON array of objects.
///
/// # Errors
///
/// Returns an error if the input is not valid JSON or is not an array of
/// objects. Field-level type mismatches are not errors here.
pub fn parse_records(input: &str) -> Result<Vec<RawRecord>> {
    serde_json::from_str(input).context("input is not a JSON array of stop records")
}
