//! Core data types shared by the validation and route-analysis passes.

use serde::Serialize;

/// Recognized stop-type markers: Start, On-demand, Finish, or unmarked.
pub const VALID_STOP_TYPES: &[&str] = &["S", "O", "F", ""];

/// A valid stop name must end with one of these suffixes.
pub const NAME_SUFFIXES: &[&str] = &[" Road", " Avenue", " Boulevard", " Street"];

/// Sentinel for integer fields that could not be parsed.
pub const MISSING_ID: i64 = -1;

/// Sentinel for string fields that could not be parsed.
pub const MISSING_TEXT: &str = "N/A";

/// A normalized stop record. Fields that failed validation hold the
/// sentinel values so a partially defective record still flows through
/// the route analysis without special-casing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Stop {
    pub bus_id: i64,
    pub stop_id: i64,
    pub stop_name: String,
    pub next_stop: i64,
    pub stop_type: String,
    pub a_time: String,
}

impl Default for Stop {
    fn default() -> Self {
        Stop {
            bus_id: MISSING_ID,
            stop_id: MISSING_ID,
            stop_name: MISSING_TEXT.to_string(),
            next_stop: MISSING_ID,
            stop_type: MISSING_TEXT.to_string(),
            a_time: MISSING_TEXT.to_string(),
        }
    }
}

/// Per-field defect counter, insertion-ordered for reporting.
///
/// A field enters the tally with count 0 the first time it is observed,
/// even when that observation is valid, so the report lists every field
/// the dataset ever mentioned.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct ErrorTally {
    entries: Vec<(String, usize)>,
}

impl ErrorTally {
    fn slot(&mut self, field: &str) -> &mut usize {
        if let Some(idx) = self.entries.iter().position(|(name, _)| name == field) {
            return &mut self.entries[idx].1;
        }
        self.entries.push((field.to_string(), 0));
        &mut self.entries.last_mut().unwrap().1
    }

    /// Registers a field without counting an error.
    pub fn observe(&mut self, field: &str) {
        self.slot(field);
    }

    /// Counts one defect against a field.
    pub fn record(&mut self, field: &str) {
        *self.slot(field) += 1;
    }

    pub fn count(&self, field: &str) -> usize {
        self.entries
            .iter()
            .find(|(name, _)| name == field)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn total(&self) -> usize {
        self.entries.iter().map(|(_, count)| count).sum()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, usize)> {
        self.entries
            .iter()
            .map(|(name, count)| (name.as_str(), *count))
    }
}

/// Number of records seen per bus line, in first-seen line order.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct LineCounts {
    entries: Vec<(i64, usize)>,
}

impl LineCounts {
    pub fn increment(&mut self, bus_id: i64) {
        if let Some(idx) = self.entries.iter().position(|(id, _)| *id == bus_id) {
            self.entries[idx].1 += 1;
        } else {
            self.entries.push((bus_id, 1));
        }
    }

    pub fn count(&self, bus_id: i64) -> usize {
        self.entries
            .iter()
            .find(|(id, _)| *id == bus_id)
            .map(|(_, count)| *count)
            .unwrap_or(0)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, usize)> {
        self.entries.iter().copied()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
