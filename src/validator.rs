//! Field-level validation of raw records.
//!
//! Each record yields exactly one normalized [`Stop`]; defective fields are
//! tallied and replaced with sentinels so the route analysis never has to
//! handle missing data.

use chrono::NaiveTime;
use serde_json::Value;
use tracing::debug;

use crate::parser::RawRecord;
use crate::stop::{ErrorTally, LineCounts, MISSING_ID, NAME_SUFFIXES, Stop, VALID_STOP_TYPES};

/// Field names the validator knows how to parse. Anything else observed in
/// a record is counted as an error under its own key.
pub const RECOGNIZED_FIELDS: &[&str] = &[
    "bus_id",
    "stop_id",
    "stop_name",
    "next_stop",
    "stop_type",
    "a_time",
];

/// Everything the validation pass produces from one dataset.
#[derive(Debug, Default)]
pub struct Validation {
    pub stops: Vec<Stop>,
    pub tally: ErrorTally,
    pub line_counts: LineCounts,
}

/// Validates every record, producing one [`Stop`] per input record in input
/// order. Fields are parsed independently per record; a missing field keeps
/// its sentinel default and is not tallied.
pub fn validate(records: &[RawRecord]) -> Validation {
    let mut validation = Validation::default();

    for record in records {
        for field in record.keys() {
            validation.tally.observe(field);
            if !RECOGNIZED_FIELDS.contains(&field.as_str()) {
                validation.tally.record(field);
            }
        }

        let mut stop = Stop::default();

        if let Some(value) = record.get("bus_id") {
            match value.as_i64() {
                Some(id) => {
                    stop.bus_id = id;
                    validation.line_counts.increment(id);
                }
                None => validation.tally.record("bus_id"),
            }
        }

        if let Some(value) = record.get("stop_id") {
            match value {
                Value::Number(n) if n.is_i64() => {
                    stop.stop_id = n.as_i64().unwrap_or(MISSING_ID);
                }
                Value::String(s) => {
                    validation.tally.record("stop_id");
                    stop.stop_id = s.parse().unwrap_or(MISSING_ID);
                }
                _ => validation.tally.record("stop_id"),
            }
        }

        if let Some(value) = record.get("next_stop") {
            match value {
                Value::Number(n) if n.is_i64() => {
                    stop.next_stop = n.as_i64().unwrap_or(MISSING_ID);
                }
                Value::Number(n) => {
                    // Fractional stop references are defects, truncated on
                    // a best-effort basis.
                    validation.tally.record("next_stop");
                    stop.next_stop = n.as_f64().map(|f| f as i64).unwrap_or(MISSING_ID);
                }
                Value::String(s) => {
                    validation.tally.record("next_stop");
                    stop.next_stop = s.parse().unwrap_or(MISSING_ID);
                }
                _ => validation.tally.record("next_stop"),
            }
        }

        if let Some(value) = record.get("stop_type") {
            match value {
                Value::String(s) => {
                    if !VALID_STOP_TYPES.contains(&s.as_str()) {
                        validation.tally.record("stop_type");
                    }
                    // Stored verbatim even when invalid.
                    stop.stop_type = s.clone();
                }
                _ => validation.tally.record("stop_type"),
            }
        }

        if let Some(value) = record.get("stop_name") {
            match value {
                Value::String(s) => {
                    if !is_well_formed_name(s) {
                        validation.tally.record("stop_name");
                    }
                    stop.stop_name = s.clone();
                }
                _ => validation.tally.record("stop_name"),
            }
        }

        if let Some(value) = record.get("a_time") {
            match value {
                Value::String(s) if s.len() == 5 && parse_arrival_time(s).is_some() => {
                    stop.a_time = s.clone();
                }
                _ => validation.tally.record("a_time"),
            }
        }

        validation.stops.push(stop);
    }

    debug!(
        records = records.len(),
        errors = validation.tally.total(),
        lines = validation.line_counts.len(),
        "validation pass complete"
    );

    validation
}

/// Parses an `HH:MM` arrival time. Sentinel and malformed values yield
/// `None`.
pub fn parse_arrival_time(value: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(value, "%H:%M").ok()
}

/// A well-formed stop name is title case and carries a street-kind suffix.
fn is_well_formed_name(name: &str) -> bool {
    is_title_case(name) && NAME_SUFFIXES.iter().any(|suffix| name.ends_with(suffix))
}

/// Every whitespace-separated word starts with an uppercase letter and has
/// no further uppercase letters. Empty and all-whitespace strings fail.
fn is_title_case(name: &str) -> bool {
    let mut words = name.split_whitespace().peekable();
    if words.peek().is_none() {
        return false;
    }
    words.all(|word| {
        let mut chars = word.chars();
        chars.next().is_some_and(|c| c.is_uppercase()) && chars.all(|c| !c.is_uppercase())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_records;

    fn validate_one(json: &str) -> Validation {
        validate(&parse_records(json).unwrap())
    }

    #[test]
    fn test_one_stop_per_record_in_order() {
        let v = validate_one(
            r#"[{"bus_id": 128, "stop_id": 1}, {"bus_id": 256, "stop_id": 2}, {"bus_id": 128}]"#,
        );
        assert_eq!(v.stops.len(), 3);
        assert_eq!(v.stops[0].bus_id, 128);
        assert_eq!(v.stops[1].bus_id, 256);
        assert_eq!(v.stops[2].stop_id, MISSING_ID);
        assert_eq!(v.tally.total(), 0);
    }

    #[test]
    fn test_bus_id_must_be_integer() {
        let v = validate_one(r#"[{"bus_id": "128"}, {"bus_id": 128.0}, {"bus_id": 128}]"#);
        assert_eq!(v.tally.count("bus_id"), 2);
        assert_eq!(v.stops[0].bus_id, MISSING_ID);
        assert_eq!(v.stops[1].bus_id, MISSING_ID);
        assert_eq!(v.stops[2].bus_id, 128);
        // Only the valid record counts toward its line.
        assert_eq!(v.line_counts.count(128), 1);
    }

    #[test]
    fn test_stop_id_string_is_coerced_but_counted() {
        let v = validate_one(r#"[{"stop_id": "3"}, {"stop_id": "three"}, {"stop_id": 3}]"#);
        assert_eq!(v.tally.count("stop_id"), 2);
        assert_eq!(v.stops[0].stop_id, 3);
        assert_eq!(v.stops[1].stop_id, MISSING_ID);
        assert_eq!(v.stops[2].stop_id, 3);
    }

    #[test]
    fn test_next_stop_float_is_truncated() {
        let v = validate_one(r#"[{"next_stop": 5.7}, {"next_stop": "6"}, {"next_stop": 7}]"#);
        assert_eq!(v.tally.count("next_stop"), 2);
        assert_eq!(v.stops[0].next_stop, 5);
        assert_eq!(v.stops[1].next_stop, 6);
        assert_eq!(v.stops[2].next_stop, 7);
    }

    #[test]
    fn test_stop_type_invalid_value_is_stored_verbatim() {
        let v = validate_one(r#"[{"stop_type": "A"}, {"stop_type": ""}, {"stop_type": "S"}]"#);
        assert_eq!(v.tally.count("stop_type"), 1);
        assert_eq!(v.stops[0].stop_type, "A");
        assert_eq!(v.stops[1].stop_type, "");
        assert_eq!(v.stops[2].stop_type, "S");
    }

    #[test]
    fn test_stop_name_title_case_and_suffix() {
        assert!(is_well_formed_name("Bourbon Street"));
        assert!(!is_well_formed_name("bourbon street"));
        assert!(!is_well_formed_name("Bourbon Avenue Extra"));
        assert!(!is_well_formed_name("Sesame STREET"));
        assert!(!is_well_formed_name(""));
    }

    #[test]
    fn test_stop_name_one_error_per_record() {
        // Fails both the case check and the suffix check; still one error.
        let v = validate_one(r#"[{"stop_name": "sesame st."}]"#);
        assert_eq!(v.tally.count("stop_name"), 1);
        assert_eq!(v.stops[0].stop_name, "sesame st.");
    }

    #[test]
    fn test_a_time_length_and_format() {
        let v = validate_one(
            r#"[{"a_time": "08:12"}, {"a_time": "8:12"}, {"a_time": "25:00"}, {"a_time": "08-12"}]"#,
        );
        assert_eq!(v.tally.count("a_time"), 3);
        assert_eq!(v.stops[0].a_time, "08:12");
        assert_eq!(v.stops[1].a_time, "N/A");
        assert_eq!(v.stops[2].a_time, "N/A");
        assert_eq!(v.stops[3].a_time, "N/A");
    }

    #[test]
    fn test_unrecognized_field_is_an_error() {
        let v = validate_one(r#"[{"bus_id": 128, "colour": "red"}]"#);
        assert_eq!(v.tally.count("colour"), 1);
        assert_eq!(v.tally.total(), 1);
    }

    #[test]
    fn test_valid_fields_still_enter_the_tally() {
        let v = validate_one(r#"[{"bus_id": 128, "a_time": "08:12"}]"#);
        let fields: Vec<_> = v.tally.iter().map(|(name, _)| name.to_string()).collect();
        assert_eq!(fields, vec!["bus_id", "a_time"]);
        assert_eq!(v.tally.total(), 0);
    }

    #[test]
    fn test_error_count_bounded_by_field_occurrences() {
        let v = validate_one(
            r#"[{"bus_id": "x", "stop_name": "elm"}, {"bus_id": "y"}, {"stop_name": "oak"}]"#,
        );
        assert_eq!(v.tally.count("bus_id"), 2);
        assert_eq!(v.tally.count("stop_name"), 2);
    }

    #[test]
    fn test_line_counts_keyed_by_each_records_line() {
        let v = validate_one(
            r#"[{"bus_id": 128}, {"bus_id": 256}, {"bus_id": 128}, {"bus_id": 128}]"#,
        );
        assert_eq!(v.line_counts.count(128), 3);
        assert_eq!(v.line_counts.count(256), 1);
        let order: Vec<_> = v.line_counts.iter().map(|(id, _)| id).collect();
        assert_eq!(order, vec![128, 256]);
    }

    #[test]
    fn test_parse_arrival_time_rejects_sentinel() {
        assert!(parse_arrival_time("08:12").is_some());
        assert!(parse_arrival_time("N/A").is_none());
    }
}
