//! Route-level checks over the normalized stop set.
//!
//! Everything here is a pure function of the stop slice; the only mutation
//! is the arrival-time check adding into the caller's error tally.

use itertools::Itertools;
use tracing::{debug, warn};

use crate::stop::{ErrorTally, MISSING_ID, Stop};
use crate::validator::parse_arrival_time;

/// Stop names bucketed by role, each list deduplicated and sorted.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct Categories {
    pub start: Vec<String>,
    pub transfer: Vec<String>,
    pub finish: Vec<String>,
    pub on_demand: Vec<String>,
}

/// Groups stops by line in first-seen line order, preserving record order
/// within each line.
fn group_by_line(stops: &[Stop]) -> Vec<(i64, Vec<&Stop>)> {
    let mut lines: Vec<(i64, Vec<&Stop>)> = Vec::new();
    for stop in stops {
        match lines.iter_mut().find(|(id, _)| *id == stop.bus_id) {
            Some((_, members)) => members.push(stop),
            None => lines.push((stop.bus_id, vec![stop])),
        }
    }
    lines
}

/// Checks that arrival times strictly increase along each line, adding at
/// most one `a_time` error per offending line.
///
/// When a line's records do not already end at the finish stop, the route
/// order is reconstructed heuristically: sort by `next_stop` and rotate the
/// presumed start to the end. Stops whose arrival time failed validation
/// are skipped; the validator already counted them.
pub fn check_arrival_times(stops: &[Stop], tally: &mut ErrorTally) {
    for (bus_id, mut line) in group_by_line(stops) {
        if line.last().is_some_and(|s| s.stop_type != "F") {
            line.sort_by_key(|s| s.next_stop);
            line.rotate_left(1);
        }

        let mut times = line.iter().filter_map(|s| parse_arrival_time(&s.a_time));
        let Some(mut prev) = times.next() else {
            continue;
        };
        for time in times {
            if time <= prev {
                warn!(bus_id, "arrival times do not strictly increase");
                tally.record("a_time");
                break;
            }
            prev = time;
        }
    }
}

/// Verifies every line has exactly one start and one finish stop.
///
/// Returns the first offending `bus_id` in first-seen line order; callers
/// stop report production there.
pub fn check_terminals(stops: &[Stop]) -> Result<(), i64> {
    for (bus_id, line) in group_by_line(stops) {
        let starts = line.iter().filter(|s| s.stop_type == "S").count();
        let finishes = line.iter().filter(|s| s.stop_type == "F").count();
        if starts != 1 || finishes != 1 {
            warn!(bus_id, starts, finishes, "line is missing terminal stops");
            return Err(bus_id);
        }
    }
    Ok(())
}

/// Buckets stop names into start, transfer, finish, and on-demand lists.
///
/// A transfer stop is any `stop_id` (other than the sentinel) appearing in
/// more than one record, across all lines. Transfer names are excluded
/// from the on-demand list.
pub fn categorize(stops: &[Stop]) -> Categories {
    let names_of_type = |marker: &str| -> Vec<String> {
        stops
            .iter()
            .filter(|s| s.stop_type == marker)
            .map(|s| s.stop_name.clone())
            .sorted()
            .dedup()
            .collect()
    };

    let shared_ids: Vec<i64> = stops
        .iter()
        .map(|s| s.stop_id)
        .sorted()
        .dedup_with_count()
        .filter(|&(count, id)| count > 1 && id != MISSING_ID)
        .map(|(_, id)| id)
        .collect();

    let transfer: Vec<String> = stops
        .iter()
        .filter(|s| shared_ids.contains(&s.stop_id))
        .map(|s| s.stop_name.clone())
        .sorted()
        .dedup()
        .collect();

    let on_demand = stops
        .iter()
        .filter(|s| s.stop_type == "O")
        .map(|s| s.stop_name.clone())
        .filter(|name| !transfer.contains(name))
        .sorted()
        .dedup()
        .collect();

    let categories = Categories {
        start: names_of_type("S"),
        finish: names_of_type("F"),
        transfer,
        on_demand,
    };

    debug!(
        start = categories.start.len(),
        transfer = categories.transfer.len(),
        finish = categories.finish.len(),
        on_demand = categories.on_demand.len(),
        "stops categorized"
    );

    categories
}
