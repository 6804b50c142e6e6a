//! Pure hourly rollup of raw event facts.

use std::collections::{BTreeMap, HashSet};

use chrono::{DateTime, Utc};
use shopstream_core::event::{EventFact, EventType};
use shopstream_core::metrics::{AggregatedBucket, NO_PRODUCT};
use shopstream_core::time::floor_to_hour;

#[derive(Default)]
struct Tally<'a> {
    total: usize,
    sessions: HashSet<&'a str>,
    users: HashSet<i64>,
}

fn count(n: usize) -> i64 {
    i64::try_from(n).unwrap_or(i64::MAX)
}

/// Groups facts by `(hour, event type, product key)` and counts events,
/// distinct sessions and distinct users. Events without a user do not count
/// towards `unique_users`.
///
/// The output is ordered by bucket key, so equal input yields equal output.
#[must_use]
pub fn rollup(facts: &[EventFact], updated_at: DateTime<Utc>) -> Vec<AggregatedBucket> {
    let mut tallies: BTreeMap<(DateTime<Utc>, EventType, i32), Tally<'_>> = BTreeMap::new();

    for fact in facts {
        let key = (
            floor_to_hour(fact.occurred_at),
            fact.event_type,
            fact.product_id.unwrap_or(NO_PRODUCT),
        );
        let tally = tallies.entry(key).or_default();
        tally.total += 1;
        tally.sessions.insert(fact.session_id.as_str());
        if let Some(user_id) = fact.user_id {
            tally.users.insert(user_id);
        }
    }

    tallies
        .into_iter()
        .map(
            |((bucket_start, event_type, product_key), tally)| AggregatedBucket {
                bucket_start,
                event_type,
                product_key,
                total_events: count(tally.total),
                unique_sessions: count(tally.sessions.len()),
                unique_users: count(tally.users.len()),
                updated_at,
            },
        )
        .collect()
}
