//! Millisecond timeline of which entries were in flight when.
//!
//! Browsers load assets concurrently, so summing entry durations overstates
//! how long a set of assets actually took. The timeline buckets every entry
//! into each millisecond it was loading; the number of distinct buckets is
//! the wall-clock (asynchronous) load time of the set.

use crate::har::Entry;
use crate::{Error, Result};
use chrono::{DateTime, DurationRound, FixedOffset, TimeDelta};
use std::collections::BTreeMap;

/// Map from millisecond instant to the entries loading at that instant
#[derive(Debug, Default)]
pub struct AssetTimeline<'e> {
    slots: BTreeMap<DateTime<FixedOffset>, Vec<&'e Entry>>,
}

impl<'e> AssetTimeline<'e> {
    /// Number of distinct instants, i.e. the asynchronous load time in ms
    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Entries in flight at `instant`, in insertion order
    pub fn at(&self, instant: &DateTime<FixedOffset>) -> &[&'e Entry] {
        self.slots.get(instant).map_or(&[], Vec::as_slice)
    }

    /// Instants in chronological order with their in-flight entries
    pub fn iter(&self) -> impl Iterator<Item = (&DateTime<FixedOffset>, &[&'e Entry])> {
        self.slots
            .iter()
            .map(|(instant, entries)| (instant, entries.as_slice()))
    }

    /// Largest number of entries loading during the same millisecond
    pub fn peak_concurrency(&self) -> usize {
        self.slots.values().map(Vec::len).max().unwrap_or(0)
    }

    fn insert(&mut self, instant: DateTime<FixedOffset>, entry: &'e Entry) {
        self.slots.entry(instant).or_default().push(entry);
    }
}

/// Build the timeline for `entries`.
///
/// Each entry occupies `max(1, floor(time))` consecutive milliseconds starting
/// at its start time truncated to the millisecond; fractional milliseconds
/// never add a slot. Entries must
/// have a parsable start time: callers exclude the rest beforehand.
pub fn create_asset_timeline<'e, I>(entries: I) -> Result<AssetTimeline<'e>>
where
    I: IntoIterator<Item = &'e Entry>,
{
    let mut timeline = AssetTimeline::default();

    for entry in entries {
        let start = entry.start_time().ok_or_else(|| {
            Error::MissingField("entry.startedDateTime (unparsable)".to_string())
        })?;
        let start = start
            .duration_trunc(TimeDelta::milliseconds(1))
            .map_err(|e| Error::InvalidInput(format!("start time {}: {}", start, e)))?;
        let slots = (entry.time()?.floor() as i64).max(1);

        for offset in 0..slots {
            timeline.insert(start + TimeDelta::milliseconds(offset), entry);
        }
    }

    tracing::debug!(
        "Built asset timeline spanning {} ms (peak concurrency {})",
        timeline.len(),
        timeline.peak_concurrency()
    );

    Ok(timeline)
}
