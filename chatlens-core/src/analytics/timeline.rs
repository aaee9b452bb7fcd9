//! Cumulative activity timelines
//!
//! A [`Timeline`] maps calendar days to the running total of a contributor's
//! messages. Only days with activity (plus an optional horizon day) are
//! stored; [`Timeline::value_on`] forward-fills everything in between.

use crate::error::Result;
use crate::types::Message;
use chrono::NaiveDate;
use serde::Serialize;
use std::collections::BTreeMap;

/// Per-day running total of messages.
///
/// Keys are strictly increasing and values are non-decreasing when iterated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Timeline {
    points: BTreeMap<NaiveDate, u64>,
}

impl Timeline {
    /// Build a cumulative timeline from a contributor's messages.
    ///
    /// Fails with [`crate::Error::TimestampFormat`] on the first message
    /// whose timestamp cannot be parsed.
    pub fn from_messages<'a, I>(messages: I) -> Result<Self>
    where
        I: IntoIterator<Item = &'a Message>,
    {
        let mut per_day: BTreeMap<NaiveDate, u64> = BTreeMap::new();
        for message in messages {
            *per_day.entry(message.date()?).or_insert(0) += 1;
        }
        Ok(Self::from_daily_counts(per_day))
    }

    /// Build a cumulative timeline from per-day counts.
    pub fn from_daily_counts(per_day: BTreeMap<NaiveDate, u64>) -> Self {
        let mut total = 0;
        let points = per_day
            .into_iter()
            .map(|(day, count)| {
                total += count;
                (day, total)
            })
            .collect();
        Self { points }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Number of stored days.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.points.keys().next().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.points.keys().next_back().copied()
    }

    /// Cumulative value at the last stored day (0 when empty).
    pub fn total(&self) -> u64 {
        self.points.values().next_back().copied().unwrap_or(0)
    }

    /// Value stored for exactly this day.
    pub fn get(&self, day: NaiveDate) -> Option<u64> {
        self.points.get(&day).copied()
    }

    /// Value on `day`, carried forward from the latest stored day at or
    /// before it. `None` before the first stored day.
    pub fn value_on(&self, day: NaiveDate) -> Option<u64> {
        self.points.range(..=day).next_back().map(|(_, v)| *v)
    }

    /// Iterate `(day, cumulative)` in ascending date order.
    pub fn iter(&self) -> impl Iterator<Item = (NaiveDate, u64)> + '_ {
        self.points.iter().map(|(d, v)| (*d, *v))
    }

    /// Extend the series flat up to `horizon`.
    ///
    /// Adds `horizon` with the current total when it lies after the last
    /// stored day. Empty timelines stay empty.
    pub fn extend_to(&mut self, horizon: NaiveDate) {
        if let Some(last) = self.last_date() {
            if horizon > last {
                let total = self.total();
                self.points.insert(horizon, total);
            }
        }
    }

    /// Amnesty re-basing: forget everything up to and including `cutoff`.
    ///
    /// Retained values are shifted down by the value of the first retained
    /// day, so the series restarts at zero. Returns the re-based timeline
    /// together with the shift that was subtracted (0 when nothing remains).
    pub fn rebase(&self, cutoff: NaiveDate) -> (Timeline, u64) {
        let mut retained = self
            .points
            .iter()
            .filter(|(day, _)| **day > cutoff)
            .map(|(d, v)| (*d, *v))
            .peekable();

        let base = match retained.peek() {
            Some((_, value)) => *value,
            None => return (Timeline::default(), 0),
        };

        let points = retained.map(|(day, value)| (day, value - base)).collect();
        (Timeline { points }, base)
    }
}
