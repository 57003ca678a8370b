// Copyright (c) 2025 Varshith Gudur. Licensed under AGPLv3.
//! Catch-up window math.
//!
//! A window is two day offsets relative to `today`. A date `d` is inside
//! iff `today - end_offset_days < d`, and also `d <= today - start_offset_days`
//! when a start offset is set. With no start offset the window is open
//! ended, so filings dated after `today` (after-hours submissions get the
//! next business day) still qualify. Comparison is on calendar dates only.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Window {
    pub start_offset_days: i64,
    pub end_offset_days: i64,
}

impl Window {
    pub fn new(start_offset_days: i64, end_offset_days: i64) -> Self {
        Self {
            start_offset_days: start_offset_days.max(0),
            end_offset_days: end_offset_days.max(0),
        }
    }

    /// Window covering the gap since the most recent stored filing, or the
    /// bootstrap lookback when nothing is stored yet.
    pub fn catch_up(today: NaiveDate, most_recent: Option<NaiveDate>, bootstrap_days: i64) -> Self {
        Self::new(0, catch_up_offset(today, most_recent, bootstrap_days))
    }

    /// Push the far edge further back by `days`.
    pub fn widened(self, days: i64) -> Self {
        Self::new(self.start_offset_days, self.end_offset_days.saturating_add(days.max(0)))
    }

    pub fn with_start_offset(self, start_offset_days: i64) -> Self {
        Self::new(start_offset_days, self.end_offset_days)
    }

    /// Exclusive lower bound.
    pub fn far_edge(&self, today: NaiveDate) -> NaiveDate {
        shift_back(today, self.end_offset_days)
    }

    /// Inclusive upper bound, only when a start offset is set.
    pub fn near_edge(&self, today: NaiveDate) -> Option<NaiveDate> {
        (self.start_offset_days > 0).then(|| shift_back(today, self.start_offset_days))
    }

    pub fn contains(&self, today: NaiveDate, date: NaiveDate) -> bool {
        date > self.far_edge(today) && self.near_edge(today).map_or(true, |near| date <= near)
    }
}

/// `today - most_recent` in whole days, clamped at zero; `bootstrap_days`
/// when there is no history.
pub fn catch_up_offset(today: NaiveDate, most_recent: Option<NaiveDate>, bootstrap_days: i64) -> i64 {
    match most_recent {
        Some(date) => (today - date).num_days().max(0),
        None => bootstrap_days,
    }
}

fn shift_back(today: NaiveDate, days: i64) -> NaiveDate {
    Duration::try_days(days)
        .and_then(|d| today.checked_sub_signed(d))
        .unwrap_or(NaiveDate::MIN)
}
