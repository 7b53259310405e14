// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Converting the injected [`Clock`]'s millisecond epoch into the
//! `DateTime<Utc>` the store, cron matching, and job timestamps use.

use chrono::{DateTime, TimeZone, Timelike, Utc};
use fc_core::Clock;

pub fn utc_now<C: Clock>(clock: &C) -> DateTime<Utc> {
    Utc.timestamp_millis_opt(clock.epoch_ms() as i64).single().unwrap_or_else(Utc::now)
}

/// Truncate to minute precision, the granularity cron matching and the
/// executor's idempotence-per-minute guard both operate on.
pub fn floor_to_minute(t: DateTime<Utc>) -> DateTime<Utc> {
    t - chrono::Duration::seconds(t.second() as i64) - chrono::Duration::nanoseconds(t.nanosecond() as i64)
}

#[cfg(test)]
#[path = "time_tests.rs"]
mod tests;
